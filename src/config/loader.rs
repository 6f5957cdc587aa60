use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::ReviewConfig;
use crate::errors::ConfigError;
use tracing::{debug, warn};

pub const CONFIG_FILE_NAME: &str = ".review-council.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

fn read_config_file(path: &Path) -> Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse and validate configuration read from `path`.
pub fn parse_config(contents: &str, path: &Path) -> Result<ReviewConfig, ConfigError> {
    let config = toml::from_str::<ReviewConfig>(contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    config.validate()?;
    Ok(config)
}

/// Load an explicitly requested configuration file. Any failure is an error.
pub fn load_config_from(path: &Path) -> Result<ReviewConfig, ConfigError> {
    let contents = read_config_file(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&contents, path)?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

fn try_load_config_from_path(config_path: &Path) -> Option<ReviewConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            // A missing file just means "keep looking".
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(
                    "Failed to read config file {}: {}",
                    config_path.display(),
                    e
                );
            }
            return None;
        }
    };

    match parse_config(&contents, config_path) {
        Ok(config) => {
            debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            warn!("{}. Using defaults.", e);
            None
        }
    }
}

/// `start` and its parents, nearest first, at most `max_depth` entries.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for a configuration file.
///
/// The nearest readable, valid file wins. An invalid file is reported and
/// the search stops there with defaults.
pub fn load_config_from_dir(start: PathBuf) -> ReviewConfig {
    let found = directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|path| path.is_file());

    found
        .and_then(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            debug!(
                "No usable config found within {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            ReviewConfig::default()
        })
}

/// Discover configuration from the current directory upwards.
pub fn load_config() -> ReviewConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from_dir(dir),
        Err(e) => {
            warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            ReviewConfig::default()
        }
    }
}
