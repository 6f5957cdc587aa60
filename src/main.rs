use anyhow::Result;
use clap::Parser;
use review_council::cli::{Cli, Commands};
use review_council::commands;
use review_council::formatting;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.global.verbosity);
    formatting::apply_color_override(cli.global.formatting());

    match cli.command {
        Commands::Review(args) => commands::review::handle_review(args, &cli.global),
        Commands::Batch(args) => commands::batch::handle_batch(args, &cli.global),
        Commands::Demo(args) => commands::demo::handle_demo(args, &cli.global),
        Commands::Init { force } => commands::init::init_config(force),
    }
}

// RUST_LOG wins over -v
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
