use crate::core::{Severity, TaskLabel};
use colored::*;
use std::env;
use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorMode {
    Auto,   // Detect based on terminal
    Always, // Force colors on
    Never,  // Force colors off
}

impl ColorMode {
    pub fn should_use_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_color_support(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum EmojiMode {
    Auto,
    Always,
    Never,
}

impl EmojiMode {
    pub fn should_use_emoji(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_color_support(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormattingConfig {
    pub color: ColorMode,
    pub emoji: EmojiMode,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::Auto,
            emoji: EmojiMode::Auto,
        }
    }
}

impl FormattingConfig {
    pub fn new(color: ColorMode, emoji: EmojiMode) -> Self {
        Self { color, emoji }
    }

    /// Defaults adjusted by `NO_COLOR`, `CLICOLOR` and `CLICOLOR_FORCE`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if env::var("NO_COLOR").is_ok() {
            config.color = ColorMode::Never;
        }
        if env::var("CLICOLOR").is_ok_and(|val| val == "0") {
            config.color = ColorMode::Never;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|val| val == "1") {
            config.color = ColorMode::Always;
        }

        config
    }

    /// ASCII-only output with no colors and no emoji.
    pub fn plain() -> Self {
        Self {
            color: ColorMode::Never,
            emoji: EmojiMode::Never,
        }
    }
}

/// Pictograms used in the terminal summary, each with an ASCII fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Summary,
    Total,
    ByTask,
    Severity,
    KeyFindings,
    Done,
    Bullet,
    Task(TaskLabel),
    Level(Severity),
}

impl Icon {
    /// `(emoji, fallback)` pair for this icon.
    pub fn glyphs(&self) -> (&'static str, &'static str) {
        match self {
            Self::Summary => ("📊", "[SUMMARY]"),
            Self::Total => ("📈", "[TOTAL]"),
            Self::ByTask => ("🔍", "[BY TASK]"),
            Self::Severity => ("⚠️ ", "[SEVERITY]"),
            Self::KeyFindings => ("💡", "[KEY FINDINGS]"),
            Self::Done => ("✅", "[DONE]"),
            Self::Bullet => ("•", "-"),
            Self::Task(task) => match task {
                TaskLabel::SyntaxLogic => ("🐛", "-"),
                TaskLabel::Security => ("🔒", "-"),
                TaskLabel::Performance => ("⚡", "-"),
                TaskLabel::Architecture => ("🏗️", "-"),
                TaskLabel::Testing => ("🧪", "-"),
                TaskLabel::Documentation => ("📝", "-"),
            },
            Self::Level(severity) => match severity {
                Severity::Critical => ("🔴", "[!]"),
                Severity::Warning => ("🟡", "[~]"),
                Severity::Suggestion => ("🟢", "[.]"),
            },
        }
    }
}

pub trait OutputFormatter {
    fn header(&self, text: &str) -> String;
    fn bold(&self, text: &str) -> String;
    fn dim(&self, text: &str) -> String;
    fn success(&self, text: &str) -> String;

    /// Color `text` by severity.
    fn severity(&self, severity: Severity, text: &str) -> String;

    fn icon(&self, icon: Icon) -> String;
}

pub struct ColoredFormatter {
    color: bool,
    emoji: bool,
}

impl ColoredFormatter {
    pub fn new(config: FormattingConfig) -> Self {
        Self {
            color: config.color.should_use_color(),
            emoji: config.emoji.should_use_emoji(),
        }
    }

    fn paint(&self, text: &str, style: impl FnOnce(&str) -> ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}

impl OutputFormatter for ColoredFormatter {
    fn header(&self, text: &str) -> String {
        self.paint(text, |t| t.blue().bold())
    }

    fn bold(&self, text: &str) -> String {
        self.paint(text, |t| t.bold())
    }

    fn dim(&self, text: &str) -> String {
        self.paint(text, |t| t.dimmed())
    }

    fn success(&self, text: &str) -> String {
        self.paint(text, |t| t.green())
    }

    fn severity(&self, severity: Severity, text: &str) -> String {
        match severity {
            Severity::Critical => self.paint(text, |t| t.red().bold()),
            Severity::Warning => self.paint(text, |t| t.yellow()),
            Severity::Suggestion => self.paint(text, |t| t.green()),
        }
    }

    fn icon(&self, icon: Icon) -> String {
        let (emoji, fallback) = icon.glyphs();
        let glyph = if self.emoji { emoji } else { fallback };
        glyph.to_string()
    }
}

pub struct PlainFormatter;

impl OutputFormatter for PlainFormatter {
    fn header(&self, text: &str) -> String {
        text.to_string()
    }

    fn bold(&self, text: &str) -> String {
        text.to_string()
    }

    fn dim(&self, text: &str) -> String {
        text.to_string()
    }

    fn success(&self, text: &str) -> String {
        text.to_string()
    }

    fn severity(&self, _severity: Severity, text: &str) -> String {
        text.to_string()
    }

    fn icon(&self, icon: Icon) -> String {
        icon.glyphs().1.to_string()
    }
}

/// Plain formatter for [`FormattingConfig::plain`], colored otherwise.
pub fn formatter_for(config: FormattingConfig) -> Box<dyn OutputFormatter> {
    if config == FormattingConfig::plain() {
        Box::new(PlainFormatter)
    } else {
        Box::new(ColoredFormatter::new(config))
    }
}

/// Pin the process-wide `colored` switch to the resolved color mode.
///
/// Call once at startup, before any formatter paints.
pub fn apply_color_override(config: FormattingConfig) {
    colored::control::set_override(config.color.should_use_color());
}

fn detect_color_support() -> bool {
    if env::var("TERM").is_ok_and(|term| term == "dumb") {
        return false;
    }
    std::io::stdout().is_terminal()
}
