//! Terminal styling for status lines and summaries.

use clap::ValueEnum;
use colored::*;
use std::env;
use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Color when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn should_use_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_color_support(),
        }
    }

    /// Apply `NO_COLOR`, `CLICOLOR` and `CLICOLOR_FORCE` on top of `self`.
    pub fn with_env_overrides(self) -> Self {
        let mut mode = self;
        if env::var_os("NO_COLOR").is_some() {
            mode = Self::Never;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            mode = Self::Never;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v == "1") {
            mode = Self::Always;
        }
        mode
    }
}

pub trait OutputFormatter {
    fn success(&self, text: &str) -> String;
    fn error(&self, text: &str) -> String;
    fn warning(&self, text: &str) -> String;
    fn info(&self, text: &str) -> String;
    fn header(&self, text: &str) -> String;
}

pub struct ColoredFormatter;

impl ColoredFormatter {
    pub fn new(mode: ColorMode) -> Self {
        colored::control::set_override(mode.should_use_color());
        Self
    }
}

impl OutputFormatter for ColoredFormatter {
    fn success(&self, text: &str) -> String {
        text.green().to_string()
    }

    fn error(&self, text: &str) -> String {
        text.red().to_string()
    }

    fn warning(&self, text: &str) -> String {
        text.yellow().to_string()
    }

    fn info(&self, text: &str) -> String {
        text.cyan().to_string()
    }

    fn header(&self, text: &str) -> String {
        text.blue().bold().to_string()
    }
}

pub struct PlainFormatter;

impl OutputFormatter for PlainFormatter {
    fn success(&self, text: &str) -> String {
        text.to_string()
    }

    fn error(&self, text: &str) -> String {
        text.to_string()
    }

    fn warning(&self, text: &str) -> String {
        text.to_string()
    }

    fn info(&self, text: &str) -> String {
        text.to_string()
    }

    fn header(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Formatter for the given mode, plain when color is off.
pub fn formatter_for(mode: ColorMode) -> Box<dyn OutputFormatter> {
    if mode.should_use_color() {
        Box::new(ColoredFormatter::new(mode))
    } else {
        Box::new(PlainFormatter)
    }
}

fn detect_color_support() -> bool {
    if env::var("TERM").is_ok_and(|term| term == "dumb") {
        return false;
    }
    std::io::stdout().is_terminal()
}
