//! Clap argument types.

use clap::{Parser, ValueEnum};

use geomancy::checks::CheckOutcome;
use geomancy::config::Config;
use geomancy::output::OutputRenderer;
use geomancy::output::json::JsonRenderer;
use geomancy::output::terminal::TerminalRenderer;

/// Load dotenv files and check the environment against checks files.
#[derive(Parser, Debug)]
#[command(
    name = geomancy::constants::APP_NAME,
    version = geomancy::constants::VERSION,
    about = super::ABOUT,
)]
pub struct Cli {
    /// Checks files or glob patterns (default: pyproject.toml, geomancy.toml, ...).
    pub checks_files: Vec<String>,

    /// Dotenv file or glob pattern to load before running checks. Repeatable.
    #[arg(short = 'e', long = "env", value_name = "FILE")]
    pub env: Vec<String>,

    /// Overwrite variables already set in the environment.
    #[arg(long, default_value_t = false, requires = "env")]
    pub overwrite: bool,

    /// Show debug log messages.
    #[arg(short, long, default_value_t = false)]
    pub debug: bool,

    /// Disable colored output.
    #[arg(long, default_value_t = false)]
    pub disable_color: bool,

    /// Print the effective configuration and exit.
    #[arg(long, default_value_t = false)]
    pub config: bool,

    /// Format used by --config.
    #[arg(long, default_value = "toml")]
    pub config_format: ConfigFormat,

    /// Output format for check results.
    #[arg(long, default_value = "terminal")]
    pub format: OutputFormat,
}

/// Formats for printing the configuration.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
}

impl ConfigFormat {
    pub fn render(&self, config: &Config) -> Result<String, geomancy::config::ConfigError> {
        match self {
            ConfigFormat::Toml => config.to_toml(),
            ConfigFormat::Yaml => config.to_yaml(),
        }
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Terminal,
    Json,
}

impl OutputFormat {
    /// Render the outcome using the renderer for this format.
    pub fn render(&self, outcome: &CheckOutcome, config: &Config) -> String {
        match self {
            OutputFormat::Terminal => TerminalRenderer::new(&config.term).render(outcome),
            OutputFormat::Json => JsonRenderer.render(outcome),
        }
    }
}
