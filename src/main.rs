//! geomancy: load dotenv files and validate the environment.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser};
use tracing::{debug, error};

use cli::args::Cli;
use geomancy::checks::{Check, load_checks_file};
use geomancy::config::Config;
use geomancy::dotenv::{ParseOptions, load_env};
use geomancy::env::Env;
use geomancy::{logger, paths};

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            eprintln!("Error: {err:#}");
            process::exit(1);
        }
    }
}

/// Returns `false` when any check failed.
fn run() -> Result<bool> {
    let cli = Cli::parse();

    logger::init(cli.debug).context("failed to initialise logging")?;
    debug!("CLI parsed args: {cli:?}");

    let mut env = Env::real();
    let mut config = Config::load(&env).context("failed to load settings")?;
    if cli.disable_color {
        config.term.use_color = false;
    }

    if cli.config {
        print!("{}", cli.config_format.render(&config)?);
        return Ok(true);
    }

    let count = load_env_files(&cli, &mut env)?;
    debug!("loaded {count} variables from environment files");

    let checks_files = resolve_checks_files(&cli, &config)?;
    if checks_files.is_empty() {
        error!("could not find a checks file");
        Cli::command().print_help()?;
        return Ok(true);
    }
    debug!("checking the following files: {checks_files:?}");

    let mut checks = Vec::new();
    for path in &checks_files {
        if let Some(check) = load_checks_file(path, &mut config)? {
            checks.push(check);
        }
    }

    let root = match checks.len() {
        0 => {
            let names: Vec<_> = checks_files.iter().map(|p| p.display().to_string()).collect();
            bail!(
                "no checks were found in the file{}: {}",
                if names.len() > 1 { "s" } else { "" },
                names.join(", ")
            );
        }
        1 => checks.remove(0),
        n => Check::group(format!("Checking {n} files"), checks),
    };

    // A config section in a checks file may also turn color off.
    if cli.disable_color || !config.term.use_color {
        colored::control::set_override(false);
    }

    let outcome = root.run(&env, &config.checks);
    print!("{}", cli.format.render(&outcome, &config));
    Ok(outcome.passed())
}

/// Load every `-e/--env` file into the process environment.
fn load_env_files(cli: &Cli, env: &mut Env) -> Result<usize> {
    let options = ParseOptions::default();
    let mut count = 0;
    for pattern in &cli.env {
        for path in paths::filepaths(pattern, true)? {
            count += load_env(&path, cli.overwrite, env, &options);
        }
    }
    Ok(count)
}

/// Checks files named on the command line (all required), or the existing
/// default checks files.
fn resolve_checks_files(cli: &Cli, config: &Config) -> Result<Vec<PathBuf>> {
    let (patterns, required) = if cli.checks_files.is_empty() {
        (&config.cli.checks_paths, false)
    } else {
        (&cli.checks_files, true)
    };

    let mut files = Vec::new();
    for pattern in patterns {
        for path in paths::filepaths(pattern, required)? {
            if !files.contains(&path) {
                files.push(path);
            }
        }
    }
    Ok(files)
}
