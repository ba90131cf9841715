use {anyhow::Result, clap::Subcommand};

use livewatch_config::{LivewatchConfig, Severity, config_dir, find_config_file, validate};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Validate the effective configuration and report errors/warnings.
    Check,
    /// Print where configuration is looked up.
    Path,
}

pub fn handle_config(action: ConfigAction, config: &LivewatchConfig) -> Result<()> {
    match action {
        ConfigAction::Check => check(config),
        ConfigAction::Path => {
            match find_config_file() {
                Some(path) => println!("{}", path.display()),
                None => println!("no config file found"),
            }
            if let Some(dir) = config_dir() {
                println!("user config dir: {}", dir.display());
            }
            Ok(())
        },
    }
}

/// ANSI color codes.
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn check(config: &LivewatchConfig) -> Result<()> {
    if let Some(path) = find_config_file() {
        eprintln!("Checking {} (with environment overrides)\n", path.display());
    } else {
        eprintln!("No config file found; checking defaults and environment.\n");
    }

    let diagnostics = validate(config);
    for d in &diagnostics {
        let color = match d.severity {
            Severity::Error => RED,
            Severity::Warning => YELLOW,
        };
        eprintln!("  {BOLD}{color}{}{RESET} {}: {}", d.severity, d.path, d.message);
    }

    let count = |severity: Severity| diagnostics.iter().filter(|d| d.severity == severity).count();
    let errors = count(Severity::Error);
    let warnings = count(Severity::Warning);

    if !diagnostics.is_empty() {
        eprintln!();
    }
    if errors == 0 && warnings == 0 {
        eprintln!("No issues found.");
    } else {
        eprintln!("{errors} error(s), {warnings} warning(s)");
    }

    if errors > 0 {
        std::process::exit(1);
    }
    Ok(())
}
