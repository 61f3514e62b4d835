//! Screensaver CLI - serve the page and inspect its configuration.

use clap::{Parser, Subcommand};
use screensaver_core::{ConfigError, Defaults, UnknownKind, WidgetKind};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

mod keys;
mod server;

#[derive(Parser)]
#[command(name = "screensaver")]
#[command(about = "Screensaver backgrounds CLI")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve a directory with caching disabled
    Serve {
        /// Port to serve on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Directory to serve (default: www)
        #[arg(short, long, default_value = "www")]
        dir: PathBuf,
    },
    /// Validate a defaults file
    Check {
        /// Defaults file to validate
        #[arg(default_value = "defaults.yaml")]
        file: PathBuf,
    },
    /// List storage keys and defaults of a screensaver kind
    Keys {
        /// Kind identifier (linear-gradient, conic-gradient, color-cycle, solid-color)
        kind: String,

        /// Defaults file to read instead of the built-ins
        #[arg(short, long)]
        defaults: Option<PathBuf>,
    },
    /// Print the built-in defaults as YAML
    Defaults,
}

/// CLI failures.
#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path} is invalid: {source}")]
    Config { path: PathBuf, source: ConfigError },
    #[error(transparent)]
    Defaults(#[from] ConfigError),
    #[error(transparent)]
    Kind(#[from] UnknownKind),
    #[error("failed to start server on {addr}: {message}")]
    Bind { addr: String, message: String },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { port, dir } => server::serve(port, &dir),
        Commands::Check { file } => check_defaults(&file),
        Commands::Keys { kind, defaults } => list_keys(&kind, defaults.as_deref()),
        Commands::Defaults => print_defaults(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn load_defaults(path: &Path) -> Result<Defaults, CliError> {
    let content = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Defaults::from_yaml(&content).map_err(|source| CliError::Config {
        path: path.to_path_buf(),
        source,
    })
}

fn check_defaults(path: &Path) -> Result<(), CliError> {
    println!("Checking defaults: {}", path.display());
    let defaults = load_defaults(path)?;
    println!("Defaults valid!");
    for kind in WidgetKind::ALL {
        let speed = defaults
            .speed(kind)
            .map_or_else(|| "-".to_string(), |s| s.to_string());
        println!(
            "  {:<16} colors: {:<2} speed: {speed}",
            kind.as_str(),
            defaults.palette(kind).len()
        );
    }
    Ok(())
}

fn list_keys(kind: &str, defaults_path: Option<&Path>) -> Result<(), CliError> {
    let kind = kind.parse::<WidgetKind>()?;
    let defaults = match defaults_path {
        Some(path) => load_defaults(path)?,
        None => Defaults::default(),
    };
    for (key, default) in keys::storage_keys(kind, &defaults) {
        println!("{key:<48} {default}");
    }
    Ok(())
}

fn print_defaults() -> Result<(), CliError> {
    print!("{}", Defaults::default().to_yaml()?);
    Ok(())
}
