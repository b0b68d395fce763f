// SPDX-FileCopyrightText: 2026 Carthub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Carthub - cart fleet administration service.
//!
//! This is the binary entry point for the carthub server.

mod serve;

use clap::{Parser, Subcommand};

/// Carthub - cart fleet administration service.
#[derive(Parser, Debug)]
#[command(name = "carthub", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the fleet API server.
    Serve,
    /// Print the resolved configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match carthub_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            carthub_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("carthub serve: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => match toml::to_string_pretty(&config) {
            Ok(rendered) => print!("{rendered}"),
            Err(e) => {
                eprintln!("carthub config: {e}");
                std::process::exit(1);
            }
        },
        None => {
            println!("carthub: use --help for available commands");
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use serial_test::serial;

    use super::{Cli, Commands};

    #[test]
    fn serve_subcommand_parses() {
        let cli = Cli::try_parse_from(["carthub", "serve"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Serve)));
    }

    #[test]
    fn no_subcommand_is_allowed() {
        let cli = Cli::try_parse_from(["carthub"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    #[serial]
    fn binary_loads_config_defaults() {
        // Verify config loads with defaults (no config file needed).
        let config =
            carthub_config::load_and_validate().expect("default config should be valid");
        assert_eq!(config.server.port, 5000);
    }
}
