// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Larkmaster - Lark automation from plain-language requests.
//!
//! This is the binary entry point.

mod commands;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Larkmaster - Lark automation from plain-language requests.
#[derive(Parser, Debug)]
#[command(name = "larkmaster", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the default locations.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP gateway and bot webhook.
    Serve,
    /// Classify a message and print the intent without acting on it.
    Classify {
        message: String,
    },
    /// List the built-in Bitable templates.
    Templates,
    /// Design a base for a message without creating it.
    Design {
        message: String,
        /// Base name, overriding the one derived from the message.
        #[arg(long)]
        name: Option<String>,
        /// Print markdown documentation instead of the JSON design.
        #[arg(long)]
        docs: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match cli.config.as_deref() {
        Some(path) => larkmaster_config::load_and_validate_path(path),
        None => larkmaster_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            larkmaster_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => {
            serve::init_tracing(&config.agent.log_level);
            serve::run_serve(config).await
        }
        Some(Commands::Classify { message }) => commands::classify(&config, &message),
        Some(Commands::Templates) => commands::templates(),
        Some(Commands::Design {
            message,
            name,
            docs,
        }) => commands::design(&config, &message, name.as_deref(), docs),
        None => {
            println!("larkmaster: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("larkmaster: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_design_flags() {
        let cli = Cli::try_parse_from([
            "larkmaster",
            "design",
            "顧客管理テーブルを作って",
            "--name",
            "営業台帳",
            "--docs",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Design { message, name, docs }) => {
                assert_eq!(message, "顧客管理テーブルを作って");
                assert_eq!(name.as_deref(), Some("営業台帳"));
                assert!(docs);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_config_flag() {
        let cli = Cli::try_parse_from(["larkmaster", "templates", "-c", "/tmp/lm.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/lm.toml")));
        assert!(matches!(cli.command, Some(Commands::Templates)));
    }

    #[test]
    fn classify_requires_message() {
        assert!(Cli::try_parse_from(["larkmaster", "classify"]).is_err());
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config =
            larkmaster_config::load_and_validate_str("").expect("default config should be valid");
        assert_eq!(config.agent.name, "larkmaster");
    }
}
