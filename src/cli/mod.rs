//! CLI module for the dynamic settings store
//!
//! Every subcommand loads the layered configuration, opens the configured backend
//! and performs a single operation against it.

pub mod commands;

use clap::{Parser, Subcommand};

use crate::domain::SettingKind;

/// Dynamic settings - typed runtime configuration
#[derive(Parser, Debug)]
#[command(name = "dyn-settings")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Settings backend to use (overrides `settings.backend`)
    #[arg(long, global = true)]
    pub backend: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print the current value of a setting
    Get { name: String },

    /// Update an existing setting; the text is coerced with its declared kind
    Set { name: String, value: String },

    /// Create a setting, or update it when it already exists with the same kind
    Define {
        name: String,
        /// bool, int, float, str, list or dict
        kind: SettingKind,
        value: String,
        /// Owning application
        #[arg(long)]
        app: Option<String>,
    },

    /// Remove a setting
    Delete { name: String },

    /// List settings, optionally restricted to owning applications
    List {
        #[arg(long = "app")]
        apps: Vec<String>,
    },

    /// Load every setting into the cache (cache backend only)
    Warm,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_define() {
        let cli = Cli::try_parse_from([
            "dyn-settings",
            "define",
            "retries",
            "int",
            "3",
            "--app",
            "billing",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Command::Define {
                name: "retries".to_string(),
                kind: SettingKind::Integer,
                value: "3".to_string(),
                app: Some("billing".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_rejects_unknown_kind() {
        let result = Cli::try_parse_from(["dyn-settings", "define", "x", "decimal", "1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_backend_flag() {
        let cli = Cli::try_parse_from(["dyn-settings", "list", "--app", "a", "--app", "b", "--backend", "cache"])
            .unwrap();

        assert_eq!(cli.backend.as_deref(), Some("cache"));
        assert_eq!(
            cli.command,
            Command::List {
                apps: vec!["a".to_string(), "b".to_string()]
            }
        );
    }
}
