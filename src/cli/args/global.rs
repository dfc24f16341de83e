//! Global CLI options shared across all commands

use crate::cli::{Cli, OutputFormat};

/// Global CLI options passed to all command handlers.
///
/// # Precedence
///
/// CLI flag > environment variable > config file > default. This struct
/// captures the CLI/env layer; config file values are resolved later in
/// `CommandContext`.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Output format (table, json)
    pub format: OutputFormat,

    /// Buttery filter override
    pub buttery: Option<String>,

    /// Custom config file path (defaults to ~/.butteryop/config.yaml)
    pub config: Option<String>,

    /// Keep the cache in memory for this run only
    pub no_cache: bool,

    /// Custom API host for development/testing
    pub api_host: Option<String>,
}

impl GlobalOptions {
    /// Create GlobalOptions from a parsed CLI struct.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            buttery: cli.buttery.clone(),
            config: cli.config.clone(),
            no_cache: cli.no_cache,
            api_host: cli.api_host.clone(),
        }
    }

    pub fn buttery_ref(&self) -> Option<&str> {
        self.buttery.as_deref()
    }

    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }

    pub fn api_host_ref(&self) -> Option<&str> {
        self.api_host.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_from_cli() {
        let cli = Cli::parse_from([
            "butteryop",
            "--format",
            "json",
            "--buttery",
            "North",
            "--no-cache",
            "menu",
            "list",
        ]);
        let opts = GlobalOptions::from_cli(&cli);

        assert_eq!(opts.format, OutputFormat::Json);
        assert_eq!(opts.buttery_ref(), Some("North"));
        assert_eq!(opts.config_ref(), None);
        assert!(opts.no_cache);
    }

    #[test]
    fn test_defaults() {
        let opts = GlobalOptions {
            format: OutputFormat::default(),
            buttery: None,
            config: None,
            no_cache: false,
            api_host: None,
        };

        assert_eq!(opts.format, OutputFormat::Table);
        assert_eq!(opts.buttery_ref(), None);
        assert_eq!(opts.api_host_ref(), None);
    }
}
