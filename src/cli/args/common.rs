//! Common CLI types shared across commands

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Table format - human-readable, shows cached data while refreshing
    #[default]
    Table,
    /// JSON format - one document per command, for scripts
    Json,
}
