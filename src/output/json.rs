//! JSON output formatting

use chrono::Utc;
use serde::Serialize;

/// Where the printed data came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "source")]
pub enum DataSource {
    /// Fetched from the backend just now
    Live,
    /// Read from the local cache
    Cache {
        /// Age of the cached copy in seconds
        age_secs: u64,
    },
    /// Produced locally (config, cache bookkeeping)
    Local,
}

/// Wrapper for JSON output with metadata
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    /// The actual data
    pub data: T,

    /// Metadata about the response
    pub meta: Metadata,
}

/// Metadata included in JSON output
#[derive(Debug, Serialize)]
pub struct Metadata {
    /// When this output was produced
    pub timestamp: String,

    /// CLI version
    pub version: String,

    #[serde(flatten)]
    pub source: DataSource,
}

impl<T> JsonOutput<T> {
    pub fn new(data: T, source: DataSource) -> Self {
        Self {
            data,
            meta: Metadata {
                timestamp: Utc::now().to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                source,
            },
        }
    }
}

/// Format data as pretty-printed JSON
pub fn format_json<T: Serialize + ?Sized>(
    data: &T,
    source: DataSource,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonOutput::new(data, source))
}
