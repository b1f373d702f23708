use std::env;

use crmsync_core::export::DEFAULT_EXPORT_FILENAME;

use crate::query::{DEFAULT_EVENT_CAPACITY, DEFAULT_RETRIES};

/// Default log filter when neither `RUST_LOG` nor `CRMSYNC_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "crmsync=info";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Tracing filter directive (default: "crmsync=info")
    pub log_filter: String,
    /// Load the twelve demo customers at start-up (default: true)
    pub seed_demo_data: bool,
    /// Extra attempts after a failed cached read (default: 1)
    pub query_retries: u32,
    /// Capacity of the cache and mutation event channels (default: 100)
    pub event_channel_capacity: usize,
    /// File name used by `export` when no path is given (default: "clientes.csv")
    pub export_filename: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CRMSYNC_LOG` - Tracing filter, overridden by `RUST_LOG` (default: "crmsync=info")
    /// - `CRMSYNC_SEED_DEMO_DATA` - Seed demo customers (default: true)
    /// - `CRMSYNC_QUERY_RETRIES` - Read retries (default: 1)
    /// - `CRMSYNC_EVENT_CHANNEL_CAPACITY` - Event channel capacity (default: 100)
    /// - `CRMSYNC_EXPORT_FILENAME` - Export file name (default: "clientes.csv")
    pub fn from_env() -> Self {
        Self {
            log_filter: env::var("CRMSYNC_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
            seed_demo_data: env::var("CRMSYNC_SEED_DEMO_DATA")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(true),
            query_retries: env::var("CRMSYNC_QUERY_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RETRIES),
            event_channel_capacity: env::var("CRMSYNC_EVENT_CHANNEL_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|capacity| *capacity > 0)
                .unwrap_or(DEFAULT_EVENT_CAPACITY),
            export_filename: env::var("CRMSYNC_EXPORT_FILENAME")
                .unwrap_or_else(|_| DEFAULT_EXPORT_FILENAME.to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            seed_demo_data: true,
            query_retries: DEFAULT_RETRIES,
            event_channel_capacity: DEFAULT_EVENT_CAPACITY,
            export_filename: DEFAULT_EXPORT_FILENAME.to_string(),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
