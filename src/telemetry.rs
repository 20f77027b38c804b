//! Tracing setup for the agent binary
//!
//! - `LOG_FORMAT`: `json`, `pretty` or `compact` (default)
//! - `RUST_LOG`: replaces the default filter entirely

use std::env;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "info,a2a_mesh=debug,hyper=warn,reqwest=warn";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Compact,
        }
    }
}

fn filter(rust_log: Option<String>) -> EnvFilter {
    match rust_log {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::new(DEFAULT_FILTER),
    }
}

/// Install the global subscriber
pub fn init(format: LogFormat) {
    let subscriber = tracing_subscriber::registry().with(filter(env::var("RUST_LOG").ok()));

    match format {
        LogFormat::Json => subscriber.with(fmt::layer().json()).init(),
        LogFormat::Pretty => subscriber.with(fmt::layer().pretty().with_ansi(true)).init(),
        LogFormat::Compact => subscriber
            .with(fmt::layer().compact().with_target(false))
            .init(),
    }
}

/// Install the global subscriber using `LOG_FORMAT`
pub fn init_from_env() {
    let format = env::var("LOG_FORMAT")
        .map(|s| LogFormat::parse(&s))
        .unwrap_or(LogFormat::Compact);
    init(format);
}
