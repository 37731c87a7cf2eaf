//! Tracing subscriber setup for the Lambda binary.
//!
//! `LOG_FORMAT` picks JSON lines (the default, suited to CloudWatch) or the
//! human-readable pretty format for local runs. `RUST_LOG` overrides the
//! default `info` filter.

use tracing_subscriber::EnvFilter;

pub const LOG_FORMAT_VAR: &str = "LOG_FORMAT";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl LogFormat {
    /// Unknown values fall back to JSON with a warning on stderr.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            other => {
                eprintln!("WARNING: unknown {LOG_FORMAT_VAR}={other:?}, falling back to json");
                Self::Json
            }
        }
    }

    pub fn from_env() -> Self {
        std::env::var(LOG_FORMAT_VAR)
            .map(|value| Self::parse(&value))
            .unwrap_or_default()
    }
}

pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let result = match format {
        LogFormat::Json => builder
            .json()
            .flatten_event(true)
            .with_current_span(false)
            .with_ansi(false)
            .try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };

    if let Err(error) = result {
        eprintln!("WARNING: tracing subscriber was not installed: {error}");
    }
}
