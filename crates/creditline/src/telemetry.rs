use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    InvalidFilter { directives: String, source: ParseError },
    Install(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::InvalidFilter { directives, .. } => {
                write!(f, "log filter '{directives}' does not parse")
            }
            TelemetryError::Install(err) => {
                write!(f, "could not install tracing subscriber: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::InvalidFilter { source, .. } => Some(source),
            TelemetryError::Install(err) => Some(&**err),
        }
    }
}

/// Filter directives for the subscriber. `RUST_LOG` wins when set;
/// otherwise the configured level applies to this workspace while hyper
/// stays at warn.
fn filter_directives(config: &TelemetryConfig) -> String {
    if let Ok(directives) = std::env::var(EnvFilter::DEFAULT_ENV) {
        if !directives.trim().is_empty() {
            return directives;
        }
    }
    format!("{},hyper=warn", config.log_level)
}

/// Install the global tracing subscriber for the lending service.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let directives = filter_directives(config);
    let env_filter =
        EnvFilter::try_new(&directives).map_err(|source| TelemetryError::InvalidFilter {
            directives,
            source,
        })?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Install)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_rejects_garbage_filter() {
        std::env::remove_var(EnvFilter::DEFAULT_ENV);
        let config = TelemetryConfig {
            log_level: "not a [filter".to_string(),
        };
        match init(&config) {
            Err(TelemetryError::InvalidFilter { directives, .. }) => {
                assert!(directives.starts_with("not a [filter"));
            }
            other => panic!("expected filter error, got {other:?}"),
        }
    }

    #[test]
    fn configured_level_quiets_hyper() {
        std::env::remove_var(EnvFilter::DEFAULT_ENV);
        let config = TelemetryConfig {
            log_level: "debug".to_string(),
        };
        let directives = filter_directives(&config);
        assert!(directives.contains("debug"));
        assert!(directives.contains("hyper=warn"));
    }
}
