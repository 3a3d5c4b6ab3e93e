//! Logging setup
//!
//! Hosts call [`init_logging`] once at startup. Library code only emits
//! `tracing` events and never installs a subscriber itself.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use posefx_core::{PosefxError, PosefxResult};

/// Subscriber configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directives, e.g. `info,posefx_runtime=debug`.
    /// `RUST_LOG` wins when set.
    pub filter: String,
    /// Emit one JSON object per event
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

impl LoggingConfig {
    fn env_filter(&self) -> PosefxResult<EnvFilter> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(&self.filter)
                .map_err(|e| PosefxError::InvalidConfig(format!("log filter: {}", e))),
        }
    }
}

/// Install the global subscriber
///
/// Fails if the filter does not parse or a subscriber is already set.
pub fn init_logging(config: &LoggingConfig) -> PosefxResult<()> {
    let filter = config.env_filter()?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if config.json {
        builder.json().with_current_span(false).try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| PosefxError::Config(format!("logging already initialized: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.filter, "info");
        assert!(!config.json);
    }

    #[test]
    fn test_bad_filter_rejected() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = LoggingConfig {
            filter: "posefx=notalevel".into(),
            json: false,
        };
        assert!(matches!(
            config.env_filter(),
            Err(PosefxError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_second_init_fails() {
        let config = LoggingConfig {
            filter: "warn".into(),
            json: true,
        };
        assert!(init_logging(&config).is_ok());
        assert!(matches!(init_logging(&config), Err(PosefxError::Config(_))));
    }
}
