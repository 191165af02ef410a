//! Tracing subscriber setup.

use precatorio_core::{LoggingConfig, PrecatorioError, PrecatorioResult};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the filter: `RUST_LOG` when set, otherwise the configured directive.
pub fn env_filter(config: &LoggingConfig) -> PrecatorioResult<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.filter).map_err(|e| PrecatorioError::Telemetry {
            reason: format!("Invalid log filter '{}': {}", config.filter, e),
        }),
    }
}

/// Install the global tracing subscriber.
///
/// Call once at startup. Fails if a global subscriber is already set.
pub fn init_tracing(config: &LoggingConfig) -> PrecatorioResult<()> {
    let filter = env_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
    };

    result.map_err(|e| PrecatorioError::Telemetry {
        reason: format!("Failed to initialize tracing subscriber: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_filter_directive() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = LoggingConfig {
            filter: "precatorio=notalevel".to_string(),
            json: false,
        };
        assert!(matches!(
            env_filter(&config),
            Err(PrecatorioError::Telemetry { .. })
        ));
    }

    #[test]
    fn test_second_init_fails() {
        let config = LoggingConfig::default();
        let _ = init_tracing(&config);
        assert!(matches!(
            init_tracing(&config),
            Err(PrecatorioError::Telemetry { .. })
        ));
    }
}
