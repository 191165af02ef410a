//! Error types for crawler operations

use thiserror::Error;

/// Configuration errors. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Malformed request template: {reason}")]
    MalformedTemplate { reason: String },
}

/// Entity resolution errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EntityError {
    #[error("Unknown entity '{input}' (normalized slug '{slug}')")]
    UnknownEntity { input: String, slug: String },
}

/// Why a single page request failed after the retry budget was spent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportCause {
    #[error("network error: {reason}")]
    Network { reason: String },

    #[error("timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response body is not valid JSON: {reason}")]
    InvalidBody { reason: String },
}

impl TransportCause {
    /// Network errors, timeouts, 5xx and 429 are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportCause::Network { .. } | TransportCause::Timeout { .. } => true,
            TransportCause::Status { status, .. } => *status == 429 || *status >= 500,
            TransportCause::InvalidBody { .. } => false,
        }
    }
}

/// Terminal failure fetching one page.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Transport failed for page {page} after {attempts} attempt(s): {cause}")]
pub struct TransportError {
    pub page: u32,
    pub attempts: u32,
    pub cause: TransportCause,
}

/// Page-structural decode failures. The page is discarded, the crawl continues.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Page carries no data: missing {missing}")]
    NoData { missing: &'static str },

    #[error("Page has no column descriptor list")]
    MissingDescriptor,

    #[error("First row of page carries no schema")]
    MissingSchema,

    #[error("Row schema has {schema} entries but {columns} columns were described")]
    SchemaMismatch { columns: usize, schema: usize },

    #[error("Malformed page: {reason}")]
    Malformed { reason: String },
}

/// Master error type for all crawler errors.
#[derive(Debug, Error)]
pub enum PrecatorioError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Entity(#[from] EntityError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Sink error: {reason}")]
    Sink { reason: String },

    #[error("Crawl worker failed: {reason}")]
    Worker { reason: String },

    #[error("Telemetry setup failed: {reason}")]
    Telemetry { reason: String },
}

/// Result type alias for crawler operations.
pub type PrecatorioResult<T> = Result<T, PrecatorioError>;

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_cause_retryable() {
        assert!(TransportCause::Network {
            reason: "reset".to_string()
        }
        .is_retryable());
        assert!(TransportCause::Timeout { after_ms: 30_000 }.is_retryable());
        assert!(TransportCause::Status {
            status: 503,
            body: String::new()
        }
        .is_retryable());
        assert!(TransportCause::Status {
            status: 429,
            body: String::new()
        }
        .is_retryable());
        assert!(!TransportCause::Status {
            status: 400,
            body: String::new()
        }
        .is_retryable());
        assert!(!TransportCause::InvalidBody {
            reason: "eof".to_string()
        }
        .is_retryable());
    }

    #[test]
    fn test_master_error_from_entity_error() {
        let err: PrecatorioError = EntityError::UnknownEntity {
            input: "Nowhere".to_string(),
            slug: "nowhere".to_string(),
        }
        .into();
        assert!(matches!(err, PrecatorioError::Entity(_)));
        assert!(err.to_string().contains("nowhere"));
    }

    #[test]
    fn test_transport_error_display() {
        let err = TransportError {
            page: 3,
            attempts: 3,
            cause: TransportCause::Timeout { after_ms: 30_000 },
        };
        assert_eq!(
            err.to_string(),
            "Transport failed for page 3 after 3 attempt(s): timed out after 30000ms"
        );
    }
}
