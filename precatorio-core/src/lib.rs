//! Precatório Core - Records, Resolution and Coercion
//!
//! Canonical record types and the pure, I/O-free pieces of the crawler:
//! entity slug resolution, wire column to field mapping, and coercion of
//! raw wire values into typed fields. Every other crate depends on this.

pub mod coerce;
pub mod config;
pub mod entity;
mod entity_table;
pub mod error;
pub mod field;
pub mod filter;
pub mod record;

pub use coerce::{
    date_from_number, normalize_number, parse_date, parse_decimal, parse_integer, Coerced,
    FieldType, FieldValue, ValueCoercer, IDENTIFIER_WIDTH, TEXT_SENTINEL,
};
pub use config::{
    CrawlerConfig, LoggingConfig, PaginationConfig, SourceConfig, TransportConfig, WorkerConfig,
};
pub use entity::{slugify, EntityMapping, EntityResolver};
pub use error::{
    ConfigError, DecodeError, EntityError, PrecatorioError, PrecatorioResult, TransportCause,
    TransportError,
};
pub use field::{base_name, FieldMapper, FieldSpec, FIELD_TABLE};
pub use filter::{RecordFilter, RecordOrder, SortKey, SortOrder};
pub use record::{CanonicalField, CanonicalRecord, CSV_COLUMNS};
