//! Precatório DSR - Response Decoding
//!
//! Decodes the query endpoint's DSR envelope: a global column descriptor
//! list, page-scoped value dictionaries and a row list where each row after
//! the first only carries the columns that changed.
//!
//! Pipeline for one page:
//! 1. `ParsedPage::from_json` validates the envelope into typed structures
//! 2. `PageDecoder::decode` expands dictionary indices and repeat masks
//! 3. `RecordAssembler::assemble` maps and coerces rows into records

pub mod assemble;
pub mod decoder;
pub mod page;
pub mod wire;

pub use assemble::{AssembledPage, FieldFallback, OrdemSequence, RecordAssembler};
pub use decoder::{Cell, DecodeIssue, DecodedPage, DecodedRow, PageDecoder, RowIssue};
pub use page::{
    extract_continuation, ColumnDescriptor, ContinuationToken, ParsedPage, RawRow, RowSchema,
    SchemaSlot, ValueDictionary,
};
