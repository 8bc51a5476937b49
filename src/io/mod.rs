mod document;
mod format;
mod input;
mod output;

pub use document::{DocumentError, MappingDocument, document_schema, load_document};
pub use format::DocumentFormat;
pub use input::{parse_document_any, parse_document_str};
pub use output::{OutputDestination, OutputOptions, emit, serialize_value};
