#![deny(rust_2018_idioms)]

pub mod convert;
pub mod domain;
pub mod editor;
pub mod io;
mod session;

pub use convert::{
    MappingError, MissingParameterPolicy, find_parameter, to_editable, to_editable_with,
    to_persisted,
};
pub use domain::{
    EditableMapping, MappingType, Parameter, ParameterKind, PersistedMapping, SourceKind,
};
pub use editor::{
    DraftPatch, EditError, EditorOptions, MappingList, RowError, RowSummary, SourceEditor,
    TitleEditor,
};
pub use io::{
    DocumentError, DocumentFormat, MappingDocument, OutputDestination, OutputOptions,
    document_schema, emit, load_document, parse_document_any, parse_document_str,
};
pub use session::{MappingSession, SessionError};

pub mod prelude {
    pub use super::{
        EditorOptions, MappingDocument, MappingSession, PersistedMapping, SourceKind,
        to_editable, to_persisted,
    };
}
