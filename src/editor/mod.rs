mod error;
mod list;
mod options;
mod source;
mod summary;
mod title;

pub use error::{EditError, RowError};
pub use list::MappingList;
pub use options::EditorOptions;
pub use source::{DraftPatch, SourceEditor};
pub use summary::RowSummary;
pub use title::TitleEditor;
