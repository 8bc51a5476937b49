use thiserror::Error;

use crate::{
    convert::{MappingError, to_editable_with},
    editor::{EditError, EditorOptions, MappingList, RowSummary, SourceEditor},
    io::MappingDocument,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Mapping(#[from] MappingError),
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error("widget has no mapping for parameter '{name}'")]
    UnknownMapping { name: String },
}

/// One edit session over a widget's mappings: converts the stored mappings
/// on open and converts them back with [`MappingSession::into_document`].
#[derive(Debug)]
pub struct MappingSession {
    document: MappingDocument,
    options: EditorOptions,
    list: MappingList,
}

impl MappingSession {
    pub fn open(document: MappingDocument, options: EditorOptions) -> Result<Self, SessionError> {
        let rows = to_editable_with(
            document.mappings.values(),
            &document.parameters,
            &document.existing_names,
            options.missing_parameter,
        )?;
        Ok(Self {
            document,
            options,
            list: MappingList::new(rows),
        })
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn existing_names(&self) -> &[String] {
        &self.document.existing_names
    }

    pub fn list(&self) -> &MappingList {
        &self.list
    }

    pub fn summaries(&self) -> Vec<RowSummary> {
        self.list.summaries()
    }

    /// Opens the named row's source editor, lets `edit` drive it, and commits
    /// the draft. Nothing changes when `edit` or the save fails.
    pub fn edit_source<F>(&mut self, name: &str, edit: F) -> Result<(), SessionError>
    where
        F: FnOnce(&mut SourceEditor) -> Result<(), EditError>,
    {
        let index = self.index_of(name)?;
        let mut editor = self.list.source_editor(index, &self.options)?;
        editor.open(&self.document.existing_names);
        if let Err(err) = edit(&mut editor) {
            editor.cancel();
            return Err(err.into());
        }
        self.list.commit_source(&mut editor)?;
        Ok(())
    }

    pub fn set_title(&mut self, name: &str, title: &str) -> Result<(), SessionError> {
        let index = self.index_of(name)?;
        let mut editor = self.list.title_editor(index)?;
        editor.open();
        editor.set_title(title)?;
        self.list.commit_title(&mut editor)?;
        Ok(())
    }

    /// Ends the session, storing the edited mappings back on the document.
    /// Mappings skipped at open are kept as they were stored.
    pub fn into_document(self) -> MappingDocument {
        let mut document = self.document;
        let mut edited = self.list.to_persisted();
        for (key, stored) in document.mappings.iter_mut() {
            if let Some(mapping) = edited.shift_remove(key) {
                *stored = mapping;
            } else {
                tracing::debug!(name = %key, "keeping mapping that was not opened for editing");
            }
        }
        document.mappings.extend(edited);
        document
    }

    fn index_of(&self, name: &str) -> Result<usize, SessionError> {
        self.list
            .position(name)
            .ok_or_else(|| SessionError::UnknownMapping {
                name: name.to_string(),
            })
    }
}
