use crate::domain::EditableMapping;

use super::error::EditError;

/// Edits the display title override of a single mapping row.
#[derive(Debug, Clone)]
pub struct TitleEditor {
    committed: EditableMapping,
    draft: Option<String>,
}

impl TitleEditor {
    pub fn new(mapping: EditableMapping) -> Self {
        Self {
            committed: mapping,
            draft: None,
        }
    }

    pub fn committed(&self) -> &EditableMapping {
        &self.committed
    }

    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    pub fn draft(&self) -> Option<&str> {
        self.draft.as_deref()
    }

    /// Parameter title shown while the draft is empty.
    pub fn placeholder(&self) -> &str {
        self.committed.param.title()
    }

    pub fn open(&mut self) {
        self.draft = Some(self.committed.title.clone().unwrap_or_default());
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), EditError> {
        let draft = self.draft.as_mut().ok_or(EditError::NotEditing)?;
        *draft = title.into();
        Ok(())
    }

    /// Commits the draft. An empty draft removes the override.
    pub fn save(&mut self) -> Result<EditableMapping, EditError> {
        let title = self.draft.take().ok_or(EditError::NotEditing)?;
        let mut mapping = self.committed.clone();
        mapping.title = (!title.is_empty()).then_some(title);
        tracing::debug!(name = %mapping.name, title = ?mapping.title, "saving title");
        self.committed = mapping;
        Ok(self.committed.clone())
    }

    /// Closing by any means other than save drops the draft.
    pub fn close(&mut self) {
        self.draft = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Parameter, ParameterKind, SourceKind};
    use serde_json::Value;

    fn row(title: Option<&str>) -> EditableMapping {
        EditableMapping {
            name: "region".to_string(),
            kind: SourceKind::WidgetLevel,
            map_to: None,
            value: Value::Null,
            title: title.map(str::to_string),
            param: Parameter::new("region", ParameterKind::Text).with_title("Region"),
        }
    }

    #[test]
    fn draft_seeds_from_committed_title() {
        let mut editor = TitleEditor::new(row(Some("Area")));
        editor.open();
        assert_eq!(editor.draft(), Some("Area"));
        assert_eq!(editor.placeholder(), "Region");
    }

    #[test]
    fn save_applies_title() {
        let mut editor = TitleEditor::new(row(None));
        editor.open();
        editor.set_title("Sales region").unwrap();
        let saved = editor.save().unwrap();
        assert_eq!(saved.title.as_deref(), Some("Sales region"));
        assert_eq!(saved.display_title(), "Sales region");
        assert!(!editor.is_editing());
    }

    #[test]
    fn empty_title_falls_back_to_parameter() {
        let mut editor = TitleEditor::new(row(Some("Area")));
        editor.open();
        editor.set_title("").unwrap();
        let saved = editor.save().unwrap();
        assert_eq!(saved.title, None);
        assert_eq!(saved.display_title(), "Region");
    }

    #[test]
    fn close_discards_draft() {
        let mut editor = TitleEditor::new(row(Some("Area")));
        editor.open();
        editor.set_title("Other").unwrap();
        editor.close();
        assert_eq!(editor.committed().title.as_deref(), Some("Area"));
        assert_eq!(editor.save(), Err(EditError::NotEditing));
    }
}
