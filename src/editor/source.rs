use serde_json::Value;

use crate::domain::{EditableMapping, SourceKind, is_empty_value};

use super::{
    error::{EditError, RowError},
    options::EditorOptions,
};

/// Partial update of a source draft. Fields left as `None` are untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftPatch {
    pub kind: Option<SourceKind>,
    pub map_to: Option<Option<String>>,
    pub value: Option<Value>,
}

impl DraftPatch {
    pub fn kind(kind: SourceKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn map_to(map_to: Option<String>) -> Self {
        Self {
            map_to: Some(map_to),
            ..Self::default()
        }
    }

    pub fn value(value: Value) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }

    pub fn with_map_to(mut self, map_to: Option<String>) -> Self {
        self.map_to = Some(map_to);
        self
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }
}

#[derive(Debug, Clone)]
struct SourceDraft {
    mapping: EditableMapping,
    original_map_to: Option<String>,
    existing_names: Vec<String>,
    error: Option<RowError>,
}

#[derive(Debug, Clone)]
enum SourceState {
    Viewing,
    Editing(Box<SourceDraft>),
}

/// Edits the value source of a single mapping row.
///
/// Changes are collected on a draft opened with [`SourceEditor::open`] and
/// only reach the committed mapping through [`SourceEditor::save`].
#[derive(Debug, Clone)]
pub struct SourceEditor {
    committed: EditableMapping,
    reject_empty_static_value: bool,
    state: SourceState,
}

impl SourceEditor {
    pub fn new(mapping: EditableMapping, options: &EditorOptions) -> Self {
        Self {
            committed: mapping,
            reject_empty_static_value: options.reject_empty_static_value,
            state: SourceState::Viewing,
        }
    }

    pub fn committed(&self) -> &EditableMapping {
        &self.committed
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, SourceState::Editing(_))
    }

    pub fn draft(&self) -> Option<&EditableMapping> {
        match &self.state {
            SourceState::Editing(draft) => Some(&draft.mapping),
            SourceState::Viewing => None,
        }
    }

    /// Inline message raised by the last edit, if any.
    pub fn error(&self) -> Option<RowError> {
        match &self.state {
            SourceState::Editing(draft) => draft.error,
            SourceState::Viewing => None,
        }
    }

    /// Existing dashboard parameter names captured when the draft was opened.
    pub fn existing_names(&self) -> &[String] {
        match &self.state {
            SourceState::Editing(draft) => &draft.existing_names,
            SourceState::Viewing => &[],
        }
    }

    /// Starts a fresh draft from the committed mapping. Reopening discards
    /// any draft in progress.
    pub fn open(&mut self, existing_names: &[String]) {
        tracing::debug!(name = %self.committed.name, "opening source editor");
        self.state = SourceState::Editing(Box::new(SourceDraft {
            mapping: self.committed.clone(),
            original_map_to: self.committed.map_to.clone(),
            existing_names: existing_names.to_vec(),
            error: None,
        }));
    }

    /// Merges the given fields into the draft.
    pub fn apply_draft_patch(&mut self, patch: DraftPatch) -> Result<(), EditError> {
        let draft = self.draft_mut()?;
        if let Some(kind) = patch.kind {
            draft.mapping.kind = kind;
        }
        if let Some(map_to) = patch.map_to {
            draft.mapping.map_to = map_to;
        }
        if let Some(value) = patch.value {
            draft.mapping.value = value;
        }
        Ok(())
    }

    pub fn select_source(&mut self, kind: SourceKind) -> Result<(), EditError> {
        let draft = self.draft_mut()?;
        draft.error = None;

        let mut map_to = draft.original_map_to.clone();
        if kind == SourceKind::DashboardMapToExisting
            && !map_to
                .as_ref()
                .is_some_and(|name| draft.existing_names.contains(name))
        {
            map_to = draft.existing_names.first().cloned();
        }

        let patch = DraftPatch::kind(kind).with_map_to(map_to);
        if kind == SourceKind::StaticValue {
            let current = &draft.mapping;
            let seed = if is_empty_value(&current.value) {
                current.param.normalized_value().cloned().unwrap_or(Value::Null)
            } else {
                current.value.clone()
            };
            self.apply_draft_patch(patch)?;
            self.set_static_value(seed)
        } else {
            self.apply_draft_patch(patch.with_value(Value::Null))
        }
    }

    /// Name typed for a new dashboard parameter. Checked as it is typed.
    pub fn set_new_name(&mut self, name: &str) -> Result<(), EditError> {
        let draft = self.draft_mut()?;
        draft.error = if name.is_empty() {
            Some(RowError::MissingName)
        } else if draft.existing_names.iter().any(|existing| existing == name) {
            Some(RowError::DuplicateName)
        } else {
            None
        };
        self.apply_draft_patch(DraftPatch::map_to(Some(name.to_string())))
    }

    /// Target picked from the existing dashboard parameters.
    pub fn select_existing(&mut self, name: &str) -> Result<(), EditError> {
        let draft = self.draft_mut()?;
        draft.error = (!draft.existing_names.iter().any(|existing| existing == name))
            .then_some(RowError::UnknownExisting);
        self.apply_draft_patch(DraftPatch::map_to(Some(name.to_string())))
    }

    pub fn set_static_value(&mut self, value: Value) -> Result<(), EditError> {
        let reject_empty = self.reject_empty_static_value;
        let draft = self.draft_mut()?;
        draft.error = (reject_empty && is_empty_value(&value)).then_some(RowError::MissingValue);
        self.apply_draft_patch(DraftPatch::value(value))
    }

    /// Why the current draft cannot be saved, or `None` when it can.
    pub fn unfulfilled_reason(&self) -> Option<RowError> {
        let SourceState::Editing(draft) = &self.state else {
            return None;
        };
        let mapping = &draft.mapping;
        match mapping.kind {
            SourceKind::DashboardMapToExisting if draft.existing_names.is_empty() => {
                Some(RowError::NoExistingParameters)
            }
            SourceKind::DashboardMapToExisting
                if !mapping
                    .map_to
                    .as_ref()
                    .is_some_and(|name| draft.existing_names.contains(name)) =>
            {
                Some(RowError::UnknownExisting)
            }
            SourceKind::DashboardAddNew => match mapping.map_to.as_deref() {
                None | Some("") => Some(RowError::MissingName),
                Some(name) if draft.existing_names.iter().any(|n| n == name) => {
                    Some(RowError::DuplicateName)
                }
                Some(_) => None,
            },
            SourceKind::StaticValue
                if self.reject_empty_static_value && is_empty_value(&mapping.value) =>
            {
                Some(RowError::MissingValue)
            }
            _ => None,
        }
    }

    /// Whether the save action is enabled. Always false outside an edit.
    pub fn is_fulfilled(&self) -> bool {
        self.is_editing() && self.unfulfilled_reason().is_none()
    }

    /// Commits the draft and returns the new mapping for the list to apply.
    pub fn save(&mut self) -> Result<EditableMapping, EditError> {
        if !self.is_editing() {
            return Err(EditError::NotEditing);
        }
        if let Some(reason) = self.unfulfilled_reason() {
            return Err(EditError::NotFulfilled {
                name: self.committed.name.clone(),
                reason,
            });
        }
        let SourceState::Editing(draft) = std::mem::replace(&mut self.state, SourceState::Viewing)
        else {
            return Err(EditError::NotEditing);
        };
        tracing::debug!(
            name = %draft.mapping.name,
            kind = ?draft.mapping.kind,
            "saving source draft"
        );
        self.committed = draft.mapping;
        Ok(self.committed.clone())
    }

    /// Drops the draft. The committed mapping is left as it was.
    pub fn cancel(&mut self) {
        self.state = SourceState::Viewing;
    }

    fn draft_mut(&mut self) -> Result<&mut SourceDraft, EditError> {
        match &mut self.state {
            SourceState::Editing(draft) => Ok(draft.as_mut()),
            SourceState::Viewing => Err(EditError::NotEditing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Parameter, ParameterKind};
    use serde_json::json;

    fn row(kind: SourceKind, map_to: Option<&str>) -> EditableMapping {
        EditableMapping {
            name: "region".to_string(),
            kind,
            map_to: map_to.map(str::to_string),
            value: Value::Null,
            title: None,
            param: Parameter::new("region", ParameterKind::Text).with_value(json!("eu")),
        }
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn edits_require_an_open_draft() {
        let mut editor = SourceEditor::new(
            row(SourceKind::WidgetLevel, None),
            &EditorOptions::default(),
        );
        assert_eq!(
            editor.select_source(SourceKind::StaticValue),
            Err(EditError::NotEditing)
        );
        assert_eq!(editor.save(), Err(EditError::NotEditing));
        assert!(!editor.is_fulfilled());
    }

    #[test]
    fn switching_to_existing_defaults_to_first_name() {
        let mut editor = SourceEditor::new(
            row(SourceKind::DashboardAddNew, Some("fresh")),
            &EditorOptions::default(),
        );
        editor.open(&names(&["a", "b"]));
        editor.select_source(SourceKind::DashboardMapToExisting).unwrap();
        assert_eq!(editor.draft().unwrap().map_to.as_deref(), Some("a"));
    }

    #[test]
    fn switching_back_restores_original_target() {
        let mut editor = SourceEditor::new(
            row(SourceKind::DashboardMapToExisting, Some("b")),
            &EditorOptions::default(),
        );
        editor.open(&names(&["a", "b"]));
        editor.select_source(SourceKind::WidgetLevel).unwrap();
        editor.select_source(SourceKind::DashboardMapToExisting).unwrap();
        assert_eq!(editor.draft().unwrap().map_to.as_deref(), Some("b"));
    }

    #[test]
    fn static_source_seeds_parameter_value() {
        let mut editor = SourceEditor::new(
            row(SourceKind::WidgetLevel, None),
            &EditorOptions::default(),
        );
        editor.open(&[]);
        editor.select_source(SourceKind::StaticValue).unwrap();
        assert_eq!(editor.draft().unwrap().value, json!("eu"));
        editor.select_source(SourceKind::WidgetLevel).unwrap();
        assert!(editor.draft().unwrap().value.is_null());
    }

    #[test]
    fn new_name_is_checked_while_typing() {
        let mut editor = SourceEditor::new(
            row(SourceKind::DashboardAddNew, Some("x")),
            &EditorOptions::default(),
        );
        editor.open(&names(&["a"]));
        editor.set_new_name("").unwrap();
        assert_eq!(editor.error(), Some(RowError::MissingName));
        editor.set_new_name("a").unwrap();
        assert_eq!(editor.error(), Some(RowError::DuplicateName));
        editor.set_new_name("b").unwrap();
        assert_eq!(editor.error(), None);
        assert!(editor.is_fulfilled());
    }

    #[test]
    fn empty_static_value_is_allowed_unless_configured() {
        let mut lenient = SourceEditor::new(
            row(SourceKind::StaticValue, None),
            &EditorOptions::default(),
        );
        lenient.open(&[]);
        lenient.set_static_value(json!("")).unwrap();
        assert!(lenient.is_fulfilled());

        let options = EditorOptions::default().with_reject_empty_static_value(true);
        let mut strict = SourceEditor::new(row(SourceKind::StaticValue, None), &options);
        strict.open(&[]);
        strict.set_static_value(json!("")).unwrap();
        assert_eq!(strict.error(), Some(RowError::MissingValue));
        assert!(!strict.is_fulfilled());
    }

    #[test]
    fn failed_save_keeps_draft_open() {
        let mut editor = SourceEditor::new(
            row(SourceKind::DashboardAddNew, Some("a")),
            &EditorOptions::default(),
        );
        editor.open(&names(&["a"]));
        let err = editor.save().unwrap_err();
        assert_eq!(
            err,
            EditError::NotFulfilled {
                name: "region".to_string(),
                reason: RowError::DuplicateName
            }
        );
        assert!(editor.is_editing());
    }

    #[test]
    fn existing_target_must_be_a_known_name() {
        let mut editor = SourceEditor::new(
            row(SourceKind::DashboardMapToExisting, Some("a")),
            &EditorOptions::default(),
        );
        editor.open(&names(&["a", "b"]));
        editor.select_existing("typo").unwrap();
        assert_eq!(editor.error(), Some(RowError::UnknownExisting));
        assert!(!editor.is_fulfilled());
        assert_eq!(
            editor.save(),
            Err(EditError::NotFulfilled {
                name: "region".to_string(),
                reason: RowError::UnknownExisting
            })
        );

        editor.select_existing("b").unwrap();
        assert_eq!(editor.error(), None);
        assert_eq!(editor.save().unwrap().map_to.as_deref(), Some("b"));
    }

    #[test]
    fn save_commits_draft() {
        let mut editor = SourceEditor::new(
            row(SourceKind::WidgetLevel, None),
            &EditorOptions::default(),
        );
        editor.open(&[]);
        editor.select_source(SourceKind::DashboardAddNew).unwrap();
        editor.set_new_name("region_all").unwrap();
        let saved = editor.save().unwrap();
        assert_eq!(saved.kind, SourceKind::DashboardAddNew);
        assert_eq!(saved.map_to.as_deref(), Some("region_all"));
        assert_eq!(editor.committed(), &saved);
        assert!(!editor.is_editing());
    }
}
