use std::fmt;

use indexmap::IndexMap;

use crate::{
    convert::to_persisted,
    domain::{EditableMapping, PersistedMapping},
};

use super::{
    error::EditError, options::EditorOptions, source::SourceEditor, summary::RowSummary,
    title::TitleEditor,
};

type ChangeNotifier = Box<dyn FnMut(&[EditableMapping])>;

/// Ordered mappings of one widget. Committed row edits replace the whole
/// collection and are reported to the change notifier.
pub struct MappingList {
    mappings: Vec<EditableMapping>,
    on_change: ChangeNotifier,
}

impl fmt::Debug for MappingList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingList")
            .field("mappings", &self.mappings)
            .finish_non_exhaustive()
    }
}

impl MappingList {
    pub fn new(mappings: Vec<EditableMapping>) -> Self {
        Self {
            mappings,
            on_change: Box::new(|_: &[EditableMapping]| {}),
        }
    }

    pub fn with_on_change(mut self, on_change: impl FnMut(&[EditableMapping]) + 'static) -> Self {
        self.on_change = Box::new(on_change);
        self
    }

    pub fn mappings(&self) -> &[EditableMapping] {
        &self.mappings
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&EditableMapping> {
        self.mappings.get(index)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.mappings.iter().position(|mapping| mapping.name == name)
    }

    /// Replaces `old` with `new`, or appends `new` when `old` is not present.
    pub fn apply_edit(&mut self, old: &EditableMapping, new: EditableMapping) {
        let mut next = self.mappings.clone();
        match next.iter().position(|mapping| mapping == old) {
            Some(index) => next[index] = new,
            None => {
                tracing::warn!(name = %old.name, "edited mapping not found, appending");
                next.push(new);
            }
        }
        self.mappings = next;
        (self.on_change)(&self.mappings);
    }

    pub fn source_editor(
        &self,
        index: usize,
        options: &EditorOptions,
    ) -> Result<SourceEditor, EditError> {
        let mapping = self.row(index)?;
        Ok(SourceEditor::new(mapping.clone(), options))
    }

    pub fn title_editor(&self, index: usize) -> Result<TitleEditor, EditError> {
        let mapping = self.row(index)?;
        Ok(TitleEditor::new(mapping.clone()))
    }

    /// Saves the editor's draft and applies it to the collection.
    pub fn commit_source(&mut self, editor: &mut SourceEditor) -> Result<(), EditError> {
        let old = editor.committed().clone();
        let new = editor.save()?;
        self.apply_edit(&old, new);
        Ok(())
    }

    pub fn commit_title(&mut self, editor: &mut TitleEditor) -> Result<(), EditError> {
        let old = editor.committed().clone();
        let new = editor.save()?;
        self.apply_edit(&old, new);
        Ok(())
    }

    pub fn to_persisted(&self) -> IndexMap<String, PersistedMapping> {
        to_persisted(&self.mappings)
    }

    pub fn summaries(&self) -> Vec<RowSummary> {
        self.mappings.iter().map(RowSummary::from_mapping).collect()
    }

    fn row(&self, index: usize) -> Result<&EditableMapping, EditError> {
        self.mappings
            .get(index)
            .ok_or(EditError::RowOutOfRange { index })
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::domain::{Parameter, ParameterKind, SourceKind};
    use serde_json::Value;

    fn row(name: &str) -> EditableMapping {
        EditableMapping {
            name: name.to_string(),
            kind: SourceKind::WidgetLevel,
            map_to: None,
            value: Value::Null,
            title: None,
            param: Parameter::new(name, ParameterKind::Text),
        }
    }

    #[test]
    fn apply_edit_replaces_in_place_and_notifies_once() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        let mut list = MappingList::new(vec![row("a"), row("b"), row("c")])
            .with_on_change(move |mappings| sink.borrow_mut().push(mappings.to_vec()));

        let old = list.get(1).cloned().unwrap();
        let mut new = old.clone();
        new.title = Some("Bee".to_string());
        list.apply_edit(&old, new.clone());

        let names: Vec<_> = list.mappings().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(list.get(1), Some(&new));
        let calls = calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], list.mappings());
    }

    #[test]
    fn apply_edit_appends_unknown_rows() {
        let mut list = MappingList::new(vec![row("a")]);
        list.apply_edit(&row("ghost"), row("z"));
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(1).map(|m| m.name.as_str()), Some("z"));
    }

    #[test]
    fn editors_reject_out_of_range_rows() {
        let list = MappingList::new(vec![row("a")]);
        assert_eq!(
            list.title_editor(3).unwrap_err(),
            EditError::RowOutOfRange { index: 3 }
        );
    }

    #[test]
    fn commit_title_routes_through_apply_edit() {
        let mut list = MappingList::new(vec![row("a"), row("b")]);
        let mut editor = list.title_editor(0).unwrap();
        editor.open();
        editor.set_title("Alpha").unwrap();
        list.commit_title(&mut editor).unwrap();
        assert_eq!(list.get(0).unwrap().title.as_deref(), Some("Alpha"));
        assert_eq!(list.len(), 2);
    }
}
