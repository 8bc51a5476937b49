use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::parameter::Parameter;

/// Where a mapped parameter takes its value from, in stored form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum MappingType {
    DashboardLevel,
    WidgetLevel,
    StaticValue,
}

/// Source kind while a mapping is being edited. The two dashboard variants
/// are derived from the existing dashboard parameter names at conversion time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    DashboardAddNew,
    DashboardMapToExisting,
    WidgetLevel,
    StaticValue,
}

impl SourceKind {
    pub fn label(self) -> &'static str {
        match self {
            SourceKind::DashboardAddNew => "New dashboard parameter",
            SourceKind::DashboardMapToExisting => "Existing dashboard parameter",
            SourceKind::WidgetLevel => "Widget parameter",
            SourceKind::StaticValue => "Static value",
        }
    }

    pub fn is_dashboard(self) -> bool {
        matches!(
            self,
            SourceKind::DashboardAddNew | SourceKind::DashboardMapToExisting
        )
    }

    pub fn persisted(self) -> MappingType {
        match self {
            SourceKind::DashboardAddNew | SourceKind::DashboardMapToExisting => {
                MappingType::DashboardLevel
            }
            SourceKind::WidgetLevel => MappingType::WidgetLevel,
            SourceKind::StaticValue => MappingType::StaticValue,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Durable form of a mapping, saved with the widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersistedMapping {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: MappingType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_to: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl PersistedMapping {
    pub fn dashboard(name: impl Into<String>, map_to: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: MappingType::DashboardLevel,
            map_to: Some(map_to.into()),
            value: Value::Null,
            title: None,
        }
    }

    pub fn widget(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: MappingType::WidgetLevel,
            map_to: None,
            value: Value::Null,
            title: None,
        }
    }

    pub fn static_value(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            kind: MappingType::StaticValue,
            map_to: None,
            value,
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// A mapping opened for editing, carrying its own copy of the parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct EditableMapping {
    pub name: String,
    pub kind: SourceKind,
    pub map_to: Option<String>,
    pub value: Value,
    pub title: Option<String>,
    pub param: Parameter,
}

impl EditableMapping {
    /// Title shown for the row; never written back.
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => self.param.title(),
        }
    }

    pub fn keyword(&self) -> String {
        format!("{{{{ {} }}}}", self.name)
    }

    /// The mapping's own value when set, otherwise the parameter's current value.
    pub fn default_value(&self) -> Option<&Value> {
        if super::is_empty_value(&self.value) {
            self.param.normalized_value()
        } else {
            Some(&self.value)
        }
    }
}
