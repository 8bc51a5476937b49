use serde::Serialize;
use serde_json::Value;
use unicode_width::UnicodeWidthChar;

use crate::domain::EditableMapping;

const MAX_VALUE_WIDTH: usize = 30;

/// One row of the mapping table as plain data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowSummary {
    pub name: String,
    pub title: String,
    pub keyword: String,
    pub default_value: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_to: Option<String>,
}

impl RowSummary {
    pub fn from_mapping(mapping: &EditableMapping) -> Self {
        Self {
            name: mapping.name.clone(),
            title: mapping.display_title().to_string(),
            keyword: mapping.keyword(),
            default_value: mapping
                .default_value()
                .map(|value| truncate_to_width(&display_value(value), MAX_VALUE_WIDTH))
                .unwrap_or_default(),
            source: mapping.kind.label().to_string(),
            map_to: mapping
                .kind
                .is_dashboard()
                .then(|| mapping.map_to.clone())
                .flatten(),
        }
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) => match (map.get("start"), map.get("end")) {
            (Some(start), Some(end)) => {
                format!("{} ~ {}", display_value(start), display_value(end))
            }
            _ => value.to_string(),
        },
        other => other.to_string(),
    }
}

fn truncate_to_width(text: &str, max: usize) -> String {
    let mut width = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max.saturating_sub(1) {
            let rest: usize = text[out.len()..]
                .chars()
                .map(|c| c.width().unwrap_or(0))
                .sum();
            if width + rest <= max {
                out.push_str(&text[out.len()..]);
            } else {
                out.push('…');
            }
            return out;
        }
        width += ch_width;
        out.push(ch);
    }
    out
}
