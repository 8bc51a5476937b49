use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date pattern"));
static DATETIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}$").expect("valid datetime pattern")
});

/// Input control type of a query parameter. Decides how values are normalized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ParameterKind {
    #[default]
    Text,
    Number,
    Enum,
    Query,
    Date,
    #[serde(rename = "datetime-local")]
    DateTime,
    DateRange,
}

/// A query parameter as supplied by the parameter catalog.
///
/// The engine never invents parameters; it clones catalog entries and
/// updates the value of its own copies through [`Parameter::set_value`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: ParameterKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_options: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub multi_values: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    value: Value,
}

impl Parameter {
    pub fn new(name: impl Into<String>, kind: ParameterKind) -> Self {
        let name = name.into();
        Self {
            title: name.clone(),
            name,
            kind,
            enum_options: Vec::new(),
            multi_values: false,
            query_id: None,
            value: Value::Null,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_enum_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_multi_values(mut self, multi: bool) -> Self {
        self.multi_values = multi;
        self
    }

    pub fn with_query_id(mut self, query_id: u64) -> Self {
        self.query_id = Some(query_id);
        self
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.set_value(value);
        self
    }

    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn enum_options(&self) -> &[String] {
        &self.enum_options
    }

    pub fn query_id(&self) -> Option<u64> {
        self.query_id
    }

    /// Current value, already normalized for this parameter's kind.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The current value when it carries information.
    pub fn normalized_value(&self) -> Option<&Value> {
        (!is_empty_value(&self.value)).then_some(&self.value)
    }

    /// Stores `value` after coercing it to this parameter's kind.
    pub fn set_value(&mut self, value: Value) {
        self.value = self.normalize(value);
    }

    /// Re-applies normalization to the stored value. Used after deserializing
    /// catalog entries, which bypasses [`Parameter::set_value`].
    pub fn renormalize(&mut self) {
        let value = std::mem::take(&mut self.value);
        self.set_value(value);
    }

    fn normalize(&self, value: Value) -> Value {
        match self.kind {
            ParameterKind::Text => normalize_text(value),
            ParameterKind::Number => normalize_number(value),
            ParameterKind::Enum | ParameterKind::Query => {
                normalize_choice(value, self.multi_values)
            }
            ParameterKind::Date => normalize_pattern(value, &DATE_PATTERN),
            ParameterKind::DateTime => normalize_pattern(value, &DATETIME_PATTERN),
            ParameterKind::DateRange => normalize_date_range(value),
        }
    }
}

/// `null`, `""` and `[]` carry no value.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn normalize_text(value: Value) -> Value {
    match value {
        Value::String(_) => value,
        Value::Number(num) => Value::String(num.to_string()),
        Value::Bool(flag) => Value::String(flag.to_string()),
        _ => Value::Null,
    }
}

fn normalize_number(value: Value) -> Value {
    match value {
        Value::Number(_) => value,
        Value::String(text) => parse_number(text.trim()).unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

fn parse_number(text: &str) -> Option<Value> {
    if let Ok(int) = text.parse::<i64>() {
        return Some(Value::from(int));
    }
    let float = text.parse::<f64>().ok().filter(|f| f.is_finite())?;
    if float.fract() == 0.0 && float.abs() < i64::MAX as f64 {
        Some(Value::from(float as i64))
    } else {
        Number::from_f64(float).map(Value::Number)
    }
}

fn choice_item(value: Value) -> Option<Value> {
    match value {
        Value::String(_) => Some(value),
        Value::Number(num) => Some(Value::String(num.to_string())),
        _ => None,
    }
}

fn normalize_choice(value: Value, multi: bool) -> Value {
    match (value, multi) {
        (Value::Array(items), true) => {
            Value::Array(items.into_iter().filter_map(choice_item).collect())
        }
        (Value::Array(items), false) => items
            .into_iter()
            .next()
            .and_then(choice_item)
            .unwrap_or(Value::Null),
        (Value::Null, _) => Value::Null,
        (scalar, true) => match choice_item(scalar) {
            Some(item) => Value::Array(vec![item]),
            None => Value::Null,
        },
        (scalar, false) => choice_item(scalar).unwrap_or(Value::Null),
    }
}

fn normalize_pattern(value: Value, pattern: &Regex) -> Value {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            if pattern.is_match(trimmed) {
                Value::String(trimmed.to_string())
            } else {
                Value::Null
            }
        }
        _ => Value::Null,
    }
}

fn normalize_date_range(value: Value) -> Value {
    let Value::Object(map) = value else {
        return Value::Null;
    };
    let start = map.get("start").cloned().map(|v| normalize_pattern(v, &DATE_PATTERN));
    let end = map.get("end").cloned().map(|v| normalize_pattern(v, &DATE_PATTERN));
    match (start, end) {
        (Some(start @ Value::String(_)), Some(end @ Value::String(_))) => {
            let mut range = Map::new();
            range.insert("start".to_string(), start);
            range.insert("end".to_string(), end);
            Value::Object(range)
        }
        _ => Value::Null,
    }
}
