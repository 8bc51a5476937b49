//! Conversion between stored mappings and the editable rows used while a
//! widget's parameter mappings are open for editing.

mod catalog;
mod error;

use indexmap::IndexMap;
use serde_json::Value;

use crate::domain::{EditableMapping, MappingType, Parameter, PersistedMapping, SourceKind};

pub use catalog::find_parameter;
pub use error::MappingError;

/// What [`to_editable_with`] does with a mapping whose parameter is not in the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingParameterPolicy {
    #[default]
    Fail,
    Skip,
}

/// Builds editable rows, failing on the first mapping without a parameter.
pub fn to_editable<'a, I>(
    mappings: I,
    parameters: &[Parameter],
    existing_names: &[String],
) -> Result<Vec<EditableMapping>, MappingError>
where
    I: IntoIterator<Item = &'a PersistedMapping>,
{
    to_editable_with(
        mappings,
        parameters,
        existing_names,
        MissingParameterPolicy::Fail,
    )
}

pub fn to_editable_with<'a, I>(
    mappings: I,
    parameters: &[Parameter],
    existing_names: &[String],
    policy: MissingParameterPolicy,
) -> Result<Vec<EditableMapping>, MappingError>
where
    I: IntoIterator<Item = &'a PersistedMapping>,
{
    let mut rows = Vec::new();
    for mapping in mappings {
        let param = match find_parameter(parameters, &mapping.name) {
            Ok(param) => param,
            Err(err) => match policy {
                MissingParameterPolicy::Fail => return Err(err),
                MissingParameterPolicy::Skip => {
                    tracing::warn!(name = %mapping.name, "skipping mapping without parameter");
                    continue;
                }
            },
        };
        rows.push(editable_row(mapping, param, existing_names));
    }
    tracing::debug!(rows = rows.len(), "converted mappings to editable rows");
    Ok(rows)
}

fn editable_row(
    mapping: &PersistedMapping,
    param: &Parameter,
    existing_names: &[String],
) -> EditableMapping {
    let mut param = param.clone();
    let (kind, value) = match mapping.kind {
        MappingType::DashboardLevel => {
            let exists = mapping
                .map_to
                .as_ref()
                .is_some_and(|map_to| existing_names.contains(map_to));
            let kind = if exists {
                SourceKind::DashboardMapToExisting
            } else {
                SourceKind::DashboardAddNew
            };
            (kind, Value::Null)
        }
        MappingType::StaticValue => {
            param.set_value(mapping.value.clone());
            (SourceKind::StaticValue, mapping.value.clone())
        }
        MappingType::WidgetLevel => (SourceKind::WidgetLevel, Value::Null),
    };
    EditableMapping {
        name: mapping.name.clone(),
        kind,
        map_to: mapping.map_to.clone(),
        value,
        title: mapping.title.clone(),
        param,
    }
}

/// Stores editable rows keyed by parameter name. A repeated name overwrites
/// the earlier entry and keeps its position.
pub fn to_persisted<'a, I>(mappings: I) -> IndexMap<String, PersistedMapping>
where
    I: IntoIterator<Item = &'a EditableMapping>,
{
    mappings
        .into_iter()
        .map(|mapping| (mapping.name.clone(), persisted_row(mapping)))
        .collect()
}

fn persisted_row(mapping: &EditableMapping) -> PersistedMapping {
    let value = match mapping.kind {
        SourceKind::StaticValue => {
            let mut param = mapping.param.clone();
            param.set_value(mapping.value.clone());
            param.value().clone()
        }
        _ => Value::Null,
    };
    PersistedMapping {
        name: mapping.name.clone(),
        kind: mapping.kind.persisted(),
        map_to: mapping.map_to.clone(),
        value,
        title: mapping.title.clone(),
    }
}
