mod mapping;
mod parameter;

pub use mapping::{EditableMapping, MappingType, PersistedMapping, SourceKind};
pub use parameter::{Parameter, ParameterKind, is_empty_value};
