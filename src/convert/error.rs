use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("parameter '{name}' is not defined by the widget query")]
    ParameterNotFound { name: String },
}
