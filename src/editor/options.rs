use crate::convert::MissingParameterPolicy;

#[derive(Debug, Clone, Default)]
pub struct EditorOptions {
    /// Treat an empty static value as unfulfilled and flag it on the row.
    pub reject_empty_static_value: bool,
    pub missing_parameter: MissingParameterPolicy,
}

impl EditorOptions {
    pub fn with_reject_empty_static_value(mut self, enabled: bool) -> Self {
        self.reject_empty_static_value = enabled;
        self
    }

    pub fn with_missing_parameter(mut self, policy: MissingParameterPolicy) -> Self {
        self.missing_parameter = policy;
        self
    }
}
