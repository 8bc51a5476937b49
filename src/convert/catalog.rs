use crate::domain::Parameter;

use super::error::MappingError;

/// Looks up a parameter by name. The first match wins.
pub fn find_parameter<'a>(
    parameters: &'a [Parameter],
    name: &str,
) -> Result<&'a Parameter, MappingError> {
    parameters
        .iter()
        .find(|param| param.name == name)
        .ok_or_else(|| MappingError::ParameterNotFound {
            name: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ParameterKind;

    #[test]
    fn returns_first_match() {
        let params = vec![
            Parameter::new("a", ParameterKind::Text).with_title("first"),
            Parameter::new("a", ParameterKind::Text).with_title("second"),
        ];
        let found = find_parameter(&params, "a").unwrap();
        assert_eq!(found.title(), "first");
    }

    #[test]
    fn reports_missing_names() {
        let err = find_parameter(&[], "ghost").unwrap_err();
        assert_eq!(
            err,
            MappingError::ParameterNotFound {
                name: "ghost".to_string()
            }
        );
    }
}
