use thiserror::Error;

/// A response body did not have the shape the screen expects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("response body is not a JSON object")]
    NotAnObject,
    #[error("field `{field}` is missing")]
    MissingField { field: String },
    #[error("field `{field}` is not {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },
}

impl ParseError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub fn wrong_type(field: impl Into<String>, expected: &'static str) -> Self {
        Self::WrongType {
            field: field.into(),
            expected,
        }
    }
}
