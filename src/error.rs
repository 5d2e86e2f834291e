use thiserror::Error;

/// Errors raised by the scoring engine.
///
/// The engine does no I/O, so the only failure is a value outside the
/// domain the calculators are defined over.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid input: {field} = {value}")]
    InvalidInput { field: &'static str, value: String },
}

impl EngineError {
    pub(crate) fn invalid(field: &'static str, value: impl ToString) -> Self {
        EngineError::InvalidInput {
            field,
            value: value.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
