use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsultError {
    #[error("invalid answer for '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("unknown question '{0}'")]
    UnknownQuestion(String),

    #[error("invalid methodology: {0}")]
    InvalidMethodology(String),

    #[error("failed to save conversation to {destination}: {message}")]
    Export {
        destination: String,
        message: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ConsultError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConsultError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConsultError>;
