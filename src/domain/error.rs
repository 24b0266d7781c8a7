use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("domain validation failed: {message}")]
    Validation { message: String },
    #[error("invalid API base URL `{input}`: {reason}")]
    InvalidBaseUrl { input: String, reason: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn invalid_base_url(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidBaseUrl {
            input: input.into(),
            reason: reason.into(),
        }
    }
}
