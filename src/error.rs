use thiserror::Error;

use crate::latex::LatexError;

/// Message shown to the user whenever a form does not yield a valid cookbook.
pub const INCOMPLETE_FORM_MESSAGE: &str =
    "Please fill in every field with a valid value and try again";

/// Errors that can occur while editing, storing or exporting a cookbook
#[derive(Error, Debug)]
pub enum CookbookError {
    /// Reading or writing the cookbook file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The cookbook file is not valid JSON or does not match the data model
    #[error("Failed to parse cookbook: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field violates a data model invariant
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// The document builder rejected an operation
    #[error("Document error: {0}")]
    Latex(#[from] LatexError),

    /// The external document compiler failed
    #[error("Compilation failed: {0}")]
    Compile(String),

    /// Exporter configuration error
    #[error("Builder error: {0}")]
    Builder(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl CookbookError {
    pub(crate) fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CookbookError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error stems from user input rather than a defect or the environment.
    pub fn is_user_error(&self) -> bool {
        matches!(self, CookbookError::Validation { .. })
    }

    /// Text suitable for a message dialog or terminal output.
    pub fn user_message(&self) -> String {
        match self {
            CookbookError::Validation { .. } => INCOMPLETE_FORM_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}
