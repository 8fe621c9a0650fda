use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please enter/select a Customer Name.")]
    MissingCustomer,

    #[error("Invalid customer name: '{0}'. Please select a valid customer from the list.")]
    InvalidCustomer(String),

    #[error("Please upload a file to process.")]
    MissingFile,

    #[error("Unsupported file type: '{0}'. Upload a PDF, PNG, JPG or JPEG file.")]
    UnsupportedFileType(String),

    #[error("Dropped item '{0}' has no readable contents.")]
    UnreadableDrop(String),

    #[error("API request failed: {0}")]
    Request(String),

    #[error("API request failed: server responded with {status}{}", detail_suffix(.detail))]
    Status { status: u16, detail: String },

    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),

    #[error("Failed to save '{}': {reason}", .path.display())]
    Save { path: PathBuf, reason: String },
}

impl FormError {
    /// Validation errors are raised before anything leaves the machine.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            FormError::MissingCustomer
                | FormError::InvalidCustomer(_)
                | FormError::MissingFile
                | FormError::UnsupportedFileType(_)
                | FormError::UnreadableDrop(_)
        )
    }
}

fn detail_suffix(detail: &str) -> String {
    if detail.is_empty() {
        String::new()
    } else {
        format!(" ({})", detail)
    }
}

impl From<reqwest::Error> for FormError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            FormError::Status {
                status: status.as_u16(),
                detail: String::new(),
            }
        } else if err.is_decode() {
            FormError::Unexpected(err.to_string())
        } else {
            FormError::Request(err.to_string())
        }
    }
}
