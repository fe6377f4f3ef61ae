use std::path::PathBuf;

use tacker_client::TackerError;
use thiserror::Error;

/// Result type alias for onboarding operations.
pub type Result<T> = std::result::Result<T, OnboardError>;

/// Prefix for every failure that happened after input validation.
const FAILURE_PREFIX: &str = "Unable to create TOSCA.";

/// Schema validators append the full offending document after this marker.
const VERBOSE_VALIDATION_MARKER: &str = "Failed validating";

#[derive(Debug, Error)]
pub enum OnboardError {
    #[error("{0}")]
    MissingInput(String),

    #[error("Only .yaml or .csar file uploads are supported, got: {0}")]
    UnsupportedFormat(String),

    #[error("There was a problem loading the namespace: {0}")]
    Encoding(String),

    #[error("Primary template is not valid UTF-8: {0}")]
    TemplateEncoding(String),

    #[error("Descriptor directory already exists: {}", .0.display())]
    DirectoryConflict(PathBuf),

    #[error("Template extraction failed: {0}")]
    Extraction(String),

    #[error(transparent)]
    RemoteCall(#[from] TackerError),

    #[error("Malformed catalog response: {0}")]
    MalformedResponse(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse category of an [`OnboardError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingInput,
    UnsupportedFormat,
    Encoding,
    DirectoryConflict,
    Extraction,
    RemoteCall,
    MalformedResponse,
    Internal,
}

impl OnboardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OnboardError::MissingInput(_) => ErrorKind::MissingInput,
            OnboardError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            OnboardError::Encoding(_) | OnboardError::TemplateEncoding(_) => ErrorKind::Encoding,
            OnboardError::DirectoryConflict(_) => ErrorKind::DirectoryConflict,
            OnboardError::Extraction(_) => ErrorKind::Extraction,
            OnboardError::RemoteCall(_) => ErrorKind::RemoteCall,
            OnboardError::MalformedResponse(_) => ErrorKind::MalformedResponse,
            OnboardError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Input problems the submitter can fix by changing the form. An
    /// extracted template that fails to decode is not one of them: by then
    /// the catalog record already exists.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            OnboardError::MissingInput(_)
                | OnboardError::UnsupportedFormat(_)
                | OnboardError::Encoding(_)
        )
    }

    /// The single message shown to the submitter for this failure.
    ///
    /// Validation errors pass through as-is. Everything else gets the
    /// failure prefix, with verbose schema dumps cut at the first
    /// validation marker. Internal errors never expose their payload.
    pub fn user_message(&self) -> String {
        if self.is_validation() {
            return self.to_string();
        }
        if let OnboardError::Internal(_) = self {
            return format!("{FAILURE_PREFIX} An unexpected error occurred.");
        }
        let detail = self.to_string();
        format!("{FAILURE_PREFIX} {}", truncate_diagnostic(&detail))
    }
}

/// Keep only the part of a diagnostic before the verbose validation marker.
pub fn truncate_diagnostic(message: &str) -> &str {
    match message.split_once(VERBOSE_VALIDATION_MARKER) {
        Some((prefix, _)) => prefix.trim_end(),
        None => message,
    }
}
