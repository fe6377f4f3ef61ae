// Template source resolution: turns the two accepted form shapes (uploaded
// file or direct input) into either inline descriptor text or CSAR bytes.
// Pure; no filesystem or network access.

use crate::error::{OnboardError, Result};
use crate::types::{ResolvedInput, ResolvedSubmission, SourceKind, SubmissionRequest};

pub const NO_FILE_SELECTED: &str = "No TOSCA template file selected.";
pub const NO_DIRECT_INPUT: &str = "No direct input specified.";

const YAML_SUFFIX: &str = ".yaml";
const CSAR_SUFFIX: &str = ".csar";

/// Validate a submission and classify its template content.
pub fn resolve(request: SubmissionRequest) -> Result<ResolvedSubmission> {
    let SubmissionRequest {
        name,
        description,
        source_kind,
        file_name,
        file_bytes,
        raw_text,
    } = request;

    if file_bytes.is_some() && raw_text.is_some() {
        return Err(OnboardError::Internal(format!(
            "{source_kind:?} submission carries both file bytes and direct input"
        )));
    }

    let input = match source_kind {
        SourceKind::File => {
            let (Some(file_name), Some(bytes)) = (file_name, file_bytes) else {
                return Err(OnboardError::MissingInput(NO_FILE_SELECTED.to_string()));
            };
            if bytes.is_empty() {
                return Err(OnboardError::MissingInput(NO_FILE_SELECTED.to_string()));
            }
            classify_upload(&file_name, bytes)?
        }
        SourceKind::Raw => match raw_text {
            Some(text) if !text.trim().is_empty() => ResolvedInput::InlineText(text),
            _ => return Err(OnboardError::MissingInput(NO_DIRECT_INPUT.to_string())),
        },
    };

    Ok(ResolvedSubmission {
        name,
        description: description.unwrap_or_default(),
        input,
    })
}

/// Classify an uploaded file by its exact, case-sensitive suffix.
pub fn classify_upload(file_name: &str, bytes: Vec<u8>) -> Result<ResolvedInput> {
    if file_name.ends_with(CSAR_SUFFIX) {
        return Ok(ResolvedInput::Archive(bytes));
    }
    if file_name.ends_with(YAML_SUFFIX) {
        let text = String::from_utf8(bytes)
            .map_err(|e| OnboardError::Encoding(format!("{file_name}: {e}")))?;
        return Ok(ResolvedInput::InlineText(text));
    }
    Err(OnboardError::UnsupportedFormat(file_name.to_string()))
}
