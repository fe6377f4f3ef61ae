use serde::Deserialize;

/// Which form field the template came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    File,
    Raw,
}

/// Already-validated form fields handed over by the UI.
/// Exactly one of `file_bytes` / `raw_text` is expected to be populated.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub source_kind: SourceKind,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_bytes: Option<Vec<u8>>,
    #[serde(default)]
    pub raw_text: Option<String>,
}

impl SubmissionRequest {
    pub fn raw(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            source_kind: SourceKind::Raw,
            file_name: None,
            file_bytes: None,
            raw_text: Some(text.into()),
        }
    }

    pub fn file(name: impl Into<String>, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            description: None,
            source_kind: SourceKind::File,
            file_name: Some(file_name.into()),
            file_bytes: Some(bytes),
            raw_text: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Template content after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedInput {
    /// Descriptor text that can be embedded in the create call.
    InlineText(String),
    /// CSAR package bytes; the descriptor is extracted after create.
    Archive(Vec<u8>),
}

/// A submission ready for the catalog: metadata plus resolved content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSubmission {
    pub name: String,
    pub description: String,
    pub input: ResolvedInput,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub canonical_text: String,
}

/// A successfully onboarded descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Onboarded {
    pub id: String,
    pub name: String,
    pub descriptor: String,
}

impl Onboarded {
    pub fn notice(&self) -> String {
        format!("VNF Catalog entry {} has been created.", self.name)
    }
}

/// Terminal result handed back to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Success(Onboarded),
    Failure(String),
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Success(_))
    }

    /// Final descriptor text, if the submission succeeded.
    pub fn descriptor(&self) -> Option<&str> {
        match self {
            SubmissionOutcome::Success(onboarded) => Some(&onboarded.descriptor),
            SubmissionOutcome::Failure(_) => None,
        }
    }
}
