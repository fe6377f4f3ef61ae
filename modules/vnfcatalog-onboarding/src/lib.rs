pub mod config;
pub mod error;
pub mod extraction;
pub mod source;
pub mod submission;
pub mod testing;
pub mod traits;
pub mod types;
pub mod validator;

pub use config::OnboardConfig;
pub use error::{ErrorKind, OnboardError, Result};
pub use extraction::ArchiveExtractor;
pub use source::resolve;
pub use submission::Onboarder;
pub use traits::{TemplateValidator, ValidatorInvocation, VnfdCatalog};
pub use types::{
    ExtractionResult, Onboarded, ResolvedInput, ResolvedSubmission, SourceKind,
    SubmissionOutcome, SubmissionRequest,
};
pub use validator::CommandValidator;
