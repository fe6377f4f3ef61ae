// Two-phase VNFD submission.
//
// Phase 1 creates the catalog record, embedding the descriptor when it is
// already known as text. Phase 2 runs only for CSAR input: the package is
// extracted under the newly assigned id and the primary template is
// uploaded onto the record.
//
// A failure after phase 1 leaves the record in the catalog without a
// descriptor body. Nothing is rolled back; the failure is reported and the
// submitter can retry with a new record.

use std::sync::Arc;

use tacker_client::{TackerClient, VnfdRequest};
use tracing::{info, warn};

use crate::config::OnboardConfig;
use crate::error::{OnboardError, Result};
use crate::extraction::ArchiveExtractor;
use crate::source::resolve;
use crate::traits::{TemplateValidator, VnfdCatalog};
use crate::types::{
    Onboarded, ResolvedInput, ResolvedSubmission, SubmissionOutcome, SubmissionRequest,
};
use crate::validator::CommandValidator;

pub struct Onboarder {
    catalog: Arc<dyn VnfdCatalog>,
    extractor: ArchiveExtractor,
}

impl Onboarder {
    pub fn new(catalog: Arc<dyn VnfdCatalog>, extractor: ArchiveExtractor) -> Self {
        Self { catalog, extractor }
    }

    /// Production wiring: Tacker REST client plus the external validator.
    pub fn from_config(config: &OnboardConfig) -> Self {
        let catalog = TackerClient::new(&config.tacker_url, config.auth_token.as_deref());
        let validator: Arc<dyn TemplateValidator> =
            Arc::new(CommandValidator::new(config.validator_bin.clone()));
        Self::new(
            Arc::new(catalog),
            ArchiveExtractor::new(config.staging_root.clone(), validator),
        )
    }

    /// Resolve and submit a form submission, translating any failure into
    /// the single message shown to the submitter.
    pub async fn submit(&self, request: SubmissionRequest) -> SubmissionOutcome {
        let result = match resolve(request) {
            Ok(resolved) => self.onboard(resolved).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(onboarded) => {
                info!(vnfd_id = onboarded.id.as_str(), "{}", onboarded.notice());
                SubmissionOutcome::Success(onboarded)
            }
            Err(e) => {
                warn!(kind = ?e.kind(), error = %e, "VNFD onboarding failed");
                SubmissionOutcome::Failure(e.user_message())
            }
        }
    }

    /// Run the create (and, for archives, extract + update) exchange.
    pub async fn onboard(&self, submission: ResolvedSubmission) -> Result<Onboarded> {
        let ResolvedSubmission {
            name,
            description,
            input,
        } = submission;

        let inline = match &input {
            ResolvedInput::InlineText(text) => Some(text.clone()),
            ResolvedInput::Archive(_) => None,
        };

        let body = VnfdRequest::create(&name, &description, inline);
        info!(
            name = name.as_str(),
            inline = body.descriptor().is_some(),
            "Creating VNFD catalog entry"
        );
        let created = self.catalog.create_vnfd(&body).await?;

        let vnfd_id = created
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| OnboardError::MalformedResponse("create response has no id".into()))?;
        let record_name = created.name.unwrap_or_else(|| name.clone());
        info!(vnfd_id = vnfd_id.as_str(), "VNFD catalog entry created");

        let descriptor = match input {
            ResolvedInput::InlineText(text) => text,
            ResolvedInput::Archive(bytes) => self.attach_archive(&vnfd_id, &bytes).await?,
        };

        Ok(Onboarded {
            id: vnfd_id,
            name: record_name,
            descriptor,
        })
    }

    async fn attach_archive(&self, vnfd_id: &str, archive: &[u8]) -> Result<String> {
        let extracted = self.extractor.extract(vnfd_id, archive).await.map_err(|e| {
            warn!(vnfd_id, error = %e, "Extraction failed; catalog entry left without descriptor");
            e
        })?;

        let body = VnfdRequest::upload(extracted.canonical_text.clone());
        self.catalog.update_vnfd(vnfd_id, &body).await.map_err(|e| {
            warn!(vnfd_id, error = %e, "Descriptor upload failed; catalog entry left without descriptor");
            OnboardError::from(e)
        })?;
        info!(vnfd_id, "Uploaded extracted descriptor");

        Ok(extracted.canonical_text)
    }
}
