// Test mocks for the onboarding pipeline.
//
// Two mocks matching the two trait boundaries:
// - MockCatalog (VnfdCatalog) — in-memory records, scripted failures
// - MockValidator (TemplateValidator) — writes or points at a primary template

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tacker_client::{TackerError, Vnfd, VnfdRequest};

use crate::traits::{TemplateValidator, ValidatorInvocation, VnfdCatalog};

// ---------------------------------------------------------------------------
// MockCatalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum CreateScript {
    Assign(String),
    MissingId,
    Fail { status: u16, message: String },
}

/// In-memory catalog. Records every call and keeps the resulting records
/// so tests can inspect partially-created descriptors.
pub struct MockCatalog {
    create_script: CreateScript,
    update_failure: Option<(u16, String)>,
    creates: Mutex<Vec<VnfdRequest>>,
    updates: Mutex<Vec<(String, VnfdRequest)>>,
    records: Mutex<BTreeMap<String, Option<String>>>,
}

impl MockCatalog {
    /// Catalog that assigns `vnfd_id` to the next created record.
    pub fn assigning(vnfd_id: &str) -> Self {
        Self::with_script(CreateScript::Assign(vnfd_id.to_string()))
    }

    /// Catalog whose create response has no id.
    pub fn without_id() -> Self {
        Self::with_script(CreateScript::MissingId)
    }

    /// Catalog that rejects every create call.
    pub fn rejecting_create(status: u16, message: &str) -> Self {
        Self::with_script(CreateScript::Fail {
            status,
            message: message.to_string(),
        })
    }

    /// Make every update call fail.
    pub fn rejecting_update(mut self, status: u16, message: &str) -> Self {
        self.update_failure = Some((status, message.to_string()));
        self
    }

    fn with_script(create_script: CreateScript) -> Self {
        Self {
            create_script,
            update_failure: None,
            creates: Mutex::new(Vec::new()),
            updates: Mutex::new(Vec::new()),
            records: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn creates(&self) -> Vec<VnfdRequest> {
        self.creates.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<(String, VnfdRequest)> {
        self.updates.lock().unwrap().clone()
    }

    /// Descriptor body currently attached to a record, if the record exists.
    pub fn record(&self, vnfd_id: &str) -> Option<Option<String>> {
        self.records.lock().unwrap().get(vnfd_id).cloned()
    }
}

#[async_trait]
impl VnfdCatalog for MockCatalog {
    async fn create_vnfd(&self, body: &VnfdRequest) -> tacker_client::Result<Vnfd> {
        self.creates.lock().unwrap().push(body.clone());

        let id = match &self.create_script {
            CreateScript::Fail { status, message } => {
                return Err(TackerError::Api {
                    status: *status,
                    message: message.clone(),
                })
            }
            CreateScript::MissingId => None,
            CreateScript::Assign(id) => {
                self.records
                    .lock()
                    .unwrap()
                    .insert(id.clone(), body.descriptor().map(String::from));
                Some(id.clone())
            }
        };

        Ok(Vnfd {
            id,
            name: body.vnfd.name.clone(),
            description: body.vnfd.description.clone(),
            ..Vnfd::default()
        })
    }

    async fn update_vnfd(&self, vnfd_id: &str, body: &VnfdRequest) -> tacker_client::Result<()> {
        self.updates
            .lock()
            .unwrap()
            .push((vnfd_id.to_string(), body.clone()));

        if let Some((status, message)) = &self.update_failure {
            return Err(TackerError::Api {
                status: *status,
                message: message.clone(),
            });
        }

        let mut records = self.records.lock().unwrap();
        match records.get_mut(vnfd_id) {
            Some(slot) => {
                *slot = body.descriptor().map(String::from);
                Ok(())
            }
            None => Err(TackerError::NotFound(vnfd_id.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// MockValidator
// ---------------------------------------------------------------------------

/// What the validator saw on one call.
#[derive(Debug, Clone)]
pub struct ValidatorCall {
    pub archive_path: PathBuf,
    pub output_dir: PathBuf,
    pub archive_bytes: Vec<u8>,
    pub validate_only: bool,
}

#[derive(Debug, Clone)]
enum ValidatorScript {
    Write { relative: PathBuf, contents: Vec<u8> },
    PointAt(PathBuf),
    Fail(String),
}

/// Validator that writes a canned primary template into the output
/// directory, or fails with a canned diagnostic.
pub struct MockValidator {
    script: ValidatorScript,
    calls: Mutex<Vec<ValidatorCall>>,
}

impl MockValidator {
    pub fn succeeding(relative: &str, template: &str) -> Self {
        Self::succeeding_bytes(relative, template.as_bytes().to_vec())
    }

    pub fn succeeding_bytes(relative: &str, contents: Vec<u8>) -> Self {
        Self::with_script(ValidatorScript::Write {
            relative: PathBuf::from(relative),
            contents,
        })
    }

    /// Reports a primary template path without creating the file.
    pub fn pointing_at(relative: &str) -> Self {
        Self::with_script(ValidatorScript::PointAt(PathBuf::from(relative)))
    }

    pub fn failing(diagnostic: &str) -> Self {
        Self::with_script(ValidatorScript::Fail(diagnostic.to_string()))
    }

    fn with_script(script: ValidatorScript) -> Self {
        Self {
            script,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<ValidatorCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TemplateValidator for MockValidator {
    async fn extract(&self, invocation: ValidatorInvocation<'_>) -> Result<PathBuf> {
        let archive_bytes = std::fs::read(invocation.archive_path)?;
        self.calls.lock().unwrap().push(ValidatorCall {
            archive_path: invocation.archive_path.to_path_buf(),
            output_dir: invocation.output_dir.to_path_buf(),
            archive_bytes,
            validate_only: invocation.validate_only,
        });

        match &self.script {
            ValidatorScript::Write { relative, contents } => {
                let primary = invocation.output_dir.join(relative);
                if let Some(parent) = primary.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&primary, contents)?;
                Ok(primary)
            }
            ValidatorScript::PointAt(relative) => Ok(invocation.output_dir.join(relative)),
            ValidatorScript::Fail(diagnostic) => Err(anyhow!("{diagnostic}")),
        }
    }
}
