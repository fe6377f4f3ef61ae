// Trait boundaries for the two external collaborators: the VNFD catalog
// service and the TOSCA template-validation engine. Production wires in
// TackerClient and CommandValidator; tests use the mocks in `testing`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tacker_client::{TackerClient, Vnfd, VnfdRequest};

/// Remote VNFD catalog. Neither call is idempotent.
#[async_trait]
pub trait VnfdCatalog: Send + Sync {
    async fn create_vnfd(&self, body: &VnfdRequest) -> tacker_client::Result<Vnfd>;
    async fn update_vnfd(&self, vnfd_id: &str, body: &VnfdRequest) -> tacker_client::Result<()>;
}

#[async_trait]
impl VnfdCatalog for TackerClient {
    async fn create_vnfd(&self, body: &VnfdRequest) -> tacker_client::Result<Vnfd> {
        TackerClient::create_vnfd(self, body).await
    }

    async fn update_vnfd(&self, vnfd_id: &str, body: &VnfdRequest) -> tacker_client::Result<()> {
        TackerClient::update_vnfd(self, vnfd_id, body).await
    }
}

/// Arguments for one run of the template-validation engine.
#[derive(Debug, Clone)]
pub struct ValidatorInvocation<'a> {
    pub archive_path: &'a Path,
    pub params_file: Option<&'a Path>,
    pub validate_only: bool,
    pub deploy_params: Option<&'a HashMap<String, String>>,
    pub meta_file: Option<&'a Path>,
    pub output_dir: &'a Path,
}

impl<'a> ValidatorInvocation<'a> {
    /// Structure-only validation of a CSAR, extracting into `output_dir`.
    pub fn validate_archive(archive_path: &'a Path, output_dir: &'a Path) -> Self {
        Self {
            archive_path,
            params_file: None,
            validate_only: true,
            deploy_params: None,
            meta_file: None,
            output_dir,
        }
    }
}

/// Extracts and validates a template package, returning the path of the
/// package's primary template file. Errors carry the engine's diagnostic.
#[async_trait]
pub trait TemplateValidator: Send + Sync {
    async fn extract(&self, invocation: ValidatorInvocation<'_>) -> anyhow::Result<PathBuf>;
}
