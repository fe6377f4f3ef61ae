// CSAR extraction: stage the archive under the staging root, hand it to the
// template validator, and read back the primary template.
//
// Paths are namespaced by the catalog-assigned VNFD id:
//   <staging_root>/tmp_<id>.csar   staged archive, removed on every exit path
//   <staging_root>/<id>/           extraction output, owned by the validator

use std::io::ErrorKind as IoErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{OnboardError, Result};
use crate::traits::{TemplateValidator, ValidatorInvocation};
use crate::types::ExtractionResult;

pub struct ArchiveExtractor {
    staging_root: PathBuf,
    validator: Arc<dyn TemplateValidator>,
}

impl ArchiveExtractor {
    pub fn new(staging_root: impl Into<PathBuf>, validator: Arc<dyn TemplateValidator>) -> Self {
        Self {
            staging_root: staging_root.into(),
            validator,
        }
    }

    pub fn staging_root(&self) -> &Path {
        &self.staging_root
    }

    pub fn staged_archive_path(&self, vnfd_id: &str) -> PathBuf {
        self.staging_root.join(format!("tmp_{vnfd_id}.csar"))
    }

    pub fn descriptor_dir(&self, vnfd_id: &str) -> PathBuf {
        self.staging_root.join(vnfd_id)
    }

    /// Extract the primary template from a CSAR for the given descriptor.
    pub async fn extract(&self, vnfd_id: &str, archive: &[u8]) -> Result<ExtractionResult> {
        check_scoping_id(vnfd_id)?;

        let output_dir = self.create_descriptor_dir(vnfd_id).await?;
        let staged = StagedArchive::new(self.staged_archive_path(vnfd_id));

        let result = self.extract_staged(staged.path(), archive, &output_dir).await;
        let cleanup = staged.release().await;

        let canonical_text = result?;
        cleanup.map_err(|e| {
            OnboardError::Extraction(format!("Failed to remove staged archive: {e}"))
        })?;

        info!(vnfd_id, bytes = canonical_text.len(), "Extracted primary template");
        Ok(ExtractionResult { canonical_text })
    }

    async fn create_descriptor_dir(&self, vnfd_id: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.staging_root)
            .await
            .map_err(|e| {
                OnboardError::Extraction(format!(
                    "Failed to create staging root {}: {e}",
                    self.staging_root.display()
                ))
            })?;

        let dir = self.descriptor_dir(vnfd_id);
        match tokio::fs::create_dir(&dir).await {
            Ok(()) => Ok(dir),
            Err(e) if e.kind() == IoErrorKind::AlreadyExists => {
                warn!(vnfd_id, dir = %dir.display(), "Descriptor directory already exists");
                Err(OnboardError::DirectoryConflict(dir))
            }
            Err(e) => Err(OnboardError::Extraction(format!(
                "Failed to create {}: {e}",
                dir.display()
            ))),
        }
    }

    async fn extract_staged(
        &self,
        staged_path: &Path,
        archive: &[u8],
        output_dir: &Path,
    ) -> Result<String> {
        tokio::fs::write(staged_path, archive).await.map_err(|e| {
            OnboardError::Extraction(format!(
                "Failed to stage archive at {}: {e}",
                staged_path.display()
            ))
        })?;
        debug!(path = %staged_path.display(), bytes = archive.len(), "Staged archive");

        let primary = self
            .validator
            .extract(ValidatorInvocation::validate_archive(staged_path, output_dir))
            .await
            .map_err(|e| OnboardError::Extraction(format!("{e:#}")))?;

        let bytes = tokio::fs::read(&primary).await.map_err(|e| {
            OnboardError::Extraction(format!("Failed to read {}: {e}", primary.display()))
        })?;

        String::from_utf8(bytes).map_err(|e| {
            let shown = primary.strip_prefix(output_dir).unwrap_or(primary.as_path());
            OnboardError::TemplateEncoding(format!("{}: {e}", shown.display()))
        })
    }
}

/// The id becomes a path component, so it must be a single plain name.
fn check_scoping_id(vnfd_id: &str) -> Result<()> {
    let mut components = Path::new(vnfd_id).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) if name == vnfd_id => Ok(()),
        _ => Err(OnboardError::MalformedResponse(format!(
            "descriptor id {vnfd_id:?} cannot scope extraction artifacts"
        ))),
    }
}

/// The staged archive file. Removed by [`StagedArchive::release`], or on
/// drop if the extraction future never got that far.
struct StagedArchive {
    path: PathBuf,
    released: bool,
}

impl StagedArchive {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            released: false,
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    async fn release(mut self) -> std::io::Result<()> {
        self.released = true;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl Drop for StagedArchive {
    fn drop(&mut self) {
        if !self.released {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockValidator;

    fn extractor(root: &Path, validator: MockValidator) -> ArchiveExtractor {
        ArchiveExtractor::new(root.join("staging"), Arc::new(validator))
    }

    #[tokio::test]
    async fn returns_primary_template_and_removes_staged_file() {
        let tmp = tempfile::tempdir().unwrap();
        let validator = MockValidator::succeeding("Definitions/vnfd.yaml", "tosca: canonical\n");
        let extractor = extractor(tmp.path(), validator);

        let result = extractor.extract("abc123", b"PK\x03\x04").await.unwrap();

        assert_eq!(result.canonical_text, "tosca: canonical\n");
        assert!(!extractor.staged_archive_path("abc123").exists());
        assert!(extractor.descriptor_dir("abc123").is_dir());
    }

    #[tokio::test]
    async fn validator_sees_staged_bytes_and_scoped_output_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let validator = Arc::new(MockValidator::succeeding("main.yaml", "x"));
        let extractor = ArchiveExtractor::new(tmp.path(), validator.clone());

        extractor.extract("abc123", b"archive-bytes").await.unwrap();

        let calls = validator.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].archive_path, tmp.path().join("tmp_abc123.csar"));
        assert_eq!(calls[0].output_dir, tmp.path().join("abc123"));
        assert_eq!(calls[0].archive_bytes, b"archive-bytes");
        assert!(calls[0].validate_only);
    }

    #[tokio::test]
    async fn validator_failure_is_extraction_error_and_cleans_up() {
        let tmp = tempfile::tempdir().unwrap();
        let validator = MockValidator::failing("TOSCA.meta is missing Entry-Definitions");
        let extractor = extractor(tmp.path(), validator);

        let err = extractor.extract("abc123", b"junk").await.unwrap_err();

        assert!(matches!(err, OnboardError::Extraction(_)));
        assert!(err.to_string().contains("Entry-Definitions"));
        assert!(!extractor.staged_archive_path("abc123").exists());
    }

    #[tokio::test]
    async fn invalid_utf8_template_is_encoding_error_and_cleans_up() {
        let tmp = tempfile::tempdir().unwrap();
        let validator = MockValidator::succeeding_bytes("main.yaml", vec![0x61, 0xc3, 0x28]);
        let extractor = extractor(tmp.path(), validator);

        let err = extractor.extract("abc123", b"PK").await.unwrap_err();

        assert!(matches!(err, OnboardError::TemplateEncoding(_)));
        assert!(err.to_string().contains("main.yaml"));
        assert!(!err.to_string().contains(&tmp.path().display().to_string()));
        assert!(!extractor.staged_archive_path("abc123").exists());
    }

    #[tokio::test]
    async fn missing_primary_template_is_extraction_error() {
        let tmp = tempfile::tempdir().unwrap();
        let validator = MockValidator::pointing_at("does/not/exist.yaml");
        let extractor = extractor(tmp.path(), validator);

        let err = extractor.extract("abc123", b"PK").await.unwrap_err();

        assert!(matches!(err, OnboardError::Extraction(_)));
        assert!(!extractor.staged_archive_path("abc123").exists());
    }

    #[tokio::test]
    async fn existing_descriptor_dir_is_a_conflict() {
        let tmp = tempfile::tempdir().unwrap();
        let validator = Arc::new(MockValidator::succeeding("main.yaml", "x"));
        let extractor = ArchiveExtractor::new(tmp.path(), validator.clone());
        std::fs::create_dir(extractor.descriptor_dir("abc123")).unwrap();

        let err = extractor.extract("abc123", b"PK").await.unwrap_err();

        assert!(matches!(err, OnboardError::DirectoryConflict(_)));
        assert!(validator.calls().is_empty());
        assert!(!extractor.staged_archive_path("abc123").exists());
    }

    #[tokio::test]
    async fn path_like_ids_are_rejected_before_touching_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let validator = Arc::new(MockValidator::succeeding("main.yaml", "x"));
        let extractor = ArchiveExtractor::new(tmp.path().join("staging"), validator.clone());

        for id in ["", ".", "..", "../escape", "a/b", "/abs"] {
            let err = extractor.extract(id, b"PK").await.unwrap_err();
            assert!(matches!(err, OnboardError::MalformedResponse(_)), "{id:?}");
        }
        assert!(!extractor.staging_root().exists());
        assert!(validator.calls().is_empty());
    }

    #[test]
    fn dropped_staged_archive_removes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tmp_x.csar");
        std::fs::write(&path, b"PK").unwrap();

        drop(StagedArchive::new(path.clone()));

        assert!(!path.exists());
    }
}
