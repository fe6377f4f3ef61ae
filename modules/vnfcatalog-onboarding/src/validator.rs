use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;

use crate::traits::{TemplateValidator, ValidatorInvocation};

/// Runs an external TOSCA validator program.
///
/// The program is called as
/// `<bin> --template-file <archive> --output-dir <dir> [--validate-only]
/// [--params-file <path>] [--meta-file <path>] [--deploy-param key=value]...`
/// and must print the primary template path as the last line of stdout.
pub struct CommandValidator {
    program: String,
}

impl CommandValidator {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn args(invocation: &ValidatorInvocation<'_>) -> Vec<String> {
        let mut args = vec![
            "--template-file".to_string(),
            invocation.archive_path.display().to_string(),
            "--output-dir".to_string(),
            invocation.output_dir.display().to_string(),
        ];
        if invocation.validate_only {
            args.push("--validate-only".to_string());
        }
        if let Some(params) = invocation.params_file {
            args.push("--params-file".to_string());
            args.push(params.display().to_string());
        }
        if let Some(meta) = invocation.meta_file {
            args.push("--meta-file".to_string());
            args.push(meta.display().to_string());
        }
        if let Some(deploy) = invocation.deploy_params {
            let mut keys: Vec<&String> = deploy.keys().collect();
            keys.sort();
            for key in keys {
                args.push("--deploy-param".to_string());
                args.push(format!("{key}={}", deploy[key]));
            }
        }
        args
    }
}

#[async_trait]
impl TemplateValidator for CommandValidator {
    async fn extract(&self, invocation: ValidatorInvocation<'_>) -> Result<PathBuf> {
        let output = tokio::process::Command::new(&self.program)
            .args(Self::args(&invocation))
            .output()
            .await
            .with_context(|| format!("Failed to run validator {}", self.program))?;

        if !output.status.success() {
            bail!("{}", failure_diagnostic(&self.program, &output));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let Some(primary) = stdout.lines().map(str::trim).filter(|l| !l.is_empty()).last() else {
            bail!("Validator {} reported no primary template", self.program);
        };

        Ok(invocation.output_dir.join(primary))
    }
}

/// The validator's stderr, or its exit status and stdout when it wrote
/// nothing to stderr.
fn failure_diagnostic(program: &str, output: &std::process::Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stdout = stdout.trim();
    if stdout.is_empty() {
        format!("Validator {program} failed with {}", output.status)
    } else {
        format!("Validator {program} failed with {}: {stdout}", output.status)
    }
}
