use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_STAGING_ROOT: &str = "/var/lib/tacker/";
const DEFAULT_VALIDATOR_BIN: &str = "tosca-extract";

/// Onboarding configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct OnboardConfig {
    // Catalog service
    pub tacker_url: String,
    pub auth_token: Option<String>,

    // CSAR handling
    pub staging_root: PathBuf,
    pub validator_bin: String,
}

impl OnboardConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            tacker_url: std::env::var("TACKER_URL")
                .context("TACKER_URL environment variable is required")?,
            auth_token: std::env::var("OS_AUTH_TOKEN").ok().filter(|t| !t.is_empty()),
            staging_root: std::env::var("VNFD_STAGING_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STAGING_ROOT)),
            validator_bin: std::env::var("TOSCA_VALIDATOR_BIN")
                .unwrap_or_else(|_| DEFAULT_VALIDATOR_BIN.to_string()),
        };

        config.log_keys();
        Ok(config)
    }

    fn log_keys(&self) {
        fn preview_opt(val: &Option<String>) -> String {
            match val {
                Some(v) if !v.is_empty() => {
                    let head: String = v.chars().take(5).collect();
                    format!("{head}...({} chars)", v.len())
                }
                _ => "<not set>".to_string(),
            }
        }

        tracing::info!("Config loaded:");
        tracing::info!("  TACKER_URL: {}", self.tacker_url);
        tracing::info!("  OS_AUTH_TOKEN: {}", preview_opt(&self.auth_token));
        tracing::info!("  VNFD_STAGING_ROOT: {}", self.staging_root.display());
        tracing::info!("  TOSCA_VALIDATOR_BIN: {}", self.validator_bin);
    }
}
