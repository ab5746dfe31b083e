//! Connection details of a provisioned inference VM.
//!
//! The provisioning scripts write `{platform}_deployment_info.json` once;
//! the assistant and probe binaries only read it back.

use crate::error::{Result, WeatherbotError};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Port the vLLM server listens on inside the VM.
pub const INFERENCE_PORT: u16 = 8000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Platform {
    Aws,
    Azure,
}

impl Platform {
    /// Auto-detection order when no platform is given.
    pub const ALL: [Platform; 2] = [Platform::Aws, Platform::Azure];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Aws => "aws",
            Platform::Azure => "azure",
        }
    }

    pub fn info_file_name(&self) -> String {
        format!("{}_deployment_info.json", self.as_str())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    /// EC2 instance id (AWS only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    /// Azure VM id (Azure only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vm_id: Option<String>,
    pub public_ip: String,
    pub api_endpoint: String,
    pub ssh_command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
}

impl DeploymentRecord {
    pub fn aws(instance_id: &str, public_ip: &str, key_pair_name: &str) -> Self {
        Self {
            instance_id: Some(instance_id.to_string()),
            vm_id: None,
            public_ip: public_ip.to_string(),
            api_endpoint: endpoint_for(public_ip),
            ssh_command: format!("ssh -i {}.pem ec2-user@{}", key_pair_name, public_ip),
            resource_group: None,
        }
    }

    pub fn azure(vm_id: &str, public_ip: &str, admin_user: &str, resource_group: &str) -> Self {
        Self {
            instance_id: None,
            vm_id: Some(vm_id.to_string()),
            public_ip: public_ip.to_string(),
            api_endpoint: endpoint_for(public_ip),
            ssh_command: format!("ssh {}@{}", admin_user, public_ip),
            resource_group: Some(resource_group.to_string()),
        }
    }

    pub fn path_in(platform: Platform, dir: &Path) -> PathBuf {
        dir.join(platform.info_file_name())
    }

    pub fn load(platform: Platform, dir: &Path) -> Result<Self> {
        let path = Self::path_in(platform, dir);
        if !path.exists() {
            return Err(WeatherbotError::Deployment(format!(
                "No deployment info found for {} ({})",
                platform,
                path.display()
            )));
        }

        let contents = fs::read_to_string(&path)?;
        let record: DeploymentRecord = serde_json::from_str(&contents).map_err(|e| {
            WeatherbotError::Deployment(format!("Malformed {}: {}", path.display(), e))
        })?;

        if record.api_endpoint.trim().is_empty() {
            return Err(WeatherbotError::Deployment(format!(
                "{} has no api_endpoint",
                path.display()
            )));
        }

        Ok(record)
    }

    /// Write the record once; an existing file is never overwritten.
    pub fn save(&self, platform: Platform, dir: &Path) -> Result<PathBuf> {
        let path = Self::path_in(platform, dir);
        if path.exists() {
            return Err(WeatherbotError::Deployment(format!(
                "{} already exists",
                path.display()
            )));
        }

        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(path)
    }

    /// First readable record in [`Platform::ALL`] order.
    pub fn detect(dir: &Path) -> Option<(Platform, Self)> {
        Platform::ALL
            .iter()
            .find_map(|&platform| Self::load(platform, dir).ok().map(|r| (platform, r)))
    }
}

fn endpoint_for(public_ip: &str) -> String {
    format!("http://{}:{}", public_ip, INFERENCE_PORT)
}
