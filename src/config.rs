// Safescan — Configuration
//
// A single immutable `Config` is loaded once per invocation (TOML file, then
// CLI overrides) and handed to each stage explicitly.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::report::{OutputFormat, Projection};
use crate::vault::ConnectParams;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to render config: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("{0}")]
    Invalid(String),
}

/// Default directory for Safescan data files.
pub fn data_dir() -> PathBuf {
    let base = dirs_next::data_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("safescan")
}

/// Default location of the config file.
pub fn default_config_path() -> PathBuf {
    let base = dirs_next::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("safescan").join("config.toml")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Logical vault name used by PACLI to refer to the definition.
    pub vault_name: String,
    pub vault_address: String,
    pub vault_port: u16,
    pub username: String,
    /// Credential file passed to LOGON.
    pub logon_file: PathBuf,
    pub accept_self_signed: bool,
    /// Rotates the secret in `logon_file` on every logon. One-way.
    pub auto_change_password: bool,
    pub pacli_path: PathBuf,
    pub session_id: u32,

    /// The pending safe and the folder inside it.
    pub safe: String,
    pub folder: String,

    pub output_path: PathBuf,
    pub output_format: OutputFormat,
    pub checkpoint_path: PathBuf,

    pub first_columns: Vec<String>,
    pub exclude_columns: Vec<String>,
    /// Attributes a dependent account inherits from its master.
    pub dependency_attributes: Vec<String>,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        let dir = data_dir();
        Self {
            vault_name: "Vault".to_string(),
            vault_address: String::new(),
            vault_port: 1858,
            username: String::new(),
            logon_file: PathBuf::from("user.ini"),
            accept_self_signed: false,
            auto_change_password: false,
            pacli_path: PathBuf::from("PACLI"),
            session_id: 1,
            safe: "PasswordManager_Pending".to_string(),
            folder: "Root".to_string(),
            output_path: dir.join("PendingAccounts.csv"),
            output_format: OutputFormat::Csv,
            checkpoint_path: dir.join("pending.checkpoint.csv"),
            first_columns: strings(&["FileName", "UserName", "Address", "Domain", "PolicyID"]),
            exclude_columns: strings(&[
                "Processed",
                "MasterPassName",
                "MasterPassFolder",
                "CPMStatus",
                "CPMErrorDetails",
                "RetriesCount",
                "LastTask",
            ]),
            dependency_attributes: strings(&[
                "UserName",
                "Address",
                "Domain",
                "Dependencies",
                "DiscoveryPlatformType",
                "OSVersion",
                "MachineOSFamily",
                "AccountDiscoveryDate",
            ]),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicitly requested file must exist. Without one, the default
    /// location is tried and built-in defaults are used if it is absent.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (default_config_path(), false),
        };

        if !required && !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!("Loaded config from {}", path.display());
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Apply command-line overrides.
    pub fn with_overrides(
        mut self,
        output: Option<PathBuf>,
        checkpoint: Option<PathBuf>,
        format: Option<OutputFormat>,
    ) -> Self {
        if let Some(output) = output {
            self.output_path = output;
        }
        if let Some(checkpoint) = checkpoint {
            self.checkpoint_path = checkpoint;
        }
        if let Some(format) = format {
            self.output_format = format;
        }
        self
    }

    /// Reject configurations that cannot reach a vault.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("vault_address", &self.vault_address),
            ("username", &self.username),
            ("safe", &self.safe),
            ("vault_name", &self.vault_name),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "missing required setting(s): {}",
                missing.join(", ")
            )));
        }
        Ok(())
    }

    pub fn connect_params(&self) -> ConnectParams {
        ConnectParams {
            vault_name: self.vault_name.clone(),
            address: self.vault_address.clone(),
            port: self.vault_port,
            username: self.username.clone(),
            logon_file: self.logon_file.clone(),
            accept_self_signed: self.accept_self_signed,
            auto_change_password: self.auto_change_password,
            safe: self.safe.clone(),
        }
    }

    pub fn projection(&self) -> Projection {
        Projection::new(self.first_columns.clone(), self.exclude_columns.clone())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
