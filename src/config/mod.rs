//! Configuration loading and management

use crate::core::error::ConfigError;
use crate::core::session::{UserSession, UserType};
use crate::core::validation::AttachmentPolicy;
use crate::core::validation::attachment::DEFAULT_EXTENSIONS;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    #[validate(length(min = 1))]
    pub host: String,

    #[validate(range(min = 1))]
    pub port: u16,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Attachment upload settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UploadConfig {
    /// Prefix of the file URLs assigned by the in-memory store
    #[validate(url)]
    pub base_url: String,

    /// Accepted attachment extensions (case-insensitive)
    #[validate(length(min = 1))]
    pub allowed_extensions: Vec<String>,
}

impl UploadConfig {
    pub fn policy(&self) -> AttachmentPolicy {
        AttachmentPolicy::new(&self.allowed_extensions)
    }
}

/// User the development server acts as
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SessionConfig {
    #[serde(rename = "type")]
    pub user_type: UserType,

    #[validate(email)]
    pub email: String,
}

impl SessionConfig {
    pub fn user(&self) -> UserSession {
        UserSession {
            user_type: self.user_type,
            email: Some(self.email.clone()),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BilledConfig {
    #[validate(nested)]
    pub server: ServerConfig,

    #[validate(nested)]
    pub uploads: UploadConfig,

    #[validate(nested)]
    pub session: SessionConfig,
}

impl BilledConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            message: format!("{}: {}", path, e),
        })?;
        Self::parse(&content, Some(path))
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Self::parse(yaml, None)
    }

    fn parse(yaml: &str, file: Option<&str>) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file: file.map(str::to_string),
            message: e.to_string(),
        })?;

        config.validate().map_err(|e| ConfigError::InvalidValue {
            message: e.to_string(),
        })?;

        Ok(config)
    }

    /// Default configuration for local development and tests
    pub fn default_config() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5678,
            },
            uploads: UploadConfig {
                base_url: "http://localhost:5678/uploads".to_string(),
                allowed_extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            },
            session: SessionConfig {
                user_type: UserType::Employee,
                email: "employee@test.tld".to_string(),
            },
        }
    }
}

impl Default for BilledConfig {
    fn default() -> Self {
        Self::default_config()
    }
}
