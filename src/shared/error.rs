// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use thiserror::Error;
pub type Result<T> = std::result::Result<T, ProvisionError>;

/// Fatal provisioning failures.
///
/// "Not ready yet" is reported as
/// `Outcome::Yield`, never as an error.
#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("version not found: application '{application}' wanted {wanted} have {available:?}")]
    VersionNotFound {
        application: String,
        wanted: String,
        available: Vec<String>,
    },

    #[error("Invalid application: {0}")]
    InvalidApplication(String),

    #[error("context invalid: {0}")]
    InvalidContext(String),

    #[error("kubeconfig error: {0}")]
    Kubeconfig(String),

    #[error("Kubernetes API error: {0}")]
    Kube(String),

    #[error("CD driver error: {0}")]
    Driver(String),

    #[error("{hook} hook failed: {message}")]
    Hook { hook: &'static str, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl From<kube::Error> for ProvisionError {
    fn from(err: kube::Error) -> Self {
        ProvisionError::Kube(err.to_string())
    }
}

impl ProvisionError {
    pub fn config_error(context: impl Into<String>) -> Self {
        Self::Config(context.into())
    }

    pub fn invalid_context(context: impl Into<String>) -> Self {
        Self::InvalidContext(context.into())
    }

    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver(message.into())
    }

    pub fn hook(hook: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Hook {
            hook,
            message: err.to_string(),
        }
    }

    pub fn version_not_found(
        application: impl Into<String>,
        wanted: impl Into<String>,
        available: Vec<String>,
    ) -> Self {
        Self::VersionNotFound {
            application: application.into(),
            wanted: wanted.into(),
            available,
        }
    }

    /// True when the failure came from the ambient cancellation signal.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
