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

use crate::infrastructure::constants::DEFAULT_APPLICATION_NAMESPACE;
use crate::shared::error::{ProvisionError, Result};
use crate::shared::retry::{Retrier, DEFAULT_RETRY_PERIOD};
use serde::{Deserialize, Serialize};
use std::fs::read_to_string;
use std::time::Duration;

pub const CONFIG_FILE_ENV: &str = "KUBE_PROVISIONERS_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisionerConfig {
    pub retry: RetryConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub period_ms: u64,
    pub timeout_secs: Option<u64>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            period_ms: DEFAULT_RETRY_PERIOD.as_millis() as u64,
            timeout_secs: Some(300),
        }
    }
}

impl RetryConfig {
    pub fn validate(&self) -> Result<()> {
        if self.period_ms == 0 {
            return Err(ProvisionError::config_error(
                "retry period must be at least 1ms",
            ));
        }
        Ok(())
    }

    pub fn retrier(&self) -> Retrier {
        let retrier = Retrier::forever().with_period(Duration::from_millis(self.period_ms));
        match self.timeout_secs {
            Some(secs) => retrier.with_timeout(Duration::from_secs(secs)),
            None => retrier,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Yaml,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = ProvisionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "table" => Ok(OutputFormat::Table),
            "yaml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ProvisionError::config_error(format!(
                "Invalid output format: {}",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub output: OutputFormat,
    pub default_namespace: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output: OutputFormat::default(),
            default_namespace: DEFAULT_APPLICATION_NAMESPACE.to_string(),
        }
    }
}

impl ProvisionerConfig {
    /// Load configuration from TOML file
    pub fn from<T: AsRef<str>>(path: T) -> Result<Self> {
        let content = read_to_string(path.as_ref()).map_err(|e| {
            ProvisionError::config_error(format!(
                "Failed to read config file {}: {}",
                path.as_ref(),
                e
            ))
        })?;

        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.retry.validate()
    }

    /// Explicit path first, then the environment, then defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from(path);
        }

        match std::env::var(CONFIG_FILE_ENV) {
            Ok(env_path) => Self::from(env_path),
            Err(_) => Ok(Self::default()),
        }
    }
}
