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

use crate::infrastructure::constants::NAME_LABEL;
use crate::shared::error::{ProvisionError, Result};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs::read_to_string;

const SEMVER_PATTERN: &str = r"^v?(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(-[0-9A-Za-z.-]+)?(\+[0-9A-Za-z.-]+)?$";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationReferenceKind {
    #[default]
    HelmApplication,
}

/// Points at one version of a catalogue application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationReference {
    #[serde(default)]
    pub kind: ApplicationReferenceKind,
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

/// A catalogue entry describing every installable version of an application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HelmApplication {
    #[serde(default)]
    pub metadata: ObjectMeta,
    pub spec: HelmApplicationSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelmApplicationSpec {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    /// Base64 encoded icon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub versions: Vec<HelmApplicationVersion>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelmApplicationVersion {
    /// Helm chart repository, or git repository when `branch` is set.
    pub repo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Semantic version; required for git sources too.
    pub version: String,
    /// Fixed release name for charts whose resource names must be predictable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<HelmApplicationParameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_namespace: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_side_apply: Option<bool>,
    /// Selects the code path generators use to configure this version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<HelmApplicationDependency>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommends: Vec<HelmApplicationRecommendation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelmApplicationParameter {
    pub name: String,
    pub value: String,
}

/// Hard dependency that must be installed first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelmApplicationDependency {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<String>,
}

/// Soft dependency that may be installed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelmApplicationRecommendation {
    pub name: String,
}

/// Where a version's manifests come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicationSource<'a> {
    Chart {
        repo: &'a str,
        chart: &'a str,
    },
    Git {
        repo: &'a str,
        branch: &'a str,
        path: Option<&'a str>,
    },
}

impl HelmApplication {
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load a catalogue entry from a YAML manifest
    pub fn from_file<T: AsRef<str>>(path: T) -> Result<Self> {
        let content = read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Logical name: the name label, falling back to the object name.
    pub fn name(&self) -> &str {
        self.metadata
            .labels
            .as_ref()
            .and_then(|labels| labels.get(NAME_LABEL))
            .or(self.metadata.name.as_ref())
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn get_version(&self, version: &str) -> Result<&HelmApplicationVersion> {
        self.spec
            .versions
            .iter()
            .find(|v| v.version == version)
            .ok_or_else(|| {
                ProvisionError::version_not_found(
                    self.name(),
                    version,
                    self.spec.versions.iter().map(|v| v.version.clone()).collect(),
                )
            })
    }

    pub fn validate(&self) -> Result<()> {
        for version in &self.spec.versions {
            version.validate().map_err(|e| {
                ProvisionError::InvalidApplication(format!("{}: {}", self.name(), e))
            })?;
        }
        Ok(())
    }
}

impl HelmApplicationVersion {
    pub fn source(&self) -> Option<ApplicationSource<'_>> {
        match (&self.chart, &self.branch) {
            (Some(chart), None) => Some(ApplicationSource::Chart {
                repo: &self.repo,
                chart,
            }),
            (None, Some(branch)) => Some(ApplicationSource::Git {
                repo: &self.repo,
                branch,
                path: self.path.as_deref(),
            }),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.repo.is_empty() {
            return Err(ProvisionError::InvalidApplication(format!(
                "version {} has no repo",
                self.version
            )));
        }

        if self.source().is_none() {
            return Err(ProvisionError::InvalidApplication(format!(
                "version {} must set exactly one of chart or branch",
                self.version
            )));
        }

        let re = Regex::new(SEMVER_PATTERN)
            .map_err(|e| ProvisionError::InvalidApplication(e.to_string()))?;
        if !re.is_match(&self.version) {
            return Err(ProvisionError::InvalidApplication(format!(
                "'{}' is not a semantic version",
                self.version
            )));
        }

        Ok(())
    }
}
