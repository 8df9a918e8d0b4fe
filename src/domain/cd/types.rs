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

use kube::config::Kubeconfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A label attached to a resource identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceIdentifierLabel {
    pub name: String,
    pub value: String,
}

/// Opaque, comparable identity of something the driver manages.
///
/// Labels are kept in key order so the same logical identity always
/// serializes the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<ResourceIdentifierLabel>,
}

impl ResourceIdentifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: Vec::new(),
        }
    }

    /// Builds an identifier from an unordered label set, sorting by key.
    pub fn with_labels<I, K, V>(name: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut labels: Vec<ResourceIdentifierLabel> = labels
            .into_iter()
            .map(|(name, value)| ResourceIdentifierLabel {
                name: name.into(),
                value: value.into(),
            })
            .collect();
        labels.sort_by(|a, b| a.name.cmp(&b.name));

        Self {
            name: name.into(),
            labels,
        }
    }

    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|l| l.name == name)
            .map(|l| l.value.as_str())
    }
}

impl fmt::Display for ResourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.labels.is_empty() {
            let labels: Vec<String> = self
                .labels
                .iter()
                .map(|l| format!("{}={}", l.name, l.value))
                .collect();
            write!(f, "({})", labels.join(","))?;
        }
        Ok(())
    }
}

/// A single `--set name=value` style parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelmApplicationParameter {
    pub name: String,
    pub value: String,
}

/// Fields of a kind the driver must not consider when diffing live state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelmApplicationField {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub group: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub json_pointers: Vec<String>,
}

/// Driver-facing description of an application to install or update.
///
/// Built fresh on every convergence; the field defaults are what the driver
/// sees when a version leaves them unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelmApplication {
    /// Helm chart repository or git repository.
    pub repo: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub chart: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub branch: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub release: String,
    /// `None` rather than an empty list so descriptors compare cleanly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<HelmApplicationParameter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<serde_json::Value>,
    /// Destination cluster, `None` for the management cluster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<ResourceIdentifier>,
    pub namespace: String,
    #[serde(default)]
    pub create_namespace: bool,
    #[serde(default)]
    pub server_side_apply: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore_differences: Vec<HelmApplicationField>,
    #[serde(default)]
    pub allow_degraded: bool,
}

impl HelmApplication {
    /// Parameters as a map, handy for display and lookups.
    pub fn parameter_map(&self) -> HashMap<&str, &str> {
        self.parameters
            .iter()
            .flatten()
            .map(|p| (p.name.as_str(), p.value.as_str()))
            .collect()
    }

    pub fn is_git(&self) -> bool {
        !self.branch.is_empty()
    }
}

/// A remote cluster registration handed to the driver.
#[derive(Debug, Clone)]
pub struct Cluster {
    pub config: Kubeconfig,
}
