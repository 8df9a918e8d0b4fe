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

//! Optional capabilities an application generator may expose.
//!
//! A generator advertises a capability by overriding the matching accessor on
//! [`Generator`]; the provisioner treats `None` as "hook absent".

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::application::{ApplicationReference, HelmApplication};
use crate::domain::cd::HelmApplicationField;
use crate::provisioners::ProvisionContext;
use crate::shared::{ProvisionError, Result};

/// Overrides the release name. An empty string keeps the version's default.
#[async_trait]
pub trait ReleaseNamer: Send + Sync {
    async fn release_name(&self, ctx: &ProvisionContext) -> String;
}

/// Contributes extra Helm parameters, appended after the static ones.
#[async_trait]
pub trait Parameterizer: Send + Sync {
    async fn parameters(
        &self,
        ctx: &ProvisionContext,
        interface: Option<&str>,
    ) -> Result<BTreeMap<String, String>>;
}

/// Produces a values document for the chart.
#[async_trait]
pub trait ValuesGenerator: Send + Sync {
    async fn values(
        &self,
        ctx: &ProvisionContext,
        interface: Option<&str>,
    ) -> Result<Option<serde_json::Value>>;
}

/// Lists fields the driver should ignore when diffing live state.
pub trait Customizer: Send + Sync {
    fn customize(&self, interface: Option<&str>) -> Result<Vec<HelmApplicationField>>;
}

/// Runs after the driver reports the application as converged.
#[async_trait]
pub trait PostProvisionHook: Send + Sync {
    async fn post_provision(&self, ctx: &ProvisionContext) -> Result<()>;
}

/// Runs before the application is removed; failure aborts the teardown.
#[async_trait]
pub trait PreDeprovisionHook: Send + Sync {
    async fn pre_deprovision(&self, ctx: &ProvisionContext) -> Result<()>;
}

/// Application-specific configuration source.
pub trait Generator: Send + Sync {
    fn release_namer(&self) -> Option<&dyn ReleaseNamer> {
        None
    }

    fn parameterizer(&self) -> Option<&dyn Parameterizer> {
        None
    }

    fn values_generator(&self) -> Option<&dyn ValuesGenerator> {
        None
    }

    fn customizer(&self) -> Option<&dyn Customizer> {
        None
    }

    fn post_provision_hook(&self) -> Option<&dyn PostProvisionHook> {
        None
    }

    fn pre_deprovision_hook(&self) -> Option<&dyn PreDeprovisionHook> {
        None
    }
}

/// Looks up the catalogue entry and the version to install.
#[async_trait]
pub trait ApplicationResolver: Send + Sync {
    async fn resolve(&self, ctx: &ProvisionContext) -> Result<(HelmApplication, String)>;
}

/// Resolver for an application known up front.
#[derive(Debug, Clone)]
pub struct FixedApplication {
    application: HelmApplication,
    version: String,
}

impl FixedApplication {
    pub fn new(application: HelmApplication, version: impl Into<String>) -> Self {
        Self {
            application,
            version: version.into(),
        }
    }
}

#[async_trait]
impl ApplicationResolver for FixedApplication {
    async fn resolve(&self, _ctx: &ProvisionContext) -> Result<(HelmApplication, String)> {
        Ok((self.application.clone(), self.version.clone()))
    }
}

/// Resolver that looks a reference up in a loaded catalogue.
///
/// The reference name matches either the object name or the application's
/// logical name.
#[derive(Debug, Clone)]
pub struct CatalogueApplication {
    catalogue: Arc<Vec<HelmApplication>>,
    reference: ApplicationReference,
}

impl CatalogueApplication {
    pub fn new(catalogue: Arc<Vec<HelmApplication>>, reference: ApplicationReference) -> Self {
        Self {
            catalogue,
            reference,
        }
    }
}

#[async_trait]
impl ApplicationResolver for CatalogueApplication {
    async fn resolve(&self, _ctx: &ProvisionContext) -> Result<(HelmApplication, String)> {
        let application = self
            .catalogue
            .iter()
            .find(|a| {
                a.metadata.name.as_deref() == Some(self.reference.name.as_str())
                    || a.name() == self.reference.name
            })
            .ok_or_else(|| {
                ProvisionError::InvalidApplication(format!(
                    "application {} not found in catalogue",
                    self.reference.name
                ))
            })?;

        Ok((application.clone(), self.reference.version.clone()))
    }
}
