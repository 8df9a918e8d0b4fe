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

use crate::domain::cd::{Driver, ResourceIdentifier};
use crate::shared::error::{ProvisionError, Result};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::Client;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Supplies the labels that uniquely identify the resource that owns the
/// applications being provisioned.
pub trait ResourceLabeler: Send + Sync {
    fn resource_labels(&self) -> Result<HashMap<String, String>>;
}

impl ResourceLabeler for HashMap<String, String> {
    fn resource_labels(&self) -> Result<HashMap<String, String>> {
        Ok(self.clone())
    }
}

impl ResourceLabeler for BTreeMap<String, String> {
    fn resource_labels(&self) -> Result<HashMap<String, String>> {
        Ok(self.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

impl ResourceLabeler for ObjectMeta {
    fn resource_labels(&self) -> Result<HashMap<String, String>> {
        match &self.labels {
            Some(labels) => labels.resource_labels(),
            None => Ok(HashMap::new()),
        }
    }
}

/// The cluster provisioners are currently operating on.
///
/// At the root this describes the management cluster (no `id`); a remote
/// cluster provisioner replaces it for its subtree.
#[derive(Clone, Default)]
pub struct ClusterContext {
    pub client: Option<Client>,
    pub id: Option<ResourceIdentifier>,
    pub host: Option<String>,
    pub port: Option<String>,
}

impl ClusterContext {
    pub fn local(client: Client) -> Self {
        Self {
            client: Some(client),
            ..Default::default()
        }
    }

    pub fn is_remote(&self) -> bool {
        self.id.is_some()
    }
}

impl fmt::Debug for ClusterContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterContext")
            .field("client", &self.client.as_ref().map(|_| "<client>"))
            .field("id", &self.id)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

/// Request-scoped values shared by every provisioner in one invocation.
///
/// Cloning is cheap. Derived contexts are built with the `with_*` methods
/// and never affect the parent.
#[derive(Clone)]
pub struct ProvisionContext {
    driver: Arc<dyn Driver>,
    cluster: Arc<ClusterContext>,
    labels: Option<Arc<dyn ResourceLabeler>>,
    background_deletion: bool,
    cancellation: CancellationToken,
}

impl ProvisionContext {
    pub fn new(driver: Arc<dyn Driver>) -> Self {
        Self {
            driver,
            cluster: Arc::new(ClusterContext::default()),
            labels: None,
            background_deletion: false,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn driver(&self) -> &dyn Driver {
        self.driver.as_ref()
    }

    pub fn cluster(&self) -> &ClusterContext {
        &self.cluster
    }

    pub fn with_cluster(mut self, cluster: ClusterContext) -> Self {
        self.cluster = Arc::new(cluster);
        self
    }

    pub fn with_resource_labels<L>(mut self, labels: L) -> Self
    where
        L: ResourceLabeler + 'static,
    {
        self.labels = Some(Arc::new(labels));
        self
    }

    /// Owner labels; fails if the reconciler never supplied any.
    pub fn resource_labels(&self) -> Result<HashMap<String, String>> {
        self.labels
            .as_ref()
            .ok_or_else(|| ProvisionError::invalid_context("resource labels not set"))?
            .resource_labels()
    }

    pub fn background_deletion(&self) -> bool {
        self.background_deletion
    }

    pub fn with_background_deletion(mut self, background_deletion: bool) -> Self {
        self.background_deletion = background_deletion;
        self
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}

impl fmt::Debug for ProvisionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvisionContext")
            .field("driver", &self.driver.kind())
            .field("cluster", &self.cluster)
            .field("background_deletion", &self.background_deletion)
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
