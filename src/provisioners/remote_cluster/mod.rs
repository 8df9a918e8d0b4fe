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

//! Runs provisioners against a cluster other than the management cluster.
//!
//! A [`RemoteCluster`] is shared by every provisioner registered on it with
//! [`RemoteCluster::provision_on`]. The first of them to converge registers
//! the cluster with the driver, and the last one to tear down removes it, so
//! the cluster outlives every application installed on it.

pub mod secret;

use std::sync::Arc;

use async_trait::async_trait;
use kube::config::Kubeconfig;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

pub use secret::SecretRemoteCluster;

use super::{BoxProvisioner, ClusterContext, ProvisionContext, Provisioner};
use crate::domain::cd::{Cluster, ResourceIdentifier};
use crate::infrastructure::constants::PROVISIONER_REMOTE_CLUSTER;
use crate::infrastructure::kubernetes;
use crate::shared::{Outcome, ProvisionError, Result};

/// Source of a remote cluster's identity and connection configuration.
#[async_trait]
pub trait RemoteClusterGenerator: Send + Sync {
    /// Unique identifier of the cluster as known to the driver.
    fn id(&self) -> ResourceIdentifier;

    /// The cluster's kubeconfig, or `None` while it is not available,
    /// either because the cluster is still being created or is already gone.
    async fn config(&self, ctx: &ProvisionContext) -> Result<Option<Kubeconfig>>;
}

#[derive(Debug, Default)]
struct Counters {
    /// Provisioners created by `provision_on`.
    registered: usize,
    /// Converge and teardown calls seen so far.
    executed: usize,
}

struct Shared {
    generator: Arc<dyn RemoteClusterGenerator>,
    controller: bool,
    counters: Mutex<Counters>,
}

impl Shared {
    async fn lock(&self, ctx: &ProvisionContext) -> Result<MutexGuard<'_, Counters>> {
        tokio::select! {
            guard = self.counters.lock() => Ok(guard),
            _ = ctx.cancellation().cancelled() => Err(ProvisionError::Cancelled),
        }
    }

    async fn cluster_context(&self, config: &Kubeconfig) -> Result<ClusterContext> {
        let connection = kubernetes::connect(config).await?;

        Ok(ClusterContext {
            client: Some(connection.client),
            id: Some(self.generator.id()),
            host: Some(connection.host),
            port: Some(connection.port),
        })
    }
}

/// Shared state for one remote cluster within one provisioner tree.
///
/// The counters are never reset, so a tree serves a single reconciliation
/// pass, either a converge or a teardown.
#[derive(Clone)]
pub struct RemoteCluster {
    shared: Arc<Shared>,
}

impl RemoteCluster {
    /// `controller` marks this tree as owning the cluster's registration
    /// with the driver.
    pub fn new<G>(generator: G, controller: bool) -> Self
    where
        G: RemoteClusterGenerator + 'static,
    {
        Self {
            shared: Arc::new(Shared {
                generator: Arc::new(generator),
                controller,
                counters: Mutex::new(Counters::default()),
            }),
        }
    }

    pub fn id(&self) -> ResourceIdentifier {
        self.shared.generator.id()
    }

    /// Wraps `child` so it runs on the remote cluster.
    ///
    /// Every sibling must be registered before any of them is converged or
    /// torn down.
    pub async fn provision_on<P>(&self, child: P) -> RemoteClusterProvisioner
    where
        P: Provisioner + 'static,
    {
        self.shared.counters.lock().await.registered += 1;

        RemoteClusterProvisioner {
            name: PROVISIONER_REMOTE_CLUSTER.to_string(),
            shared: self.shared.clone(),
            child: Box::new(child),
            background_deletion: false,
        }
    }
}

/// A child provisioner bound to a remote cluster.
pub struct RemoteClusterProvisioner {
    name: String,
    shared: Arc<Shared>,
    child: BoxProvisioner,
    background_deletion: bool,
}

impl RemoteClusterProvisioner {
    /// Deletes the child's applications without waiting for them to go away.
    /// Only suitable when the cluster itself is about to be destroyed.
    pub fn background_deletion(mut self) -> Self {
        self.background_deletion = true;
        self
    }

    /// Registers the cluster with the driver on the first execution.
    async fn provision_remote(&self, ctx: &ProvisionContext) -> Result<Outcome> {
        let mut counters = self.shared.lock(ctx).await?;
        counters.executed += 1;

        if !self.shared.controller || counters.executed != 1 {
            return Ok(Outcome::Success);
        }

        let id = self.shared.generator.id();

        info!(remotecluster = %id, "provisioning remote cluster");

        let Some(config) = self.shared.generator.config(ctx).await? else {
            info!(remotecluster = %id, "remote cluster not ready, yielding");
            return Ok(Outcome::Yield);
        };

        let outcome = ctx
            .driver()
            .create_or_update_cluster(&id, &Cluster { config })
            .await?;

        if outcome.is_yield() {
            info!(remotecluster = %id, "remote cluster not ready, yielding");
            return Ok(Outcome::Yield);
        }

        info!(remotecluster = %id, "remote cluster provisioned");
        Ok(Outcome::Success)
    }

    /// Removes the cluster once every sibling has torn down.
    async fn deprovision_remote(&self, ctx: &ProvisionContext) -> Result<Outcome> {
        let mut counters = self.shared.lock(ctx).await?;
        counters.executed += 1;

        if !self.shared.controller || counters.executed != counters.registered {
            return Ok(Outcome::Success);
        }

        let id = self.shared.generator.id();

        info!(remotecluster = %id, "deprovisioning remote cluster");

        let outcome = ctx.driver().delete_cluster(&id).await?;
        if outcome.is_success() {
            info!(remotecluster = %id, "remote cluster deprovisioned");
        }

        Ok(outcome)
    }
}

#[async_trait]
impl Provisioner for RemoteClusterProvisioner {
    fn name(&self) -> &str {
        &self.name
    }

    async fn converge(&self, ctx: &ProvisionContext) -> Result<Outcome> {
        if self.provision_remote(ctx).await?.is_yield() {
            return Ok(Outcome::Yield);
        }

        let Some(config) = self.shared.generator.config(ctx).await? else {
            debug!(remotecluster = %self.shared.generator.id(), "remote cluster config not available, yielding");
            return Ok(Outcome::Yield);
        };

        let cluster = self.shared.cluster_context(&config).await?;
        let ctx = ctx.clone().with_cluster(cluster);

        self.child.converge(&ctx).await
    }

    async fn teardown(&self, ctx: &ProvisionContext) -> Result<Outcome> {
        match self.shared.generator.config(ctx).await? {
            // Config is gone with the cluster, so is everything on it.
            None => {
                debug!(remotecluster = %self.shared.generator.id(), "remote cluster config not available, assuming deprovisioned");
            }
            Some(config) => {
                let cluster = self.shared.cluster_context(&config).await?;
                let mut ctx = ctx.clone().with_cluster(cluster);
                if self.background_deletion {
                    ctx = ctx.with_background_deletion(true);
                }

                let outcome = self.child.teardown(&ctx).await?;
                if !outcome.is_success() {
                    return Ok(outcome);
                }
            }
        }

        self.deprovision_remote(ctx).await
    }
}
