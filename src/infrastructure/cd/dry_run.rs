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

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::cd::{Cluster, Driver, HelmApplication, ResourceIdentifier};
use crate::shared::{Outcome, Result};

/// An application as last submitted to the driver.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub id: ResourceIdentifier,
    pub application: HelmApplication,
}

#[derive(Debug, Default)]
struct State {
    applications: BTreeMap<String, Submission>,
    clusters: BTreeMap<String, ResourceIdentifier>,
    attempts: HashMap<String, usize>,
}

/// In-memory driver that installs nothing.
///
/// Every resource reports not ready for the first `pending_passes`
/// submissions, then converged. Deleting something unknown succeeds.
#[derive(Debug, Default)]
pub struct DryRunDriver {
    pending_passes: usize,
    state: Mutex<State>,
}

impl DryRunDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pending_passes(mut self, passes: usize) -> Self {
        self.pending_passes = passes;
        self
    }

    pub async fn applications(&self) -> Vec<Submission> {
        self.state.lock().await.applications.values().cloned().collect()
    }

    pub async fn application(&self, id: &ResourceIdentifier) -> Option<HelmApplication> {
        self.state
            .lock()
            .await
            .applications
            .get(&id.to_string())
            .map(|s| s.application.clone())
    }

    pub async fn clusters(&self) -> Vec<ResourceIdentifier> {
        self.state.lock().await.clusters.values().cloned().collect()
    }

    fn settle(&self, state: &mut State, key: String) -> Outcome {
        let attempts = state.attempts.entry(key).or_default();
        *attempts += 1;

        if *attempts > self.pending_passes {
            Outcome::Success
        } else {
            Outcome::Yield
        }
    }
}

#[async_trait]
impl Driver for DryRunDriver {
    fn kind(&self) -> &'static str {
        "dry-run"
    }

    async fn create_or_update_helm_application(
        &self,
        id: &ResourceIdentifier,
        application: &HelmApplication,
    ) -> Result<Outcome> {
        let key = format!("application/{}", id);
        let mut state = self.state.lock().await;

        state.applications.insert(
            id.to_string(),
            Submission {
                id: id.clone(),
                application: application.clone(),
            },
        );

        let outcome = self.settle(&mut state, key);
        debug!(application = %id, %outcome, "dry-run application submitted");
        Ok(outcome)
    }

    async fn delete_helm_application(
        &self,
        id: &ResourceIdentifier,
        background_delete: bool,
    ) -> Result<Outcome> {
        let mut state = self.state.lock().await;
        state.applications.remove(&id.to_string());
        state.attempts.remove(&format!("application/{}", id));

        debug!(application = %id, background_delete, "dry-run application deleted");
        Ok(Outcome::Success)
    }

    async fn create_or_update_cluster(
        &self,
        id: &ResourceIdentifier,
        _cluster: &Cluster,
    ) -> Result<Outcome> {
        let key = format!("cluster/{}", id);
        let mut state = self.state.lock().await;

        state.clusters.insert(id.to_string(), id.clone());

        let outcome = self.settle(&mut state, key);
        debug!(cluster = %id, %outcome, "dry-run cluster submitted");
        Ok(outcome)
    }

    async fn delete_cluster(&self, id: &ResourceIdentifier) -> Result<Outcome> {
        let mut state = self.state.lock().await;
        state.clusters.remove(&id.to_string());
        state.attempts.remove(&format!("cluster/{}", id));

        debug!(cluster = %id, "dry-run cluster deleted");
        Ok(Outcome::Success)
    }
}
