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

use super::types::{Cluster, HelmApplication, ResourceIdentifier};
use crate::shared::{Outcome, Result};

#[cfg(test)]
use mockall::automock;

/// Continuous-deployment backend that actually installs things.
///
/// `Ok(Outcome::Yield)` means the request was accepted but the resource is
/// not ready yet; any `Err` is fatal.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Driver: Send + Sync {
    /// Human readable driver kind, used for logging.
    fn kind(&self) -> &'static str;

    async fn create_or_update_helm_application(
        &self,
        id: &ResourceIdentifier,
        application: &HelmApplication,
    ) -> Result<Outcome>;

    async fn delete_helm_application(
        &self,
        id: &ResourceIdentifier,
        background_delete: bool,
    ) -> Result<Outcome>;

    async fn create_or_update_cluster(
        &self,
        id: &ResourceIdentifier,
        cluster: &Cluster,
    ) -> Result<Outcome>;

    async fn delete_cluster(&self, id: &ResourceIdentifier) -> Result<Outcome>;
}
