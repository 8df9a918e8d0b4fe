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

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::config::Kubeconfig;
use kube::Api;
use tracing::debug;

use super::RemoteClusterGenerator;
use crate::domain::cd::ResourceIdentifier;
use crate::infrastructure::constants::KUBECONFIG_SECRET_KEY;
use crate::infrastructure::kubernetes::parse_kubeconfig;
use crate::provisioners::ProvisionContext;
use crate::shared::error::{ProvisionError, Result};

/// Remote cluster whose kubeconfig is published in a Secret on the current
/// cluster, as cluster API and vcluster do.
#[derive(Debug, Clone)]
pub struct SecretRemoteCluster {
    id: ResourceIdentifier,
    namespace: String,
    name: String,
    key: String,
}

impl SecretRemoteCluster {
    pub fn new(
        id: ResourceIdentifier,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            namespace: namespace.into(),
            name: name.into(),
            key: KUBECONFIG_SECRET_KEY.to_string(),
        }
    }

    /// Reads the kubeconfig from `key` instead of the default `config`.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    fn decode(&self, secret: &Secret) -> Result<Option<Kubeconfig>> {
        let Some(data) = secret.data.as_ref().and_then(|data| data.get(&self.key)) else {
            debug!(secret = %self.name, key = %self.key, "kubeconfig key not present");
            return Ok(None);
        };

        let content = std::str::from_utf8(&data.0).map_err(|e| {
            ProvisionError::Kubeconfig(format!(
                "secret {}/{} key {} is not UTF-8: {}",
                self.namespace, self.name, self.key, e
            ))
        })?;

        parse_kubeconfig(content).map(Some)
    }
}

#[async_trait]
impl RemoteClusterGenerator for SecretRemoteCluster {
    fn id(&self) -> ResourceIdentifier {
        self.id.clone()
    }

    async fn config(&self, ctx: &ProvisionContext) -> Result<Option<Kubeconfig>> {
        let client = ctx.cluster().client.clone().ok_or_else(|| {
            ProvisionError::invalid_context("no cluster client to read the kubeconfig secret with")
        })?;

        let api: Api<Secret> = Api::namespaced(client, &self.namespace);

        match api.get(&self.name).await {
            Ok(secret) => self.decode(&secret),
            Err(kube::Error::Api(ae)) if ae.code == 404 => {
                debug!(namespace = %self.namespace, secret = %self.name, "kubeconfig secret not found");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}
