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

use crate::infrastructure::constants::{HTTPS_DEFAULT_PORT, HTTP_DEFAULT_PORT};
use crate::shared::error::{ProvisionError, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};

/// A live client for a cluster plus the API endpoint it talks to.
#[derive(Clone)]
pub struct ClusterConnection {
    pub client: Client,
    pub host: String,
    pub port: String,
}

pub fn parse_kubeconfig(content: &str) -> Result<Kubeconfig> {
    Kubeconfig::from_yaml(content)
        .map_err(|e| ProvisionError::Kubeconfig(format!("Failed to parse kubeconfig: {}", e)))
}

/// Reads an explicit kubeconfig, or falls back to KUBECONFIG / ~/.kube/config.
pub fn load_kubeconfig(path: Option<&str>) -> Result<Kubeconfig> {
    let kubeconfig = match path {
        Some(path) => Kubeconfig::read_from(path),
        None => Kubeconfig::read(),
    };

    kubeconfig.map_err(|e| ProvisionError::Kubeconfig(format!("Failed to load kubeconfig: {}", e)))
}

/// Resolves the current context of `kubeconfig` and builds a client for it.
pub async fn connect(kubeconfig: &Kubeconfig) -> Result<ClusterConnection> {
    let config = Config::from_custom_kubeconfig(kubeconfig.clone(), &KubeConfigOptions::default())
        .await
        .map_err(|e| {
            ProvisionError::Kubeconfig(format!("Failed to create Kubernetes config: {}", e))
        })?;

    let (host, port) = endpoint(&config)?;

    let client = Client::try_from(config).map_err(|e| {
        ProvisionError::Kube(format!("Failed to create Kubernetes client: {}", e))
    })?;

    Ok(ClusterConnection { client, host, port })
}

/// Splits the API server URL into host and port, defaulting the port from
/// the scheme when the URL has none.
pub fn endpoint(config: &Config) -> Result<(String, String)> {
    let url = &config.cluster_url;

    let host = url
        .host()
        .map(|h| h.trim_start_matches('[').trim_end_matches(']').to_string())
        .ok_or_else(|| {
            ProvisionError::Kubeconfig(format!("cluster server {} has no host", url))
        })?;

    let port = match url.port_u16() {
        Some(port) => port.to_string(),
        None => match url.scheme_str() {
            Some("http") => HTTP_DEFAULT_PORT.to_string(),
            Some("https") => HTTPS_DEFAULT_PORT.to_string(),
            _ => String::new(),
        },
    };

    Ok((host, port))
}
