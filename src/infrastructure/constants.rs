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

/// Label carrying an application's logical name
pub const NAME_LABEL: &str = "app.kubernetes.io/name";

/// Namespace used when neither the provisioner nor the version names one
pub const DEFAULT_APPLICATION_NAMESPACE: &str = "default";

/// Default secret key holding a remote cluster's kubeconfig
pub const KUBECONFIG_SECRET_KEY: &str = "config";

/// Provisioner names
pub const PROVISIONER_APPLICATION: &str = "application";
pub const PROVISIONER_REMOTE_CLUSTER: &str = "remote-cluster";

/// Default ports by URL scheme
pub const HTTP_DEFAULT_PORT: &str = "80";
pub const HTTPS_DEFAULT_PORT: &str = "443";
