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

//! Idempotent provisioners and the primitives used to compose them.
//!
//! A reconciler builds a tree of provisioners for each pass and calls
//! [`Provisioner::converge`] or [`Provisioner::teardown`] on the root. Both
//! must be safe to call any number of times: re-running against an already
//! converged resource is a no-op that still reports [`Outcome::Success`].
//! [`Outcome::Yield`] asks the caller to come back later; any `Err` is fatal
//! and is passed up unchanged.

pub mod application;
pub mod conditional;
pub mod context;
pub mod remote_cluster;
pub mod serial;

use crate::shared::{Outcome, Result};

pub use context::{ClusterContext, ProvisionContext, ResourceLabeler};

#[async_trait::async_trait]
pub trait Provisioner: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Drives the resource towards its desired state.
    async fn converge(&self, ctx: &ProvisionContext) -> Result<Outcome>;

    /// Removes the resource. Implementations should gate on the resource
    /// actually being gone before reporting success.
    async fn teardown(&self, ctx: &ProvisionContext) -> Result<Outcome>;
}

pub type BoxProvisioner = Box<dyn Provisioner>;

#[async_trait::async_trait]
impl<P: Provisioner + ?Sized> Provisioner for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn converge(&self, ctx: &ProvisionContext) -> Result<Outcome> {
        (**self).converge(ctx).await
    }

    async fn teardown(&self, ctx: &ProvisionContext) -> Result<Outcome> {
        (**self).teardown(ctx).await
    }
}

#[async_trait::async_trait]
impl<P: Provisioner + ?Sized> Provisioner for std::sync::Arc<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn converge(&self, ctx: &ProvisionContext) -> Result<Outcome> {
        (**self).converge(ctx).await
    }

    async fn teardown(&self, ctx: &ProvisionContext) -> Result<Outcome> {
        (**self).teardown(ctx).await
    }
}
