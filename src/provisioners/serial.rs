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
use tracing::info;

use super::{BoxProvisioner, ProvisionContext, Provisioner};
use crate::shared::{Outcome, Result};

/// Runs its members one after the other.
///
/// Members earlier in the list are prerequisites of later ones, so teardown
/// walks the list backwards. Both directions stop at the first member that
/// does not succeed.
pub struct Serial {
    name: String,
    members: Vec<BoxProvisioner>,
}

impl Serial {
    pub fn new(name: impl Into<String>, members: Vec<BoxProvisioner>) -> Self {
        Self {
            name: name.into(),
            members,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[async_trait]
impl Provisioner for Serial {
    fn name(&self) -> &str {
        &self.name
    }

    async fn converge(&self, ctx: &ProvisionContext) -> Result<Outcome> {
        info!(group = %self.name, "provisioning serial group");

        for member in &self.members {
            match member.converge(ctx).await {
                Ok(Outcome::Success) => {}
                Ok(Outcome::Yield) => {
                    info!(group = %self.name, provisioner = member.name(), "serial group member yielded");
                    return Ok(Outcome::Yield);
                }
                Err(e) => {
                    info!(group = %self.name, provisioner = member.name(), error = %e, "serial group member exited with error");
                    return Err(e);
                }
            }
        }

        info!(group = %self.name, "serial group provisioned");
        Ok(Outcome::Success)
    }

    async fn teardown(&self, ctx: &ProvisionContext) -> Result<Outcome> {
        info!(group = %self.name, "deprovisioning serial group");

        for member in self.members.iter().rev() {
            match member.teardown(ctx).await {
                Ok(Outcome::Success) => {}
                Ok(Outcome::Yield) => {
                    info!(group = %self.name, provisioner = member.name(), "serial group member yielded");
                    return Ok(Outcome::Yield);
                }
                Err(e) => {
                    info!(group = %self.name, provisioner = member.name(), error = %e, "serial group member exited with error");
                    return Err(e);
                }
            }
        }

        info!(group = %self.name, "serial group deprovisioned");
        Ok(Outcome::Success)
    }
}
