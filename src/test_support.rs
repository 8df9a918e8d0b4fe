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

//! Fixtures shared by the unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::cd::MockDriver;
use crate::provisioners::{ProvisionContext, Provisioner};
use crate::shared::{Outcome, ProvisionError, Result};

/// Kubeconfig for an unreachable cluster; good enough to build a client.
pub const KUBECONFIG: &str = r#"
apiVersion: v1
kind: Config
current-context: remote
clusters:
  - name: remote
    cluster:
      server: https://10.0.0.1:6443
      insecure-skip-tls-verify: true
contexts:
  - name: remote
    context:
      cluster: remote
      user: admin
users:
  - name: admin
    user:
      token: not-a-real-token
"#;

/// A mock driver that only answers `kind`.
pub fn mock_driver() -> MockDriver {
    let mut driver = MockDriver::new();
    driver.expect_kind().return_const("mock");
    driver
}

pub fn context(driver: MockDriver) -> ProvisionContext {
    ProvisionContext::new(Arc::new(driver))
}

/// What a scripted provisioner reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Success,
    Yield,
    Fail,
}

impl Step {
    fn result(self, name: &str) -> Result<Outcome> {
        match self {
            Step::Success => Ok(Outcome::Success),
            Step::Yield => Ok(Outcome::Yield),
            Step::Fail => Err(ProvisionError::driver(format!("{} failed", name))),
        }
    }
}

/// Shared call journal, entries look like `converge:a`.
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn record(&self, entry: String) {
        self.0.lock().unwrap().push(entry);
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Provisioner that records every call and replies with a fixed step.
pub struct Scripted {
    name: String,
    journal: Journal,
    converge: Step,
    teardown: Step,
}

impl Scripted {
    pub fn new(name: &str, journal: &Journal) -> Self {
        Self {
            name: name.to_string(),
            journal: journal.clone(),
            converge: Step::Success,
            teardown: Step::Success,
        }
    }

    pub fn converge_with(mut self, step: Step) -> Self {
        self.converge = step;
        self
    }

    pub fn teardown_with(mut self, step: Step) -> Self {
        self.teardown = step;
        self
    }
}

#[async_trait]
impl Provisioner for Scripted {
    fn name(&self) -> &str {
        &self.name
    }

    async fn converge(&self, _ctx: &ProvisionContext) -> Result<Outcome> {
        self.journal.record(format!("converge:{}", self.name));
        self.converge.result(&self.name)
    }

    async fn teardown(&self, _ctx: &ProvisionContext) -> Result<Outcome> {
        self.journal.record(format!("teardown:{}", self.name));
        self.teardown.result(&self.name)
    }
}
