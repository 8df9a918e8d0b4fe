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

pub type Predicate = Box<dyn Fn() -> bool + Send + Sync>;

/// Converges its member only while the predicate holds, tearing it down
/// otherwise. The predicate is evaluated on every converge.
pub struct Conditional {
    name: String,
    condition: Predicate,
    member: BoxProvisioner,
}

impl Conditional {
    pub fn new<F>(name: impl Into<String>, condition: F, member: BoxProvisioner) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            condition: Box::new(condition),
            member,
        }
    }
}

#[async_trait]
impl Provisioner for Conditional {
    fn name(&self) -> &str {
        &self.name
    }

    async fn converge(&self, ctx: &ProvisionContext) -> Result<Outcome> {
        if !(self.condition)() {
            info!(provisioner = %self.name, "conditional deprovision");
            return self.member.teardown(ctx).await;
        }

        self.member.converge(ctx).await
    }

    async fn teardown(&self, ctx: &ProvisionContext) -> Result<Outcome> {
        self.member.teardown(ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{context, mock_driver, Journal, Scripted, Step};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_predicate_true_converges() {
        let journal = Journal::default();
        let conditional = Conditional::new("on", || true, Box::new(Scripted::new("a", &journal)));

        let ctx = context(mock_driver());
        assert_eq!(conditional.converge(&ctx).await.unwrap(), Outcome::Success);
        assert_eq!(conditional.teardown(&ctx).await.unwrap(), Outcome::Success);
        assert_eq!(journal.entries(), vec!["converge:a", "teardown:a"]);
    }

    #[tokio::test]
    async fn test_predicate_false_tears_down() {
        let journal = Journal::default();
        let conditional = Conditional::new(
            "off",
            || false,
            Box::new(Scripted::new("a", &journal).teardown_with(Step::Yield)),
        );

        let ctx = context(mock_driver());
        assert_eq!(conditional.converge(&ctx).await.unwrap(), Outcome::Yield);
        assert_eq!(conditional.teardown(&ctx).await.unwrap(), Outcome::Yield);
        assert_eq!(journal.entries(), vec!["teardown:a", "teardown:a"]);
    }

    #[tokio::test]
    async fn test_predicate_evaluated_every_time() {
        let journal = Journal::default();
        let enabled = Arc::new(AtomicBool::new(true));
        let flag = enabled.clone();
        let conditional = Conditional::new(
            "toggle",
            move || flag.load(Ordering::SeqCst),
            Box::new(Scripted::new("a", &journal)),
        );

        let ctx = context(mock_driver());
        assert!(conditional.converge(&ctx).await.unwrap().is_success());
        enabled.store(false, Ordering::SeqCst);
        assert!(conditional.converge(&ctx).await.unwrap().is_success());
        assert_eq!(journal.entries(), vec!["converge:a", "teardown:a"]);
    }
}
