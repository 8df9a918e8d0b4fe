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

//! Fixed-period "retry until it works" loop.
//!
//! The callback is invoked once immediately, then on every tick of a
//! fixed-period ticker until it succeeds or the cancellation signal (or an
//! optional deadline) fires. On cancellation both the cancellation cause and
//! the last callback failure are handed back to the caller.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{interval, sleep_until, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

pub const DEFAULT_RETRY_PERIOD: Duration = Duration::from_secs(1);

/// Shortest period the ticker accepts.
pub const MIN_RETRY_PERIOD: Duration = Duration::from_millis(1);

/// Why the retry loop stopped waiting.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    #[error("context canceled")]
    Cancelled,

    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// Returned when the loop gives up: carries the cancellation cause and the
/// last error produced by the callback.
#[derive(Debug)]
pub struct RetryError<E> {
    context: ContextError,
    callback: E,
}

impl<E> RetryError<E> {
    pub fn new(context: ContextError, callback: E) -> Self {
        Self { context, callback }
    }

    pub fn context(&self) -> ContextError {
        self.context
    }

    pub fn callback(&self) -> &E {
        &self.callback
    }

    pub fn into_callback(self) -> E {
        self.callback
    }
}

impl<E: std::fmt::Display> std::fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.callback)
    }
}

impl<E> std::error::Error for RetryError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.callback)
    }
}

#[derive(Debug, Clone)]
pub struct Retrier {
    period: Duration,
    timeout: Option<Duration>,
}

impl Default for Retrier {
    fn default() -> Self {
        Self::forever()
    }
}

impl Retrier {
    /// Retries forever, once a second, until the callback succeeds.
    pub fn forever() -> Self {
        Self {
            period: DEFAULT_RETRY_PERIOD,
            timeout: None,
        }
    }

    /// Sets the tick period, raised to `MIN_RETRY_PERIOD` if shorter.
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period.max(MIN_RETRY_PERIOD);
        self
    }

    /// Gives up with `ContextError::DeadlineExceeded` once `timeout` has
    /// elapsed since the loop started.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Runs the loop with no cancellation signal other than the optional
    /// timeout.
    pub async fn run<T, E, F, Fut>(&self, f: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        self.run_with_cancellation(&CancellationToken::new(), f)
            .await
    }

    pub async fn run_with_cancellation<T, E, F, Fut>(
        &self,
        token: &CancellationToken,
        mut f: F,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let deadline = self.timeout.map(|timeout| Instant::now() + timeout);

        // Check immediately to avoid a delay of one period.
        let mut last = match f().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of a tokio interval completes immediately.
        ticker.tick().await;

        let expired = async move {
            match deadline {
                Some(deadline) => sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::pin!(expired);

        loop {
            tracing::debug!(error = %last, period = ?self.period, "retrying");

            tokio::select! {
                _ = token.cancelled() => {
                    return Err(RetryError::new(ContextError::Cancelled, last));
                }
                _ = &mut expired => {
                    return Err(RetryError::new(ContextError::DeadlineExceeded, last));
                }
                _ = ticker.tick() => {
                    match f().await {
                        Ok(value) => return Ok(value),
                        Err(err) => last = err,
                    }
                }
            }
        }
    }
}
