// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock token issuer for deterministic credential tests.
//!
//! Steps are popped from a FIFO script; an empty script issues a fresh
//! numbered token. Every call is counted before any delay, so tests can
//! assert on issuance counts while a refresh is still in flight.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use larkmaster_core::{AccessToken, CredentialError, IssuedToken, TokenIssuer};

/// What the next `issue()` call does.
#[derive(Debug, Clone)]
pub enum IssueStep {
    /// Issue `mock-token-{n}` with the configured lifetime.
    Token,
    /// Issue a token with an explicit lifetime.
    TokenWithLifetime(Duration),
    Fail(CredentialError),
    /// Never complete.
    Hang,
    Panic,
}

pub struct MockIssuer {
    calls: AtomicUsize,
    script: Mutex<VecDeque<IssueStep>>,
    delay: Option<Duration>,
    lifetime: Duration,
}

impl MockIssuer {
    /// Issues two-hour tokens immediately.
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            script: Mutex::new(VecDeque::new()),
            delay: None,
            lifetime: Duration::from_secs(7200),
        }
    }

    /// Sleep (on the tokio clock) before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn with_steps(self, steps: impl IntoIterator<Item = IssueStep>) -> Self {
        Self {
            script: Mutex::new(steps.into_iter().collect()),
            ..self
        }
    }

    pub async fn push_step(&self, step: IssueStep) {
        self.script.lock().await.push_back(step);
    }

    /// Number of `issue()` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockIssuer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenIssuer for MockIssuer {
    async fn issue(&self) -> Result<IssuedToken, CredentialError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let step = self
            .script
            .lock()
            .await
            .pop_front()
            .unwrap_or(IssueStep::Token);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        tracing::debug!(call = n, ?step, "mock issuer called");
        match step {
            IssueStep::Token => Ok(IssuedToken {
                token: AccessToken::new(format!("mock-token-{n}")),
                expires_in: self.lifetime,
            }),
            IssueStep::TokenWithLifetime(lifetime) => Ok(IssuedToken {
                token: AccessToken::new(format!("mock-token-{n}")),
                expires_in: lifetime,
            }),
            IssueStep::Fail(err) => Err(err),
            IssueStep::Hang => std::future::pending().await,
            IssueStep::Panic => panic!("mock issuer panicked on call {n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn numbers_tokens_and_counts_calls() {
        let issuer = MockIssuer::new();
        let first = issuer.issue().await.unwrap();
        let second = issuer.issue().await.unwrap();
        assert_eq!(first.token.expose(), "mock-token-1");
        assert_eq!(second.token.expose(), "mock-token-2");
        assert_eq!(issuer.calls(), 2);
    }

    #[tokio::test]
    async fn script_runs_before_default() {
        let issuer = MockIssuer::new().with_steps([IssueStep::Fail(CredentialError::Cancelled)]);
        assert_eq!(issuer.issue().await.unwrap_err(), CredentialError::Cancelled);
        assert!(issuer.issue().await.is_ok());
    }
}
