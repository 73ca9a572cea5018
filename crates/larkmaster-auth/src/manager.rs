// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-flight tenant credential manager.
//!
//! The manager holds at most one live [`Credential`] and at most one refresh
//! in flight. A refresh is a spawned task bounded by the refresh timeout and
//! exposed to callers as a shared future, so every caller that observed the
//! stale credential awaits the same issuance and sees the same outcome.
//! The slot is cleared when the flight completes, whatever the outcome, so a
//! failed refresh is never replayed to later callers.

use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use larkmaster_config::AuthConfig;
use larkmaster_core::{AccessToken, CredentialError, CredentialKind, TokenIssuer};

type Flight = Shared<BoxFuture<'static, Result<Credential, CredentialError>>>;

/// A token plus the instant it stops being accepted.
///
/// Replaced, never mutated, on refresh.
#[derive(Debug, Clone)]
pub struct Credential {
    pub token: AccessToken,
    pub expires_at: Instant,
    pub kind: CredentialKind,
}

impl Credential {
    /// Usable while `now < expires_at - margin`.
    pub fn is_fresh(&self, now: Instant, margin: Duration) -> bool {
        self.expires_at
            .checked_sub(margin)
            .is_some_and(|deadline| now < deadline)
    }
}

struct State {
    current: Option<Credential>,
    generation: u64,
    in_flight: Option<(u64, Flight)>,
    next_flight: u64,
}

impl State {
    /// Clears the slot if it still belongs to `flight_id` and installs the result.
    fn settle(&mut self, flight_id: u64, result: &Result<Credential, CredentialError>) {
        if !matches!(&self.in_flight, Some((id, _)) if *id == flight_id) {
            return;
        }
        self.in_flight = None;
        match result {
            Ok(credential) => {
                self.current = Some(credential.clone());
                self.generation += 1;
                info!(generation = self.generation, "tenant token refreshed");
            }
            Err(e) => warn!(error = %e, "tenant token refresh failed"),
        }
    }
}

/// Guarantees a valid tenant token for every outbound call.
pub struct CredentialManager {
    issuer: Arc<dyn TokenIssuer>,
    safety_margin: Duration,
    refresh_timeout: Duration,
    state: Arc<Mutex<State>>,
}

impl CredentialManager {
    pub fn new(issuer: Arc<dyn TokenIssuer>, safety_margin: Duration, refresh_timeout: Duration) -> Self {
        Self {
            issuer,
            safety_margin,
            refresh_timeout,
            state: Arc::new(Mutex::new(State {
                current: None,
                generation: 0,
                in_flight: None,
                next_flight: 0,
            })),
        }
    }

    pub fn from_config(issuer: Arc<dyn TokenIssuer>, config: &AuthConfig) -> Self {
        Self::new(issuer, config.safety_margin(), config.refresh_timeout())
    }

    /// Returns a token valid for at least the safety margin.
    ///
    /// Performs no I/O while the held credential is fresh. Otherwise joins
    /// the refresh in flight, starting one if there is none.
    pub async fn get_valid_token(&self) -> Result<AccessToken, CredentialError> {
        self.credential().await.map(|c| c.token)
    }

    /// Like [`get_valid_token`](Self::get_valid_token) but returns the whole credential.
    pub async fn credential(&self) -> Result<Credential, CredentialError> {
        let (flight_id, flight) = {
            let mut state = self.state.lock().await;
            if let Some(current) = state
                .current
                .as_ref()
                .filter(|c| c.is_fresh(Instant::now(), self.safety_margin))
            {
                return Ok(current.clone());
            }

            match &state.in_flight {
                Some((id, flight)) => {
                    debug!(flight = id, "joining tenant token refresh in flight");
                    (*id, flight.clone())
                }
                None => {
                    state.next_flight += 1;
                    let id = state.next_flight;
                    let flight = self.start_refresh(id);
                    state.in_flight = Some((id, flight.clone()));
                    debug!(flight = id, "starting tenant token refresh");
                    (id, flight)
                }
            }
        };

        let result = flight.await;
        // The refresh task settles on its own; this covers a task that panicked
        // or was aborted before it could.
        self.state.lock().await.settle(flight_id, &result);
        result
    }

    fn start_refresh(&self, flight_id: u64) -> Flight {
        let issuer = Arc::clone(&self.issuer);
        let state = Arc::clone(&self.state);
        let timeout = self.refresh_timeout;

        let task = tokio::spawn(async move {
            let started = Instant::now();
            let result = match tokio::time::timeout(timeout, issuer.issue()).await {
                Ok(Ok(issued)) => Ok(Credential {
                    token: issued.token,
                    expires_at: started + issued.expires_in,
                    kind: CredentialKind::Tenant,
                }),
                Ok(Err(e)) => Err(e),
                Err(_) => Err(CredentialError::Timeout(timeout)),
            };
            state.lock().await.settle(flight_id, &result);
            result
        });

        async move {
            match task.await {
                Ok(result) => result,
                Err(e) => {
                    warn!(error = %e, "tenant token refresh task did not complete");
                    Err(CredentialError::Cancelled)
                }
            }
        }
        .boxed()
        .shared()
    }

    /// Drops the held credential so the next call refreshes.
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        if state.current.take().is_some() {
            debug!(generation = state.generation, "tenant token invalidated");
        }
    }

    /// Drops the held credential only if it is still `token`.
    ///
    /// Used after the platform rejects a token, so a rejection observed late
    /// does not discard a credential that was refreshed in the meantime.
    pub async fn invalidate_token(&self, token: &AccessToken) {
        let mut state = self.state.lock().await;
        if state.current.as_ref().is_some_and(|c| &c.token == token) {
            state.current = None;
            debug!(generation = state.generation, "rejected tenant token invalidated");
        }
    }

    /// Number of successful refreshes so far.
    pub async fn generation(&self) -> u64 {
        self.state.lock().await.generation
    }
}

impl std::fmt::Debug for CredentialManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialManager")
            .field("safety_margin", &self.safety_margin)
            .field("refresh_timeout", &self.refresh_timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larkmaster_test_utils::{IssueStep, MockIssuer};
    use tracing_test::traced_test;

    const MARGIN: Duration = Duration::from_secs(300);
    const TIMEOUT: Duration = Duration::from_secs(30);

    fn manager(issuer: &Arc<MockIssuer>) -> Arc<CredentialManager> {
        Arc::new(CredentialManager::new(issuer.clone(), MARGIN, TIMEOUT))
    }

    async fn concurrent_calls(
        manager: &Arc<CredentialManager>,
        n: usize,
    ) -> Vec<Result<AccessToken, CredentialError>> {
        let handles: Vec<_> = (0..n)
            .map(|_| {
                let m = Arc::clone(manager);
                tokio::spawn(async move { m.get_valid_token().await })
            })
            .collect();
        let mut results = Vec::with_capacity(n);
        for handle in handles {
            results.push(handle.await.unwrap());
        }
        results
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_token_is_reused_without_io() {
        let issuer = Arc::new(MockIssuer::new());
        let manager = manager(&issuer);

        let first = manager.get_valid_token().await.unwrap();
        let second = manager.get_valid_token().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(issuer.calls(), 1);
        assert_eq!(manager.generation().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_share_one_refresh() {
        let issuer = Arc::new(MockIssuer::new().with_delay(Duration::from_millis(200)));
        let manager = manager(&issuer);

        let results = concurrent_calls(&manager, 50).await;
        assert_eq!(issuer.calls(), 1);
        let tokens: Vec<_> = results.into_iter().map(Result::unwrap).collect();
        assert!(tokens.iter().all(|t| t.expose() == "mock-token-1"));
    }

    #[tokio::test(start_paused = true)]
    async fn failure_reaches_every_waiter_then_clears() {
        let rejected = CredentialError::Rejected {
            code: 10014,
            message: "app secret invalid".into(),
        };
        let issuer = Arc::new(
            MockIssuer::new()
                .with_delay(Duration::from_millis(100))
                .with_steps([IssueStep::Fail(rejected.clone())]),
        );
        let manager = manager(&issuer);

        let results = concurrent_calls(&manager, 10).await;
        assert_eq!(issuer.calls(), 1);
        assert!(results.iter().all(|r| r.as_ref().unwrap_err() == &rejected));

        // not sticky: the next caller triggers a new refresh
        let token = manager.get_valid_token().await.unwrap();
        assert_eq!(token.expose(), "mock-token-2");
        assert_eq!(issuer.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn refreshes_once_inside_safety_margin() {
        let issuer = Arc::new(MockIssuer::new().with_lifetime(Duration::from_secs(600)));
        let manager = manager(&issuer);

        manager.get_valid_token().await.unwrap();
        tokio::time::advance(Duration::from_secs(299)).await;
        assert_eq!(manager.get_valid_token().await.unwrap().expose(), "mock-token-1");

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(manager.get_valid_token().await.unwrap().expose(), "mock-token-2");
        assert_eq!(issuer.calls(), 2);
        assert_eq!(manager.generation().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_refresh_releases_waiters() {
        let issuer = Arc::new(MockIssuer::new().with_steps([IssueStep::Hang]));
        let manager = manager(&issuer);

        let results = concurrent_calls(&manager, 3).await;
        for result in results {
            assert_eq!(result.unwrap_err(), CredentialError::Timeout(TIMEOUT));
        }

        assert!(manager.get_valid_token().await.is_ok());
        assert_eq!(issuer.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_issuer_is_reported_as_cancelled() {
        let issuer = Arc::new(MockIssuer::new().with_steps([IssueStep::Panic]));
        let manager = manager(&issuer);

        let results = concurrent_calls(&manager, 4).await;
        for result in results {
            assert_eq!(result.unwrap_err(), CredentialError::Cancelled);
        }
        assert_eq!(manager.get_valid_token().await.unwrap().expose(), "mock-token-2");
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_a_waiter_does_not_cancel_the_refresh() {
        let issuer = Arc::new(MockIssuer::new().with_delay(Duration::from_secs(1)));
        let manager = manager(&issuer);

        let m = Arc::clone(&manager);
        let first = tokio::spawn(async move { m.get_valid_token().await });
        tokio::task::yield_now().await;
        first.abort();

        let token = manager.get_valid_token().await.unwrap();
        assert_eq!(token.expose(), "mock-token-1");
        assert_eq!(issuer.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_rejection_keeps_newer_token() {
        let issuer = Arc::new(MockIssuer::new());
        let manager = manager(&issuer);

        let old = manager.get_valid_token().await.unwrap();
        manager.invalidate().await;
        let new = manager.get_valid_token().await.unwrap();
        assert_ne!(old, new);

        manager.invalidate_token(&old).await;
        assert_eq!(manager.get_valid_token().await.unwrap(), new);

        manager.invalidate_token(&new).await;
        assert_eq!(manager.get_valid_token().await.unwrap().expose(), "mock-token-3");
    }

    #[test]
    fn freshness_boundary_is_exclusive() {
        let now = Instant::now();
        let credential = Credential {
            token: AccessToken::new("t"),
            expires_at: now + Duration::from_secs(400),
            kind: CredentialKind::Tenant,
        };
        assert!(credential.is_fresh(now, MARGIN));
        assert!(!credential.is_fresh(now + Duration::from_secs(100), MARGIN));
        assert!(!credential.is_fresh(now, Duration::from_secs(500)));
    }

    #[tokio::test(start_paused = true)]
    #[traced_test]
    async fn invalidation_is_logged_without_the_token() {
        let issuer = Arc::new(MockIssuer::new());
        let manager = manager(&issuer);
        let token = manager.get_valid_token().await.unwrap();
        manager.invalidate().await;
        assert!(logs_contain("tenant token invalidated"));
        assert!(!logs_contain(token.expose()));
    }
}
