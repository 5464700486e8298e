//! Login sequence: token exchange, token storage, identity verification.
//!
//! One call to [`Sequencer::authenticate`] walks the steps in a fixed order and
//! reports each one on the progress channel:
//!
//! 1. `Authenticating...` (indeterminate) while the token is requested
//! 2. `Saving token` once the server hands out a token
//! 3. `Testing` while the identity bound to that token is checked
//!
//! A successful run ends with one [`AuthenticationChanged`] on the identity
//! channel. Every failure ends with one `Failure` progress event, which is
//! always the last event of the run.

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::client::{CredentialExchange, Credentials, SessionToken};
use super::error::{AuthError, Result, TransportError};
use super::role::{resolve_role, AuthenticationChanged, Identity, Role};
use super::state::{Attempt, AuthState, RealtimeChannel};
use crate::session::bus::Sink;
use crate::session::progress::{Progress, StageCounter};
use crate::session::storage::{SessionStore, TOKEN_KEY};

/// Stage count reported by structured progress events.
pub const STAGE_COUNT: u32 = 5;

/// What to do when the server answers the token request with a non-200
/// status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadStatusPolicy {
    /// Report on the progress channel only; the caller gets
    /// `AuthOutcome::Rejected`.
    #[default]
    Report,
    /// Report on the progress channel and return `AuthError::BadStatus`.
    Propagate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    Authenticated(Role),
    /// Token request refused under [`BadStatusPolicy::Report`], the default.
    Rejected { status: u16 },
}

impl AuthOutcome {
    pub fn role(&self) -> Option<Role> {
        match self {
            AuthOutcome::Authenticated(role) => Some(*role),
            AuthOutcome::Rejected { .. } => None,
        }
    }
}

pub struct Sequencer<C, S> {
    exchange: C,
    store: S,
    policy: BadStatusPolicy,
    total_stages: u32,
    in_flight: Mutex<()>,
}

impl<C, S> Sequencer<C, S>
where
    C: CredentialExchange,
    S: SessionStore,
{
    pub fn new(exchange: C, store: S) -> Self {
        Self {
            exchange,
            store,
            policy: BadStatusPolicy::default(),
            total_stages: STAGE_COUNT,
            in_flight: Mutex::new(()),
        }
    }

    pub fn with_policy(mut self, policy: BadStatusPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Override the stage total reported in structured events (at least 3).
    pub fn with_total_stages(mut self, total: u32) -> Self {
        self.total_stages = total.max(3);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn exchange(&self) -> &C {
        &self.exchange
    }

    /// Log in with `credentials`.
    ///
    /// Concurrent calls on the same sequencer run one after another. When an
    /// error is returned after the token was saved, the store still holds
    /// that token; callers should not assume they are logged out.
    pub async fn authenticate<P, I>(
        &self,
        credentials: &Credentials,
        progress: &P,
        identity: &I,
    ) -> Result<AuthOutcome>
    where
        P: Sink<Progress> + ?Sized,
        I: Sink<AuthenticationChanged> + ?Sized,
    {
        let _guard = self.in_flight.lock().await;
        let mut attempt = Attempt::new();

        let result = self
            .run(&mut attempt, credentials, progress, identity)
            .await;

        match &result {
            Ok(AuthOutcome::Authenticated(role)) => {
                tracing::info!(username = %credentials.username, %role, "authenticated");
            }
            Ok(AuthOutcome::Rejected { status }) => {
                attempt.advance(AuthState::Failed);
                tracing::warn!(username = %credentials.username, status, "token request rejected");
            }
            Err(err) => {
                attempt.advance(AuthState::Failed);
                let description = match err {
                    AuthError::BadStatus(code) => {
                        format!("Internal error: bad status code {}", code)
                    }
                    other => format!("Problem: {}", other),
                };
                progress.publish(Progress::failure(description));
                tracing::warn!(username = %credentials.username, error = %err, "authentication failed");
            }
        }
        tracing::debug!(state = attempt.state().name(), "authentication finished");

        result
    }

    async fn run<P, I>(
        &self,
        attempt: &mut Attempt,
        credentials: &Credentials,
        progress: &P,
        identity: &I,
    ) -> Result<AuthOutcome>
    where
        P: Sink<Progress> + ?Sized,
        I: Sink<AuthenticationChanged> + ?Sized,
    {
        let mut stages = StageCounter::new(1, self.total_stages);

        progress.publish(Progress::indeterminate("Authenticating..."));
        attempt.advance(AuthState::AwaitingToken);
        let response = self.exchange.request_token(credentials).await?;
        if !response.is_success() {
            return match self.policy {
                BadStatusPolicy::Propagate => Err(AuthError::BadStatus(response.status)),
                BadStatusPolicy::Report => {
                    progress.publish(Progress::failure(format!(
                        "Internal error: bad status code {}",
                        response.status
                    )));
                    Ok(AuthOutcome::Rejected {
                        status: response.status,
                    })
                }
            };
        }
        let token = response.token.ok_or(TransportError::MissingToken)?;

        progress.publish(stages.advance("Saving token"));
        self.store.set(TOKEN_KEY, token.as_str())?;
        attempt.advance(AuthState::TokenStored);

        progress.publish(stages.advance("Testing"));
        attempt.advance(AuthState::VerifyingIdentity);
        let role = self.verify(credentials, &token).await?;

        identity.publish(AuthenticationChanged {
            authenticated: role,
        });
        attempt.advance(AuthState::Authenticated {
            role,
            realtime: RealtimeChannel::Deferred,
        });
        tracing::debug!("real-time channel not opened for this session");

        Ok(AuthOutcome::Authenticated(role))
    }

    async fn verify(&self, credentials: &Credentials, token: &SessionToken) -> Result<Role> {
        let identity: Identity = self.exchange.check_identity(token).await?;
        if identity.username != credentials.username {
            return Err(AuthError::SecurityMismatch {
                requested: credentials.username.clone(),
                actual: identity.username,
            });
        }

        Ok(resolve_role(&identity))
    }
}
