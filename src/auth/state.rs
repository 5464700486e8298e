//! Authentication state machine

use super::role::Role;

/// Work deferred until after authentication completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RealtimeChannel {
    /// No real-time channel is opened for the session yet.
    Deferred,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Idle,
    AwaitingToken,
    TokenStored,
    VerifyingIdentity,
    Authenticated {
        role: Role,
        realtime: RealtimeChannel,
    },
    Failed,
}

impl AuthState {
    pub fn name(&self) -> &'static str {
        match self {
            AuthState::Idle => "idle",
            AuthState::AwaitingToken => "awaiting_token",
            AuthState::TokenStored => "token_stored",
            AuthState::VerifyingIdentity => "verifying_identity",
            AuthState::Authenticated { .. } => "authenticated",
            AuthState::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AuthState::Authenticated { .. } | AuthState::Failed)
    }

    pub fn can_transition_to(&self, next: &AuthState) -> bool {
        use AuthState::*;
        match (self, next) {
            (Idle, AwaitingToken)
            | (AwaitingToken, TokenStored)
            | (TokenStored, VerifyingIdentity)
            | (VerifyingIdentity, Authenticated { .. }) => true,
            (from, Failed) => !from.is_terminal(),
            _ => false,
        }
    }
}

/// State of a single authentication attempt.
#[derive(Debug)]
pub(crate) struct Attempt {
    state: AuthState,
}

impl Attempt {
    pub(crate) fn new() -> Self {
        Self {
            state: AuthState::Idle,
        }
    }

    pub(crate) fn state(&self) -> AuthState {
        self.state
    }

    pub(crate) fn advance(&mut self, next: AuthState) {
        debug_assert!(
            self.state.can_transition_to(&next),
            "illegal transition {} -> {}",
            self.state.name(),
            next.name()
        );
        tracing::debug!(from = self.state.name(), to = next.name(), "auth state");
        self.state = next;
    }
}
