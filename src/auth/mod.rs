//! Authentication against an Annotatron server

pub mod client;
pub mod error;
pub mod role;
pub mod sequencer;
pub mod state;

pub use client::{
    CredentialExchange, Credentials, HttpCredentialExchange, SessionToken, TokenResponse,
};
pub use error::{AuthError, TransportError};
pub use role::{resolve_role, AuthenticationChanged, Identity, Role};
pub use sequencer::{AuthOutcome, BadStatusPolicy, Sequencer, STAGE_COUNT};
pub use state::{AuthState, RealtimeChannel};
