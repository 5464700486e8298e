//! Session state shared with the rest of the client: progress events, the
//! event channels they travel on, and the persisted token.

pub mod bus;
pub mod progress;
pub mod storage;

pub use bus::{EventBus, Sink, AUTHENTICATION_CHANGED_CHANNEL, PROGRESS_CHANNEL};
pub use progress::{Progress, ProgressKind, StageCounter};
pub use storage::{
    is_authenticated, FileSessionStore, MemorySessionStore, SessionStore, TOKEN_KEY,
};
