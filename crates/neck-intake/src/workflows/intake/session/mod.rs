mod cache;
mod state;
mod store;

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

pub(crate) use cache::{SessionCache, DEFAULT_SESSION_CACHE_CAPACITY};
pub use state::{IntakeSession, IntakeStep, SubmissionTicket, TransitionError};
pub use store::{
    load_session, save_session, FileSessionStore, InMemorySessionStore, SessionEntry,
    SessionStore, StoreError,
};

/// Opaque identifier for one questionnaire run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
