use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::{IntakeSession, IntakeStep, SessionId};
use crate::workflows::intake::answers::AnswerSet;
use crate::workflows::intake::catalog::QuestionCatalog;
use crate::workflows::intake::contact::ContactInfo;

/// Independently persisted pieces of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionEntry {
    Step,
    Answers,
    Contact,
}

impl SessionEntry {
    pub const ALL: [SessionEntry; 3] = [
        SessionEntry::Step,
        SessionEntry::Answers,
        SessionEntry::Contact,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            SessionEntry::Step => "intake_step",
            SessionEntry::Answers => "intake_answers",
            SessionEntry::Contact => "intake_contact",
        }
    }
}

/// Keyed storage for serialized session entries.
pub trait SessionStore: Send + Sync {
    fn read(&self, session: SessionId, entry: SessionEntry) -> Result<Option<String>, StoreError>;
    fn write(
        &self,
        session: SessionId,
        entry: SessionEntry,
        payload: String,
    ) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    entries: Mutex<HashMap<(SessionId, SessionEntry), String>>,
}

impl SessionStore for InMemorySessionStore {
    fn read(&self, session: SessionId, entry: SessionEntry) -> Result<Option<String>, StoreError> {
        let guard = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("session map poisoned".to_string()))?;
        Ok(guard.get(&(session, entry)).cloned())
    }

    fn write(
        &self,
        session: SessionId,
        entry: SessionEntry,
        payload: String,
    ) -> Result<(), StoreError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("session map poisoned".to_string()))?;
        guard.insert((session, entry), payload);
        Ok(())
    }
}

/// One JSON file per entry under `<root>/<session id>/`.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    root: PathBuf,
}

impl FileSessionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, session: SessionId, entry: SessionEntry) -> PathBuf {
        self.root
            .join(session.to_string())
            .join(format!("{}.json", entry.key()))
    }
}

impl SessionStore for FileSessionStore {
    fn read(&self, session: SessionId, entry: SessionEntry) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.entry_path(session, entry)) {
            Ok(payload) => Ok(Some(payload)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(
        &self,
        session: SessionId,
        entry: SessionEntry,
        payload: String,
    ) -> Result<(), StoreError> {
        let path = self.entry_path(session, entry);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, payload)?;
        Ok(())
    }
}

/// Load a session, masking missing or unreadable entries with defaults.
///
/// Returns `None` when the store has no step entry for the session or cannot
/// be read at all.
pub fn load_session<S>(
    store: &S,
    id: SessionId,
    catalog: &QuestionCatalog,
) -> Option<IntakeSession>
where
    S: SessionStore + ?Sized,
{
    match store.read(id, SessionEntry::Step) {
        Ok(Some(_)) => {}
        Ok(None) => return None,
        Err(err) => {
            warn!(
                session = %id,
                error = %err,
                "session store read failed; treating session as absent"
            );
            return None;
        }
    }

    let step = read_entry::<_, IntakeStep>(store, id, SessionEntry::Step).unwrap_or_default();
    let answers = read_entry::<_, BTreeMap<String, u32>>(store, id, SessionEntry::Answers)
        .map(|raw| AnswerSet::from_stored(raw, catalog))
        .unwrap_or_else(|| AnswerSet::initialized(catalog));
    let contact = read_entry::<_, ContactInfo>(store, id, SessionEntry::Contact).unwrap_or_default();

    let step = if step == IntakeStep::Results && !contact.is_captured() {
        warn!(session = %id, "stored results step without contact details; reopening lead form");
        IntakeStep::LeadCapture
    } else {
        step
    };

    debug!(session = %id, step = step.token(), "session restored");
    Some(IntakeSession::restore(id, step, answers, contact))
}

/// Write every entry of the session. Failures are logged and swallowed.
pub fn save_session<S>(store: &S, session: &IntakeSession)
where
    S: SessionStore + ?Sized,
{
    write_entry(store, session.id(), SessionEntry::Step, &session.step());
    write_entry(store, session.id(), SessionEntry::Answers, session.answers());
    write_entry(store, session.id(), SessionEntry::Contact, session.contact());
}

fn read_entry<S, T>(store: &S, id: SessionId, entry: SessionEntry) -> Option<T>
where
    S: SessionStore + ?Sized,
    T: DeserializeOwned,
{
    let payload = match store.read(id, entry) {
        Ok(payload) => payload?,
        Err(err) => {
            warn!(session = %id, entry = entry.key(), error = %err, "session entry unreadable");
            return None;
        }
    };

    match serde_json::from_str(&payload) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(session = %id, entry = entry.key(), error = %err, "session entry malformed; using default");
            None
        }
    }
}

fn write_entry<S, T>(store: &S, id: SessionId, entry: SessionEntry, value: &T)
where
    S: SessionStore + ?Sized,
    T: Serialize + ?Sized,
{
    let payload = match serde_json::to_string(value) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(session = %id, entry = entry.key(), error = %err, "session entry not serializable");
            return;
        }
    };

    if let Err(err) = store.write(id, entry, payload) {
        warn!(session = %id, entry = entry.key(), error = %err, "session store write failed");
    }
}
