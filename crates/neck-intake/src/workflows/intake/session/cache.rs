use std::collections::HashMap;

use tracing::debug;

use super::{IntakeSession, SessionId};

/// Sessions kept in memory by default before the least recently used idle one is dropped.
pub(crate) const DEFAULT_SESSION_CACHE_CAPACITY: usize = 1024;

struct CachedSession {
    session: IntakeSession,
    last_access: u64,
}

/// Bounded working set of live sessions in front of the session store.
///
/// Every mutation is already written to the store, so an evicted session
/// reloads from its stored entries on the next touch. Sessions with a
/// submission in flight are never evicted.
pub(crate) struct SessionCache {
    capacity: usize,
    clock: u64,
    entries: HashMap<SessionId, CachedSession>,
}

impl SessionCache {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            clock: 0,
            entries: HashMap::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, id: SessionId) -> bool {
        self.entries.contains_key(&id)
    }

    pub(crate) fn insert(&mut self, session: IntakeSession) {
        let id = session.id();
        if !self.entries.contains_key(&id) {
            self.make_room();
        }
        self.clock += 1;
        self.entries.insert(
            id,
            CachedSession {
                session,
                last_access: self.clock,
            },
        );
    }

    /// Cached session for `id`, calling `load` to fill the slot on a miss.
    pub(crate) fn get_or_load(
        &mut self,
        id: SessionId,
        load: impl FnOnce() -> Option<IntakeSession>,
    ) -> Option<&mut IntakeSession> {
        if !self.entries.contains_key(&id) {
            let session = load()?;
            self.insert(session);
        }

        self.clock += 1;
        let clock = self.clock;
        self.entries.get_mut(&id).map(|cached| {
            cached.last_access = clock;
            &mut cached.session
        })
    }

    fn make_room(&mut self) {
        while self.entries.len() >= self.capacity {
            let oldest_idle = self
                .entries
                .iter()
                .filter(|(_, cached)| !cached.session.is_submitting())
                .min_by_key(|(_, cached)| cached.last_access)
                .map(|(id, _)| *id);

            match oldest_idle {
                Some(id) => {
                    self.entries.remove(&id);
                    debug!(session = %id, "session evicted from cache");
                }
                None => break,
            }
        }
    }
}
