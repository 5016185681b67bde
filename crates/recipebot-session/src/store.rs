use crate::clock::{Clock, SystemClock};
use crate::session::Session;
use parking_lot::RwLock;
use recipebot_core::UserId;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Storage for the one in-progress dialogue of each user.
///
/// Implementations never perform I/O, so the methods are synchronous.
pub trait SessionStore: Send + Sync {
    /// The live session of `user`, if any. Expired entries are reported as absent.
    fn get(&self, user: UserId) -> Option<Session>;
    /// Inserts or overwrites the session of `user` and restarts its TTL.
    fn put(&self, user: UserId, session: Session);
    /// Deletes the session of `user`. Removing an absent entry is a no-op.
    fn remove(&self, user: UserId);
    /// Drops every expired entry and returns how many were dropped.
    fn purge_expired(&self) -> usize;
    /// Number of live entries.
    fn len(&self) -> usize;
    /// Whether there are no live entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct Entry {
    session: Session,
    /// `None` when the TTL reaches past what `Instant` can represent.
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

/// In-memory [`SessionStore`] whose entries expire a fixed time after their
/// last write.
///
/// Every operation holds the lock only for a map lookup or insert, so
/// concurrent users never wait on each other for long.
pub struct TtlSessionStore {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: RwLock<HashMap<UserId, Entry>>,
}

impl TtlSessionStore {
    /// Creates a store using the system clock.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Creates a store reading time from `clock`.
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// The configured time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl SessionStore for TtlSessionStore {
    fn get(&self, user: UserId) -> Option<Session> {
        let now = self.clock.now();
        let entries = self.entries.read();
        entries
            .get(&user)
            .filter(|e| e.is_live(now))
            .map(|e| e.session.clone())
    }

    fn put(&self, user: UserId, session: Session) {
        let expires_at = self.clock.now().checked_add(self.ttl);
        self.entries
            .write()
            .insert(user, Entry { session, expires_at });
    }

    fn remove(&self, user: UserId) {
        self.entries.write().remove(&user);
    }

    fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, e| e.is_live(now));
        before - entries.len()
    }

    fn len(&self) -> usize {
        let now = self.clock.now();
        self.entries
            .read()
            .values()
            .filter(|e| e.is_live(now))
            .count()
    }
}
