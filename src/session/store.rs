//! In-memory session registry keyed by cookie id
//!
//! Every lookup stamps the session with the current time. Sessions left
//! untouched for longer than the idle timeout are swept out whenever a new
//! session is minted, so clients that drop cookies cannot grow the map
//! without bound.

use super::Session;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// Opaque session identifier carried in the session cookie
pub type SessionId = Uuid;

/// Shared, lockable handle to one session
pub type SessionHandle = Arc<Mutex<Session>>;

/// Cookie name carrying the session id
pub const SESSION_COOKIE: &str = "parley_session";

/// Idle time after which a session is forgotten
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Upper bound on the time between two sweeps
const MAX_SWEEP_INTERVAL_MS: i64 = 60_000;

#[derive(Debug)]
struct Entry {
    handle: SessionHandle,
    last_seen_ms: AtomicI64,
}

impl Entry {
    fn new(handle: SessionHandle, now_ms: i64) -> Self {
        Self {
            handle,
            last_seen_ms: AtomicI64::new(now_ms),
        }
    }

    fn touch(&self, now_ms: i64) {
        self.last_seen_ms.fetch_max(now_ms, Ordering::Relaxed);
    }

    /// Idle past the timeout and not held by any request
    fn is_expired(&self, now_ms: i64, idle_timeout_ms: i64) -> bool {
        Arc::strong_count(&self.handle) == 1
            && now_ms.saturating_sub(self.last_seen_ms.load(Ordering::Relaxed)) >= idle_timeout_ms
    }
}

/// Holds every live session
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, Entry>>,
    idle_timeout_ms: i64,
    last_sweep_ms: AtomicI64,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_timeout(DEFAULT_IDLE_TIMEOUT)
    }
}

impl SessionStore {
    /// Create an empty store with the default idle timeout
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that forgets sessions idle for `idle_timeout`
    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout_ms: i64::try_from(idle_timeout.as_millis()).unwrap_or(i64::MAX),
            last_sweep_ms: AtomicI64::new(0),
        }
    }

    /// Look up the session for `id`, creating a fresh one when unknown
    ///
    /// Returns the id actually used (which differs from `id` when a new
    /// session was minted), the handle, and whether it was created.
    pub async fn get_or_init(&self, id: Option<SessionId>) -> (SessionId, SessionHandle, bool) {
        let now_ms = Utc::now().timestamp_millis();

        if let Some(id) = id {
            if let Some(entry) = self.sessions.read().await.get(&id) {
                entry.touch(now_ms);
                return (id, entry.handle.clone(), false);
            }
        }

        let mut sessions = self.sessions.write().await;
        // Another request may have inserted this id between the locks
        if let Some(id) = id {
            if let Some(entry) = sessions.get(&id) {
                entry.touch(now_ms);
                return (id, entry.handle.clone(), false);
            }
        }

        if self.sweep_due(now_ms) {
            self.sweep(&mut sessions, now_ms);
        }

        let new_id = Uuid::new_v4();
        let handle = Arc::new(Mutex::new(Session::new()));
        sessions.insert(new_id, Entry::new(handle.clone(), now_ms));
        tracing::debug!("Created session {}", new_id);
        (new_id, handle, true)
    }

    fn sweep_due(&self, now_ms: i64) -> bool {
        let interval = self.idle_timeout_ms.min(MAX_SWEEP_INTERVAL_MS);
        now_ms.saturating_sub(self.last_sweep_ms.load(Ordering::Relaxed)) >= interval
    }

    fn sweep(&self, sessions: &mut HashMap<SessionId, Entry>, now_ms: i64) -> usize {
        self.last_sweep_ms.store(now_ms, Ordering::Relaxed);
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.is_expired(now_ms, self.idle_timeout_ms));
        let removed = before - sessions.len();
        if removed > 0 {
            tracing::debug!(removed, live = sessions.len(), "Evicted idle sessions");
        }
        removed
    }

    /// Forget a session
    pub async fn remove(&self, id: &SessionId) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether no session exists
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
