//! Per-session state. Each visitor gets their own draft slot keyed by a session id;
//! nothing is shared across sessions and nothing outlives the process.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No cover letter generated yet; the feedback form is hidden.
    Idle,
    /// A draft is cached; the feedback form is shown.
    HasDraft,
}

/// The only mutable state of a session: the latest accepted cover letter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    modified_cover_letter: String,
}

impl SessionState {
    pub fn phase(&self) -> Phase {
        if self.modified_cover_letter.is_empty() {
            Phase::Idle
        } else {
            Phase::HasDraft
        }
    }

    pub fn draft(&self) -> Option<&str> {
        match self.phase() {
            Phase::Idle => None,
            Phase::HasDraft => Some(self.modified_cover_letter.as_str()),
        }
    }

    /// Replaces the draft. Blank text is ignored so a draft, once set, is never cleared.
    /// Returns whether the draft was replaced.
    pub fn accept_draft(&mut self, text: String) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        self.modified_cover_letter = text;
        true
    }
}

/// A session's state behind its own lock. Handlers hold the lock for a whole action,
/// so overlapping actions on one session run one after the other.
pub type SessionHandle = Arc<Mutex<SessionState>>;

#[derive(Debug)]
struct SessionEntry {
    state: SessionHandle,
    last_seen: DateTime<Utc>,
}

/// Concurrent map of session id → state. Cheap to clone; clones share the map.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handle for `id`, creating a fresh Idle session when the id is absent
    /// or unknown. The returned id is the one to hand back to the client.
    pub async fn load_or_create(&self, id: Option<Uuid>) -> (Uuid, SessionHandle) {
        let mut sessions = self.inner.write().await;
        let now = Utc::now();

        if let Some(id) = id {
            if let Some(entry) = sessions.get_mut(&id) {
                entry.last_seen = now;
                return (id, Arc::clone(&entry.state));
            }
        }

        let id = Uuid::new_v4();
        let state = SessionHandle::default();
        sessions.insert(
            id,
            SessionEntry {
                state: Arc::clone(&state),
                last_seen: now,
            },
        );
        debug!("Created session {id}");
        (id, state)
    }

    /// Returns the handle for an existing session, or `None` if it is unknown.
    pub async fn get(&self, id: Uuid) -> Option<SessionHandle> {
        let mut sessions = self.inner.write().await;
        sessions.get_mut(&id).map(|entry| {
            entry.last_seen = Utc::now();
            Arc::clone(&entry.state)
        })
    }

    /// Drops sessions idle for longer than `ttl`. Returns how many were removed.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        // A ttl reaching past the representable range means nothing is ever stale.
        let Some(cutoff) = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| Utc::now().checked_sub_signed(ttl))
        else {
            return 0;
        };
        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_seen >= cutoff);
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
