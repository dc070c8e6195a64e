use super::storage::SessionStore;
use crate::error::{ChatError, Result};
use crate::models::Session;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockWriteGuard};

pub const SESSION_EXPIRY_MINUTES: i64 = 30;

/// Process-local session store. Sessions live until they sit idle longer
/// than the expiry window; there is no persistence across restarts.
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    expiry: Duration,
}

impl MemorySessionStore {
    pub fn new(expiry_minutes: i64) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            expiry: Duration::minutes(expiry_minutes),
        }
    }

    fn is_expired(&self, session: &Session, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(session.last_updated) >= self.expiry
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Session>>> {
        self.sessions
            .write()
            .map_err(|_| ChatError::Session("session store lock poisoned".to_string()))
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self, id: &str) -> Result<Option<Session>> {
        let now = Utc::now();
        let mut sessions = self.write()?;

        let expired = match sessions.get(id) {
            Some(session) => self.is_expired(session, now),
            None => return Ok(None),
        };

        if expired {
            tracing::debug!(conversation_id = %id, "dropping expired session");
            sessions.remove(id);
            return Ok(None);
        }

        Ok(sessions.get(id).cloned())
    }

    fn save(&self, session: &Session) -> Result<()> {
        let now = Utc::now();
        let mut sessions = self.write()?;

        let before = sessions.len();
        sessions.retain(|_, existing| !self.is_expired(existing, now));
        let purged = before - sessions.len();
        if purged > 0 {
            tracing::debug!(purged, "purged expired sessions");
        }

        sessions.insert(session.conversation_id.clone(), session.clone());
        Ok(())
    }

    fn session_count(&self) -> Result<usize> {
        self.sessions
            .read()
            .map(|sessions| sessions.len())
            .map_err(|_| ChatError::Session("session store lock poisoned".to_string()))
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new(SESSION_EXPIRY_MINUTES)
    }
}
