use crate::error::Result;
use crate::models::Session;

/// Trait for session storage backends
pub trait SessionStore: Send + Sync {
    /// Look up a live session by id. Expired sessions read as absent.
    fn load(&self, id: &str) -> Result<Option<Session>>;

    /// Insert or replace a session
    fn save(&self, session: &Session) -> Result<()>;

    /// Number of sessions currently held
    fn session_count(&self) -> Result<usize>;
}
