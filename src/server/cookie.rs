use super::AppState;
use crate::error::Result;
use crate::models::Session;
use crate::session::create_new_session;
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use sha2::{Digest, Sha512};

pub const SESSION_COOKIE: &str = "kautaliya_session";

/// Derive the 64-byte cookie signing key from a configured secret, or
/// generate a throwaway one for this process.
pub fn signing_key(secret: Option<&str>) -> Key {
    match secret {
        Some(secret) => Key::from(Sha512::digest(secret.as_bytes()).as_slice()),
        None => Key::generate(),
    }
}

fn session_cookie(conversation_id: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, conversation_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Look up the caller's live session without creating one. A missing or
/// tampered cookie, or an expired session, reads as `None`.
pub fn current_session(state: &AppState, jar: &SignedCookieJar) -> Result<Option<Session>> {
    match jar.get(SESSION_COOKIE) {
        Some(cookie) => state.store.load(cookie.value()),
        None => Ok(None),
    }
}

/// Return the caller's live session, creating and registering a fresh one
/// (plus its cookie) when [`current_session`] finds none.
pub fn ensure_session(
    state: &AppState,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Session)> {
    if let Some(session) = current_session(state, &jar)? {
        return Ok((jar, session));
    }

    let session = create_new_session();
    state.store.save(&session)?;
    tracing::debug!(conversation_id = %session.conversation_id, "started new session");

    let jar = jar.add(session_cookie(session.conversation_id.clone()));
    Ok((jar, session))
}
