use super::{current_session, ensure_session, AppState};
use crate::api::reply;
use crate::error::{ChatError, Result};
use crate::models::{ChatRequest, ChatResponse, ClearResponse, HistoryResponse, Turn};
use crate::prompt::build_prompt;
use crate::session::trim_conversation_history;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Html;
use axum::Json;
use axum_extra::extract::cookie::SignedCookieJar;
use chrono::Utc;

const INDEX_HTML: &str = include_str!("../../templates/index.html");
const DEFAULT_TIMEZONE: &str = "UTC";

pub async fn index(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Html<&'static str>)> {
    let (jar, _session) = ensure_session(&state, jar)?;
    Ok((jar, Html(INDEX_HTML)))
}

pub async fn chat(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Result<(SignedCookieJar, Json<ChatResponse>)> {
    let Json(request) =
        payload.map_err(|e| ChatError::Internal(format!("Unreadable chat request: {}", e)))?;

    let message = request.message.trim();
    if message.is_empty() {
        return Err(ChatError::InvalidInput("Message cannot be empty".to_string()));
    }

    let (jar, mut session) = ensure_session(&state, jar)?;

    session.timezone = Some(
        request
            .timezone
            .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
    );
    session.messages.push(Turn::user(message));

    let conversation = build_prompt(&session.messages, session.timezone.as_deref());
    let response = reply(state.generator.as_ref(), &conversation).await;

    let assistant_turn = Turn::assistant(response);
    let body = ChatResponse {
        response: assistant_turn.content.clone(),
        timestamp: assistant_turn.timestamp.clone(),
    };
    session.messages.push(assistant_turn);

    if let Some(max_pairs) = state.max_history_pairs {
        trim_conversation_history(&mut session.messages, max_pairs);
    }
    session.last_updated = Utc::now();
    state.store.save(&session)?;

    tracing::debug!(
        conversation_id = %session.conversation_id,
        turns = session.messages.len(),
        "chat turn recorded"
    );

    Ok((jar, Json(body)))
}

/// Read-only: a caller without a live session gets an empty transcript and
/// no new session.
pub async fn history(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Json<HistoryResponse>> {
    let messages = current_session(&state, &jar)?
        .map(|session| session.messages)
        .unwrap_or_default();
    Ok(Json(HistoryResponse { messages }))
}

pub async fn clear(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Json<ClearResponse>> {
    // Nothing to clear without a live session
    if let Some(mut session) = current_session(&state, &jar)? {
        session.messages.clear();
        session.last_updated = Utc::now();
        state.store.save(&session)?;
        tracing::debug!(conversation_id = %session.conversation_id, "transcript cleared");
    }

    Ok(Json(ClearResponse { success: true }))
}
