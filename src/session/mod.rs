mod memory;
mod storage;

pub use memory::{MemorySessionStore, SESSION_EXPIRY_MINUTES};
pub use storage::SessionStore;

use crate::models::{Session, Turn};
use chrono::Utc;
use uuid::Uuid;

/// Create a new session with an empty transcript
pub fn create_new_session() -> Session {
    Session {
        conversation_id: Uuid::new_v4().to_string(),
        timezone: None,
        last_updated: Utc::now(),
        messages: vec![],
    }
}

/// Trim the transcript to the last `max_pairs` user/assistant exchanges
pub fn trim_conversation_history(messages: &mut Vec<Turn>, max_pairs: usize) {
    let keep_count = max_pairs.saturating_mul(2);
    if messages.len() > keep_count {
        let excess = messages.len() - keep_count;
        messages.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript(pairs: usize) -> Vec<Turn> {
        (0..pairs)
            .flat_map(|i| {
                [
                    Turn::user(format!("question {i}")),
                    Turn::assistant(format!("answer {i}")),
                ]
            })
            .collect()
    }

    #[test]
    fn test_new_sessions_get_distinct_ids() {
        let a = create_new_session();
        let b = create_new_session();
        assert_ne!(a.conversation_id, b.conversation_id);
        assert!(Uuid::parse_str(&a.conversation_id).is_ok());
        assert!(a.messages.is_empty());
        assert!(a.timezone.is_none());
    }

    #[test]
    fn test_trim_keeps_most_recent_pairs() {
        let mut messages = transcript(5);
        trim_conversation_history(&mut messages, 2);

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].content, "question 3");
        assert_eq!(messages[3].content, "answer 4");
    }

    #[test]
    fn test_trim_with_largest_cap_keeps_everything() {
        let mut messages = transcript(1);
        trim_conversation_history(&mut messages, usize::MAX);
        assert_eq!(messages.len(), 2);
    }

    #[test]
    fn test_trim_is_noop_under_cap() {
        let mut messages = transcript(2);
        trim_conversation_history(&mut messages, 3);
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].content, "question 0");
    }
}
