use serde::{Deserialize, Serialize};

/// Body for `models/{model}:generateContent`. The whole conversation travels
/// as the parts of a single user content; the API keeps no history of its own.
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

impl GenerateRequest {
    pub fn from_conversation(conversation: &[String]) -> Self {
        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts: conversation
                    .iter()
                    .map(|text| Part { text: text.clone() })
                    .collect(),
            }],
        }
    }
}
