mod chat;
mod session;

pub use chat::{ChatRequest, ChatResponse, ClearResponse, HistoryResponse};
pub use session::{Role, Session, Turn};
