pub mod client;
pub mod generator;
pub mod models;
pub mod response;

pub use client::GeminiClient;
pub use generator::{reply, Generator, FALLBACK_REPLY};
pub use models::GenerateRequest;
