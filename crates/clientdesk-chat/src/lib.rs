pub mod client;
pub mod dto;
pub mod error;
pub mod normalize;
pub mod traits;

pub use client::WebhookChatClient;
pub use dto::{ChatReply, ChatRequest, WebhookEnvelope};
pub use error::ChatError;
pub use normalize::normalize_reply;
pub use traits::ChatRelay;
