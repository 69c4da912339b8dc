//! Question answering for the globe: a keyword rule chain over static tables, an
//! encyclopedia client and an optional chat-completion source.

pub mod chat;
pub mod clock;
pub mod encyclopedia;
pub mod error;
pub mod router;
pub mod source;
pub mod tables;
pub mod text;

pub use chat::{CHAT_ERROR_TEXT, ChatAnswerSource, ChatClient, ChatConfig, ChatMessage, Role};
pub use clock::{Clock, FixedClock, SystemClock};
pub use encyclopedia::{Encyclopedia, Lookup, WikiConfig, WikipediaClient};
pub use error::KnowledgeError;
pub use router::{Category, KnowledgeRouter, Outcome, Rule};
pub use source::AnswerSource;
