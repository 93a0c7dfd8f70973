//! Logging infrastructure: the JSONL transcript of gateway traffic.
//!
//! Provides [`JsonlConversationLogger`], which implements the
//! [`ConversationLogger`](quorum_application::ConversationLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlConversationLogger;
