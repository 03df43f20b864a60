// File: src/services/mod.rs

pub mod command;
pub mod replies;
pub mod conversation_service;

pub use command::Command;
pub use conversation_service::{ConversationReply, ConversationService, Dispatch};
