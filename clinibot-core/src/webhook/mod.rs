// File: src/webhook/mod.rs

pub mod server;

pub use server::{build_router, serve, WebhookState};
