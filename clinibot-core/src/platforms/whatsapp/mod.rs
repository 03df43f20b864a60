// File: src/platforms/whatsapp/mod.rs

pub mod client;

pub use client::WhatsAppClient;
