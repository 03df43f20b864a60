// File: src/platforms/mod.rs
//
// Outbound integrations: the messaging transport and the scheduling system.

pub mod whatsapp;
pub mod dentalink;

pub use whatsapp::WhatsAppClient;
pub use dentalink::DentalinkClient;
