// File: clinibot-common/src/models/mod.rs
pub mod user;
pub mod audit;
pub mod scheduling;
pub mod webhook;

pub use user::UserRecord;
pub use audit::{AuditAction, AuditEntry};
pub use scheduling::{Appointment, Slot};
pub use webhook::{InboundMessage, WebhookPayload};
