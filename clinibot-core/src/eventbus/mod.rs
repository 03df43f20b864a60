// File: src/eventbus/mod.rs

pub mod audit_logger;

pub use audit_logger::{spawn_audit_logger, AuditCommand, AuditLoggerHandle};
