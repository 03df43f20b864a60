use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::Error;

/// Commands that leave a trace in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditAction {
    #[serde(rename = "MIS_HORAS")]
    QueryAppointments,
    #[serde(rename = "AGENDAR_QUERY")]
    SearchAvailability,
    #[serde(rename = "RESERVAR")]
    Book,
    #[serde(rename = "CANCELAR")]
    Cancel,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::QueryAppointments => "MIS_HORAS",
            AuditAction::SearchAvailability => "AGENDAR_QUERY",
            AuditAction::Book => "RESERVAR",
            AuditAction::Cancel => "CANCELAR",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MIS_HORAS" => Ok(AuditAction::QueryAppointments),
            "AGENDAR_QUERY" => Ok(AuditAction::SearchAvailability),
            "RESERVAR" => Ok(AuditAction::Book),
            "CANCELAR" => Ok(AuditAction::Cancel),
            other => Err(Error::Parse(format!("unknown audit action '{}'", other))),
        }
    }
}

/// Append-only trace of a command invocation and its outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub audit_id: Uuid,
    pub user_id: Uuid,
    pub action: AuditAction,
    pub detail: Value,
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(user_id: Uuid, action: AuditAction, detail: Value) -> Self {
        Self {
            audit_id: Uuid::new_v4(),
            user_id,
            action,
            detail,
            created_at: Utc::now(),
        }
    }
}
