use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-sender state. Everything the conversation needs between messages
/// lives here; there is no in-memory session.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, sqlx::FromRow)]
pub struct UserRecord {
    pub user_id: Uuid,
    /// Chat counterpart id (the WhatsApp phone number). Unique.
    pub sender_id: String,
    pub identity_hash: Option<String>,
    pub identity_masked: Option<String>,
    pub consent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn new(sender_id: &str) -> Self {
        Self {
            user_id: Uuid::new_v4(),
            sender_id: sender_id.to_string(),
            identity_hash: None,
            identity_masked: None,
            consent_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn has_consent(&self) -> bool {
        self.consent_at.is_some()
    }

    /// Records consent. Returns `false` (and keeps the original timestamp)
    /// when consent was already granted.
    pub fn grant_consent(&mut self, at: DateTime<Utc>) -> bool {
        if self.consent_at.is_some() {
            return false;
        }
        self.consent_at = Some(at);
        true
    }

    /// Hash and masked form are only ever set together.
    pub fn set_identity(&mut self, hash: String, masked: String) {
        self.identity_hash = Some(hash);
        self.identity_masked = Some(masked);
    }

    /// Identifier handed to the scheduling system: the verified identity
    /// hash when present, otherwise the sender id.
    pub fn scheduling_identifier(&self) -> &str {
        self.identity_hash.as_deref().unwrap_or(&self.sender_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn consent_is_set_once() {
        let mut user = UserRecord::new("56911112222");
        let first = Utc::now();
        assert!(user.grant_consent(first));
        assert!(!user.grant_consent(first + Duration::minutes(5)));
        assert_eq!(user.consent_at, Some(first));
    }

    #[test]
    fn scheduling_identifier_prefers_identity_hash() {
        let mut user = UserRecord::new("56911112222");
        assert_eq!(user.scheduling_identifier(), "56911112222");
        user.set_identity("abc".into(), "12345***-5".into());
        assert_eq!(user.scheduling_identifier(), "abc");
    }
}
