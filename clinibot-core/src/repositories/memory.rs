// src/repositories/memory.rs
//
// Process-local UserStore for `--in-memory` runs and tests.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Mutex;
use uuid::Uuid;

use clinibot_common::models::{AuditEntry, UserRecord};
use clinibot_common::traits::UserStore;
use crate::Error;

#[derive(Default)]
pub struct InMemoryUserStore {
    users: DashMap<String, UserRecord>,
    audit: Mutex<Vec<AuditEntry>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every audit entry in insertion order.
    pub fn all_audit_entries(&self) -> Vec<AuditEntry> {
        self.audit
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_sender(&self, sender_id: &str) -> Result<Option<UserRecord>, Error> {
        Ok(self.users.get(sender_id).map(|u| u.clone()))
    }

    async fn create(&self, sender_id: &str) -> Result<UserRecord, Error> {
        let user = self
            .users
            .entry(sender_id.to_string())
            .or_insert_with(|| UserRecord::new(sender_id));
        Ok(user.clone())
    }

    async fn save(&self, user: &UserRecord) -> Result<(), Error> {
        let mut stored = self
            .users
            .get_mut(&user.sender_id)
            .ok_or_else(|| Error::NotFound(format!("no user for sender '{}'", user.sender_id)))?;
        if user.identity_hash.is_some() {
            stored.identity_hash = user.identity_hash.clone();
            stored.identity_masked = user.identity_masked.clone();
        }
        if stored.consent_at.is_none() {
            stored.consent_at = user.consent_at;
        }
        Ok(())
    }

    async fn append_audit(&self, entry: &AuditEntry) -> Result<(), Error> {
        let mut log = self
            .audit
            .lock()
            .map_err(|_| Error::AuditLog("audit log mutex poisoned".into()))?;
        log.push(entry.clone());
        Ok(())
    }

    async fn audit_entries_for(&self, user_id: Uuid, limit: i64) -> Result<Vec<AuditEntry>, Error> {
        let log = self
            .audit
            .lock()
            .map_err(|_| Error::AuditLog("audit log mutex poisoned".into()))?;
        let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        Ok(log
            .iter()
            .rev()
            .filter(|e| e.user_id == user_id)
            .take(limit)
            .cloned()
            .collect())
    }
}
