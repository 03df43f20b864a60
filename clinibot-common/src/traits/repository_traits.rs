use async_trait::async_trait;
use uuid::Uuid;
use crate::error::Error;
use crate::models::{AuditEntry, UserRecord};

/// Keyed store of per-sender records plus the append-only audit log.
///
/// Implementations must give read-your-writes consistency within the
/// processing of a single message. Nothing here serializes concurrent
/// deliveries for the same sender: consent and identity updates from two
/// racing deliveries are last-write-wins.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_sender(&self, sender_id: &str) -> Result<Option<UserRecord>, Error>;

    /// Creates the record for a sender seen for the first time. If another
    /// delivery created it in the meantime, that record is returned.
    async fn create(&self, sender_id: &str) -> Result<UserRecord, Error>;

    /// Persists consent and identity fields. Never clears `consent_at`.
    async fn save(&self, user: &UserRecord) -> Result<(), Error>;

    async fn append_audit(&self, entry: &AuditEntry) -> Result<(), Error>;

    /// Most recent audit entries for a user, newest first.
    async fn audit_entries_for(&self, user_id: Uuid, limit: i64) -> Result<Vec<AuditEntry>, Error>;
}
