// src/repositories/postgres/user_store.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use clinibot_common::models::{AuditAction, AuditEntry, UserRecord};
use clinibot_common::traits::UserStore;
use crate::Error;

#[derive(Clone)]
pub struct PostgresUserStore {
    pool: Pool<Postgres>,
}

impl PostgresUserStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn find_by_sender(&self, sender_id: &str) -> Result<Option<UserRecord>, Error> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT user_id,
                   sender_id,
                   identity_hash,
                   identity_masked,
                   consent_at,
                   created_at
            FROM users
            WHERE sender_id = $1
            "#,
        )
            .bind(sender_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create(&self, sender_id: &str) -> Result<UserRecord, Error> {
        let fresh = UserRecord::new(sender_id);
        // A concurrent delivery may have inserted the sender already; keep theirs.
        sqlx::query(
            r#"
            INSERT INTO users (user_id, sender_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (sender_id) DO NOTHING
            "#,
        )
            .bind(fresh.user_id)
            .bind(&fresh.sender_id)
            .bind(fresh.created_at)
            .execute(&self.pool)
            .await?;

        self.find_by_sender(sender_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("user for sender '{}' vanished after insert", sender_id)))
    }

    async fn save(&self, user: &UserRecord) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE users
            SET identity_hash   = COALESCE($1, identity_hash),
                identity_masked = COALESCE($2, identity_masked),
                consent_at      = COALESCE(consent_at, $3)
            WHERE user_id = $4
            "#,
        )
            .bind(&user.identity_hash)
            .bind(&user.identity_masked)
            .bind(user.consent_at)
            .bind(user.user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn append_audit(&self, entry: &AuditEntry) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (audit_id, user_id, action, detail, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
            .bind(entry.audit_id)
            .bind(entry.user_id)
            .bind(entry.action.as_str())
            .bind(&entry.detail)
            .bind(entry.created_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn audit_entries_for(&self, user_id: Uuid, limit: i64) -> Result<Vec<AuditEntry>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT audit_id, user_id, action, detail, created_at
            FROM audit_logs
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        let mut out = Vec::with_capacity(rows.len());
        for r in rows {
            let action: String = r.try_get("action")?;
            out.push(AuditEntry {
                audit_id: r.try_get("audit_id")?,
                user_id: r.try_get("user_id")?,
                action: action.parse::<AuditAction>()?,
                detail: r.try_get::<Value, _>("detail")?,
                created_at: r.try_get::<DateTime<Utc>, _>("created_at")?,
            });
        }
        Ok(out)
    }
}
