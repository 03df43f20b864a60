// File: clinibot-core/tests/test_utils/helpers.rs
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;
use async_trait::async_trait;
use chrono::Utc;
use mockall::mock;

use clinibot_common::models::{Appointment, AuditEntry, Slot, UserRecord};
use clinibot_common::traits::{MessageSender, SchedulingGateway, UserStore};
use clinibot_core::eventbus::{spawn_audit_logger, AuditLoggerHandle};
use clinibot_core::repositories::InMemoryUserStore;
use clinibot_core::services::ConversationService;
use clinibot_core::{AppConfig, Error};

mock! {
    pub Gateway {}

    #[async_trait]
    impl SchedulingGateway for Gateway {
        async fn list_upcoming(&self, identifier: &str) -> Result<Vec<Appointment>, Error>;
        async fn search(&self, specialty: Option<String>, date: Option<String>) -> Result<Vec<Slot>, Error>;
        async fn book(&self, identifier: &str, date: &str, time: &str) -> Result<bool, Error>;
        async fn cancel(&self, code: &str) -> Result<bool, Error>;
    }
}

/// Captures every reply instead of calling WhatsApp. Sends to
/// `failing_recipient` return a platform error.
#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<(String, String)>>,
    failing_recipient: Mutex<Option<String>>,
}

impl RecordingSender {
    pub fn fail_for(&self, recipient: &str) {
        *self.failing_recipient.lock().unwrap() = Some(recipient.to_string());
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_text(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|(_, body)| body.clone())
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send_text(&self, recipient_id: &str, body: &str) -> Result<(), Error> {
        if self.failing_recipient.lock().unwrap().as_deref() == Some(recipient_id) {
            return Err(Error::Platform(format!("send_text: HTTP 500 for {}", recipient_id)));
        }
        self.sent
            .lock()
            .unwrap()
            .push((recipient_id.to_string(), body.to_string()));
        Ok(())
    }
}

/// Gateway whose calls never finish in time.
pub struct StalledGateway;

#[async_trait]
impl SchedulingGateway for StalledGateway {
    async fn list_upcoming(&self, _identifier: &str) -> Result<Vec<Appointment>, Error> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(vec![])
    }

    async fn search(&self, _s: Option<String>, _d: Option<String>) -> Result<Vec<Slot>, Error> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(vec![])
    }

    async fn book(&self, _i: &str, _d: &str, _t: &str) -> Result<bool, Error> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(true)
    }

    async fn cancel(&self, _code: &str) -> Result<bool, Error> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(true)
    }
}

pub struct TestBot {
    pub service: Arc<ConversationService>,
    pub store: Arc<InMemoryUserStore>,
    pub sender: Arc<RecordingSender>,
    pub audit: AuditLoggerHandle,
}

impl TestBot {
    /// Waits for the background writer, then returns all audit entries.
    pub async fn audit_entries(&self) -> Result<Vec<AuditEntry>, Error> {
        self.audit.flush_now().await?;
        Ok(self.store.all_audit_entries())
    }

    pub async fn user(&self, sender_id: &str) -> Result<UserRecord, Error> {
        self.store
            .find_by_sender(sender_id)
            .await?
            .ok_or_else(|| Error::NotFound(sender_id.to_string()))
    }

    /// Creates `sender_id` with consent already granted.
    pub async fn consented_user(&self, sender_id: &str) -> Result<UserRecord, Error> {
        let mut user = self.store.create(sender_id).await?;
        user.grant_consent(Utc::now());
        self.store.save(&user).await?;
        Ok(user)
    }
}

pub fn test_config(require_consent: bool) -> AppConfig {
    AppConfig {
        require_consent,
        app_secret: "test-secret".into(),
        http_timeout: Duration::from_millis(200),
        ..AppConfig::default()
    }
}

pub fn build_bot<G>(gateway: G, require_consent: bool) -> TestBot
where
    G: SchedulingGateway + 'static,
{
    let config = test_config(require_consent);
    let store = Arc::new(InMemoryUserStore::new());
    let sender = Arc::new(RecordingSender::default());
    let (audit, _task) = spawn_audit_logger(store.clone(), 32);
    let service = Arc::new(ConversationService::new(
        &config,
        store.clone(),
        Arc::new(gateway),
        sender.clone(),
        audit.clone(),
    ));
    TestBot { service, store, sender, audit }
}
