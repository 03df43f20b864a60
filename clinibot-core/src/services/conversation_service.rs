// File: clinibot-core/src/services/conversation_service.rs

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use serde_json::json;
use tracing::{debug, info, warn};

use clinibot_common::models::{AuditAction, AuditEntry, UserRecord, WebhookPayload};
use clinibot_common::traits::{MessageSender, SchedulingGateway, UserStore};
use crate::config::AppConfig;
use crate::crypto::rut;
use crate::eventbus::AuditLoggerHandle;
use crate::services::command::{classify, is_consent_affirmative, Command};
use crate::services::replies;
use crate::Error;

/// What the dispatcher decided for one message.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    pub reply: String,
    /// Written in the background once the reply has gone out.
    pub audit: Option<AuditEntry>,
}

impl Dispatch {
    fn reply(text: impl Into<String>) -> Self {
        Self { reply: text.into(), audit: None }
    }

    fn audited(text: impl Into<String>, entry: AuditEntry) -> Self {
        Self { reply: text.into(), audit: Some(entry) }
    }
}

/// Outcome of a handled message, returned to the transport for logging.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationReply {
    pub recipient: String,
    pub text: String,
    pub audited: Option<AuditAction>,
}

/// Per-message state machine: consent gate, identification and the
/// appointment commands. All state lives in the stored `UserRecord`.
pub struct ConversationService {
    store: Arc<dyn UserStore>,
    gateway: Arc<dyn SchedulingGateway>,
    sender: Arc<dyn MessageSender>,
    audit: AuditLoggerHandle,
    require_consent: bool,
    clinic_name: String,
    call_timeout: Duration,
}

impl ConversationService {
    pub fn new(
        config: &AppConfig,
        store: Arc<dyn UserStore>,
        gateway: Arc<dyn SchedulingGateway>,
        sender: Arc<dyn MessageSender>,
        audit: AuditLoggerHandle,
    ) -> Self {
        debug!("Initializing ConversationService (require_consent={})", config.require_consent);
        Self {
            store,
            gateway,
            sender,
            audit,
            require_consent: config.require_consent,
            clinic_name: config.clinic_name.clone(),
            call_timeout: config.http_timeout,
        }
    }

    /// Handles every message of a webhook delivery, strictly one after the
    /// other. A failed reply send aborts the rest of the delivery.
    pub async fn process_payload(&self, payload: &WebhookPayload) -> Result<usize, Error> {
        let mut handled = 0usize;
        for msg in payload.messages() {
            let Some(from) = msg.from.as_deref().filter(|f| !f.is_empty()) else {
                warn!("Skipping inbound message {:?} without sender", msg.id);
                continue;
            };
            self.handle_message(from, msg.text_body()).await?;
            handled += 1;
        }
        Ok(handled)
    }

    /// Loads (or creates) the sender's record, decides, replies, and then
    /// queues the audit entry if the command produced one.
    pub async fn handle_message(&self, sender_id: &str, text: &str) -> Result<ConversationReply, Error> {
        let text = text.trim();
        let mut user = match self.store.find_by_sender(sender_id).await? {
            Some(u) => u,
            None => {
                info!("First contact from {}", sender_id);
                self.store.create(sender_id).await?
            }
        };

        let dispatch = self.dispatch(&mut user, text).await?;

        // Send failures are not caught here; the delivery fails.
        self.sender.send_text(sender_id, &dispatch.reply).await?;

        let audited = dispatch.audit.as_ref().map(|e| e.action);
        if let Some(entry) = dispatch.audit {
            self.audit.record(entry);
        }

        Ok(ConversationReply {
            recipient: sender_id.to_string(),
            text: dispatch.reply,
            audited,
        })
    }

    /// Decides the reply for `text`, persisting consent or identity changes
    /// on the way. Gateway failures become replies; store failures propagate.
    pub async fn dispatch(&self, user: &mut UserRecord, text: &str) -> Result<Dispatch, Error> {
        if self.require_consent && !user.has_consent() {
            return self.consent_gate(user, text).await;
        }

        let command = classify(text);
        debug!("{} ⇒ {}", user.sender_id, command.name());

        let dispatch = match command {
            Command::Menu => Dispatch::reply(replies::menu(&self.clinic_name)),
            Command::IdentifyByRut { candidate } => self.identify_by_rut(user, &candidate).await?,
            Command::IdentifyByPhone => Dispatch::reply(replies::PHONE_IDENTIFIED),
            Command::MyAppointments => self.my_appointments(user).await,
            Command::SearchAvailability { specialty, date } => {
                self.search_availability(user, specialty, date).await
            }
            Command::Book { date, time } => self.book(user, &date, &time).await,
            Command::BookUsage => Dispatch::reply(replies::BOOK_USAGE),
            Command::CancelPrompt => Dispatch::reply(replies::CANCEL_PROMPT),
            Command::Cancel { code } => self.cancel(user, &code).await,
            Command::Help => Dispatch::reply(replies::HELP),
            Command::Unknown => Dispatch::reply(replies::FALLBACK),
        };
        Ok(dispatch)
    }

    async fn consent_gate(&self, user: &mut UserRecord, text: &str) -> Result<Dispatch, Error> {
        if !is_consent_affirmative(text) {
            return Ok(Dispatch::reply(replies::consent_request(&self.clinic_name)));
        }
        user.grant_consent(Utc::now());
        self.store.save(user).await?;
        info!("Consent recorded for {}", user.sender_id);
        Ok(Dispatch::reply(replies::CONSENT_GRANTED))
    }

    async fn identify_by_rut(&self, user: &mut UserRecord, candidate: &str) -> Result<Dispatch, Error> {
        if !rut::is_valid(candidate) {
            debug!("Rejected RUT candidate from {}", user.sender_id);
            return Ok(Dispatch::reply(replies::RUT_INVALID));
        }
        let masked = rut::mask(candidate);
        user.set_identity(rut::hash(candidate), masked.clone());
        self.store.save(user).await?;
        info!("RUT {} verified for {}", masked, user.sender_id);
        Ok(Dispatch::reply(replies::rut_verified(&masked)))
    }

    async fn my_appointments(&self, user: &UserRecord) -> Dispatch {
        let result = self.guarded(self.gateway.list_upcoming(user.scheduling_identifier())).await;
        let (reply, ok) = match result {
            Ok(list) if list.is_empty() => (replies::NO_APPOINTMENTS.to_string(), true),
            Ok(list) => (replies::appointments(&list), true),
            Err(e) => {
                warn!("list_upcoming failed for {}: {}", user.sender_id, e);
                (replies::APPOINTMENTS_FAILED.to_string(), false)
            }
        };
        let entry = AuditEntry::new(user.user_id, AuditAction::QueryAppointments, json!({ "ok": ok }));
        Dispatch::audited(reply, entry)
    }

    async fn search_availability(
        &self,
        user: &UserRecord,
        specialty: Option<String>,
        date: Option<String>,
    ) -> Dispatch {
        let result = self
            .guarded(self.gateway.search(specialty.clone(), date.clone()))
            .await;
        let (reply, ok) = match result {
            Ok(slots) if slots.is_empty() => (replies::NO_AVAILABILITY.to_string(), true),
            Ok(slots) => (replies::availability(&slots), true),
            Err(e) => {
                warn!("search failed for {}: {}", user.sender_id, e);
                (replies::AVAILABILITY_FAILED.to_string(), false)
            }
        };
        let entry = AuditEntry::new(
            user.user_id,
            AuditAction::SearchAvailability,
            json!({ "especialidad": specialty, "fecha": date, "ok": ok }),
        );
        Dispatch::audited(reply, entry)
    }

    async fn book(&self, user: &UserRecord, date: &str, time: &str) -> Dispatch {
        let result = self
            .guarded(self.gateway.book(user.scheduling_identifier(), date, time))
            .await;
        let (reply, ok) = match result {
            Ok(true) => (replies::booked(date, time), true),
            Ok(false) => (replies::BOOK_REJECTED.to_string(), false),
            Err(e) => {
                warn!("book failed for {}: {}", user.sender_id, e);
                (replies::BOOK_FAILED.to_string(), false)
            }
        };
        let entry = AuditEntry::new(
            user.user_id,
            AuditAction::Book,
            json!({ "fecha": date, "hora": time, "ok": ok }),
        );
        Dispatch::audited(reply, entry)
    }

    async fn cancel(&self, user: &UserRecord, code: &str) -> Dispatch {
        let (reply, ok) = match self.guarded(self.gateway.cancel(code)).await {
            Ok(true) => (replies::CANCELLED, true),
            Ok(false) => (replies::CANCEL_REJECTED, false),
            Err(e) => {
                warn!("cancel failed for {}: {}", user.sender_id, e);
                (replies::CANCEL_FAILED, false)
            }
        };
        let entry = AuditEntry::new(user.user_id, AuditAction::Cancel, json!({ "code": code, "ok": ok }));
        Dispatch::audited(reply, entry)
    }

    /// Bounds a gateway call by the configured timeout; an elapsed timer
    /// is reported like any other call failure.
    async fn guarded<T, F>(&self, call: F) -> Result<T, Error>
    where
        F: Future<Output = Result<T, Error>>,
    {
        tokio::time::timeout(self.call_timeout, call).await?
    }
}
