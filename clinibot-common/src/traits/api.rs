use async_trait::async_trait;
use crate::error::Error;
use crate::models::{Appointment, Slot};

/// The external appointment system.
///
/// `list_upcoming` and `search` fail on any non-2xx response. `book` and
/// `cancel` only report `Ok(false)` for a rejected request; `Err` is kept
/// for transport failures.
#[async_trait]
pub trait SchedulingGateway: Send + Sync {
    async fn list_upcoming(&self, identifier: &str) -> Result<Vec<Appointment>, Error>;

    async fn search(
        &self,
        specialty: Option<String>,
        date: Option<String>,
    ) -> Result<Vec<Slot>, Error>;

    async fn book(&self, identifier: &str, date: &str, time: &str) -> Result<bool, Error>;

    async fn cancel(&self, code: &str) -> Result<bool, Error>;
}

/// Outbound text replies to a chat counterpart.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_text(&self, recipient_id: &str, body: &str) -> Result<(), Error>;
}
