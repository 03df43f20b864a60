// File: src/platforms/dentalink/mod.rs

pub mod client;
pub mod requests;

use async_trait::async_trait;
use clinibot_common::models::{Appointment, Slot};
use clinibot_common::traits::SchedulingGateway;
use crate::Error;

pub use client::DentalinkClient;

#[async_trait]
impl SchedulingGateway for DentalinkClient {
    async fn list_upcoming(&self, identifier: &str) -> Result<Vec<Appointment>, Error> {
        self.fetch_upcoming_appointments(identifier).await
    }

    async fn search(
        &self,
        specialty: Option<String>,
        date: Option<String>,
    ) -> Result<Vec<Slot>, Error> {
        self.fetch_availability(specialty.as_deref(), date.as_deref()).await
    }

    async fn book(&self, identifier: &str, date: &str, time: &str) -> Result<bool, Error> {
        self.create_appointment(identifier, date, time).await
    }

    async fn cancel(&self, code: &str) -> Result<bool, Error> {
        self.delete_appointment(code).await
    }
}
