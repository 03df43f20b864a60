//! Dentalink ⟶ /v1/appointments
//! List upcoming appointments, book a slot, cancel a booking.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use clinibot_common::models::Appointment;
use crate::Error;
use crate::platforms::dentalink::client::{ensure_success, DentalinkClient};

#[derive(Debug, Deserialize)]
struct AppointmentsResponse {
    #[serde(default)]
    items: Vec<AppointmentItem>,
}

#[derive(Debug, Deserialize)]
struct AppointmentItem {
    date: Option<String>,
    time: Option<String>,
    doctor: Option<Doctor>,
    specialty: Option<String>,
    id: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Doctor {
    name: Option<String>,
}

/// JSON body for POST /v1/appointments.
#[derive(Debug, Serialize)]
struct BookRequest<'a> {
    identifier: &'a str,
    date: &'a str,
    time: &'a str,
}

impl From<AppointmentItem> for Appointment {
    fn from(item: AppointmentItem) -> Self {
        Appointment {
            date: item.date.unwrap_or_default(),
            time: item.time.unwrap_or_default(),
            specialty: item.specialty.unwrap_or_default(),
            professional: item.doctor.and_then(|d| d.name).unwrap_or_default(),
            code: item.id.and_then(|id| match id {
                Value::String(s) => Some(s),
                Value::Null => None,
                other => Some(other.to_string()),
            }),
        }
    }
}

impl DentalinkClient {
    /// GET /v1/appointments?identifier=..&status=upcoming
    pub async fn fetch_upcoming_appointments(&self, identifier: &str) -> Result<Vec<Appointment>, Error> {
        let url = self.endpoint(&["v1", "appointments"])?;
        let resp = self
            .http_client()
            .get(url)
            .bearer_auth(self.api_key())
            .query(&[("identifier", identifier), ("status", "upcoming")])
            .send()
            .await?;
        let resp = ensure_success(resp, "list_upcoming").await?;

        let body: AppointmentsResponse = resp.json().await?;
        debug!("Dentalink returned {} upcoming appointments", body.items.len());
        Ok(body.items.into_iter().map(Appointment::from).collect())
    }

    /// POST /v1/appointments. Only 200/201 count as booked.
    pub async fn create_appointment(&self, identifier: &str, date: &str, time: &str) -> Result<bool, Error> {
        let url = self.endpoint(&["v1", "appointments"])?;
        let resp = self
            .http_client()
            .post(url)
            .bearer_auth(self.api_key())
            .json(&BookRequest { identifier, date, time })
            .send()
            .await?;
        let status = resp.status().as_u16();
        debug!("Dentalink booking {} {} ⇒ HTTP {}", date, time, status);
        Ok(matches!(status, 200 | 201))
    }

    /// DELETE /v1/appointments/{code}. Only 200/204 count as cancelled.
    pub async fn delete_appointment(&self, code: &str) -> Result<bool, Error> {
        let url = self.endpoint(&["v1", "appointments", code])?;
        let resp = self
            .http_client()
            .delete(url)
            .bearer_auth(self.api_key())
            .send()
            .await?;
        let status = resp.status().as_u16();
        debug!("Dentalink cancel {} ⇒ HTTP {}", code, status);
        Ok(matches!(status, 200 | 204))
    }
}
