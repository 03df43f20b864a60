//! Dentalink ⟶ GET /v1/availability

use serde::Deserialize;
use tracing::debug;

use clinibot_common::models::Slot;
use crate::Error;
use crate::platforms::dentalink::client::{ensure_success, DentalinkClient};

#[derive(Debug, Deserialize)]
struct AvailabilityResponse {
    #[serde(default)]
    slots: Vec<Slot>,
}

impl DentalinkClient {
    /// Filters are only sent when present and non-empty.
    pub async fn fetch_availability(
        &self,
        specialty: Option<&str>,
        date: Option<&str>,
    ) -> Result<Vec<Slot>, Error> {
        let url = self.endpoint(&["v1", "availability"])?;

        let mut params: Vec<(&str, &str)> = Vec::new();
        if let Some(s) = specialty.filter(|s| !s.is_empty()) {
            params.push(("specialty", s));
        }
        if let Some(d) = date.filter(|d| !d.is_empty()) {
            params.push(("date", d));
        }

        let resp = self
            .http_client()
            .get(url)
            .bearer_auth(self.api_key())
            .query(&params)
            .send()
            .await?;
        let resp = ensure_success(resp, "search").await?;

        let body: AvailabilityResponse = resp.json().await?;
        debug!("Dentalink returned {} free slots", body.slots.len());
        Ok(body.slots)
    }
}
