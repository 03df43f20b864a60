// File: clinibot-core/src/platforms/whatsapp/client.rs

use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::Serialize;
use tracing::debug;

use clinibot_common::traits::MessageSender;
use crate::config::AppConfig;
use crate::Error;

/// Sends replies through the WhatsApp Cloud API (`/{phone_id}/messages`).
pub struct WhatsAppClient {
    http: Arc<ReqwestClient>,
    base_url: String,
    phone_id: String,
    bearer_token: String,
}

/// JSON body for a plain text message.
#[derive(Debug, Serialize)]
struct TextMessageRequest<'a> {
    messaging_product: &'static str,
    to: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    text: TextContent<'a>,
}

#[derive(Debug, Serialize)]
struct TextContent<'a> {
    preview_url: bool,
    body: &'a str,
}

impl WhatsAppClient {
    pub fn new(
        base_url: &str,
        phone_id: &str,
        bearer_token: &str,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let http = ReqwestClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http: Arc::new(http),
            base_url: base_url.trim_end_matches('/').to_string(),
            phone_id: phone_id.to_string(),
            bearer_token: bearer_token.to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        Self::new(
            &config.wa_base,
            &config.wa_phone_id,
            &config.whatsapp_token,
            config.http_timeout,
        )
    }

    fn messages_url(&self) -> String {
        format!("{}/{}/messages", self.base_url, self.phone_id)
    }
}

#[async_trait]
impl MessageSender for WhatsAppClient {
    async fn send_text(&self, recipient_id: &str, body: &str) -> Result<(), Error> {
        let payload = TextMessageRequest {
            messaging_product: "whatsapp",
            to: recipient_id,
            kind: "text",
            text: TextContent { preview_url: false, body },
        };

        let resp = self
            .http
            .post(self.messages_url())
            .bearer_auth(&self.bearer_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::Platform(format!("send_text network error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(Error::Platform(format!("send_text: HTTP {status} ⇒ {text}")));
        }
        debug!("Reply delivered to {}", recipient_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_matches_cloud_api_shape() {
        let payload = TextMessageRequest {
            messaging_product: "whatsapp",
            to: "56911112222",
            kind: "text",
            text: TextContent { preview_url: false, body: "hola" },
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "messaging_product": "whatsapp",
                "to": "56911112222",
                "type": "text",
                "text": {"preview_url": false, "body": "hola"}
            })
        );
    }

    #[test]
    fn messages_url_ignores_trailing_slash() {
        let client = WhatsAppClient::new(
            "https://graph.facebook.com/v21.0/",
            "12345",
            "token",
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(client.messages_url(), "https://graph.facebook.com/v21.0/12345/messages");
    }
}
