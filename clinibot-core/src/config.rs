// File: clinibot-core/src/config.rs
//
// Process configuration. Loaded once at startup and handed to each
// component's constructor; nothing reads the environment after that.

use std::time::Duration;
use tracing::warn;
use crate::Error;

pub const DEFAULT_VERIFY_TOKEN: &str = "changeme";
pub const DEFAULT_WA_BASE: &str = "https://graph.facebook.com/v21.0";
pub const DEFAULT_DENTALINK_BASE: &str = "https://api.dentalink.example";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_CLINIC_NAME: &str = "Clínica Ceinsa";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Token expected in the GET verification handshake.
    pub verify_token: String,
    /// Bearer token for the WhatsApp Cloud API.
    pub whatsapp_token: String,
    /// Meta app secret used to sign webhook deliveries. Empty disables
    /// signature checks (only accepted with `allow_unsigned_webhooks`).
    pub app_secret: String,
    pub wa_base: String,
    /// Phone Number ID the bot sends from.
    pub wa_phone_id: String,
    pub dentalink_base: String,
    pub dentalink_api_key: String,
    /// Shown in the greeting and consent prompt.
    pub clinic_name: String,
    pub require_consent: bool,
    pub allow_unsigned_webhooks: bool,
    /// Bound on every outbound call (messaging and scheduling).
    pub http_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            verify_token: DEFAULT_VERIFY_TOKEN.to_string(),
            whatsapp_token: String::new(),
            app_secret: String::new(),
            wa_base: DEFAULT_WA_BASE.to_string(),
            wa_phone_id: String::new(),
            dentalink_base: DEFAULT_DENTALINK_BASE.to_string(),
            dentalink_api_key: String::new(),
            clinic_name: DEFAULT_CLINIC_NAME.to_string(),
            require_consent: true,
            allow_unsigned_webhooks: false,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    /// Reads the process environment. Call `dotenv::dotenv()` first if a
    /// `.env` file should be honoured.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup (the environment in
    /// production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |key: &str, default: String| lookup(key).unwrap_or(default);

        let http_timeout = match lookup("HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| {
                    Error::Config(format!("HTTP_TIMEOUT_SECS='{}' is not a number: {}", raw, e))
                })?;
                Duration::from_secs(secs)
            }
            None => defaults.http_timeout,
        };

        Ok(Self {
            verify_token: text("VERIFY_TOKEN", defaults.verify_token),
            whatsapp_token: text("WHATSAPP_TOKEN", defaults.whatsapp_token),
            app_secret: text("APP_SECRET", defaults.app_secret),
            wa_base: text("WA_BASE", defaults.wa_base),
            wa_phone_id: text("WA_PHONE_ID", defaults.wa_phone_id),
            dentalink_base: text("DENTALINK_BASE", defaults.dentalink_base),
            dentalink_api_key: text("DENTALINK_API_KEY", defaults.dentalink_api_key),
            clinic_name: text("CLINIC_NAME", defaults.clinic_name),
            require_consent: parse_flag(lookup("REQUIRE_CONSENT"), true),
            allow_unsigned_webhooks: parse_flag(lookup("ALLOW_UNSIGNED_WEBHOOKS"), false),
            http_timeout,
        })
    }

    /// Rejects configurations that must never reach a deployed instance.
    pub fn validate(&self) -> Result<(), Error> {
        if self.app_secret.is_empty() {
            if !self.allow_unsigned_webhooks {
                return Err(Error::Config(
                    "APP_SECRET is empty; set it, or set ALLOW_UNSIGNED_WEBHOOKS=true for local testing"
                        .into(),
                ));
            }
            warn!("!!! APP_SECRET is empty: webhook signature verification is DISABLED. Never run like this in production. !!!");
        }
        if self.verify_token == DEFAULT_VERIFY_TOKEN {
            warn!("VERIFY_TOKEN is the default '{}'.", DEFAULT_VERIFY_TOKEN);
        }
        if self.http_timeout.is_zero() {
            return Err(Error::Config("HTTP_TIMEOUT_SECS must be > 0".into()));
        }
        Ok(())
    }
}

fn parse_flag(raw: Option<String>, default: bool) -> bool {
    match raw {
        Some(v) => v.trim().eq_ignore_ascii_case("true"),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(cfg.verify_token, DEFAULT_VERIFY_TOKEN);
        assert_eq!(cfg.wa_base, DEFAULT_WA_BASE);
        assert!(cfg.require_consent);
        assert!(!cfg.allow_unsigned_webhooks);
        assert_eq!(cfg.http_timeout, Duration::from_secs(20));
    }

    #[test]
    fn consent_flag_is_only_true_for_true() {
        let cfg = AppConfig::from_lookup(lookup_from(&[("REQUIRE_CONSENT", "no")])).unwrap();
        assert!(!cfg.require_consent);
        let cfg = AppConfig::from_lookup(lookup_from(&[("REQUIRE_CONSENT", "TRUE")])).unwrap();
        assert!(cfg.require_consent);
    }

    #[test]
    fn empty_secret_requires_explicit_opt_in() {
        let cfg = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert!(matches!(cfg.validate(), Err(Error::Config(_))));

        let cfg = AppConfig::from_lookup(lookup_from(&[("ALLOW_UNSIGNED_WEBHOOKS", "true")])).unwrap();
        assert!(cfg.validate().is_ok());

        let cfg = AppConfig::from_lookup(lookup_from(&[("APP_SECRET", "s3cret")])).unwrap();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn bad_timeout_is_a_config_error() {
        let res = AppConfig::from_lookup(lookup_from(&[("HTTP_TIMEOUT_SECS", "soon")]));
        assert!(matches!(res, Err(Error::Config(_))));
    }
}
