//! WhatsApp Cloud API adapter: Implementation of Notifier.
//!
//! Sends plain text messages through `POST {api_base}/{phone_id}/messages`
//! with a bearer token.
//!
//! # Secrets
//!
//! The bearer token is held in `Zeroizing` and never printed: the `Debug`
//! impl of [`WhatsAppConfig`] redacts it.

use std::time::Duration;

use serde::Serialize;
use zeroize::Zeroizing;

use crate::ports::{NotifyError, Notifier};

const PHONE_ID_ENV: &str = "WHATSAPP_PHONE_ID";
const TOKEN_ENV: &str = "WHATSAPP_TOKEN";
const API_BASE_ENV: &str = "HEARTGUARD_WHATSAPP_API_BASE";

const DEFAULT_API_BASE: &str = "https://graph.facebook.com/v18.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for the messaging API.
#[derive(Clone)]
pub struct WhatsAppConfig {
    pub phone_id: String,
    pub token: Zeroizing<String>,
    pub api_base: String,
}

impl std::fmt::Debug for WhatsAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhatsAppConfig")
            .field("phone_id", &self.phone_id)
            .field("token", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl WhatsAppConfig {
    /// Load from the process environment.
    ///
    /// Required: `WHATSAPP_PHONE_ID`, `WHATSAPP_TOKEN`.
    /// Optional: `HEARTGUARD_WHATSAPP_API_BASE`.
    ///
    /// # Errors
    /// Returns `NotifyError::MissingConfig` naming the first missing variable.
    pub fn from_env() -> Result<Self, NotifyError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, NotifyError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let phone_id = non_empty(PHONE_ID_ENV).ok_or(NotifyError::MissingConfig(PHONE_ID_ENV))?;
        let token = non_empty(TOKEN_ENV).ok_or(NotifyError::MissingConfig(TOKEN_ENV))?;
        let api_base = non_empty(API_BASE_ENV)
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        Ok(Self {
            phone_id,
            token: Zeroizing::new(token),
            api_base,
        })
    }

    /// Endpoint messages are posted to.
    #[must_use]
    pub fn messages_url(&self) -> String {
        format!("{}/{}/messages", self.api_base, self.phone_id)
    }
}

#[derive(Debug, Serialize)]
struct TextBody<'a> {
    body: &'a str,
}

/// Request body for a plain text message.
#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    messaging_product: &'static str,
    to: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    text: TextBody<'a>,
}

impl<'a> TextMessage<'a> {
    fn new(to: &'a str, body: &'a str) -> Self {
        Self {
            messaging_product: "whatsapp",
            to,
            kind: "text",
            text: TextBody { body },
        }
    }
}

/// Blocking WhatsApp Cloud API client.
pub struct WhatsAppNotifier {
    config: WhatsAppConfig,
    client: reqwest::blocking::Client,
}

impl WhatsAppNotifier {
    /// Create a notifier with the given configuration.
    ///
    /// # Errors
    /// Returns `NotifyError::Transport` if the HTTP client cannot be built.
    pub fn new(config: WhatsAppConfig) -> Result<Self, NotifyError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;
        Ok(Self { config, client })
    }

    /// Create a notifier configured from the environment.
    ///
    /// # Errors
    /// Returns error if configuration is missing or the client cannot be built.
    pub fn from_env() -> Result<Self, NotifyError> {
        Self::new(WhatsAppConfig::from_env()?)
    }
}

impl Notifier for WhatsAppNotifier {
    fn send_text(&self, to: &str, body: &str) -> Result<(), NotifyError> {
        let to = to.trim();
        if to.is_empty() {
            return Err(NotifyError::EmptyRecipient);
        }

        let response = self
            .client
            .post(self.config.messages_url())
            .bearer_auth(self.config.token.as_str())
            .json(&TextMessage::new(to, body))
            .send()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("WhatsApp API returned HTTP {}", status.as_u16());
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
            });
        }

        tracing::debug!("WhatsApp message accepted ({} chars)", body.chars().count());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_payload_shape() {
        let payload = serde_json::to_value(TextMessage::new("256700000000", "hello"))
            .expect("serialize");
        assert_eq!(
            payload,
            serde_json::json!({
                "messaging_product": "whatsapp",
                "to": "256700000000",
                "type": "text",
                "text": { "body": "hello" }
            })
        );
    }

    #[test]
    fn test_config_requires_phone_id_and_token() {
        let err = WhatsAppConfig::from_lookup(lookup_from(&[(TOKEN_ENV, "abc")]))
            .expect_err("missing phone id");
        assert!(matches!(err, NotifyError::MissingConfig(PHONE_ID_ENV)));

        let lookup = lookup_from(&[(PHONE_ID_ENV, "123"), (TOKEN_ENV, "  ")]);
        let err = WhatsAppConfig::from_lookup(lookup).expect_err("blank token");
        assert!(matches!(err, NotifyError::MissingConfig(TOKEN_ENV)));
    }

    #[test]
    fn test_config_url_and_default_base() {
        let config = WhatsAppConfig::from_lookup(lookup_from(&[
            (PHONE_ID_ENV, "1055"),
            (TOKEN_ENV, "secret-token"),
        ]))
        .expect("config");
        assert_eq!(
            config.messages_url(),
            "https://graph.facebook.com/v18.0/1055/messages"
        );

        let config = WhatsAppConfig::from_lookup(lookup_from(&[
            (PHONE_ID_ENV, "1055"),
            (TOKEN_ENV, "secret-token"),
            (API_BASE_ENV, "http://localhost:9000/"),
        ]))
        .expect("config");
        assert_eq!(config.messages_url(), "http://localhost:9000/1055/messages");
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = WhatsAppConfig::from_lookup(lookup_from(&[
            (PHONE_ID_ENV, "1055"),
            (TOKEN_ENV, "super-secret-token"),
        ]))
        .expect("config");
        let printed = format!("{config:?}");
        assert!(!printed.contains("super-secret-token"));
        assert!(printed.contains("[REDACTED]"));
    }

    #[test]
    fn test_empty_recipient_rejected_before_network() {
        let config = WhatsAppConfig::from_lookup(lookup_from(&[
            (PHONE_ID_ENV, "1055"),
            (TOKEN_ENV, "token"),
        ]))
        .expect("config");
        let notifier = WhatsAppNotifier::new(config).expect("client");
        let err = notifier.send_text("   ", "hi").expect_err("empty recipient");
        assert!(matches!(err, NotifyError::EmptyRecipient));
    }
}
