use crate::error::MailError;
use rendezvous_common::services::{BoxFuture, EmailMessage, NotificationResult, NotificationService};
use rendezvous_common::HTTP_CLIENT;
use rendezvous_config::MailConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info};

pub type SharedNotifier = Arc<dyn NotificationService<Error = MailError>>;

/// JSON body accepted by the transactional mail API.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct OutgoingMail<'a> {
    pub from: &'a str,
    pub to: Vec<&'a str>,
    pub subject: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<&'a str>,
}

impl<'a> OutgoingMail<'a> {
    pub fn new(from: &'a str, message: &'a EmailMessage) -> Self {
        let (text, html) = if message.is_html {
            (None, Some(message.body.as_str()))
        } else {
            (Some(message.body.as_str()), None)
        };
        Self {
            from,
            to: vec![message.to.as_str()],
            subject: &message.subject,
            text,
            html,
            reply_to: message.reply_to.as_deref(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SentMail {
    id: Option<String>,
}

/// Sends mail through an HTTP mail API authenticated with a bearer key.
pub struct MailNotificationService {
    config: MailConfig,
    client: Client,
}

impl MailNotificationService {
    pub fn new(config: MailConfig) -> Self {
        Self {
            config,
            client: HTTP_CLIENT.clone(),
        }
    }

    pub fn with_client(config: MailConfig, client: Client) -> Self {
        Self { config, client }
    }

    async fn deliver(&self, message: EmailMessage) -> Result<NotificationResult, MailError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(MailError::ConfigError)?;
        if message.to.trim().is_empty() {
            return Err(MailError::InvalidMessage("recipient is empty".to_string()));
        }

        let body = OutgoingMail::new(&self.config.from_address, &message);
        debug!(to = %message.to, subject = %message.subject, "Sending email");

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %message, "Mail API rejected the message");
            return Err(MailError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let sent: SentMail = response.json().await.unwrap_or(SentMail { id: None });
        info!(to = %message.to, message_id = ?sent.id, "Email sent");
        Ok(NotificationResult {
            message_id: sent.id,
            status: "sent".to_string(),
        })
    }
}

impl NotificationService for MailNotificationService {
    type Error = MailError;

    fn send_email(&self, message: EmailMessage) -> BoxFuture<'_, NotificationResult, Self::Error> {
        Box::pin(self.deliver(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(is_html: bool) -> EmailMessage {
        EmailMessage {
            to: "marie@example.com".into(),
            reply_to: None,
            subject: "Hello".into(),
            body: "Body".into(),
            is_html,
        }
    }

    #[test]
    fn plain_text_message_uses_text_field() {
        let msg = message(false);
        let json = serde_json::to_value(OutgoingMail::new("clinic@example.com", &msg)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "from": "clinic@example.com",
                "to": ["marie@example.com"],
                "subject": "Hello",
                "text": "Body"
            })
        );
    }

    #[test]
    fn html_message_uses_html_field() {
        let msg = message(true);
        let mail = OutgoingMail::new("clinic@example.com", &msg);
        assert_eq!(mail.html, Some("Body"));
        assert!(mail.text.is_none());
    }

    #[tokio::test]
    async fn missing_api_key_is_a_config_error() {
        let service = MailNotificationService::new(MailConfig {
            api_url: "http://127.0.0.1:9/emails".into(),
            from_address: "clinic@example.com".into(),
            business_address: "clinic@example.com".into(),
            api_key: None,
        });
        let err = service.send_email(message(false)).await.unwrap_err();
        assert!(matches!(err, MailError::ConfigError));
    }
}
