//! Notifier that records messages instead of sending them.

use crate::error::MailError;
use rendezvous_common::services::{BoxFuture, EmailMessage, NotificationResult, NotificationService};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<EmailMessage>>,
    failing: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every following send fails with an API error.
    pub fn fail_all(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl NotificationService for RecordingNotifier {
    type Error = MailError;

    fn send_email(&self, message: EmailMessage) -> BoxFuture<'_, NotificationResult, Self::Error> {
        Box::pin(async move {
            if self.failing.load(Ordering::SeqCst) {
                return Err(MailError::ApiError {
                    status_code: 503,
                    message: "mail API unavailable".to_string(),
                });
            }
            let mut sent = self.sent.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            sent.push(message);
            Ok(NotificationResult {
                message_id: Some(format!("recorded-{}", sent.len())),
                status: "sent".to_string(),
            })
        })
    }
}
