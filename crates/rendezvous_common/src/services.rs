// --- File: crates/rendezvous_common/src/services.rs ---
//! Service abstractions for external providers.
//!
//! The calendar, payment and mail providers are reached through these traits
//! so that the booking logic can be exercised against in-memory doubles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Operations the booking system needs from a calendar provider.
///
/// Implementations must not borrow `calendar_id` or `event_id` inside the
/// returned future.
pub trait CalendarService: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Lists single, non-cancelled events overlapping `[start_time, end_time)`,
    /// ordered by start.
    fn list_events(
        &self,
        calendar_id: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<CalendarEntry>, Self::Error>;

    fn create_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error>;

    /// Deletes an event. Deleting an event that no longer exists succeeds.
    fn delete_event(&self, calendar_id: &str, event_id: &str) -> BoxFuture<'_, (), Self::Error>;
}

/// Operations the booking system needs from a payment provider.
pub trait PaymentService: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> BoxFuture<'_, CheckoutSession, Self::Error>;

    fn retrieve_checkout_session(
        &self,
        session_id: &str,
    ) -> BoxFuture<'_, CheckoutSessionStatus, Self::Error>;
}

/// Outbound notifications.
pub trait NotificationService: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn send_email(&self, message: EmailMessage) -> BoxFuture<'_, NotificationResult, Self::Error>;
}

/// Whether an event blocks time on the provider calendar.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Transparency {
    #[default]
    Opaque,
    Transparent,
}

impl Transparency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transparency::Opaque => "opaque",
            Transparency::Transparent => "transparent",
        }
    }

    /// Parses the provider value; anything but `transparent` blocks time.
    pub fn from_provider(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("transparent") => Transparency::Transparent,
            _ => Transparency::Opaque,
        }
    }
}

/// An event to be written to the provider calendar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalendarEvent {
    /// RFC 3339 start, with the local offset.
    pub start_time: String,
    /// RFC 3339 end, with the local offset.
    pub end_time: String,
    pub summary: String,
    pub description: Option<String>,
    /// IANA zone name the provider should display the event in.
    pub time_zone: Option<String>,
    #[serde(default)]
    pub transparency: Transparency,
    /// Stable booking reference stored alongside the event.
    pub reference: Option<String>,
}

/// An event as read back from the provider calendar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalendarEntry {
    pub event_id: String,
    pub summary: String,
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub transparency: Transparency,
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalendarEventResult {
    pub event_id: String,
    pub status: String,
}

/// A hosted checkout for `quantity × unit_amount`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub product_name: String,
    pub description: Option<String>,
    /// Price of one unit in the smallest currency unit.
    pub unit_amount: i64,
    pub quantity: u32,
    pub currency: String,
    pub customer_email: Option<String>,
    /// Opaque key/value pairs returned unchanged when the session is retrieved.
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckoutSession {
    pub session_id: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckoutSessionStatus {
    pub session_id: String,
    /// Provider payment status, `paid` once the payment is captured.
    pub payment_status: String,
    pub amount_total: Option<i64>,
    pub currency: Option<String>,
    pub customer_email: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl CheckoutSessionStatus {
    pub fn is_paid(&self) -> bool {
        self.payment_status == "paid"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub body: String,
    pub is_html: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationResult {
    pub message_id: Option<String>,
    pub status: String,
}
