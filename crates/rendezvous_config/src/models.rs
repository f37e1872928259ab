// --- File: crates/rendezvous_config/src/models.rs ---

use serde::{Deserialize, Serialize};

pub const DEFAULT_TIME_ZONE: &str = "America/Toronto";
pub const DEFAULT_FREE_MARKER: &str = "free";
pub const DEFAULT_BUFFER_TITLE: &str = "Preparation";
pub const DEFAULT_LEAD_TIME_HOURS: i64 = 48;
pub const DEFAULT_MAX_MONTHS_AHEAD: u32 = 1;
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_CURRENCY: &str = "cad";

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by the CORS layer. Empty means any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

// --- Google Calendar Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct GcalConfig {
    pub key_path: Option<String>,
    pub calendar_id: Option<String>,
    /// IANA zone used for appointment timestamps and calendar days.
    pub time_zone: Option<String>,
    /// Case-insensitive title marker identifying availability events.
    pub free_marker: Option<String>,
    pub buffer_title: Option<String>,
    pub lead_time_hours: Option<i64>,
    pub max_months_ahead: Option<u32>,
    pub provider_timeout_secs: Option<u64>,
}

impl GcalConfig {
    pub fn time_zone(&self) -> &str {
        self.time_zone.as_deref().unwrap_or(DEFAULT_TIME_ZONE)
    }

    pub fn free_marker(&self) -> &str {
        self.free_marker.as_deref().unwrap_or(DEFAULT_FREE_MARKER)
    }

    pub fn buffer_title(&self) -> &str {
        self.buffer_title.as_deref().unwrap_or(DEFAULT_BUFFER_TITLE)
    }

    pub fn lead_time_hours(&self) -> i64 {
        self.lead_time_hours.unwrap_or(DEFAULT_LEAD_TIME_HOURS)
    }

    pub fn max_months_ahead(&self) -> u32 {
        self.max_months_ahead.unwrap_or(DEFAULT_MAX_MONTHS_AHEAD).max(1)
    }

    pub fn provider_timeout_secs(&self) -> u64 {
        self.provider_timeout_secs
            .unwrap_or(DEFAULT_PROVIDER_TIMEOUT_SECS)
    }
}

// --- Stripe Config ---
// Secrets are usually "secret_from_env" markers resolved at load time.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StripeConfig {
    /// Must contain the `{CHECKOUT_SESSION_ID}` placeholder.
    pub success_url: String,
    pub cancel_url: String,
    pub default_currency: Option<String>,
    pub secret_key: Option<String>,
    pub webhook_secret: Option<String>,
}

impl StripeConfig {
    pub fn currency(&self) -> &str {
        self.default_currency.as_deref().unwrap_or(DEFAULT_CURRENCY)
    }
}

// --- Mail Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MailConfig {
    pub api_url: String,
    pub from_address: String,
    /// Inbox receiving booking notices and contact messages.
    pub business_address: String,
    pub api_key: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct FulfillmentConfig {
    pub shared_secret: Option<String>,
}

/// A selectable length for services priced by duration.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct DurationOption {
    pub duration_minutes: i64,
    /// Price in the smallest currency unit (e.g., cents).
    pub price: i64,
}

/// One entry of the service catalog offered to visitors.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ServiceOffering {
    pub name: String,
    pub duration_minutes: Option<i64>,
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub is_free: bool,
    #[serde(default)]
    pub durations: Vec<DurationOption>,
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_gcal: bool,
    #[serde(default)]
    pub use_stripe: bool,
    #[serde(default)]
    pub use_mail: bool,
    #[serde(default)]
    pub use_fulfillment: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub gcal: Option<GcalConfig>,
    #[serde(default)]
    pub stripe: Option<StripeConfig>,
    #[serde(default)]
    pub mail: Option<MailConfig>,
    #[serde(default)]
    pub fulfillment: Option<FulfillmentConfig>,

    #[serde(default)]
    pub services: Vec<ServiceOffering>,
}
