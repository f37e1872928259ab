//! Route states built from the loaded configuration.
//!
//! Availability and booking routes are mounted even when Google Calendar is
//! switched off, so they answer 503 instead of 404; [`DisabledCalendar`]
//! stands in and refuses every call. Mail and payment routes need their
//! config section and then check their own flag.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rendezvous_booking::ServiceCatalog;
use rendezvous_common::services::{
    BoxFuture, CalendarEntry, CalendarEvent, CalendarEventResult, CalendarService,
};
use rendezvous_common::{config_error, RendezvousError};
use rendezvous_config::AppConfig;
use rendezvous_fulfillment::logic::Notifications;
use rendezvous_fulfillment::{Fulfiller, FulfillmentState};
use rendezvous_gcal::auth::create_calendar_hub;
use rendezvous_gcal::{
    CalendarSettings, GcalServiceError, GcalState, GoogleCalendarService, ReservationCoordinator,
    SharedCalendar,
};
use rendezvous_mail::{MailNotificationService, MailState, SharedNotifier};
use rendezvous_stripe::{SharedPayments, StripePaymentService, StripeState};
use std::sync::Arc;
use tracing::{info, warn};

const FALLBACK_CALENDAR_ID: &str = "primary";

/// Calendar used while `use_gcal` is off.
pub struct DisabledCalendar;

impl DisabledCalendar {
    fn refuse<T: Send + 'static>() -> BoxFuture<'static, T, GcalServiceError> {
        Box::pin(async {
            Err(GcalServiceError::Unavailable(
                "Google Calendar is disabled".to_string(),
            ))
        })
    }
}

impl CalendarService for DisabledCalendar {
    type Error = GcalServiceError;

    fn list_events(
        &self,
        _calendar_id: &str,
        _start_time: DateTime<Utc>,
        _end_time: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<CalendarEntry>, Self::Error> {
        Self::refuse()
    }

    fn create_event(
        &self,
        _calendar_id: &str,
        _event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        Self::refuse()
    }

    fn delete_event(&self, _calendar_id: &str, _event_id: &str) -> BoxFuture<'_, (), Self::Error> {
        Self::refuse()
    }
}

/// The external providers behind the routes. Tests build this by hand.
#[derive(Clone)]
pub struct Services {
    pub calendar: SharedCalendar,
    pub notifier: Option<SharedNotifier>,
    pub payments: Option<SharedPayments>,
}

impl Services {
    /// Connects to the providers the configuration enables.
    pub async fn connect(config: &AppConfig, time_zone: Tz) -> Result<Self, RendezvousError> {
        let calendar: SharedCalendar = if config.use_gcal {
            let gcal = config
                .gcal
                .as_ref()
                .ok_or_else(|| config_error("use_gcal is set but [gcal] is missing"))?;
            let hub = create_calendar_hub(gcal).await?;
            info!("Google Calendar connected");
            Arc::new(GoogleCalendarService::new(Arc::new(hub), time_zone))
        } else {
            warn!("Google Calendar disabled; availability and booking will answer 503");
            Arc::new(DisabledCalendar)
        };

        if config.use_mail && config.mail.is_none() {
            return Err(config_error("use_mail is set but [mail] is missing"));
        }
        let notifier = config.mail.as_ref().map(|mail| {
            Arc::new(MailNotificationService::new(mail.clone())) as SharedNotifier
        });

        if config.use_stripe && config.stripe.is_none() {
            return Err(config_error("use_stripe is set but [stripe] is missing"));
        }
        let payments = config.stripe.as_ref().map(|stripe| {
            Arc::new(StripePaymentService::new(stripe.clone())) as SharedPayments
        });

        Ok(Services {
            calendar,
            notifier,
            payments,
        })
    }
}

/// States shared by the routers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub gcal: Arc<GcalState>,
    pub fulfillment: Arc<FulfillmentState>,
    /// Present when `[mail]` is configured.
    pub mail: Option<Arc<MailState>>,
    /// Present when `[stripe]` is configured.
    pub stripe: Option<Arc<StripeState>>,
}

impl AppState {
    pub async fn from_config(config: Arc<AppConfig>) -> Result<Self, RendezvousError> {
        let settings = calendar_settings(&config)?;
        let services = Services::connect(&config, settings.time_zone).await?;
        Self::new(config, services)
    }

    pub fn new(config: Arc<AppConfig>, services: Services) -> Result<Self, RendezvousError> {
        let settings = calendar_settings(&config)?;
        let coordinator = Arc::new(ReservationCoordinator::new(
            services.calendar.clone(),
            settings.clone(),
        ));
        let catalog = ServiceCatalog::new(config.services.clone());

        let notifications = match (&services.notifier, &config.mail) {
            (Some(notifier), Some(mail)) if config.use_mail => Some(Notifications {
                notifier: notifier.clone(),
                business_address: mail.business_address.clone(),
            }),
            _ => None,
        };
        let fulfiller = Arc::new(Fulfiller::new(coordinator, catalog, notifications));

        let gcal = Arc::new(GcalState {
            config: config.clone(),
            calendar: services.calendar,
            settings,
        });
        let fulfillment = Arc::new(FulfillmentState {
            config: config.clone(),
            fulfiller: fulfiller.clone(),
        });
        let mail = services.notifier.map(|notifier| {
            Arc::new(MailState {
                config: config.clone(),
                notifier,
            })
        });
        let stripe = services.payments.map(|payments| {
            Arc::new(StripeState {
                config: config.clone(),
                payments,
                fulfiller,
            })
        });

        Ok(AppState {
            config,
            gcal,
            fulfillment,
            mail,
            stripe,
        })
    }
}

/// Settings from `[gcal]`. A disabled calendar falls back to defaults.
pub fn calendar_settings(config: &AppConfig) -> Result<CalendarSettings, RendezvousError> {
    let mut gcal = config.gcal.clone().unwrap_or_default();
    if !config.use_gcal && gcal.calendar_id.is_none() {
        gcal.calendar_id = Some(FALLBACK_CALENDAR_ID.to_string());
    }
    Ok(CalendarSettings::from_config(&gcal)?)
}
