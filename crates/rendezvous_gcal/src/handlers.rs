// File: crates/rendezvous_gcal/src/handlers.rs
use crate::logic::{
    get_availability, AvailabilityQuery, CalendarSettings, SharedCalendar,
    AVAILABILITY_UNAVAILABLE_MESSAGE,
};
use axum::{
    extract::{Query, State},
    response::Json,
};
use chrono::Utc;
use rendezvous_booking::TimeSlot;
use rendezvous_common::{unavailable, RendezvousError};
use rendezvous_config::AppConfig;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Clone)]
pub struct GcalState {
    pub config: Arc<AppConfig>,
    pub calendar: SharedCalendar,
    pub settings: CalendarSettings,
}

/// Bookable slots from two days out, ordered by start.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Bookable slots ordered by start", body = [TimeSlot]),
        (status = 503, description = "Calendar disabled or temporarily unavailable")
    ),
    tag = "Availability"
))]
pub async fn get_availability_handler(
    State(state): State<Arc<GcalState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<TimeSlot>>, RendezvousError> {
    if !state.config.use_gcal {
        info!("Availability requested while calendar integration is disabled");
        return Err(unavailable("Calendar integration is disabled."));
    }

    let slots = get_availability(
        state.calendar.as_ref(),
        &state.settings,
        Utc::now(),
        query.months,
    )
    .await
    .map_err(|e| {
        error!(error = %e, retryable = e.is_retryable(), "Availability query failed");
        unavailable(AVAILABILITY_UNAVAILABLE_MESSAGE)
    })?;

    Ok(Json(slots))
}
