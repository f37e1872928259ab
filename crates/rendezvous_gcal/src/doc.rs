// File: crates/rendezvous_gcal/src/doc.rs
#![cfg(feature = "openapi")]
use crate::logic::AvailabilityQuery;
use rendezvous_booking::TimeSlot;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(crate::handlers::get_availability_handler),
    components(schemas(AvailabilityQuery, TimeSlot)),
    tags(
        (name = "Availability", description = "Bookable slots computed from the business calendar")
    ),
    servers(
        (url = "/api", description = "Rendezvous API")
    )
)]
pub struct GcalApiDoc;
