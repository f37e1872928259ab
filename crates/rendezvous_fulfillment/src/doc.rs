#![cfg(feature = "openapi")]
use crate::handlers::PaidBookingRequest;
use crate::logic::{BookingResponse, ClientInfo, FailedSlot, ReservationCommit};
use rendezvous_booking::{ClientDetails, TimeSlot};
use rendezvous_gcal::Appointment;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::book_handler,
        crate::handlers::fulfill_booking_handler
    ),
    components(schemas(
        ReservationCommit,
        PaidBookingRequest,
        BookingResponse,
        ClientInfo,
        FailedSlot,
        ClientDetails,
        TimeSlot,
        Appointment
    )),
    tags(
        (name = "Booking", description = "Free bookings"),
        (name = "Fulfillment", description = "Internal commit of paid bookings")
    )
)]
pub struct FulfillmentApiDoc;
