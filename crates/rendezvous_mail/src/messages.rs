//! Text of the emails sent after a booking and from the contact form.

use crate::handlers::ContactRequest;
use rendezvous_booking::{ClientDetails, TimeSlot};
use rendezvous_common::services::EmailMessage;

/// "Tuesday, February 10, 2026, 10:00 to 11:00", in the slot's own offset.
pub fn format_slot(slot: &TimeSlot) -> String {
    format!(
        "{}, {} to {}",
        slot.date.format("%A, %B %-d, %Y"),
        slot.date.format("%H:%M"),
        slot.end.format("%H:%M")
    )
}

fn slot_lines(slots: &[TimeSlot]) -> String {
    slots
        .iter()
        .map(|slot| format!("- {}", format_slot(slot)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Confirmation sent to the client once their appointments are on the calendar.
pub fn booking_confirmation(
    client: &ClientDetails,
    slots: &[TimeSlot],
    business_address: &str,
) -> EmailMessage {
    let plural = if slots.len() > 1 { "s" } else { "" };
    let body = format!(
        "Hello {},\n\nYour appointment{} for {} is confirmed:\n{}\n\n\
         If you need to change or cancel, reply to this email.\n",
        client.name.trim(),
        plural,
        client.service.trim(),
        slot_lines(slots)
    );
    EmailMessage {
        to: client.email.trim().to_string(),
        reply_to: Some(business_address.to_string()),
        subject: format!("Appointment confirmed: {}", client.service.trim()),
        body,
        is_html: false,
    }
}

/// Notice sent to the business inbox for every committed booking.
pub fn booking_notice(
    client: &ClientDetails,
    slots: &[TimeSlot],
    payment_status: &str,
    business_address: &str,
) -> EmailMessage {
    let mut lines = client.description_lines();
    lines.push(format!("Payment: {}", payment_status));
    lines.push(String::new());
    lines.push(slot_lines(slots));
    EmailMessage {
        to: business_address.to_string(),
        reply_to: Some(client.email.trim().to_string()),
        subject: format!("New booking: {}", client.appointment_title()),
        body: lines.join("\n"),
        is_html: false,
    }
}

/// Contact form message forwarded to the business inbox.
pub fn contact_message(request: &ContactRequest, business_address: &str) -> EmailMessage {
    EmailMessage {
        to: business_address.to_string(),
        reply_to: Some(request.email.trim().to_string()),
        subject: format!("Contact form: {}", request.name.trim()),
        body: format!(
            "From: {} <{}>\n\n{}",
            request.name.trim(),
            request.email.trim(),
            request.message.trim()
        ),
        is_html: false,
    }
}
