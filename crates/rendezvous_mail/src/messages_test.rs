#[cfg(test)]
mod tests {
    use crate::handlers::ContactRequest;
    use crate::messages::{booking_confirmation, booking_notice, contact_message, format_slot};
    use chrono::DateTime;
    use rendezvous_booking::{ClientDetails, TimeSlot};

    fn client() -> ClientDetails {
        ClientDetails {
            name: "Marie Tremblay".into(),
            email: "marie@example.com".into(),
            phone: "514-555-0101".into(),
            address: None,
            birthdate: None,
            service: "Massage".into(),
        }
    }

    fn slot(start: &str, end: &str) -> TimeSlot {
        TimeSlot::new(
            DateTime::parse_from_rfc3339(start).unwrap(),
            DateTime::parse_from_rfc3339(end).unwrap(),
            "Free",
        )
    }

    #[test]
    fn slot_is_rendered_in_its_own_offset() {
        let text = format_slot(&slot("2026-02-10T10:00:00-05:00", "2026-02-10T11:00:00-05:00"));
        assert_eq!(text, "Tuesday, February 10, 2026, 10:00 to 11:00");
    }

    #[test]
    fn confirmation_goes_to_client_and_lists_every_slot() {
        let slots = [
            slot("2026-02-10T10:00:00-05:00", "2026-02-10T11:00:00-05:00"),
            slot("2026-02-12T14:00:00-05:00", "2026-02-12T15:00:00-05:00"),
        ];
        let email = booking_confirmation(&client(), &slots, "clinic@example.com");

        assert_eq!(email.to, "marie@example.com");
        assert_eq!(email.reply_to.as_deref(), Some("clinic@example.com"));
        assert_eq!(email.subject, "Appointment confirmed: Massage");
        assert!(email.body.contains("appointments for Massage"));
        assert!(email.body.contains("- Thursday, February 12, 2026, 14:00 to 15:00"));
        assert!(!email.is_html);
    }

    #[test]
    fn notice_carries_client_details_and_payment() {
        let slots = [slot("2026-02-10T10:00:00-05:00", "2026-02-10T11:00:00-05:00")];
        let email = booking_notice(&client(), &slots, "paid", "clinic@example.com");

        assert_eq!(email.to, "clinic@example.com");
        assert_eq!(email.reply_to.as_deref(), Some("marie@example.com"));
        assert_eq!(email.subject, "New booking: Massage - Marie Tremblay");
        assert!(email.body.contains("Phone: 514-555-0101"));
        assert!(email.body.contains("Payment: paid"));
    }

    #[test]
    fn contact_message_replies_to_sender() {
        let request = ContactRequest {
            name: " Luc ".into(),
            email: "luc@example.com".into(),
            message: "Do you offer evening sessions?".into(),
        };
        let email = contact_message(&request, "clinic@example.com");

        assert_eq!(email.to, "clinic@example.com");
        assert_eq!(email.reply_to.as_deref(), Some("luc@example.com"));
        assert_eq!(email.subject, "Contact form: Luc");
        assert!(email.body.ends_with("Do you offer evening sessions?"));
    }
}
