#[cfg(test)]
mod tests {
    use crate::catalog::{total_amount, ServiceCatalog, ServiceDuration};
    use crate::error::BookingError;
    use crate::slot::TimeSlot;
    use chrono::{DateTime, Duration};
    use rendezvous_config::{DurationOption, ServiceOffering};

    fn catalog() -> ServiceCatalog {
        ServiceCatalog::new(vec![
            ServiceOffering {
                name: "Remise en forme".into(),
                duration_minutes: Some(30),
                price: 15000,
                is_free: false,
                durations: vec![],
            },
            ServiceOffering {
                name: "Coaching - course à pied / triathlon".into(),
                duration_minutes: Some(30),
                price: 0,
                is_free: true,
                durations: vec![],
            },
            ServiceOffering {
                name: "Massage".into(),
                duration_minutes: None,
                price: 0,
                is_free: false,
                durations: vec![
                    DurationOption { duration_minutes: 45, price: 7500 },
                    DurationOption { duration_minutes: 60, price: 11000 },
                    DurationOption { duration_minutes: 75, price: 12000 },
                    DurationOption { duration_minutes: 90, price: 14000 },
                ],
            },
        ])
    }

    fn slot(start: &str, end: &str) -> TimeSlot {
        TimeSlot::new(
            DateTime::parse_from_rfc3339(start).unwrap(),
            DateTime::parse_from_rfc3339(end).unwrap(),
            "Free",
        )
    }

    #[test]
    fn fixed_service_quotes_its_own_duration() {
        let quote = catalog().quote("remise en forme", None).unwrap();
        assert_eq!(quote, ServiceDuration { duration: 30, price: 15000 });
    }

    #[test]
    fn massage_quotes_selected_duration() {
        let quote = catalog().quote("Massage", Some(75)).unwrap();
        assert_eq!(quote, ServiceDuration { duration: 75, price: 12000 });
    }

    #[test]
    fn massage_defaults_to_an_hour() {
        let quote = catalog().quote("Massage", None).unwrap();
        assert_eq!(quote.duration, 60);
        assert_eq!(quote.price, 11000);
    }

    #[test]
    fn unsupported_duration_is_rejected() {
        let err = catalog().quote("Massage", Some(50)).unwrap_err();
        assert_eq!(
            err,
            BookingError::UnknownDuration { service: "Massage".into(), minutes: 50 }
        );
    }

    #[test]
    fn unknown_service_is_rejected() {
        assert!(matches!(
            catalog().quote("Yoga", None),
            Err(BookingError::UnknownService(_))
        ));
    }

    #[test]
    fn free_service_allows_one_slot_and_costs_nothing() {
        let catalog = catalog();
        let name = "Coaching - course à pied / triathlon";
        assert_eq!(catalog.max_slots(name).unwrap(), Some(1));
        assert_eq!(catalog.quote(name, None).unwrap().price, 0);
        assert_eq!(catalog.max_slots("Massage").unwrap(), None);
    }

    #[test]
    fn enough_duration_includes_buffer() {
        let quote = ServiceDuration { duration: 30, price: 15000 };
        assert_eq!(quote.length(), Duration::minutes(30));
        assert!(quote.has_enough_duration(&slot(
            "2026-03-02T09:00:00-05:00",
            "2026-03-02T09:45:00-05:00"
        )));
        assert!(!quote.has_enough_duration(&slot(
            "2026-03-02T09:00:00-05:00",
            "2026-03-02T09:44:00-05:00"
        )));
    }

    #[test]
    fn total_is_price_times_slots() {
        let quote = ServiceDuration { duration: 60, price: 11000 };
        assert_eq!(total_amount(&quote, 3), 33000);
        assert_eq!(total_amount(&quote, 0), 0);
    }
}
