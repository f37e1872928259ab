#[cfg(test)]
mod tests {
    use crate::auth::INTERNAL_AUTH_HEADER;
    use crate::handlers::FulfillmentState;
    use crate::logic::Fulfiller;
    use crate::routes::routes;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use chrono::Duration;
    use chrono_tz::Tz;
    use rendezvous_booking::ServiceCatalog;
    use rendezvous_config::{AppConfig, FulfillmentConfig, ServerConfig, ServiceOffering};
    use rendezvous_gcal::mock::InMemoryCalendar;
    use rendezvous_gcal::{CalendarSettings, ReservationCoordinator};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    const SECRET: &str = "s3cret";

    fn config() -> AppConfig {
        AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 8086,
                allowed_origins: Vec::new(),
            },
            use_gcal: true,
            use_stripe: false,
            use_mail: false,
            use_fulfillment: true,
            gcal: None,
            stripe: None,
            mail: None,
            fulfillment: Some(FulfillmentConfig {
                shared_secret: Some(SECRET.into()),
            }),
            services: vec![ServiceOffering {
                name: "Coaching".into(),
                duration_minutes: Some(30),
                price: 0,
                is_free: true,
                durations: Vec::new(),
            }],
        }
    }

    fn app(config: AppConfig) -> axum::Router {
        let calendar = Arc::new(InMemoryCalendar::new());
        calendar.seed(
            "primary",
            "Free",
            "2026-02-10T09:00:00-05:00",
            "2026-02-10T12:00:00-05:00",
        );
        let settings = CalendarSettings {
            calendar_id: "primary".into(),
            time_zone: Tz::America__Toronto,
            free_marker: "free".into(),
            buffer_title: "Preparation".into(),
            lead_time: Duration::hours(48),
            max_months_ahead: 1,
            provider_timeout: std::time::Duration::from_secs(5),
        };
        let coordinator = Arc::new(ReservationCoordinator::new(calendar, settings));
        let catalog = ServiceCatalog::new(config.services.clone());
        routes(Arc::new(FulfillmentState {
            config: Arc::new(config),
            fulfiller: Arc::new(Fulfiller::new(coordinator, catalog, None)),
        }))
    }

    async fn post(
        app: axum::Router,
        uri: &str,
        secret: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(secret) = secret {
            builder = builder.header(INTERNAL_AUTH_HEADER, secret);
        }
        let response = app
            .oneshot(builder.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn free_booking(email: &str, start: &str) -> Value {
        json!({
            "name": "Marie Tremblay",
            "email": email,
            "phone": "514-555-0101",
            "service": "Coaching",
            "timeSlot": start
        })
    }

    fn paid_booking() -> Value {
        json!({
            "client": {
                "name": "Marie Tremblay",
                "email": "marie@example.com",
                "phone": "514-555-0101",
                "address": null,
                "birthdate": null,
                "service": "Massage"
            },
            "slots": [{
                "date": "2026-02-10T09:00:00-05:00",
                "end": "2026-02-10T10:00:00-05:00"
            }]
        })
    }

    #[tokio::test]
    async fn free_booking_returns_client_info() {
        let (status, body) = post(
            app(config()),
            "/book",
            None,
            free_booking("marie@example.com", "2026-02-10T10:00:00-05:00"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["paymentStatus"], "free");
        assert_eq!(body["clientInfo"]["email"], "marie@example.com");
        assert_eq!(body["clientInfo"]["timeSlot"], "2026-02-10T10:00:00-05:00");
    }

    #[tokio::test]
    async fn taken_slot_is_a_conflict() {
        let app = app(config());
        let (first, _) = post(
            app.clone(),
            "/book",
            None,
            free_booking("marie@example.com", "2026-02-10T10:00:00-05:00"),
        )
        .await;
        assert_eq!(first, StatusCode::OK);

        let (status, body) = post(
            app,
            "/book",
            None,
            free_booking("luc@example.com", "2026-02-10T10:00:00-05:00"),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], 409);
    }

    #[tokio::test]
    async fn missing_phone_is_a_bad_request() {
        let mut booking = free_booking("marie@example.com", "2026-02-10T10:00:00-05:00");
        booking["phone"] = json!(" ");
        let (status, _) = post(app(config()), "/book", None, booking).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn internal_route_requires_the_secret() {
        let (missing, _) = post(app(config()), "/fulfill/booking", None, paid_booking()).await;
        assert_eq!(missing, StatusCode::UNAUTHORIZED);

        let (wrong, _) =
            post(app(config()), "/fulfill/booking", Some("guess"), paid_booking()).await;
        assert_eq!(wrong, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn operator_commit_books_paid_slots() {
        let (status, body) =
            post(app(config()), "/fulfill/booking", Some(SECRET), paid_booking()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["paymentStatus"], "paid");
        assert_eq!(body["appointments"].as_array().unwrap().len(), 1);
        assert!(body.get("failedSlots").is_none());
    }

    #[tokio::test]
    async fn unconfigured_secret_is_a_server_error() {
        let mut config = config();
        config.fulfillment = None;
        let (status, _) = post(app(config), "/fulfill/booking", Some(SECRET), paid_booking()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
