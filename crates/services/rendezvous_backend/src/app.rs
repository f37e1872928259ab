use crate::app_state::AppState;
use axum::{routing::get, Router};
use http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// The whole HTTP surface: every feature router nested under `/api`.
pub fn build_router(state: &AppState) -> Router {
    let mut api = Router::new()
        .route("/", get(|| async { "Welcome to the Rendezvous API!" }))
        .merge(rendezvous_gcal::routes(state.gcal.clone()))
        .merge(rendezvous_fulfillment::routes(state.fulfillment.clone()));
    if let Some(mail) = &state.mail {
        api = api.merge(rendezvous_mail::routes(mail.clone()));
    }
    if let Some(stripe) = &state.stripe {
        api = api.merge(rendezvous_stripe::routes(stripe.clone()));
    }

    #[allow(unused_mut)] // mutated only with the openapi feature
    let mut app = Router::new().nest("/api", api);

    #[cfg(feature = "openapi")]
    {
        app = app.merge(swagger_ui(state));
    }

    app.layer(cors_layer(&state.config.server.allowed_origins))
        .layer(TraceLayer::new_for_http())
}

/// Any origin when none are configured.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);
    if allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    info!(origins = origins.len(), "CORS restricted to configured origins");
    layer.allow_origin(AllowOrigin::list(origins))
}

#[cfg(feature = "openapi")]
fn swagger_ui(state: &AppState) -> utoipa_swagger_ui::SwaggerUi {
    use rendezvous_fulfillment::doc::FulfillmentApiDoc;
    use rendezvous_gcal::doc::GcalApiDoc;
    use rendezvous_mail::doc::MailApiDoc;
    use rendezvous_stripe::doc::StripeApiDoc;
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    #[derive(OpenApi)]
    #[openapi(
        info(
            title = "Rendezvous API",
            version = "0.1.0",
            description = "Appointment availability, booking and payment endpoints",
            license(name = "MIT", url = "https://opensource.org/licenses/MIT")
        ),
        tags((name = "Rendezvous", description = "Core service endpoints")),
        servers((url = "/api", description = "Main API Prefix")),
    )]
    struct ApiDoc;

    let mut openapi_doc = ApiDoc::openapi();
    openapi_doc.merge(GcalApiDoc::openapi());
    openapi_doc.merge(FulfillmentApiDoc::openapi());
    if state.mail.is_some() {
        openapi_doc.merge(MailApiDoc::openapi());
    }
    if state.stripe.is_some() {
        openapi_doc.merge(StripeApiDoc::openapi());
    }
    info!("Swagger UI at /api/docs");
    SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc)
}
