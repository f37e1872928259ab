use crate::messages::contact_message;
use crate::service::SharedNotifier;
use axum::{extract::State, response::Json};
use rendezvous_common::{config_error, unavailable, validation_error, RendezvousError};
use rendezvous_config::AppConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Clone)]
pub struct MailState {
    pub config: Arc<AppConfig>,
    pub notifier: SharedNotifier,
}

#[derive(Deserialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactRequest {
    pub fn validate(&self) -> Result<(), RendezvousError> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("message", &self.message),
        ] {
            if value.trim().is_empty() {
                return Err(validation_error(format!("{} is required", field)));
            }
        }
        let email = self.email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
            _ => Err(validation_error("email is not a valid address")),
        }
    }
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}

/// Forwards a contact form message to the business inbox.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/contact",
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Message forwarded", body = ContactResponse),
        (status = 400, description = "A field is missing or the email is invalid"),
        (status = 502, description = "The mail provider rejected the message"),
        (status = 503, description = "Mail is disabled")
    ),
    tag = "Mail"
))]
pub async fn contact_handler(
    State(state): State<Arc<MailState>>,
    Json(request): Json<ContactRequest>,
) -> Result<Json<ContactResponse>, RendezvousError> {
    if !state.config.use_mail {
        return Err(unavailable("Mail is disabled."));
    }
    request.validate()?;

    let mail_config = state
        .config
        .mail
        .as_ref()
        .ok_or_else(|| config_error("mail configuration missing"))?;

    let message = contact_message(&request, &mail_config.business_address);
    state.notifier.send_email(message).await.map_err(|e| {
        error!(error = %e, "Failed to forward contact message");
        RendezvousError::from(e)
    })?;

    info!(from = %request.email.trim(), "Contact message forwarded");
    Ok(Json(ContactResponse {
        success: true,
        message: "Message sent".to_string(),
    }))
}
