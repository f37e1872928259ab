//! Service-account access to the Google Calendar API.

use crate::logic::GcalError;
use google_calendar3::{
    hyper_rustls::{HttpsConnector, HttpsConnectorBuilder},
    hyper_util::client::legacy::{connect::HttpConnector, Client},
    yup_oauth2::{read_service_account_key, ServiceAccountAuthenticator},
    CalendarHub,
};
use hyper_util::rt::TokioExecutor;
use rendezvous_config::GcalConfig;
use std::path::Path;
use tracing::info;

pub type HubType = CalendarHub<HttpsConnector<HttpConnector>>;

/// Authenticates with the key file at `key_path` and builds a TLS-only client.
pub async fn create_calendar_hub(config: &GcalConfig) -> Result<HubType, GcalError> {
    let key_path = config
        .key_path
        .as_deref()
        .filter(|path| !path.trim().is_empty())
        .ok_or_else(|| GcalError::Config("key_path is missing".to_string()))?;

    let key = read_service_account_key(Path::new(key_path))
        .await
        .map_err(|e| GcalError::Config(format!("cannot read key file {}: {}", key_path, e)))?;
    let client_email = key.client_email.clone();
    let authenticator = ServiceAccountAuthenticator::builder(key)
        .build()
        .await
        .map_err(|e| GcalError::Config(format!("service account rejected: {}", e)))?;

    let connector = HttpsConnectorBuilder::new()
        .with_native_roots()
        .map_err(|e| GcalError::Config(format!("no native TLS roots: {}", e)))?
        .https_only()
        .enable_http1()
        .build();
    let client = Client::builder(TokioExecutor::new()).build(connector);

    info!(account = %client_email, "Google Calendar service account loaded");
    Ok(CalendarHub::new(client, authenticator))
}
