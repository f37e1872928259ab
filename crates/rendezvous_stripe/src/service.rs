use crate::error::StripeError;
use rendezvous_common::services::{
    BoxFuture, CheckoutRequest, CheckoutSession, CheckoutSessionStatus, PaymentService,
};
use rendezvous_common::HTTP_CLIENT;
use rendezvous_config::StripeConfig;
use reqwest::{Client, Response};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info};

pub const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

pub type SharedPayments = Arc<dyn PaymentService<Error = StripeError>>;

/// Checkout session as returned by the Stripe API.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeSessionObject {
    pub id: String,
    pub url: Option<String>,
    #[serde(default)]
    pub payment_status: String,
    pub amount_total: Option<i64>,
    pub currency: Option<String>,
    pub customer_email: Option<String>,
    pub customer_details: Option<StripeCustomerDetails>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeCustomerDetails {
    pub email: Option<String>,
}

impl From<StripeSessionObject> for CheckoutSessionStatus {
    fn from(session: StripeSessionObject) -> Self {
        let customer_email = session
            .customer_email
            .or_else(|| session.customer_details.and_then(|d| d.email));
        CheckoutSessionStatus {
            session_id: session.id,
            payment_status: session.payment_status,
            amount_total: session.amount_total,
            currency: session.currency,
            customer_email,
            metadata: session.metadata,
        }
    }
}

/// Form fields of a `POST /v1/checkout/sessions` call.
pub fn checkout_form(config: &StripeConfig, request: &CheckoutRequest) -> Vec<(String, String)> {
    let mut form: Vec<(String, String)> = vec![
        ("mode".into(), "payment".into()),
        ("payment_method_types[]".into(), "card".into()),
        ("success_url".into(), config.success_url.clone()),
        ("cancel_url".into(), config.cancel_url.clone()),
        (
            "line_items[0][price_data][currency]".into(),
            request.currency.to_lowercase(),
        ),
        (
            "line_items[0][price_data][product_data][name]".into(),
            request.product_name.clone(),
        ),
        (
            "line_items[0][price_data][unit_amount]".into(),
            request.unit_amount.to_string(),
        ),
        ("line_items[0][quantity]".into(), request.quantity.to_string()),
    ];
    if let Some(description) = &request.description {
        form.push((
            "line_items[0][price_data][product_data][description]".into(),
            description.clone(),
        ));
    }
    if let Some(email) = &request.customer_email {
        form.push(("customer_email".into(), email.clone()));
    }
    for (key, value) in &request.metadata {
        form.push((format!("metadata[{}]", key), value.clone()));
    }
    form
}

/// Stripe Checkout over the REST API, authenticated with the secret key.
pub struct StripePaymentService {
    config: StripeConfig,
    client: Client,
    api_base: String,
}

impl StripePaymentService {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            client: HTTP_CLIENT.clone(),
            api_base: STRIPE_API_BASE.to_string(),
        }
    }

    fn secret_key(&self) -> Result<&str, StripeError> {
        self.config
            .secret_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(StripeError::ConfigError)
    }

    async fn read_session(response: Response) -> Result<StripeSessionObject, StripeError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            error!(status = status.as_u16(), body = %body, "Stripe API error");
            return Err(StripeError::ApiError {
                status_code: status.as_u16(),
                message: body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn create(&self, request: CheckoutRequest) -> Result<CheckoutSession, StripeError> {
        let key = self.secret_key()?;
        let form = checkout_form(&self.config, &request);
        let response = self
            .client
            .post(format!("{}/checkout/sessions", self.api_base))
            .basic_auth(key, None::<&str>)
            .form(&form)
            .send()
            .await?;
        let session = Self::read_session(response).await?;
        let url = session.url.ok_or_else(|| StripeError::ApiError {
            status_code: 502,
            message: "checkout session without url".to_string(),
        })?;
        info!(session_id = %session.id, "Stripe checkout session created");
        Ok(CheckoutSession {
            session_id: session.id,
            url,
        })
    }

    async fn retrieve(&self, session_id: String) -> Result<CheckoutSessionStatus, StripeError> {
        let key = self.secret_key()?;
        let response = self
            .client
            .get(format!("{}/checkout/sessions/{}", self.api_base, session_id))
            .basic_auth(key, None::<&str>)
            .send()
            .await?;
        Ok(Self::read_session(response).await?.into())
    }
}

impl PaymentService for StripePaymentService {
    type Error = StripeError;

    fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> BoxFuture<'_, CheckoutSession, Self::Error> {
        Box::pin(self.create(request))
    }

    fn retrieve_checkout_session(
        &self,
        session_id: &str,
    ) -> BoxFuture<'_, CheckoutSessionStatus, Self::Error> {
        Box::pin(self.retrieve(session_id.to_string()))
    }
}
