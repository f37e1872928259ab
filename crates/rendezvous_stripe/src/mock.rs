use crate::error::StripeError;
use rendezvous_common::services::{
    BoxFuture, CheckoutRequest, CheckoutSession, CheckoutSessionStatus, PaymentService,
};
use std::collections::HashMap;
use std::sync::Mutex;

/// Keeps checkout sessions in memory; `mark_paid` plays the customer.
#[derive(Default)]
pub struct MockPayments {
    sessions: Mutex<HashMap<String, (CheckoutRequest, String)>>,
}

impl MockPayments {
    pub fn mark_paid(&self, session_id: &str) {
        if let Some(entry) = self.lock().get_mut(session_id) {
            entry.1 = "paid".to_string();
        }
    }

    pub fn request(&self, session_id: &str) -> Option<CheckoutRequest> {
        self.lock().get(session_id).map(|(request, _)| request.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, (CheckoutRequest, String)>> {
        self.sessions.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl PaymentService for MockPayments {
    type Error = StripeError;

    fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> BoxFuture<'_, CheckoutSession, Self::Error> {
        Box::pin(async move {
            let mut sessions = self.lock();
            let session_id = format!("cs_test_{}", sessions.len() + 1);
            sessions.insert(session_id.clone(), (request, "unpaid".to_string()));
            Ok(CheckoutSession {
                url: format!("https://checkout.stripe.test/{}", session_id),
                session_id,
            })
        })
    }

    fn retrieve_checkout_session(
        &self,
        session_id: &str,
    ) -> BoxFuture<'_, CheckoutSessionStatus, Self::Error> {
        let session_id = session_id.to_string();
        Box::pin(async move {
            let sessions = self.lock();
            let (request, status) = sessions.get(&session_id).ok_or(StripeError::ApiError {
                status_code: 404,
                message: format!("No such checkout.session: {}", session_id),
            })?;
            Ok(CheckoutSessionStatus {
                session_id: session_id.clone(),
                payment_status: status.clone(),
                amount_total: Some(request.unit_amount * i64::from(request.quantity)),
                currency: Some(request.currency.clone()),
                customer_email: request.customer_email.clone(),
                metadata: request.metadata.clone(),
            })
        })
    }
}
