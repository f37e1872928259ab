#![cfg(feature = "openapi")]
use crate::handlers::{ContactRequest, ContactResponse};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(crate::handlers::contact_handler),
    components(schemas(ContactRequest, ContactResponse)),
    tags((name = "Mail", description = "Contact form"))
)]
pub struct MailApiDoc;
