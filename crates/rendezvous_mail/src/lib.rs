pub mod doc;
pub mod error;
pub mod handlers;
pub mod messages;
#[cfg(test)]
mod messages_test;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod routes;
pub mod service;

pub use error::MailError;
pub use handlers::{ContactRequest, MailState};
pub use routes::routes;
pub use service::{MailNotificationService, SharedNotifier};
