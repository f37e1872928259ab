// --- File: crates/rendezvous_common/src/lib.rs ---

pub mod error; // Error handling
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities
pub mod services; // Service abstractions

pub use error::{
    config_error, conflict, external_service_error, internal_error, unavailable,
    validation_error, HttpStatusCode, RendezvousError,
};

pub use http::{
    client::{create_client, HTTP_CLIENT},
    IntoHttpResponse,
};

pub use logging::{init, init_with_level};
