pub mod app;
pub mod app_state;

pub use app::build_router;
pub use app_state::{AppState, Services};
