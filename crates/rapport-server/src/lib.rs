//! Rapport server: HTTP routes and engine selection.

pub mod engine;
pub mod routes;
pub mod state;

pub use engine::Engine;
pub use routes::build_router;
pub use state::AppState;
