//! REST API over the backend services

pub mod error;
pub mod server;

pub use error::HttpError;
pub use server::{build_router, AppState};
