//! Fitment Gateway HTTP Server
//!
//! Serves the upload form and the JSON analyse API.

pub mod analyse_api;
pub mod control_ui;
pub mod error;
pub mod health_api;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, start_server, GatewayState};
