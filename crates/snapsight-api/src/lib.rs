//! Snapsight API Library
//!
//! HTTP entry point for image uploads, application setup, and the in-process analysis worker.

mod handlers;
mod telemetry;

pub mod error;
pub mod services;
pub mod setup;
pub mod state;

pub use error::HttpAppError;
pub use services::ingress::{Accepted, IngressHandler};
pub use state::AppState;
