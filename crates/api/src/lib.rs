//! HTTP API layer for echocity.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: citizen and admin complaint APIs
//! - **Extractors**: authentication
//! - **Middleware**: bearer-token resolution, shared state
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
