//! Core business logic for echocity.

pub mod services;

pub use services::*;
