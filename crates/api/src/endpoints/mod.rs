//! API endpoints.

mod admin;
mod advisory;
mod auth;
mod categories;
mod complaints;
mod departments;
mod profiles;
mod uploads;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .nest("/i", profiles::router())
        .nest("/complaints", complaints::router())
        .nest("/categories", categories::router())
        .nest("/departments", departments::router())
        .nest("/advisory", advisory::router())
        .nest("/uploads", uploads::router())
        .nest("/admin", admin::router())
}
