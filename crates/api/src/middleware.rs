//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use echocity_core::{
    AccountService, AdvisoryService, CategoryService, ComplaintService, DepartmentService,
    RoleResolver, UploadService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub account_service: AccountService,
    pub role_resolver: RoleResolver,
    pub complaint_service: ComplaintService,
    pub category_service: CategoryService,
    pub department_service: DepartmentService,
    pub advisory_service: AdvisoryService,
    pub upload_service: UploadService,
}

/// Authentication middleware.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // Try to extract token from header
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        match state.account_service.authenticate_by_token(token).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Bearer token did not resolve to a user");
            }
        }
    }

    next.run(req).await
}
