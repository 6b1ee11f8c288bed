//! Role resolution.
//!
//! Admin privilege is looked up from the profile row on the server, never
//! taken from client input. Lookups are bounded by a timeout and fail
//! closed: a missing row, a database error, or a slow query all resolve
//! to non-admin instead of blocking the request or granting access.

use std::time::Duration;

use echocity_common::{AppError, AppResult, Config};
use echocity_db::{entities::profile::AppRole, repositories::ProfileRepository};
use tracing::warn;

/// Resolved access level for a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessContext {
    /// The user the context was resolved for.
    pub user_id: String,
    /// Whether the profile row carries the admin role.
    pub is_admin: bool,
}

/// Resolves admin privilege from profile rows.
#[derive(Clone)]
pub struct RoleResolver {
    profile_repo: ProfileRepository,
    timeout: Duration,
}

impl RoleResolver {
    /// Create a new role resolver.
    #[must_use]
    pub fn new(profile_repo: ProfileRepository, config: &Config) -> Self {
        Self {
            profile_repo,
            timeout: Duration::from_secs(config.auth.role_check_timeout_secs),
        }
    }

    /// Create a resolver with an explicit timeout.
    #[must_use]
    pub const fn with_timeout(profile_repo: ProfileRepository, timeout: Duration) -> Self {
        Self {
            profile_repo,
            timeout,
        }
    }

    /// Resolve the access context for a user.
    ///
    /// Never fails: any lookup problem resolves to `is_admin = false`.
    pub async fn resolve(&self, user_id: &str) -> AccessContext {
        let is_admin = match tokio::time::timeout(
            self.timeout,
            self.profile_repo.find_by_user_id(user_id),
        )
        .await
        {
            Ok(Ok(Some(profile))) => profile.role == AppRole::Admin,
            Ok(Ok(None)) => false,
            Ok(Err(e)) => {
                warn!(user_id = %user_id, error = %e, "Role lookup failed; treating as non-admin");
                false
            }
            Err(_) => {
                warn!(user_id = %user_id, "Role lookup timed out; treating as non-admin");
                false
            }
        };

        AccessContext {
            user_id: user_id.to_string(),
            is_admin,
        }
    }

    /// Resolve and require the admin role.
    pub async fn require_admin(&self, user_id: &str) -> AppResult<AccessContext> {
        let ctx = self.resolve(user_id).await;
        if ctx.is_admin {
            Ok(ctx)
        } else {
            Err(AppError::Forbidden("Admin access required".to_string()))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use echocity_db::entities::profile;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_profile(user_id: &str, role: AppRole) -> profile::Model {
        profile::Model {
            user_id: user_id.to_string(),
            password: None,
            full_name: "Test Citizen".to_string(),
            phone: None,
            address: None,
            city: "Pune".to_string(),
            state: "Maharashtra".to_string(),
            pincode: None,
            role,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_resolver(db: Arc<sea_orm::DatabaseConnection>) -> RoleResolver {
        RoleResolver::with_timeout(ProfileRepository::new(db), Duration::from_secs(3))
    }

    #[tokio::test]
    async fn test_resolve_admin() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_profile("user1", AppRole::Admin)]])
                .into_connection(),
        );

        let resolver = create_resolver(db);
        let ctx = resolver.resolve("user1").await;

        assert!(ctx.is_admin);
        assert_eq!(ctx.user_id, "user1");
    }

    #[tokio::test]
    async fn test_resolve_citizen() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_profile("user1", AppRole::Citizen)]])
                .into_connection(),
        );

        let resolver = create_resolver(db);
        let ctx = resolver.resolve("user1").await;

        assert!(!ctx.is_admin);
    }

    #[tokio::test]
    async fn test_missing_profile_resolves_non_admin() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<profile::Model>::new()])
                .into_connection(),
        );

        let resolver = create_resolver(db);
        let ctx = resolver.resolve("user1").await;

        assert!(!ctx.is_admin);
    }

    #[tokio::test]
    async fn test_lookup_error_resolves_non_admin() {
        // No results queued: the mock returns an error instead of a row.
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let resolver = create_resolver(db);
        let ctx = resolver.resolve("user1").await;

        assert!(!ctx.is_admin);
    }

    #[tokio::test]
    async fn test_require_admin_rejects_citizen() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_profile("user1", AppRole::Citizen)]])
                .into_connection(),
        );

        let resolver = create_resolver(db);
        let result = resolver.require_admin("user1").await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_require_admin_accepts_admin() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_profile("user1", AppRole::Admin)]])
                .into_connection(),
        );

        let resolver = create_resolver(db);
        let result = resolver.require_admin("user1").await;

        assert!(result.is_ok());
    }
}
