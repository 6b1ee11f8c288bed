//! Complaint service.
//!
//! Creation, listing, and lifecycle transitions of complaints. Transition
//! legality comes from [`lifecycle::plan_transition`]; this service only
//! resolves the actor, applies the plan, and keeps `resolved_at` honest.
//!
//! [`lifecycle::plan_transition`]: crate::services::lifecycle::plan_transition

use echocity_common::{AppError, AppResult, IdGenerator};
use echocity_db::{
    entities::{
        complaint,
        complaint::{ComplaintPriority, ComplaintStatus},
    },
    repositories::{CategoryRepository, ComplaintRepository},
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::services::lifecycle::{Actor, TransitionKind, plan_transition};

/// Complaint service for business logic.
#[derive(Clone)]
pub struct ComplaintService {
    complaint_repo: ComplaintRepository,
    category_repo: CategoryRepository,
    id_gen: IdGenerator,
}

/// Input for filing a new complaint.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateComplaintInput {
    #[validate(length(min = 1, max = 256))]
    pub title: String,

    #[validate(length(min = 1, max = 8192))]
    pub description: String,

    #[validate(length(min = 1, max = 32))]
    pub category_id: String,

    pub priority: Option<ComplaintPriority>,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    #[validate(length(min = 1, max = 2048))]
    pub address: String,

    #[validate(length(max = 10))]
    pub image_urls: Vec<String>,
}

/// Aggregate complaint counts for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct ComplaintStats {
    pub total: u64,
    pub pending: u64,
    pub approved: u64,
    pub in_progress: u64,
    pub pending_verification: u64,
    pub resolved: u64,
    pub rejected: u64,
    pub reopened: u64,
}

impl ComplaintService {
    /// Create a new complaint service.
    #[must_use]
    pub fn new(complaint_repo: ComplaintRepository, category_repo: CategoryRepository) -> Self {
        Self {
            complaint_repo,
            category_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// File a new complaint.
    ///
    /// The department is derived from the category; a second complaint
    /// with the same title by the same user is rejected as a duplicate.
    pub async fn create(
        &self,
        user_id: &str,
        input: CreateComplaintInput,
    ) -> AppResult<complaint::Model> {
        input.validate()?;

        if self
            .complaint_repo
            .exists_by_user_and_title(user_id, &input.title)
            .await?
        {
            return Err(AppError::Conflict(
                "You have already filed a complaint with this title".to_string(),
            ));
        }

        let category = self.category_repo.get_by_id(&input.category_id).await?;

        let model = complaint::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            title: Set(input.title),
            description: Set(input.description),
            status: Set(ComplaintStatus::Pending),
            priority: Set(input.priority.unwrap_or_default()),
            category_id: Set(category.id),
            department_id: Set(category.department_id),
            latitude: Set(input.latitude),
            longitude: Set(input.longitude),
            address: Set(input.address),
            image_urls: Set(serde_json::json!(input.image_urls)),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        let created = self.complaint_repo.create(model).await?;

        info!(complaint_id = %created.id, user_id = %user_id, "Complaint filed");

        Ok(created)
    }

    /// Get a complaint by ID.
    pub async fn get(&self, id: &str) -> AppResult<complaint::Model> {
        self.complaint_repo.get_by_id(id).await
    }

    /// Get a complaint, enforcing that the caller may view it.
    pub async fn get_for_viewer(
        &self,
        id: &str,
        viewer_id: &str,
        viewer_is_admin: bool,
    ) -> AppResult<complaint::Model> {
        let complaint = self.complaint_repo.get_by_id(id).await?;
        if !viewer_is_admin && complaint.user_id != viewer_id {
            return Err(AppError::Forbidden(
                "You may only view your own complaints".to_string(),
            ));
        }
        Ok(complaint)
    }

    /// List a user's own complaints, newest first.
    pub async fn list_for_user(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<complaint::Model>> {
        self.complaint_repo.find_by_user(user_id, limit, offset).await
    }

    /// List all complaints for triage, optionally filtered by status.
    pub async fn list_all(
        &self,
        status: Option<ComplaintStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<complaint::Model>> {
        self.complaint_repo.find_all(status, limit, offset).await
    }

    /// Apply a status transition as the given actor.
    ///
    /// A repeated transition to the current status is a no-op success, so
    /// two admins racing on the same record do not double-fire effects or
    /// churn `resolved_at`.
    pub async fn transition(
        &self,
        id: &str,
        target: ComplaintStatus,
        actor_id: &str,
        actor_is_admin: bool,
    ) -> AppResult<complaint::Model> {
        let complaint = self.complaint_repo.get_by_id(id).await?;

        let actor = if actor_is_admin {
            Actor::Admin
        } else if complaint.user_id == actor_id {
            Actor::Owner
        } else {
            Actor::Other
        };

        match plan_transition(complaint.status, target, actor) {
            Ok(TransitionKind::NoOp) => Ok(complaint),
            Ok(TransitionKind::Apply) => {
                let from = complaint.status;
                let updated = self
                    .complaint_repo
                    .update(transition_model(complaint, target))
                    .await?;

                info!(
                    complaint_id = %id,
                    from = from.as_str(),
                    to = target.as_str(),
                    actor_id = %actor_id,
                    "Complaint status changed"
                );

                Ok(updated)
            }
            Err(reason) => Err(AppError::Validation(reason)),
        }
    }

    /// Dispute a resolved complaint as its owner.
    pub async fn dispute(&self, id: &str, owner_id: &str) -> AppResult<complaint::Model> {
        self.transition(id, ComplaintStatus::PendingVerification, owner_id, false)
            .await
    }

    /// Aggregate counts per status.
    pub async fn stats(&self) -> AppResult<ComplaintStats> {
        Ok(ComplaintStats {
            total: self.complaint_repo.count().await?,
            pending: self.complaint_repo.count_by_status(ComplaintStatus::Pending).await?,
            approved: self.complaint_repo.count_by_status(ComplaintStatus::Approved).await?,
            in_progress: self
                .complaint_repo
                .count_by_status(ComplaintStatus::InProgress)
                .await?,
            pending_verification: self
                .complaint_repo
                .count_by_status(ComplaintStatus::PendingVerification)
                .await?,
            resolved: self.complaint_repo.count_by_status(ComplaintStatus::Resolved).await?,
            rejected: self.complaint_repo.count_by_status(ComplaintStatus::Rejected).await?,
            reopened: self.complaint_repo.count_by_status(ComplaintStatus::Reopened).await?,
        })
    }
}

/// Build the update for a planned transition.
///
/// `resolved_at` tracks the resolved state exactly: set when entering it,
/// cleared when leaving it, untouched otherwise.
fn transition_model(complaint: complaint::Model, target: ComplaintStatus) -> complaint::ActiveModel {
    let from = complaint.status;
    let mut active: complaint::ActiveModel = complaint.into();
    active.status = Set(target);
    active.updated_at = Set(Some(chrono::Utc::now().into()));

    if target == ComplaintStatus::Resolved {
        active.resolved_at = Set(Some(chrono::Utc::now().into()));
    } else if from == ComplaintStatus::Resolved {
        active.resolved_at = Set(None);
    }

    active
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_complaint(
        id: &str,
        user_id: &str,
        status: ComplaintStatus,
    ) -> complaint::Model {
        complaint::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            title: "Pothole on FC Road".to_string(),
            description: "Deep pothole near the signal".to_string(),
            status,
            priority: ComplaintPriority::Medium,
            category_id: "cat1".to_string(),
            department_id: "dep1".to_string(),
            latitude: 18.52,
            longitude: 73.85,
            address: "FC Road, Pune".to_string(),
            image_urls: serde_json::json!([]),
            created_at: Utc::now().into(),
            updated_at: None,
            resolved_at: match status {
                ComplaintStatus::Resolved => Some(Utc::now().into()),
                _ => None,
            },
        }
    }

    fn create_test_service(
        complaint_db: Arc<sea_orm::DatabaseConnection>,
        category_db: Arc<sea_orm::DatabaseConnection>,
    ) -> ComplaintService {
        ComplaintService::new(
            ComplaintRepository::new(complaint_db),
            CategoryRepository::new(category_db),
        )
    }

    #[tokio::test]
    async fn test_duplicate_title_rejected() {
        // Count query says a complaint with this title already exists.
        let complaint_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(1))
                }]])
                .into_connection(),
        );
        let category_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(complaint_db, category_db);

        let input = CreateComplaintInput {
            title: "Broken streetlight".to_string(),
            description: "The light is out".to_string(),
            category_id: "cat1".to_string(),
            priority: None,
            latitude: 18.52,
            longitude: 73.85,
            address: "FC Road".to_string(),
            image_urls: vec![],
        };

        let result = service.create("user1", input).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_input_validation() {
        let input = CreateComplaintInput {
            title: String::new(),
            description: "x".to_string(),
            category_id: "cat1".to_string(),
            priority: None,
            latitude: 120.0, // out of range
            longitude: 73.85,
            address: "FC Road".to_string(),
            image_urls: vec![],
        };
        assert!(input.validate().is_err());
    }

    #[tokio::test]
    async fn test_admin_approves_pending() {
        let pending = create_test_complaint("c1", "user1", ComplaintStatus::Pending);
        let mut approved = pending.clone();
        approved.status = ComplaintStatus::Approved;

        let complaint_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[pending]])
                .append_query_results([[approved]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let category_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(complaint_db, category_db);

        let result = service
            .transition("c1", ComplaintStatus::Approved, "admin1", true)
            .await
            .unwrap();
        assert_eq!(result.status, ComplaintStatus::Approved);
    }

    #[tokio::test]
    async fn test_pending_to_resolved_rejected_without_mutation() {
        let pending = create_test_complaint("c1", "user1", ComplaintStatus::Pending);

        // Only the fetch is queued; a write would fail the mock.
        let complaint_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[pending]])
                .into_connection(),
        );
        let category_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(complaint_db, category_db);

        let result = service
            .transition("c1", ComplaintStatus::Resolved, "admin1", true)
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_transition_to_current_status_is_noop() {
        let approved = create_test_complaint("c1", "user1", ComplaintStatus::Approved);

        let complaint_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[approved.clone()]])
                .into_connection(),
        );
        let category_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(complaint_db, category_db);

        // No update queued in the mock: a write would error, a no-op won't.
        let result = service
            .transition("c1", ComplaintStatus::Approved, "admin1", true)
            .await
            .unwrap();
        assert_eq!(result.status, ComplaintStatus::Approved);
        assert_eq!(result.id, approved.id);
    }

    #[tokio::test]
    async fn test_non_admin_cannot_transition() {
        let pending = create_test_complaint("c1", "user1", ComplaintStatus::Pending);

        let complaint_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[pending]])
                .into_connection(),
        );
        let category_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(complaint_db, category_db);

        let result = service
            .transition("c1", ComplaintStatus::Approved, "user2", false)
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_owner_disputes_resolution() {
        let resolved = create_test_complaint("c1", "user1", ComplaintStatus::Resolved);
        let mut disputed = resolved.clone();
        disputed.status = ComplaintStatus::PendingVerification;
        disputed.resolved_at = None;

        let complaint_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[resolved]])
                .append_query_results([[disputed]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let category_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(complaint_db, category_db);

        let result = service.dispute("c1", "user1").await.unwrap();
        assert_eq!(result.status, ComplaintStatus::PendingVerification);
        assert!(result.resolved_at.is_none());
    }

    #[test]
    fn test_entering_resolved_sets_resolved_at() {
        let in_progress = create_test_complaint("c1", "user1", ComplaintStatus::InProgress);
        let active = transition_model(in_progress, ComplaintStatus::Resolved);
        assert!(matches!(active.status, sea_orm::ActiveValue::Set(ComplaintStatus::Resolved)));
        assert!(matches!(active.resolved_at, sea_orm::ActiveValue::Set(Some(_))));
    }

    #[test]
    fn test_leaving_resolved_clears_resolved_at() {
        let resolved = create_test_complaint("c1", "user1", ComplaintStatus::Resolved);
        let active = transition_model(resolved, ComplaintStatus::PendingVerification);
        assert!(matches!(active.resolved_at, sea_orm::ActiveValue::Set(None)));
    }

    #[test]
    fn test_other_transitions_leave_resolved_at_untouched() {
        let pending = create_test_complaint("c1", "user1", ComplaintStatus::Pending);
        let active = transition_model(pending, ComplaintStatus::Approved);
        assert!(matches!(active.resolved_at, sea_orm::ActiveValue::Unchanged(None)));
    }

    #[tokio::test]
    async fn test_stranger_cannot_dispute() {
        let resolved = create_test_complaint("c1", "user1", ComplaintStatus::Resolved);

        let complaint_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[resolved]])
                .into_connection(),
        );
        let category_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(complaint_db, category_db);

        let result = service.dispute("c1", "user2").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_stranger_dispute_of_disputed_complaint_rejected() {
        // Already in the dispute target state; a stranger must still get
        // an error, not the record back as a no-op.
        let disputed = create_test_complaint("c1", "user1", ComplaintStatus::PendingVerification);

        let complaint_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[disputed]])
                .into_connection(),
        );
        let category_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(complaint_db, category_db);

        let result = service.dispute("c1", "user2").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_for_viewer_enforces_ownership() {
        let complaint = create_test_complaint("c1", "user1", ComplaintStatus::Pending);

        let complaint_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[complaint.clone()], [complaint.clone()], [complaint]])
                .into_connection(),
        );
        let category_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = create_test_service(complaint_db, category_db);

        // Owner sees it
        assert!(service.get_for_viewer("c1", "user1", false).await.is_ok());
        // Admin sees it
        assert!(service.get_for_viewer("c1", "admin1", true).await.is_ok());
        // Stranger does not
        let result = service.get_for_viewer("c1", "user2", false).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
