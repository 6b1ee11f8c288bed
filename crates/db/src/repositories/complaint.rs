//! Complaint repository.

use std::sync::Arc;

use crate::entities::{Complaint, complaint, complaint::ComplaintStatus};
use echocity_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

/// Complaint repository for database operations.
#[derive(Clone)]
pub struct ComplaintRepository {
    db: Arc<DatabaseConnection>,
}

impl ComplaintRepository {
    /// Create a new complaint repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a complaint by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<complaint::Model>> {
        Complaint::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a complaint by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<complaint::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ComplaintNotFound(id.to_string()))
    }

    /// Check whether a user already filed a complaint with the given title.
    pub async fn exists_by_user_and_title(&self, user_id: &str, title: &str) -> AppResult<bool> {
        let count = Complaint::find()
            .filter(complaint::Column::UserId.eq(user_id))
            .filter(complaint::Column::Title.eq(title))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Create a new complaint.
    pub async fn create(&self, model: complaint::ActiveModel) -> AppResult<complaint::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a complaint.
    pub async fn update(&self, model: complaint::ActiveModel) -> AppResult<complaint::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a user's complaints, newest first (paginated).
    pub async fn find_by_user(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<complaint::Model>> {
        Complaint::find()
            .filter(complaint::Column::UserId.eq(user_id))
            .order_by_desc(complaint::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all complaints, newest first, optionally filtered by status (paginated).
    pub async fn find_all(
        &self,
        status: Option<ComplaintStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<complaint::Model>> {
        let mut query = Complaint::find();

        if let Some(s) = status {
            query = query.filter(complaint::Column::Status.eq(s));
        }

        query
            .order_by_desc(complaint::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count complaints with the given status.
    pub async fn count_by_status(&self, status: ComplaintStatus) -> AppResult<u64> {
        Complaint::find()
            .filter(complaint::Column::Status.eq(status))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all complaints.
    pub async fn count(&self) -> AppResult<u64> {
        Complaint::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::complaint::ComplaintPriority;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set};
    use std::sync::Arc;

    fn create_test_complaint(id: &str, user_id: &str, title: &str) -> complaint::Model {
        complaint::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            title: title.to_string(),
            description: "The road has a large pothole".to_string(),
            status: ComplaintStatus::Pending,
            priority: ComplaintPriority::Medium,
            category_id: "cat1".to_string(),
            department_id: "dep1".to_string(),
            latitude: 18.52,
            longitude: 73.85,
            address: "FC Road, Pune".to_string(),
            image_urls: serde_json::json!([]),
            created_at: Utc::now().into(),
            updated_at: None,
            resolved_at: None,
        }
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_returns_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<complaint::Model>::new()])
                .into_connection(),
        );

        let repo = ComplaintRepository::new(db);
        let result = repo.get_by_id("nonexistent").await;

        assert!(result.is_err());
        match result {
            Err(AppError::ComplaintNotFound(id)) => assert_eq!(id, "nonexistent"),
            _ => panic!("Expected ComplaintNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_exists_by_user_and_title() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(1))
                }]])
                .into_connection(),
        );

        let repo = ComplaintRepository::new(db);
        let result = repo
            .exists_by_user_and_title("user1", "Pothole on FC Road")
            .await
            .unwrap();

        assert!(result);
    }

    #[tokio::test]
    async fn test_exists_by_user_and_title_absent() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(0))
                }]])
                .into_connection(),
        );

        let repo = ComplaintRepository::new(db);
        let result = repo
            .exists_by_user_and_title("user1", "Pothole on FC Road")
            .await
            .unwrap();

        assert!(!result);
    }

    #[tokio::test]
    async fn test_create_complaint() {
        let complaint = create_test_complaint("c1", "user1", "Pothole on FC Road");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[complaint.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = ComplaintRepository::new(db);

        let active = complaint::ActiveModel {
            id: Set("c1".to_string()),
            user_id: Set("user1".to_string()),
            title: Set("Pothole on FC Road".to_string()),
            ..Default::default()
        };

        let result = repo.create(active).await.unwrap();
        assert_eq!(result.status, ComplaintStatus::Pending);
    }

    #[tokio::test]
    async fn test_find_by_user() {
        let c1 = create_test_complaint("c1", "user1", "Pothole on FC Road");
        let c2 = create_test_complaint("c2", "user1", "Broken street light");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[c1, c2]])
                .into_connection(),
        );

        let repo = ComplaintRepository::new(db);
        let result = repo.find_by_user("user1", 10, 0).await.unwrap();

        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_find_all_with_status_filter() {
        let c1 = create_test_complaint("c1", "user1", "Pothole on FC Road");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[c1]])
                .into_connection(),
        );

        let repo = ComplaintRepository::new(db);
        let result = repo
            .find_all(Some(ComplaintStatus::Pending), 10, 0)
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].status, ComplaintStatus::Pending);
    }

    #[tokio::test]
    async fn test_count_by_status() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(4))
                }]])
                .into_connection(),
        );

        let repo = ComplaintRepository::new(db);
        let count = repo.count_by_status(ComplaintStatus::Resolved).await.unwrap();

        assert_eq!(count, 4);
    }
}
