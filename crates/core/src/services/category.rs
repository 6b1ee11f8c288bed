//! Category service.

use echocity_common::{AppError, AppResult, IdGenerator};
use echocity_db::{entities::category, repositories::CategoryRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Category service for business logic.
#[derive(Clone)]
pub struct CategoryService {
    category_repo: CategoryRepository,
    id_gen: IdGenerator,
}

/// Input for creating a category.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryInput {
    #[validate(length(min = 1, max = 256))]
    pub name: String,

    #[validate(length(min = 1, max = 64))]
    pub icon: String,

    #[validate(length(min = 1, max = 32))]
    pub department_id: String,
}

impl CategoryService {
    /// Create a new category service.
    #[must_use]
    pub fn new(category_repo: CategoryRepository) -> Self {
        Self {
            category_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// List all categories.
    pub async fn list(&self) -> AppResult<Vec<category::Model>> {
        self.category_repo.find_all().await
    }

    /// List categories for a department.
    pub async fn list_for_department(&self, department_id: &str) -> AppResult<Vec<category::Model>> {
        self.category_repo.find_by_department(department_id).await
    }

    /// Get a category by ID.
    pub async fn get(&self, id: &str) -> AppResult<category::Model> {
        self.category_repo.get_by_id(id).await
    }

    /// Create a category.
    pub async fn create(&self, input: CreateCategoryInput) -> AppResult<category::Model> {
        input.validate()?;

        if self.category_repo.find_by_name(&input.name).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Category already exists: {}",
                input.name
            )));
        }

        let model = category::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            icon: Set(input.icon),
            department_id: Set(input.department_id),
        };

        self.category_repo.create(model).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn potholes() -> category::Model {
        category::Model {
            id: "cat1".to_string(),
            name: "Potholes".to_string(),
            icon: "road".to_string(),
            department_id: "dep1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_duplicate_name_rejected() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[potholes()]])
                .into_connection(),
        );
        let service = CategoryService::new(CategoryRepository::new(db));

        let result = service
            .create(CreateCategoryInput {
                name: "Potholes".to_string(),
                icon: "road".to_string(),
                department_id: "dep1".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }
}
