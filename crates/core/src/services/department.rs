//! Department service.

use echocity_common::{AppError, AppResult, IdGenerator};
use echocity_db::{entities::department, repositories::DepartmentRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Department service for business logic.
#[derive(Clone)]
pub struct DepartmentService {
    department_repo: DepartmentRepository,
    id_gen: IdGenerator,
}

/// Input for creating a department.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDepartmentInput {
    #[validate(length(min = 1, max = 256))]
    pub name: String,

    #[validate(length(max = 2048))]
    pub description: Option<String>,
}

/// Input for updating a department.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDepartmentInput {
    #[validate(length(min = 1, max = 256))]
    pub name: Option<String>,

    #[validate(length(max = 2048))]
    pub description: Option<String>,
}

impl DepartmentService {
    /// Create a new department service.
    #[must_use]
    pub fn new(department_repo: DepartmentRepository) -> Self {
        Self {
            department_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// List all departments.
    pub async fn list(&self) -> AppResult<Vec<department::Model>> {
        self.department_repo.find_all().await
    }

    /// Get a department by ID.
    pub async fn get(&self, id: &str) -> AppResult<department::Model> {
        self.department_repo.get_by_id(id).await
    }

    /// Create a department.
    pub async fn create(&self, input: CreateDepartmentInput) -> AppResult<department::Model> {
        input.validate()?;

        if self.department_repo.find_by_name(&input.name).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Department already exists: {}",
                input.name
            )));
        }

        let model = department::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            description: Set(input.description),
        };

        self.department_repo.create(model).await
    }

    /// Update a department's name or description.
    pub async fn update(
        &self,
        id: &str,
        input: UpdateDepartmentInput,
    ) -> AppResult<department::Model> {
        input.validate()?;

        let existing = self.department_repo.get_by_id(id).await?;
        let mut active: department::ActiveModel = existing.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }

        self.department_repo.update(active).await
    }

    /// Delete a department.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.department_repo.get_by_id(id).await?;
        self.department_repo.delete(id).await
    }
}
