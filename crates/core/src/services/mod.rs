//! Business logic services.

#![allow(missing_docs)]

pub mod account;
pub mod advisory;
pub mod category;
pub mod complaint;
pub mod department;
pub mod lifecycle;
pub mod role;
pub mod upload;

pub use account::{AccountService, SignUpInput, SignInInput, UpdateProfileInput};
pub use advisory::{
    AdvisoryClient, AdvisoryService, CategorySuggestion, GeminiClient, ImageAnalysis, UrlAnalysis,
    select_category,
};
pub use category::{CategoryService, CreateCategoryInput};
pub use complaint::{ComplaintService, ComplaintStats, CreateComplaintInput};
pub use department::{CreateDepartmentInput, DepartmentService, UpdateDepartmentInput};
pub use lifecycle::{Actor, TransitionKind, plan_transition};
pub use role::{AccessContext, RoleResolver};
pub use upload::{UploadService, UploadedImage};
