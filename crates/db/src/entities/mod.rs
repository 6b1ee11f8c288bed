//! Database entities.

pub mod category;
pub mod complaint;
pub mod department;
pub mod profile;
pub mod user;

pub use category::Entity as Category;
pub use complaint::Entity as Complaint;
pub use department::Entity as Department;
pub use profile::Entity as Profile;
pub use user::Entity as User;
