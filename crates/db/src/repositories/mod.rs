//! Database repositories.

pub mod category;
pub mod complaint;
pub mod department;
pub mod profile;
pub mod user;

pub use category::CategoryRepository;
pub use complaint::ComplaintRepository;
pub use department::DepartmentRepository;
pub use profile::ProfileRepository;
pub use user::UserRepository;
