pub mod profile_handlers;
pub mod profile_models;
pub mod profile_repository;

pub use profile_models::Profile;
pub use profile_repository::ProfileRepository;
