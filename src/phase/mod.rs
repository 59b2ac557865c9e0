pub mod phase_handlers;
pub mod phase_models;
pub mod phase_repository;

pub use phase_models::{PhaseStatus, ProjectPhase};
pub use phase_repository::PhaseRepository;
