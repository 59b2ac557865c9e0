pub mod deliverable_dto;
pub mod deliverable_handlers;
pub mod deliverable_models;
pub mod deliverable_repository;
pub mod deliverable_service;

pub use deliverable_models::{Deliverable, DeliverableStatus};
pub use deliverable_repository::DeliverableRepository;
