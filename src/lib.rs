pub mod auth;
pub mod db;
pub mod deliverable;
pub mod email;
pub mod error;
pub mod middleware;
pub mod notification;
pub mod phase;
pub mod profile;
pub mod routes;
pub mod state;
