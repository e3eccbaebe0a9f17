//! API endpoint handlers, one module per resource.

pub mod analytics;
pub mod assistant;
pub mod chronic;
pub mod dashboard;
pub mod health;
pub mod patients;
pub mod regions;
pub mod session;
