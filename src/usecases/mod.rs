//! Application use cases. Orchestrate domain logic via ports.

pub mod planner_service;

pub use planner_service::{PlannerService, PlannerSnapshot, SemesterGroup};
