//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod aggregate;
pub mod entities;
pub mod errors;
pub mod retake;

pub use aggregate::{CalculationDetail, GradeAggregate};
pub use entities::{Course, CourseId, GradeSelection, SpecialWeighting, WeightMode};
pub use errors::DomainError;
pub use retake::{RetakeCandidate, RetakeTuning};
