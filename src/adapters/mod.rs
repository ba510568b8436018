//! Infrastructure adapters. Implement outbound ports.
//!
//! Catalog stores and the terminal UI. Map errors to DomainError.

pub mod persistence;
pub mod ui;
