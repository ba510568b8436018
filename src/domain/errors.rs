//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these. The calculation core itself
//! has no error paths; failures exist only at the I/O edges.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("Report error: {0}")]
    Report(String),
}
