//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{Course, DomainError};

/// Course catalog store. Supplies the course list; the application treats the
/// catalog as read-only and never writes back through this port.
#[async_trait::async_trait]
pub trait CatalogPort: Send + Sync {
    /// Load all catalog entries. Returned in storage order; callers sort for
    /// display. Records with invalid weights are rejected here, before the
    /// calculation core ever sees them.
    async fn load_courses(&self) -> Result<Vec<Course>, DomainError>;
}
