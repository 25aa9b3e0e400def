//! API handlers

pub mod health;
pub mod loan;

pub use health::{health_check, root};
pub use loan::*;

// Re-export AuthenticatedUser from middleware for handler use
pub use crate::middleware::auth::AuthenticatedUser;
