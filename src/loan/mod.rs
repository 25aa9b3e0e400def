//! Loan domain module
//!
//! Contains models, storage backends, and the lifecycle service for loans and
//! the lender profiles they reference.

mod memory_store;
mod model;
mod pg_store;
mod service;
mod store;

pub use memory_store::InMemoryStore;
pub use model::*;
pub use pg_store::{PgLenderStore, PgLoanStore};
pub use service::{Clock, LifecycleError, LifecycleService, Operation};
pub use store::{LenderStore, LoanStore, StoreError};
