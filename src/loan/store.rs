//! Persistence capabilities consumed by the lifecycle service

use async_trait::async_trait;
use sqlx::types::chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::model::{LenderProfile, LenderStatus, LoanRecord, LoanScope};

/// Storage-layer errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Loan record capabilities
#[async_trait]
pub trait LoanStore: Send + Sync {
    /// Earliest-created loan inside `scope`, if any.
    async fn find_one(&self, scope: &LoanScope) -> Result<Option<LoanRecord>, StoreError>;

    /// Persist the mutable fields of `loan`. Returns false if the row no longer exists.
    async fn update(&self, loan: &LoanRecord) -> Result<bool, StoreError>;

    /// Returns false if nothing was deleted.
    async fn delete_one(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Remove every loan inside `scope`, returning how many were removed.
    async fn delete_many(&self, scope: &LoanScope) -> Result<u64, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

/// Lender profile capabilities
#[async_trait]
pub trait LenderStore: Send + Sync {
    /// Set status and closed date on the profile with `lender_id`, whoever added it.
    async fn update_status(
        &self,
        lender_id: &str,
        status: LenderStatus,
        closed_date: Option<DateTime<Utc>>,
    ) -> Result<Option<LenderProfile>, StoreError>;

    /// Delete the profile with `lender_id` only if it was added by `added_by`.
    async fn delete_one(
        &self,
        lender_id: &str,
        added_by: Uuid,
    ) -> Result<Option<LenderProfile>, StoreError>;
}
