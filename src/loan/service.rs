//! Loan lifecycle service - ownership-scoped transitions for loans and lenders
//!
//! Every operation starts from the loan matched by `{lender_id, borrowed_by = caller}`.
//! A loan outside the caller's scope is reported exactly like a missing one.
//!
//! Writes are sequential and independent: the loan is written first, then the
//! lender profile. Nothing is rolled back if the second write fails.

use std::{fmt, sync::Arc};

use sqlx::types::chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::model::{DeletedProfile, LoanRecord, LoanScope, ProfileStatus};
use super::store::{LenderStore, LoanStore, StoreError};

/// Source of "now" for stamping dates
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// The operations exposed by [`LifecycleService`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    DeleteTransaction,
    StopInterest,
    CloseProfile,
    DeleteProfile,
    ReopenProfile,
    ProfileStatus,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::DeleteTransaction => "delete_transaction",
            Operation::StopInterest => "stop_interest",
            Operation::CloseProfile => "close_profile",
            Operation::DeleteProfile => "delete_profile",
            Operation::ReopenProfile => "reopen_profile",
            Operation::ProfileStatus => "profile_status",
        }
    }

    /// Message reported when no loan matches the caller's scope
    pub fn not_found_message(&self) -> &'static str {
        match self {
            Operation::DeleteTransaction => {
                "Loan not found or you do not have permission to delete this transaction"
            }
            Operation::StopInterest => {
                "Loan not found or you do not have permission to modify this loan"
            }
            Operation::CloseProfile => {
                "Loan not found or you do not have permission to close this profile"
            }
            Operation::DeleteProfile => {
                "Loan not found or you do not have permission to delete this profile"
            }
            Operation::ReopenProfile => {
                "Loan not found or you do not have permission to reopen this profile"
            }
            Operation::ProfileStatus => "Loan not found",
        }
    }

    /// Message reported when storage fails mid-operation
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::DeleteTransaction => "Error deleting transaction",
            Operation::StopInterest => "Error stopping interest",
            Operation::CloseProfile => "Error closing profile",
            Operation::DeleteProfile => "Error deleting profile",
            Operation::ReopenProfile => "Error reopening profile",
            Operation::ProfileStatus => "Error fetching profile status",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            Operation::DeleteTransaction => "Transaction deleted successfully",
            Operation::StopInterest => "Interest stopped successfully",
            Operation::CloseProfile => "Profile closed successfully",
            Operation::DeleteProfile => "Profile and all associated data deleted successfully",
            Operation::ReopenProfile => "Profile reopened successfully",
            Operation::ProfileStatus => "Profile status retrieved successfully",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle errors
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// No loan for this lender is owned by the caller. Deliberately does not
    /// distinguish "missing" from "someone else's".
    #[error("{operation}: no loan for lender {lender_id} in caller scope")]
    NotFound {
        operation: Operation,
        lender_id: String,
    },

    #[error("{operation}: {source}")]
    Storage {
        operation: Operation,
        #[source]
        source: StoreError,
    },
}

impl LifecycleError {
    pub fn operation(&self) -> Operation {
        match self {
            LifecycleError::NotFound { operation, .. } => *operation,
            LifecycleError::Storage { operation, .. } => *operation,
        }
    }
}

/// Lifecycle manager for loans and their lender profiles
#[derive(Clone)]
pub struct LifecycleService {
    loans: Arc<dyn LoanStore>,
    lenders: Arc<dyn LenderStore>,
    clock: Clock,
}

impl LifecycleService {
    pub fn new(loans: Arc<dyn LoanStore>, lenders: Arc<dyn LenderStore>) -> Self {
        Self {
            loans,
            lenders,
            clock: Arc::new(Utc::now),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Loan store health, used by the health endpoint
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.loans.ping().await
    }

    /// Permanently delete the caller's loan with this lender. The lender profile is untouched.
    pub async fn delete_transaction(
        &self,
        lender_id: &str,
        caller: Uuid,
    ) -> Result<Uuid, LifecycleError> {
        let op = Operation::DeleteTransaction;
        let loan = self.find_owned_loan(op, lender_id, caller).await?;

        let deleted = self
            .loans
            .delete_one(loan.id)
            .await
            .map_err(|source| storage(op, source))?;
        if !deleted {
            return Err(not_found(op, lender_id));
        }

        tracing::info!(loan_id = %loan.id, lender_id, user_id = %caller, "Transaction deleted");
        Ok(loan.id)
    }

    /// Freeze interest on the caller's loan. Calling it again restamps the stop date.
    pub async fn stop_interest(
        &self,
        lender_id: &str,
        caller: Uuid,
    ) -> Result<LoanRecord, LifecycleError> {
        let op = Operation::StopInterest;
        let mut loan = self.find_owned_loan(op, lender_id, caller).await?;

        if loan.is_closed() {
            // TODO: decide with product whether stopping interest on a closed loan should be rejected
            tracing::debug!(loan_id = %loan.id, lender_id, "Stopping interest on a closed loan");
        }

        loan.stop_interest(self.now());
        self.save(op, &loan).await?;

        tracing::info!(loan_id = %loan.id, lender_id, user_id = %caller, "Interest stopped");
        Ok(loan)
    }

    /// Close the caller's loan (stopping interest) and mark the lender profile closed.
    pub async fn close_profile(
        &self,
        lender_id: &str,
        caller: Uuid,
    ) -> Result<LoanRecord, LifecycleError> {
        let op = Operation::CloseProfile;
        let mut loan = self.find_owned_loan(op, lender_id, caller).await?;

        loan.close(self.now());
        self.save(op, &loan).await?;
        self.sync_lender_status(op, &loan).await;

        tracing::info!(loan_id = %loan.id, lender_id, user_id = %caller, "Profile closed");
        Ok(loan)
    }

    /// Delete every loan the caller holds with this lender, then the lender
    /// profile if the caller added it.
    pub async fn delete_profile(
        &self,
        lender_id: &str,
        caller: Uuid,
    ) -> Result<DeletedProfile, LifecycleError> {
        let op = Operation::DeleteProfile;
        let scope = LoanScope::new(lender_id, caller);
        self.find_owned_loan(op, lender_id, caller).await?;

        let deleted_loans = self
            .loans
            .delete_many(&scope)
            .await
            .map_err(|source| storage(op, source))?;

        let lender = self
            .lenders
            .delete_one(lender_id, caller)
            .await
            .map_err(|source| storage(op, source))?;

        if lender.is_none() {
            tracing::warn!(lender_id, user_id = %caller, "Lender profile not removed: missing or added by another user");
        }

        tracing::info!(lender_id, user_id = %caller, deleted_loans, "Profile deleted");
        Ok(DeletedProfile {
            lender_id: lender_id.to_string(),
            lender,
            deleted_loans,
        })
    }

    /// Reopen the caller's loan (restarting interest) and mark the lender profile active.
    pub async fn reopen_profile(
        &self,
        lender_id: &str,
        caller: Uuid,
    ) -> Result<LoanRecord, LifecycleError> {
        let op = Operation::ReopenProfile;
        let mut loan = self.find_owned_loan(op, lender_id, caller).await?;

        loan.reopen(self.now());
        self.save(op, &loan).await?;
        self.sync_lender_status(op, &loan).await;

        tracing::info!(loan_id = %loan.id, lender_id, user_id = %caller, "Profile reopened");
        Ok(loan)
    }

    /// Read-only status of the caller's loan with this lender
    pub async fn profile_status(
        &self,
        lender_id: &str,
        caller: Uuid,
    ) -> Result<ProfileStatus, LifecycleError> {
        let loan = self
            .find_owned_loan(Operation::ProfileStatus, lender_id, caller)
            .await?;
        Ok(loan.status_view())
    }

    async fn find_owned_loan(
        &self,
        op: Operation,
        lender_id: &str,
        caller: Uuid,
    ) -> Result<LoanRecord, LifecycleError> {
        self.loans
            .find_one(&LoanScope::new(lender_id, caller))
            .await
            .map_err(|source| storage(op, source))?
            .ok_or_else(|| not_found(op, lender_id))
    }

    async fn save(&self, op: Operation, loan: &LoanRecord) -> Result<(), LifecycleError> {
        let updated = self
            .loans
            .update(loan)
            .await
            .map_err(|source| storage(op, source))?;
        if !updated {
            return Err(not_found(op, &loan.lender_id));
        }
        Ok(())
    }

    /// Mirror the loan's status onto the lender profile, by lender id alone.
    /// Best effort: failures are logged and never undo the loan write.
    async fn sync_lender_status(&self, op: Operation, loan: &LoanRecord) {
        let result = self
            .lenders
            .update_status(&loan.lender_id, loan.status.into(), loan.closed_date)
            .await;

        match result {
            Ok(Some(_)) => {}
            Ok(None) => {
                tracing::warn!(operation = %op, lender_id = %loan.lender_id, "No lender profile to update");
            }
            Err(e) => {
                tracing::warn!(operation = %op, lender_id = %loan.lender_id, error = %e, "Lender profile update failed");
            }
        }
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}

fn not_found(operation: Operation, lender_id: &str) -> LifecycleError {
    LifecycleError::NotFound {
        operation,
        lender_id: lender_id.to_string(),
    }
}

fn storage(operation: Operation, source: StoreError) -> LifecycleError {
    LifecycleError::Storage { operation, source }
}
