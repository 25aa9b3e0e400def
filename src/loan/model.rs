//! Loan and lender models
//!
//! The transition rules for a loan's `status` / `interestStopped` pair live on
//! [`LoanRecord`] so that every storage backend sees the same state machine:
//!
//! ```text
//! (active, running) --stop-interest--> (active, stopped)
//! (active, *)       --close----------> (closed, stopped)
//! (closed, stopped) --reopen---------> (active, running)
//! ```

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

/// Loan status
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "loan_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Active,
    Closed,
}

/// Lender profile status
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "lender_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LenderStatus {
    Active,
    Closed,
}

impl From<LoanStatus> for LenderStatus {
    fn from(status: LoanStatus) -> Self {
        match status {
            LoanStatus::Active => LenderStatus::Active,
            LoanStatus::Closed => LenderStatus::Closed,
        }
    }
}

/// Interest accrual metadata carried by a loan
#[derive(Debug, Default, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoanDetails {
    pub interest_stopped: bool,
    pub interest_stopped_date: Option<DateTime<Utc>>,
    pub accrued_interest: i64, // minor units, never computed here
}

/// A loan taken by `borrowed_by` from the lender identified by `lender_id`
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq, Eq)]
pub struct LoanRecord {
    pub id: Uuid,
    #[serde(rename = "lenderID")]
    pub lender_id: String,
    #[serde(rename = "borrowedBy")]
    pub borrowed_by: Uuid,
    pub status: LoanStatus,
    #[serde(rename = "closedDate")]
    pub closed_date: Option<DateTime<Utc>>,
    #[sqlx(flatten)]
    #[serde(rename = "loanDetails")]
    pub loan_details: LoanDetails,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl LoanRecord {
    /// A freshly recorded, active loan with interest running.
    pub fn new(lender_id: impl Into<String>, borrowed_by: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            lender_id: lender_id.into(),
            borrowed_by,
            status: LoanStatus::Active,
            closed_date: None,
            loan_details: LoanDetails::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Freeze interest accrual. Re-applying restamps the stop date.
    pub fn stop_interest(&mut self, now: DateTime<Utc>) {
        self.loan_details.interest_stopped = true;
        self.loan_details.interest_stopped_date = Some(now);
        self.updated_at = now;
    }

    /// Close the loan. Interest always stops on close, whatever its prior state.
    pub fn close(&mut self, now: DateTime<Utc>) {
        self.status = LoanStatus::Closed;
        self.closed_date = Some(now);
        self.stop_interest(now);
    }

    /// Reopen the loan and restart interest, discarding any earlier stop.
    pub fn reopen(&mut self, now: DateTime<Utc>) {
        self.status = LoanStatus::Active;
        self.closed_date = None;
        self.loan_details.interest_stopped = false;
        self.loan_details.interest_stopped_date = None;
        self.updated_at = now;
    }

    pub fn is_closed(&self) -> bool {
        self.status == LoanStatus::Closed
    }

    /// Whether the stored fields satisfy the status/date and close/stop invariants.
    pub fn is_consistent(&self) -> bool {
        let details = &self.loan_details;
        self.is_closed() == self.closed_date.is_some()
            && details.interest_stopped == details.interest_stopped_date.is_some()
            && (!self.is_closed() || details.interest_stopped)
    }

    pub fn status_view(&self) -> ProfileStatus {
        ProfileStatus {
            lender_id: self.lender_id.clone(),
            status: self.status,
            interest_stopped: self.loan_details.interest_stopped,
            closed_date: self.closed_date,
            interest_stopped_date: self.loan_details.interest_stopped_date,
        }
    }
}

/// A lender registered by `added_by`
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq, Eq)]
pub struct LenderProfile {
    #[serde(rename = "lenderID")]
    pub lender_id: String,
    #[serde(rename = "addedBy")]
    pub added_by: Uuid,
    #[serde(rename = "FirstName")]
    pub first_name: String,
    #[serde(rename = "LastName")]
    pub last_name: String,
    pub status: LenderStatus,
    #[serde(rename = "closedDate")]
    pub closed_date: Option<DateTime<Utc>>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl LenderProfile {
    pub fn new(
        lender_id: impl Into<String>,
        added_by: Uuid,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            lender_id: lender_id.into(),
            added_by,
            first_name: first_name.into(),
            last_name: last_name.into(),
            status: LenderStatus::Active,
            closed_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Owner-scoped loan selector: `{lenderID, borrowedBy}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanScope {
    pub lender_id: String,
    pub borrowed_by: Uuid,
}

impl LoanScope {
    pub fn new(lender_id: impl Into<String>, borrowed_by: Uuid) -> Self {
        Self {
            lender_id: lender_id.into(),
            borrowed_by,
        }
    }

    pub fn matches(&self, loan: &LoanRecord) -> bool {
        loan.lender_id == self.lender_id && loan.borrowed_by == self.borrowed_by
    }
}

/// Read-only projection returned by the status query
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ProfileStatus {
    #[serde(rename = "lenderID")]
    pub lender_id: String,
    pub status: LoanStatus,
    #[serde(rename = "interestStopped")]
    pub interest_stopped: bool,
    #[serde(rename = "closedDate")]
    pub closed_date: Option<DateTime<Utc>>,
    #[serde(rename = "interestStoppedDate")]
    pub interest_stopped_date: Option<DateTime<Utc>>,
}

/// Outcome of removing a lender profile together with the caller's loans
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedProfile {
    pub lender_id: String,
    pub lender: Option<LenderProfile>,
    pub deleted_loans: u64,
}

impl DeletedProfile {
    pub fn lender_name(&self) -> String {
        self.lender
            .as_ref()
            .map(LenderProfile::display_name)
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

// ===== Response DTOs =====

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteTransactionResponse {
    pub message: String,
    #[serde(rename = "deletedLoanId")]
    pub deleted_loan_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StoppedInterest {
    #[serde(rename = "lenderID")]
    pub lender_id: String,
    #[serde(rename = "interestStopped")]
    pub interest_stopped: bool,
    #[serde(rename = "interestStoppedDate")]
    pub interest_stopped_date: Option<DateTime<Utc>>,
    #[serde(rename = "accruedInterest")]
    pub accrued_interest: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StopInterestResponse {
    pub message: String,
    pub loan: StoppedInterest,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClosedLoan {
    #[serde(rename = "lenderID")]
    pub lender_id: String,
    pub status: LoanStatus,
    #[serde(rename = "closedDate")]
    pub closed_date: Option<DateTime<Utc>>,
    #[serde(rename = "interestStopped")]
    pub interest_stopped: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CloseProfileResponse {
    pub message: String,
    pub loan: ClosedLoan,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteProfileResponse {
    pub message: String,
    #[serde(rename = "deletedLenderID")]
    pub deleted_lender_id: String,
    #[serde(rename = "deletedLenderName")]
    pub deleted_lender_name: String,
    #[serde(rename = "deletedTransactions")]
    pub deleted_transactions: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReopenedLoan {
    #[serde(rename = "lenderID")]
    pub lender_id: String,
    pub status: LoanStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReopenProfileResponse {
    pub message: String,
    pub loan: ReopenedLoan,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileStatusResponse {
    pub message: String,
    #[serde(flatten)]
    pub profile: ProfileStatus,
}

impl From<&LoanRecord> for StoppedInterest {
    fn from(loan: &LoanRecord) -> Self {
        Self {
            lender_id: loan.lender_id.clone(),
            interest_stopped: loan.loan_details.interest_stopped,
            interest_stopped_date: loan.loan_details.interest_stopped_date,
            accrued_interest: loan.loan_details.accrued_interest,
        }
    }
}

impl From<&LoanRecord> for ClosedLoan {
    fn from(loan: &LoanRecord) -> Self {
        Self {
            lender_id: loan.lender_id.clone(),
            status: loan.status,
            closed_date: loan.closed_date,
            interest_stopped: loan.loan_details.interest_stopped,
        }
    }
}

impl From<&LoanRecord> for ReopenedLoan {
    fn from(loan: &LoanRecord) -> Self {
        Self {
            lender_id: loan.lender_id.clone(),
            status: loan.status,
        }
    }
}
