//! PostgreSQL storage backend

use async_trait::async_trait;
use sqlx::types::chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::model::{LenderProfile, LenderStatus, LoanRecord, LoanScope};
use super::store::{LenderStore, LoanStore, StoreError};

#[derive(Clone)]
pub struct PgLoanStore {
    db_pool: PgPool,
}

impl PgLoanStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Loans are recorded by another service; this is for seeding and fixtures.
    pub async fn insert(&self, loan: &LoanRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO loans (
                id, lender_id, borrowed_by, status, closed_date,
                interest_stopped, interest_stopped_date, accrued_interest,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(loan.id)
        .bind(&loan.lender_id)
        .bind(loan.borrowed_by)
        .bind(loan.status)
        .bind(loan.closed_date)
        .bind(loan.loan_details.interest_stopped)
        .bind(loan.loan_details.interest_stopped_date)
        .bind(loan.loan_details.accrued_interest)
        .bind(loan.created_at)
        .bind(loan.updated_at)
        .execute(&self.db_pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl LoanStore for PgLoanStore {
    async fn find_one(&self, scope: &LoanScope) -> Result<Option<LoanRecord>, StoreError> {
        let loan = sqlx::query_as::<_, LoanRecord>(
            r#"
            SELECT * FROM loans
            WHERE lender_id = $1 AND borrowed_by = $2
            ORDER BY created_at ASC, id ASC
            LIMIT 1
            "#,
        )
        .bind(&scope.lender_id)
        .bind(scope.borrowed_by)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(loan)
    }

    async fn update(&self, loan: &LoanRecord) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE loans
            SET status = $1, closed_date = $2, interest_stopped = $3,
                interest_stopped_date = $4, updated_at = $5
            WHERE id = $6
            "#,
        )
        .bind(loan.status)
        .bind(loan.closed_date)
        .bind(loan.loan_details.interest_stopped)
        .bind(loan.loan_details.interest_stopped_date)
        .bind(loan.updated_at)
        .bind(loan.id)
        .execute(&self.db_pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_one(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM loans WHERE id = $1")
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_many(&self, scope: &LoanScope) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM loans WHERE lender_id = $1 AND borrowed_by = $2")
            .bind(&scope.lender_id)
            .bind(scope.borrowed_by)
            .execute(&self.db_pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.db_pool).await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct PgLenderStore {
    db_pool: PgPool,
}

impl PgLenderStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Lenders are registered by another service; this is for seeding and fixtures.
    pub async fn insert(&self, lender: &LenderProfile) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO lenders (
                lender_id, added_by, first_name, last_name, status,
                closed_date, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&lender.lender_id)
        .bind(lender.added_by)
        .bind(&lender.first_name)
        .bind(&lender.last_name)
        .bind(lender.status)
        .bind(lender.closed_date)
        .bind(lender.created_at)
        .bind(lender.updated_at)
        .execute(&self.db_pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl LenderStore for PgLenderStore {
    async fn update_status(
        &self,
        lender_id: &str,
        status: LenderStatus,
        closed_date: Option<DateTime<Utc>>,
    ) -> Result<Option<LenderProfile>, StoreError> {
        let lender = sqlx::query_as::<_, LenderProfile>(
            r#"
            UPDATE lenders
            SET status = $1, closed_date = $2, updated_at = $3
            WHERE lender_id = $4
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(closed_date)
        .bind(Utc::now())
        .bind(lender_id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(lender)
    }

    async fn delete_one(
        &self,
        lender_id: &str,
        added_by: Uuid,
    ) -> Result<Option<LenderProfile>, StoreError> {
        let lender = sqlx::query_as::<_, LenderProfile>(
            "DELETE FROM lenders WHERE lender_id = $1 AND added_by = $2 RETURNING *",
        )
        .bind(lender_id)
        .bind(added_by)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(lender)
    }
}
