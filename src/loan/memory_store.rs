//! In-process storage backend
//!
//! Keeps loans in insertion order so `find_one` returns the earliest record the
//! same way the PostgreSQL backend does.

use async_trait::async_trait;
use sqlx::types::chrono::{DateTime, Utc};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::model::{LenderProfile, LenderStatus, LoanRecord, LoanScope};
use super::store::{LenderStore, LoanStore, StoreError};

#[derive(Clone, Default)]
pub struct InMemoryStore {
    loans: Arc<RwLock<Vec<LoanRecord>>>,
    lenders: Arc<RwLock<HashMap<String, LenderProfile>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_loan(&self, loan: LoanRecord) {
        self.loans.write().await.push(loan);
    }

    pub async fn insert_lender(&self, lender: LenderProfile) {
        self.lenders
            .write()
            .await
            .insert(lender.lender_id.clone(), lender);
    }

    pub async fn loan(&self, id: Uuid) -> Option<LoanRecord> {
        self.loans.read().await.iter().find(|l| l.id == id).cloned()
    }

    pub async fn loans(&self) -> Vec<LoanRecord> {
        self.loans.read().await.clone()
    }

    pub async fn lender(&self, lender_id: &str) -> Option<LenderProfile> {
        self.lenders.read().await.get(lender_id).cloned()
    }
}

#[async_trait]
impl LoanStore for InMemoryStore {
    async fn find_one(&self, scope: &LoanScope) -> Result<Option<LoanRecord>, StoreError> {
        let loans = self.loans.read().await;
        // min_by_key keeps the first of equal keys, so ties fall back to insertion order
        Ok(loans
            .iter()
            .filter(|loan| scope.matches(loan))
            .min_by_key(|loan| loan.created_at)
            .cloned())
    }

    async fn update(&self, loan: &LoanRecord) -> Result<bool, StoreError> {
        let mut loans = self.loans.write().await;
        match loans.iter_mut().find(|stored| stored.id == loan.id) {
            Some(stored) => {
                stored.status = loan.status;
                stored.closed_date = loan.closed_date;
                stored.loan_details.interest_stopped = loan.loan_details.interest_stopped;
                stored.loan_details.interest_stopped_date =
                    loan.loan_details.interest_stopped_date;
                stored.updated_at = loan.updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_one(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut loans = self.loans.write().await;
        let before = loans.len();
        loans.retain(|loan| loan.id != id);
        Ok(loans.len() < before)
    }

    async fn delete_many(&self, scope: &LoanScope) -> Result<u64, StoreError> {
        let mut loans = self.loans.write().await;
        let before = loans.len();
        loans.retain(|loan| !scope.matches(loan));
        Ok((before - loans.len()) as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl LenderStore for InMemoryStore {
    async fn update_status(
        &self,
        lender_id: &str,
        status: LenderStatus,
        closed_date: Option<DateTime<Utc>>,
    ) -> Result<Option<LenderProfile>, StoreError> {
        let mut lenders = self.lenders.write().await;
        Ok(lenders.get_mut(lender_id).map(|lender| {
            lender.status = status;
            lender.closed_date = closed_date;
            lender.updated_at = Utc::now();
            lender.clone()
        }))
    }

    async fn delete_one(
        &self,
        lender_id: &str,
        added_by: Uuid,
    ) -> Result<Option<LenderProfile>, StoreError> {
        let mut lenders = self.lenders.write().await;
        match lenders.get(lender_id) {
            Some(lender) if lender.added_by == added_by => Ok(lenders.remove(lender_id)),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_find_one_returns_earliest_in_scope() {
        let store = InMemoryStore::new();
        let owner = Uuid::new_v4();
        let now = Utc::now();

        let later = LoanRecord::new("L1", owner, now);
        let earlier = LoanRecord::new("L1", owner, now - Duration::days(10));
        let other_owner = LoanRecord::new("L1", Uuid::new_v4(), now - Duration::days(20));

        store.insert_loan(later).await;
        store.insert_loan(earlier.clone()).await;
        store.insert_loan(other_owner).await;

        let found = store
            .find_one(&LoanScope::new("L1", owner))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, earlier.id);
    }

    #[tokio::test]
    async fn test_find_one_ties_use_insertion_order() {
        let store = InMemoryStore::new();
        let owner = Uuid::new_v4();
        let now = Utc::now();

        let first = LoanRecord::new("L1", owner, now);
        let second = LoanRecord::new("L1", owner, now);
        store.insert_loan(first.clone()).await;
        store.insert_loan(second).await;

        let found = store
            .find_one(&LoanScope::new("L1", owner))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, first.id);
    }

    #[tokio::test]
    async fn test_update_missing_loan() {
        let store = InMemoryStore::new();
        let loan = LoanRecord::new("L1", Uuid::new_v4(), Utc::now());
        assert!(!store.update(&loan).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_many_respects_scope() {
        let store = InMemoryStore::new();
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        let now = Utc::now();

        for _ in 0..3 {
            store.insert_loan(LoanRecord::new("L1", owner, now)).await;
        }
        store.insert_loan(LoanRecord::new("L1", other, now)).await;
        store.insert_loan(LoanRecord::new("L2", owner, now)).await;

        let removed = store
            .delete_many(&LoanScope::new("L1", owner))
            .await
            .unwrap();
        assert_eq!(removed, 3);
        assert_eq!(store.loans().await.len(), 2);
    }

    #[tokio::test]
    async fn test_lender_delete_requires_owner() {
        let store = InMemoryStore::new();
        let owner = Uuid::new_v4();
        store
            .insert_lender(LenderProfile::new("L1", owner, "Ada", "Lovelace", Utc::now()))
            .await;

        let denied = LenderStore::delete_one(&store, "L1", Uuid::new_v4())
            .await
            .unwrap();
        assert!(denied.is_none());
        assert!(store.lender("L1").await.is_some());

        let removed = LenderStore::delete_one(&store, "L1", owner).await.unwrap();
        assert_eq!(removed.unwrap().first_name, "Ada");
        assert!(store.lender("L1").await.is_none());
    }

    #[tokio::test]
    async fn test_lender_update_ignores_owner() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        store
            .insert_lender(LenderProfile::new("L1", Uuid::new_v4(), "Ada", "Lovelace", now))
            .await;

        let updated = store
            .update_status("L1", LenderStatus::Closed, Some(now))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, LenderStatus::Closed);
        assert_eq!(updated.closed_date, Some(now));

        let missing = store
            .update_status("nope", LenderStatus::Closed, Some(now))
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
