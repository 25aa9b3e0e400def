//! Loan lifecycle HTTP handlers
//!
//! Each handler passes the authenticated caller explicitly to the lifecycle
//! service; ownership is decided there, not here.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use super::AuthenticatedUser;
use crate::error::ApiResult;
use crate::loan::{
    CloseProfileResponse, DeleteProfileResponse, DeleteTransactionResponse, LifecycleService,
    Operation, ProfileStatusResponse, ReopenProfileResponse, StopInterestResponse,
};

/// DELETE /delete-transaction/:lender_id
pub async fn delete_transaction(
    State(service): State<Arc<LifecycleService>>,
    user: AuthenticatedUser,
    Path(lender_id): Path<String>,
) -> ApiResult<Json<DeleteTransactionResponse>> {
    let deleted_loan_id = service.delete_transaction(&lender_id, user.user_id).await?;

    Ok(Json(DeleteTransactionResponse {
        message: Operation::DeleteTransaction.success_message().to_string(),
        deleted_loan_id,
    }))
}

/// PUT /stop-interest/:lender_id
pub async fn stop_interest(
    State(service): State<Arc<LifecycleService>>,
    user: AuthenticatedUser,
    Path(lender_id): Path<String>,
) -> ApiResult<Json<StopInterestResponse>> {
    let loan = service.stop_interest(&lender_id, user.user_id).await?;

    Ok(Json(StopInterestResponse {
        message: Operation::StopInterest.success_message().to_string(),
        loan: (&loan).into(),
    }))
}

/// PUT /close-profile/:lender_id
pub async fn close_profile(
    State(service): State<Arc<LifecycleService>>,
    user: AuthenticatedUser,
    Path(lender_id): Path<String>,
) -> ApiResult<Json<CloseProfileResponse>> {
    let loan = service.close_profile(&lender_id, user.user_id).await?;

    Ok(Json(CloseProfileResponse {
        message: Operation::CloseProfile.success_message().to_string(),
        loan: (&loan).into(),
    }))
}

/// DELETE /delete-profile/:lender_id
pub async fn delete_profile(
    State(service): State<Arc<LifecycleService>>,
    user: AuthenticatedUser,
    Path(lender_id): Path<String>,
) -> ApiResult<Json<DeleteProfileResponse>> {
    let deleted = service.delete_profile(&lender_id, user.user_id).await?;

    Ok(Json(DeleteProfileResponse {
        message: Operation::DeleteProfile.success_message().to_string(),
        deleted_lender_name: deleted.lender_name(),
        deleted_lender_id: deleted.lender_id,
        deleted_transactions: deleted.deleted_loans,
    }))
}

/// PUT /reopen-profile/:lender_id
pub async fn reopen_profile(
    State(service): State<Arc<LifecycleService>>,
    user: AuthenticatedUser,
    Path(lender_id): Path<String>,
) -> ApiResult<Json<ReopenProfileResponse>> {
    let loan = service.reopen_profile(&lender_id, user.user_id).await?;

    Ok(Json(ReopenProfileResponse {
        message: Operation::ReopenProfile.success_message().to_string(),
        loan: (&loan).into(),
    }))
}

/// GET /profile-status/:lender_id
pub async fn profile_status(
    State(service): State<Arc<LifecycleService>>,
    user: AuthenticatedUser,
    Path(lender_id): Path<String>,
) -> ApiResult<Json<ProfileStatusResponse>> {
    let profile = service.profile_status(&lender_id, user.user_id).await?;

    Ok(Json(ProfileStatusResponse {
        message: Operation::ProfileStatus.success_message().to_string(),
        profile,
    }))
}
