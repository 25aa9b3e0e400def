//! Loan lifecycle route definitions

use axum::{
    routing::{delete, get, put},
    Router,
};

use crate::handlers::*;
use crate::state::AppState;

pub fn loan_routes() -> Router<AppState> {
    Router::new()
        .route("/delete-transaction/:lender_id", delete(delete_transaction))
        .route("/stop-interest/:lender_id", put(stop_interest))
        .route("/close-profile/:lender_id", put(close_profile))
        .route("/delete-profile/:lender_id", delete(delete_profile))
        .route("/reopen-profile/:lender_id", put(reopen_profile))
        .route("/profile-status/:lender_id", get(profile_status))
}
