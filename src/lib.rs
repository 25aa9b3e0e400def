//! Loan Ledger Backend Library
//!
//! Lifecycle management for borrowed loans and the lender profiles behind
//! them: stopping interest, closing, reopening and deleting, always scoped to
//! the authenticated borrower.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod loan;
pub mod middleware;
pub mod routes;
pub mod state;
