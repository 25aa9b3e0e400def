//! Authentication module
//!
//! Bearer JWT verification. The resolved user id is handed to handlers by the
//! `AuthenticatedUser` extractor and passed explicitly into the loan service.

mod jwt;
mod service;

pub use jwt::{decode_token, issue_token, Claims, JwtError, TokenKind};
pub use service::AuthService;
