//! Bearer token codec
//!
//! Tokens are HS256 JWTs minted by the identity service with the same shared
//! secret. `sub` carries the user id and `type` separates access from refresh
//! tokens.

use chrono::{Duration, Utc};
use jsonwebtoken::{errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token has expired")]
    Expired,

    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Expected an access token, got {0:?}")]
    WrongKind(TokenKind),

    #[error("Token signing failed: {0}")]
    Signing(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
    #[serde(rename = "type")]
    pub kind: TokenKind,
}

/// Mint a token the way the identity service does. Used by operators and tests.
pub fn issue_token(
    user_id: Uuid,
    kind: TokenKind,
    secret: &str,
    ttl: Duration,
) -> Result<String, JwtError> {
    let issued_at = Utc::now();
    let claims = Claims {
        sub: user_id,
        iat: issued_at.timestamp(),
        exp: (issued_at + ttl).timestamp(),
        kind,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| JwtError::Signing(e.to_string()))
}

/// Check signature and expiry, then hand back the claims
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::Malformed(e.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "codec-secret";

    #[test]
    fn test_issue_then_decode() {
        let user_id = Uuid::new_v4();
        let token = issue_token(user_id, TokenKind::Access, SECRET, Duration::minutes(15)).unwrap();

        let claims = decode_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.kind, TokenKind::Access);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_garbage_is_malformed() {
        assert!(matches!(
            decode_token("abc.def.ghi", SECRET),
            Err(JwtError::Malformed(_))
        ));
    }

    #[test]
    fn test_foreign_secret_is_malformed() {
        let token = issue_token(Uuid::new_v4(), TokenKind::Access, "other", Duration::minutes(5))
            .unwrap();
        assert!(matches!(
            decode_token(&token, SECRET),
            Err(JwtError::Malformed(_))
        ));
    }

    #[test]
    fn test_expired_past_leeway() {
        let token = issue_token(Uuid::new_v4(), TokenKind::Access, SECRET, Duration::hours(-1))
            .unwrap();
        assert!(matches!(decode_token(&token, SECRET), Err(JwtError::Expired)));
    }

    #[test]
    fn test_claims_wire_shape() {
        let claims = Claims {
            sub: Uuid::nil(),
            iat: 1,
            exp: 2,
            kind: TokenKind::Refresh,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["type"], "refresh");
        assert_eq!(json["sub"], Uuid::nil().to_string());
    }
}
