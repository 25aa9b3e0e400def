//! Caller resolution
//!
//! Users, sessions and token issuance belong to the identity service; this
//! side only verifies bearer tokens.

use uuid::Uuid;

use super::jwt::{decode_token, JwtError, TokenKind};

#[derive(Clone)]
pub struct AuthService {
    jwt_secret: String,
}

impl AuthService {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
        }
    }

    /// User id carried by a valid access token. Refresh tokens are refused.
    pub fn authenticate(&self, token: &str) -> Result<Uuid, JwtError> {
        let claims = decode_token(token, &self.jwt_secret)?;
        match claims.kind {
            TokenKind::Access => Ok(claims.sub),
            other => Err(JwtError::WrongKind(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::issue_token;
    use chrono::Duration;

    #[test]
    fn test_access_token_resolves_user() {
        let service = AuthService::new("secret");
        let user_id = Uuid::new_v4();
        let token = issue_token(user_id, TokenKind::Access, "secret", Duration::minutes(15)).unwrap();

        assert_eq!(service.authenticate(&token).unwrap(), user_id);
    }

    #[test]
    fn test_refresh_token_refused() {
        let service = AuthService::new("secret");
        let token =
            issue_token(Uuid::new_v4(), TokenKind::Refresh, "secret", Duration::days(7)).unwrap();

        assert!(matches!(
            service.authenticate(&token),
            Err(JwtError::WrongKind(TokenKind::Refresh))
        ));
    }
}
