/// Login tokens and password hashes for roster users
///
/// Access and refresh tokens are HS256 JWTs whose subject is the numeric user
/// id. Each token carries its kind, and a refresh token is never accepted where
/// an access token is expected.
use crate::error::{Result, ServerError};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use roster_core::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    bcrypt_cost: u32,
}

impl fmt::Debug for AuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthService")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish_non_exhaustive()
    }
}

/// JWT payload of a roster login token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Roster user id, as a decimal string
    pub sub: String,
    /// Unix seconds
    pub exp: i64,
    pub iat: i64,
    pub token_type: TokenType,
}

impl Claims {
    /// The user the token was issued to
    pub fn user_id(&self) -> Result<UserId> {
        self.sub
            .parse()
            .map_err(|_| ServerError::Auth("Token subject is not a user id".to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl AuthService {
    /// Signs with `secret`; lifetimes come from the `auth` config section
    pub fn new(secret: String, access_expiration_hours: u64, refresh_expiration_days: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl: Duration::hours(access_expiration_hours as i64),
            refresh_ttl: Duration::days(refresh_expiration_days as i64),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Bcrypt work factor for new hashes
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    pub fn hash_password(&self, password: &str) -> Result<String> {
        if password.is_empty() {
            return Err(ServerError::BadRequest("Password must not be empty".to_string()));
        }
        bcrypt::hash(password, self.bcrypt_cost).map_err(ServerError::from)
    }

    /// Malformed stored hashes are an error, not a mismatch
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        bcrypt::verify(password, hash).map_err(ServerError::from)
    }

    /// Short-lived token sent as `Authorization: Bearer`
    pub fn create_access_token(&self, user_id: UserId) -> Result<String> {
        self.issue(user_id, TokenType::Access, self.access_ttl)
    }

    /// Long-lived token accepted only by `/api/auth/refresh`
    pub fn create_refresh_token(&self, user_id: UserId) -> Result<String> {
        self.issue(user_id, TokenType::Refresh, self.refresh_ttl)
    }

    /// Check signature and expiry, whatever the token kind
    pub fn decode_claims(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(data.claims)
    }

    pub fn verify_access_token(&self, token: &str) -> Result<UserId> {
        self.verify_kind(token, TokenType::Access)
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<UserId> {
        self.verify_kind(token, TokenType::Refresh)
    }

    fn verify_kind(&self, token: &str, expected: TokenType) -> Result<UserId> {
        let claims = self.decode_claims(token)?;
        if claims.token_type != expected {
            return Err(ServerError::Auth(format!(
                "Expected a {} token",
                match expected {
                    TokenType::Access => "access",
                    TokenType::Refresh => "refresh",
                }
            )));
        }
        claims.user_id()
    }

    fn issue(&self, user_id: UserId, token_type: TokenType, ttl: Duration) -> Result<String> {
        let issued_at = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (issued_at + ttl).timestamp(),
            iat: issued_at.timestamp(),
            token_type,
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(ServerError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> AuthService {
        AuthService::new("secret".to_string(), 24, 30).with_bcrypt_cost(4)
    }

    #[test]
    fn hashes_verify_only_the_original_password() {
        let auth = auth();
        let hash = auth.hash_password("quarterly-review").unwrap();
        assert!(auth.verify_password("quarterly-review", &hash).unwrap());
        assert!(!auth.verify_password("Quarterly-Review", &hash).unwrap());
    }

    #[test]
    fn tokens_carry_the_user_id() {
        let auth = auth();

        let access_token = auth.create_access_token(42).unwrap();
        assert_eq!(auth.verify_access_token(&access_token).unwrap(), 42);

        let refresh_token = auth.create_refresh_token(42).unwrap();
        assert_eq!(auth.verify_refresh_token(&refresh_token).unwrap(), 42);
    }

    #[test]
    fn token_kinds_are_not_interchangeable() {
        let auth = auth();

        let access_token = auth.create_access_token(7).unwrap();
        assert!(matches!(
            auth.verify_refresh_token(&access_token),
            Err(ServerError::Auth(ref msg)) if msg.contains("refresh")
        ));

        let refresh_token = auth.create_refresh_token(7).unwrap();
        assert!(auth.verify_access_token(&refresh_token).is_err());
    }

    #[test]
    fn debug_output_hides_keys() {
        let rendered = format!("{:?}", auth());
        assert!(rendered.contains("bcrypt_cost"));
        assert!(!rendered.contains("secret"));
    }
}
