//! Authentication service - credentials and session tokens
//!
//! Passwords are stored as argon2id PHC strings and never leave this
//! module in the clear. Session tokens are HS256 JWTs whose subject is the
//! user id; the server's middleware verifies them through the same
//! TokenIssuer that signed them.

use std::sync::Arc;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::User;
use crate::ports::UserStore;

/// Hash a password into an argon2id PHC string with a fresh OS-random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::internal(format!("password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC string
///
/// A mismatch comes back as the undifferentiated credentials error, the
/// same one an unknown email produces.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<()> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| Error::internal(format!("stored password hash unreadable: {e}")))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| Error::IncorrectCredentials)
}

/// JWT claims carried by a session token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Owning user id
    pub sub: String,
    /// Expiration time (unix seconds)
    pub exp: u64,
    /// Issued at (unix seconds)
    pub iat: u64,
}

/// Issues and verifies HS256 session tokens
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: u64,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    /// Sign a token whose subject is the user id
    pub fn issue(&self, user_id: Uuid) -> Result<String> {
        let now = Utc::now().timestamp() as u64;
        let claims = Claims {
            sub: user_id.to_string(),
            exp: now + self.ttl_secs,
            iat: now,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| Error::internal(format!("token signing failed: {e}")))
    }

    /// Verify a token and return the user id it was issued for
    pub fn verify(&self, token: &str) -> Result<Uuid> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| Error::token(e.to_string()))?;

        Uuid::parse_str(&data.claims.sub).map_err(|e| Error::token(e.to_string()))
    }
}

/// Authentication service - turns credentials into sessions
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: Arc<TokenIssuer>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, tokens: Arc<TokenIssuer>) -> Self {
        Self { users, tokens }
    }

    /// Authenticate by email and password, issuing a session token
    ///
    /// Unknown email and wrong password take the same exit; the caller
    /// learns only that the combination was rejected.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<AuthenticatedSession> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(Error::IncorrectCredentials)?;

        verify_password(password, &user.password_hash)?;

        let token = self.tokens.issue(user.id)?;
        tracing::info!(user_id = %user.id, "session issued");

        Ok(AuthenticatedSession { user, token })
    }
}

/// Result of a successful authentication
#[derive(Debug, Serialize)]
pub struct AuthenticatedSession {
    pub user: User,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryUserStore;

    fn issuer() -> Arc<TokenIssuer> {
        Arc::new(TokenIssuer::new("test-secret", 3600))
    }

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("s3cret").unwrap();
        assert!(hash.starts_with("$argon2id$"), "expected a PHC string");
        assert!(verify_password("s3cret", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong", &hash),
            Err(Error::IncorrectCredentials)
        ));
    }

    #[test]
    fn test_two_hashes_of_same_password_differ() {
        // Fresh salt per hash
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_token_round_trip() {
        let issuer = issuer();
        let user_id = Uuid::new_v4();

        let token = issuer.issue(user_id).unwrap();
        assert_eq!(issuer.verify(&token).unwrap(), user_id);
    }

    #[test]
    fn test_tampered_token_rejected() {
        let issuer = issuer();
        let mut token = issuer.issue(Uuid::new_v4()).unwrap();
        token.push('x');

        assert!(matches!(issuer.verify(&token), Err(Error::Token(_))));
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let token = TokenIssuer::new("other-secret", 3600)
            .issue(Uuid::new_v4())
            .unwrap();

        assert!(matches!(issuer().verify(&token), Err(Error::Token(_))));
    }

    #[tokio::test]
    async fn test_authenticate_issues_token_for_valid_credentials() {
        let users = Arc::new(InMemoryUserStore::new());
        let hash = hash_password("correct horse").unwrap();
        let user = User::new("Alice", "alice@example.com", hash);
        users.save_user(&user).await.unwrap();

        let service = AuthService::new(users, issuer());
        let session = service
            .authenticate("alice@example.com", "correct horse")
            .await
            .unwrap();

        assert_eq!(session.user.id, user.id);
        assert_eq!(issuer().verify(&session.token).unwrap(), user.id);
    }

    #[tokio::test]
    async fn test_unknown_email_and_wrong_password_are_indistinguishable() {
        let users = Arc::new(InMemoryUserStore::new());
        let hash = hash_password("right").unwrap();
        users
            .save_user(&User::new("Alice", "alice@example.com", hash))
            .await
            .unwrap();

        let service = AuthService::new(users, issuer());

        let unknown_email = service
            .authenticate("nobody@example.com", "whatever")
            .await
            .unwrap_err();
        let wrong_password = service
            .authenticate("alice@example.com", "wrong")
            .await
            .unwrap_err();

        assert!(matches!(unknown_email, Error::IncorrectCredentials));
        assert!(matches!(wrong_password, Error::IncorrectCredentials));
        assert_eq!(
            unknown_email.to_string(),
            wrong_password.to_string(),
            "both failures must read identically to the caller"
        );
    }
}
