//! JWT identity adapter.
//!
//! Verifies HS256-signed ID tokens with a shared secret and maps the `sub`
//! claim to the caller's [`UserRef`].

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use budget_types::{IdentityError, IdentityVerifier, UserRef};

/// Claims read from an ID token. Other claims are ignored.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User uid
    pub sub: String,
    /// Expiration timestamp
    pub exp: u64,
}

/// [`IdentityVerifier`] backed by `jsonwebtoken`.
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Requires the `iss` claim to equal `issuer`.
    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.validation.set_issuer(&[issuer]);
        self.validation.required_spec_claims.insert("iss".to_string());
        self
    }

    /// Requires the `aud` claim to contain `audience`.
    pub fn with_audience(mut self, audience: &str) -> Self {
        self.validation.set_audience(&[audience]);
        self.validation.validate_aud = true;
        self.validation.required_spec_claims.insert("aud".to_string());
        self
    }

    fn decode(&self, token: &str) -> Result<UserRef, IdentityError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|e| IdentityError::InvalidToken(e.to_string()))?;

        if data.claims.sub.trim().is_empty() {
            return Err(IdentityError::InvalidToken("token has no subject".into()));
        }
        Ok(UserRef::new(data.claims.sub))
    }
}

#[async_trait]
impl IdentityVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<UserRef, IdentityError> {
        self.decode(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;

    const SECRET: &str = "test-secret";

    fn mint(claims: serde_json::Value, secret: &str) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn in_one_hour() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    #[tokio::test]
    async fn test_valid_token_yields_user() {
        let token = mint(json!({ "sub": "u1", "exp": in_one_hour() }), SECRET);

        let user = JwtVerifier::new(SECRET).verify(&token).await.unwrap();

        assert_eq!(user, UserRef::new("u1"));
    }

    #[tokio::test]
    async fn test_wrong_secret_is_rejected() {
        let token = mint(json!({ "sub": "u1", "exp": in_one_hour() }), "other-secret");

        let result = JwtVerifier::new(SECRET).verify(&token).await;

        assert!(matches!(result, Err(IdentityError::InvalidToken(_))));
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let exp = chrono::Utc::now().timestamp() - 3600;
        let token = mint(json!({ "sub": "u1", "exp": exp }), SECRET);

        let result = JwtVerifier::new(SECRET).verify(&token).await;

        assert!(matches!(result, Err(IdentityError::InvalidToken(_))));
    }

    #[tokio::test]
    async fn test_missing_exp_is_rejected() {
        let token = mint(json!({ "sub": "u1" }), SECRET);

        let result = JwtVerifier::new(SECRET).verify(&token).await;

        assert!(matches!(result, Err(IdentityError::InvalidToken(_))));
    }

    #[tokio::test]
    async fn test_empty_subject_is_rejected() {
        let token = mint(json!({ "sub": "", "exp": in_one_hour() }), SECRET);

        let result = JwtVerifier::new(SECRET).verify(&token).await;

        assert!(matches!(result, Err(IdentityError::InvalidToken(_))));
    }

    #[tokio::test]
    async fn test_blank_subject_is_rejected() {
        let token = mint(json!({ "sub": "   ", "exp": in_one_hour() }), SECRET);

        let result = JwtVerifier::new(SECRET).verify(&token).await;

        assert!(matches!(result, Err(IdentityError::InvalidToken(_))));
    }

    #[tokio::test]
    async fn test_subject_is_not_trimmed() {
        let token = mint(json!({ "sub": " u1", "exp": in_one_hour() }), SECRET);

        let user = JwtVerifier::new(SECRET).verify(&token).await.unwrap();

        assert_eq!(user, UserRef::new(" u1"));
    }

    #[tokio::test]
    async fn test_issuer_and_audience_are_checked_when_configured() {
        let verifier = JwtVerifier::new(SECRET)
            .with_issuer("https://issuer.example")
            .with_audience("budget");

        let good = mint(
            json!({ "sub": "u1", "exp": in_one_hour(), "iss": "https://issuer.example", "aud": "budget" }),
            SECRET,
        );
        let wrong_aud = mint(
            json!({ "sub": "u1", "exp": in_one_hour(), "iss": "https://issuer.example", "aud": "other" }),
            SECRET,
        );
        let no_iss = mint(json!({ "sub": "u1", "exp": in_one_hour(), "aud": "budget" }), SECRET);

        assert!(verifier.verify(&good).await.is_ok());
        assert!(verifier.verify(&wrong_aud).await.is_err());
        assert!(verifier.verify(&no_iss).await.is_err());
    }

    #[tokio::test]
    async fn test_garbage_is_rejected() {
        let result = JwtVerifier::new(SECRET).verify("not.a.jwt").await;

        assert!(matches!(result, Err(IdentityError::InvalidToken(_))));
    }
}
