//! HS256 access-token verification against the backend's signing key

use anyhow::{Context, Result};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use super::Claims;

#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(signing_key: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            key: DecodingKey::from_secret(signing_key.as_bytes()),
            validation,
        }
    }

    /// Verify a JWT and return its claims. Refresh tokens are rejected.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.key, &self.validation)
            .context("JWT validation failed")?;

        if !data.claims.is_access() {
            anyhow::bail!("expected an access token, got {}", data.claims.token_type);
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
pub(crate) fn issue_test_token(signing_key: &str, user_id: i64, token_type: &str, exp: i64) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let claims = Claims {
        token_type: token_type.to_string(),
        exp,
        iat: Some(chrono::Utc::now().timestamp()),
        jti: Some("cf6efb4b69334cf288dfeb024771be9e".to_string()),
        user_id,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key.as_bytes()),
    )
    .expect("token encodes")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_an_hour() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    #[test]
    fn accepts_valid_access_token() {
        let verifier = TokenVerifier::new("secret");
        let token = issue_test_token("secret", 7, "access", in_an_hour());

        let claims = verifier.verify(&token).unwrap();
        assert_eq!(claims.user_id, 7);
    }

    #[test]
    fn rejects_refresh_tokens() {
        let verifier = TokenVerifier::new("secret");
        let token = issue_test_token("secret", 7, "refresh", in_an_hour());

        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn rejects_expired_or_foreign_tokens() {
        let verifier = TokenVerifier::new("secret");
        let expired = issue_test_token("secret", 7, "access", chrono::Utc::now().timestamp() - 3600);
        let foreign = issue_test_token("other-secret", 7, "access", in_an_hour());

        assert!(verifier.verify(&expired).is_err());
        assert!(verifier.verify(&foreign).is_err());
        assert!(verifier.verify("not-a-jwt").is_err());
    }
}
