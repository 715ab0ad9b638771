use super::Claims;

/// Authenticated caller, passed explicitly to everything that needs a session.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Account id (from the `user_id` claim)
    pub user_id: i64,

    /// Raw bearer token, forwarded to the analysis backend
    token: String,

    claims: Claims,
}

impl AuthContext {
    pub fn new(claims: Claims, token: &str) -> Self {
        Self {
            user_id: claims.user_id,
            token: token.to_string(),
            claims,
        }
    }

    /// Get the raw JWT token
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Get the JWT claims
    pub fn claims(&self) -> &Claims {
        &self.claims
    }
}
