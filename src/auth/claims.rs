use serde::{Deserialize, Serialize};

/// Access-token claims issued by the accounts backend (SimpleJWT layout).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// "access" or "refresh"
    pub token_type: String,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: Option<i64>,

    /// Token id
    #[serde(default)]
    pub jti: Option<String>,

    /// Account id
    pub user_id: i64,
}

impl Claims {
    pub fn is_access(&self) -> bool {
        self.token_type == "access"
    }
}
