//! Application JWTs issued after a successful Google sign-in.

use chrono::Utc;
use core_access::User;
use jsonwebtoken::{
    decode, encode, errors::Error as JwtError, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

/// Represents the claims we put into, and expect to find in, the JWT.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The subject of the token: the user's database id.
    pub sub: String,
    /// The expiration timestamp.
    pub exp: usize,
    /// The role at issue time. Informational; authorization re-reads the user row.
    #[serde(default)]
    pub role: String,
}

/// Signs a token for `user` that expires `ttl_secs` from now.
pub fn issue_token(user: &User, secret: &str, ttl_secs: u64) -> Result<String, JwtError> {
    let exp = Utc::now().timestamp().max(0) as u64 + ttl_secs;
    let claims = Claims {
        sub: user.id.clone(),
        exp: exp as usize,
        role: user.role.clone(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verifies the signature and expiry of `token`.
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}
