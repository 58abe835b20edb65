//! Signed admin tokens. There is a single shared credential, so the only
//! embedded claim besides expiry is the fixed admin role.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminClaims {
    pub exp: i64,
    pub role: String,
}

pub fn issue_admin_token(
    secret: &[u8],
    hours: u64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = AdminClaims {
        exp: (Utc::now() + Duration::hours(hours as i64)).timestamp(),
        role: ADMIN_ROLE.to_string(),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret))
}

pub fn verify_admin_token(
    token: &str,
    secret: &[u8],
) -> Result<AdminClaims, jsonwebtoken::errors::Error> {
    let data = decode::<AdminClaims>(
        token,
        &DecodingKey::from_secret(secret),
        &Validation::default(),
    )?;
    Ok(data.claims)
}
