pub mod claims;
pub mod extractors;
pub mod guards;
pub mod middleware;

pub use claims::{AuthUser, Claims, CurrentUser};

use chrono::{Duration, Utc};
use db::models::user::AccountType;
use jsonwebtoken::{EncodingKey, Header, encode};
use util::config::AppConfig;

/// Name of the cookie carrying the session token.
pub const TOKEN_COOKIE: &str = "token";

/// Generates a JWT and its RFC 3339 expiry timestamp for a given user.
pub fn generate_jwt(
    user_id: i64,
    email: &str,
    account_type: AccountType,
) -> Result<(String, String), jsonwebtoken::errors::Error> {
    let (secret, duration) = {
        let config = AppConfig::global();
        (config.jwt_secret.clone(), config.jwt_duration_minutes)
    };

    let expiry = Utc::now() + Duration::minutes(duration as i64);
    let claims = Claims {
        sub: user_id,
        email: email.to_owned(),
        account_type,
        exp: expiry.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok((token, expiry.to_rfc3339()))
}
