use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use axum_extra::extract::{CookieJar, TypedHeader};
use headers::{Authorization, authorization::Bearer};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use util::config::AppConfig;

use crate::auth::TOKEN_COOKIE;
use crate::auth::claims::{AuthUser, Claims, CurrentUser};

/// Decodes and validates an HS256 session token.
pub fn decode_token(token: &str) -> Option<Claims> {
    let secret = AppConfig::global().jwt_secret.clone();
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .ok()
    .map(|data| data.claims)
}

/// Reads the session token from the `Authorization: Bearer` header, falling
/// back to the `token` cookie.
async fn token_from_parts<S: Send + Sync>(parts: &mut Parts, state: &S) -> Option<String> {
    if let Ok(TypedHeader(Authorization(bearer))) =
        TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await
    {
        return Some(bearer.token().to_owned());
    }

    let jar = CookieJar::from_headers(&parts.headers);
    jar.get(TOKEN_COOKIE)
        .map(|c| c.value().to_owned())
        .filter(|v| !v.is_empty())
}

/// Extracts `AuthUser` from a bearer header or the session cookie.
///
/// # Errors
/// - `401 Unauthorized` if no token is present or it is invalid or expired.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = token_from_parts(parts, state)
            .await
            .ok_or((StatusCode::UNAUTHORIZED, "Missing authentication token"))?;

        decode_token(&token)
            .map(AuthUser)
            .ok_or((StatusCode::UNAUTHORIZED, "Invalid or expired token"))
    }
}

/// Reads the account a guard placed in the request extensions.
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or((StatusCode::UNAUTHORIZED, "Authentication required"))
    }
}
