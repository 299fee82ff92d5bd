use db::models::user::{self, AccountType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: i64,
    pub email: String,
    pub account_type: AccountType,
    pub exp: usize,
}

/// Decoded, unverified-against-the-database token claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

/// The caller's account as re-loaded from the database by the guards.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub user::Model);
