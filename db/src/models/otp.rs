use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};

/// One-time signup code sent to an email address.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "otps")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Result of checking a submitted code against the latest one issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpCheck {
    Valid,
    Missing,
    Expired,
    Mismatch,
}

/// A random six digit code, zero padded.
pub fn generate_code() -> String {
    let n: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{n:06}")
}

impl Model {
    pub async fn issue(db: &DbConn, email: &str, expiry_minutes: i64) -> Result<Model, DbErr> {
        let now = Utc::now();
        let otp = ActiveModel {
            email: Set(super::user::normalize_email(email)),
            code: Set(generate_code()),
            created_at: Set(now),
            expires_at: Set(now + Duration::minutes(expiry_minutes)),
            ..Default::default()
        };
        otp.insert(db).await
    }

    /// Most recently issued code for `email`.
    pub async fn latest_for(db: &DbConn, email: &str) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::Email.eq(super::user::normalize_email(email)))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .limit(1)
            .one(db)
            .await
    }

    /// Only the latest code counts; earlier codes are ignored even if they match.
    pub async fn check(db: &DbConn, email: &str, code: &str) -> Result<OtpCheck, DbErr> {
        let Some(latest) = Self::latest_for(db, email).await? else {
            return Ok(OtpCheck::Missing);
        };
        if latest.expires_at <= Utc::now() {
            return Ok(OtpCheck::Expired);
        }
        if latest.code != code.trim() {
            return Ok(OtpCheck::Mismatch);
        }
        Ok(OtpCheck::Valid)
    }

    pub async fn clear_for<C: ConnectionTrait>(db: &C, email: &str) -> Result<u64, DbErr> {
        let res = Entity::delete_many()
            .filter(Column::Email.eq(super::user::normalize_email(email)))
            .exec(db)
            .await?;
        Ok(res.rows_affected)
    }
}
