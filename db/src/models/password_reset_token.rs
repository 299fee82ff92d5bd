use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::{Rng, thread_rng};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Only the SHA-256 of the emailed token is stored.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "password_reset_tokens")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    #[serde(skip_serializing)]
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn hash_token(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}

impl Model {
    /// Stores a fresh token for `user_id` and returns it with the raw value to email.
    pub async fn issue(
        db: &DbConn,
        user_id: i64,
        expiry_minutes: i64,
    ) -> Result<(Model, String), DbErr> {
        let raw = thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect::<String>();

        let now = Utc::now();
        let token = ActiveModel {
            user_id: Set(user_id),
            token_hash: Set(hash_token(&raw)),
            expires_at: Set(now + Duration::minutes(expiry_minutes)),
            used: Set(false),
            created_at: Set(now),
            ..Default::default()
        };
        let model = token.insert(db).await?;
        Ok((model, raw))
    }

    /// Looks up a token by its raw value regardless of state.
    pub async fn find_by_token(db: &DbConn, raw: &str) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::TokenHash.eq(hash_token(raw)))
            .one(db)
            .await
    }

    pub fn is_usable(&self) -> bool {
        !self.used && self.expires_at > Utc::now()
    }

    pub async fn mark_as_used<C: ConnectionTrait>(&self, db: &C) -> Result<(), DbErr> {
        let mut active_model: ActiveModel = self.clone().into();
        active_model.used = Set(true);
        active_model.update(db).await?;
        Ok(())
    }
}
