use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Represents a user in the `users` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Primary key ID (auto-incremented).
    #[sea_orm(primary_key)]
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Unique, lower-cased email address.
    pub email: String,
    /// Argon2 PHC string. Never leaves the server.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub account_type: AccountType,
    /// Avatar URL, an initials avatar until a picture is uploaded.
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Platform-wide role of an account.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AccountType {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "student")]
    Student,
    #[sea_orm(string_value = "teacher")]
    Teacher,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::profile::Entity")]
    Profile,
    #[sea_orm(has_many = "super::course::Entity")]
    Courses,
    #[sea_orm(has_many = "super::course_enrollment::Entity")]
    Enrollments,
    #[sea_orm(has_many = "super::rating_review::Entity")]
    Ratings,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Courses.def()
    }
}

impl Related<super::course_enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl Related<super::rating_review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ratings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Initials avatar used until the user uploads a display picture.
pub fn default_avatar(first_name: &str, last_name: &str) -> String {
    format!(
        "https://api.dicebear.com/5.x/initials/svg?seed={}%20{}",
        first_name.trim(),
        last_name.trim()
    )
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl Model {
    /// Hashes a password into an Argon2 PHC string.
    pub fn hash_password(password: &str) -> Result<String, DbErr> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DbErr::Custom(format!("Password hashing failed: {e}")))
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
        account_type: AccountType,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();
        let user = ActiveModel {
            first_name: Set(first_name.trim().to_owned()),
            last_name: Set(last_name.trim().to_owned()),
            email: Set(normalize_email(email)),
            password_hash: Set(Self::hash_password(password)?),
            account_type: Set(account_type),
            image: Set(default_avatar(first_name, last_name)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        user.insert(db).await
    }

    pub async fn find_by_id(db: &DbConn, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn find_by_email(db: &DbConn, email: &str) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::Email.eq(normalize_email(email)))
            .one(db)
            .await
    }

    /// Returns the user when the email exists and the password matches.
    pub async fn verify_credentials(
        db: &DbConn,
        email: &str,
        password: &str,
    ) -> Result<Option<Model>, DbErr> {
        Ok(Self::find_by_email(db, email)
            .await?
            .filter(|user| user.verify_password(password)))
    }

    pub fn verify_password(&self, password: &str) -> bool {
        match PasswordHash::new(&self.password_hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    pub async fn update_password<C: ConnectionTrait>(
        db: &C,
        id: i64,
        password: &str,
    ) -> Result<Model, DbErr> {
        let user = ActiveModel {
            id: Set(id),
            password_hash: Set(Self::hash_password(password)?),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        user.update(db).await
    }

    pub async fn update_image(db: &DbConn, id: i64, image: &str) -> Result<Model, DbErr> {
        let user = ActiveModel {
            id: Set(id),
            image: Set(image.to_owned()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        user.update(db).await
    }

    /// Changes the display name; empty values keep the current name.
    pub async fn update_names(
        db: &DbConn,
        id: i64,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<Model, DbErr> {
        let mut user = ActiveModel {
            id: Set(id),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        if let Some(first) = first_name.map(str::trim).filter(|s| !s.is_empty()) {
            user.first_name = Set(first.to_owned());
        }
        if let Some(last) = last_name.map(str::trim).filter(|s| !s.is_empty()) {
            user.last_name = Set(last.to_owned());
        }
        user.update(db).await
    }

    /// Deletes the account; dependent rows go with it through cascading keys.
    pub async fn delete(db: &DbConn, id: i64) -> Result<(), DbErr> {
        Entity::delete_by_id(id).exec(db).await?;
        Ok(())
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_admin(&self) -> bool {
        self.account_type == AccountType::Admin
    }
}
