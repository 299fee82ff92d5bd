pub mod category;
pub mod course;
pub mod enrollment;
pub mod rating;
pub mod user;

use db::models::user::{self as user_model, AccountType};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};

pub const SEED_PASSWORD: &str = "password123";

pub(crate) async fn users_of_type(
    db: &DatabaseConnection,
    account_type: AccountType,
) -> Result<Vec<user_model::Model>, DbErr> {
    user_model::Entity::find()
        .filter(user_model::Column::AccountType.eq(account_type))
        .all(db)
        .await
}
