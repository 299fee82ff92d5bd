use crate::seed::Seeder;
use crate::seeds::SEED_PASSWORD;
use db::models::{
    profile,
    user::{AccountType, Model},
};
use fake::{
    Fake,
    faker::name::en::{FirstName, LastName},
};
use sea_orm::{DatabaseConnection, DbErr};

pub struct UserSeeder;

async fn create_with_profile(
    db: &DatabaseConnection,
    first_name: &str,
    last_name: &str,
    email: &str,
    account_type: AccountType,
) -> Result<(), DbErr> {
    if Model::find_by_email(db, email).await?.is_some() {
        return Ok(());
    }
    let user = Model::create(db, first_name, last_name, email, SEED_PASSWORD, account_type).await?;
    profile::Model::create_empty(db, user.id, None).await?;
    Ok(())
}

#[async_trait::async_trait]
impl Seeder for UserSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        // Fixed accounts
        create_with_profile(db, "Site", "Admin", "admin@example.com", AccountType::Admin).await?;
        create_with_profile(db, "Terry", "Teacher", "teacher@example.com", AccountType::Teacher).await?;
        create_with_profile(db, "Sam", "Student", "student@example.com", AccountType::Student).await?;

        for i in 1..=3 {
            let first: String = FirstName().fake();
            let last: String = LastName().fake();
            let email = format!("teacher{i}@example.com");
            create_with_profile(db, &first, &last, &email, AccountType::Teacher).await?;
        }

        for i in 1..=20 {
            let first: String = FirstName().fake();
            let last: String = LastName().fake();
            let email = format!("student{i}@example.com");
            create_with_profile(db, &first, &last, &email, AccountType::Student).await?;
        }

        Ok(())
    }
}
