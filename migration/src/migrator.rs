use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202601010001_create_users::Migration),
            Box::new(migrations::m202601010002_create_profiles::Migration),
            Box::new(migrations::m202601010003_create_otps::Migration),
            Box::new(migrations::m202601010004_create_password_reset_tokens::Migration),
            Box::new(migrations::m202601010005_create_categories::Migration),
            Box::new(migrations::m202601010006_create_courses::Migration),
            Box::new(migrations::m202601010007_create_sections::Migration),
            Box::new(migrations::m202601010008_create_sub_sections::Migration),
            Box::new(migrations::m202601010009_create_course_enrollments::Migration),
            Box::new(migrations::m202601010010_create_course_progress::Migration),
            Box::new(migrations::m202601010011_create_ratings_and_reviews::Migration),
            Box::new(migrations::m202601010012_create_payment_orders::Migration),
        ]
    }
}
