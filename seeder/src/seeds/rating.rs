use crate::seed::Seeder;
use crate::seeds::users_of_type;
use db::models::{
    course_enrollment,
    rating_review::{self, RatingError},
    user::AccountType,
};
use fake::{Fake, faker::lorem::en::Sentence};
use sea_orm::{DatabaseConnection, DbErr};

pub struct RatingSeeder;

#[async_trait::async_trait]
impl Seeder for RatingSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        for student in users_of_type(db, AccountType::Student).await? {
            for course_id in course_enrollment::Model::course_ids_for_user(db, student.id).await? {
                // Roughly two thirds of enrolments leave a review
                if fastrand::u8(..3) == 0 {
                    continue;
                }
                let review: String = Sentence(4..12).fake();
                match rating_review::Model::create(
                    db,
                    student.id,
                    course_id,
                    fastrand::i32(2..=5),
                    &review,
                )
                .await
                {
                    Ok(_) | Err(RatingError::AlreadyReviewed) => {}
                    Err(RatingError::Database(e)) => return Err(e),
                    Err(e) => return Err(DbErr::Custom(e.to_string())),
                }
            }
        }
        Ok(())
    }
}
