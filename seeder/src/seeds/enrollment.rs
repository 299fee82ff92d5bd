use crate::seed::Seeder;
use crate::seeds::users_of_type;
use db::enrollment::{EnrollmentError, enroll};
use db::models::{course, course_enrollment, sub_section, user::AccountType};
use db::progress::mark_complete;
use sea_orm::{DatabaseConnection, DbErr};

pub struct EnrollmentSeeder;

#[async_trait::async_trait]
impl Seeder for EnrollmentSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let courses = course::Model::list_published(db).await?;
        if courses.is_empty() {
            return Ok(());
        }

        for student in users_of_type(db, AccountType::Student).await? {
            if !course_enrollment::Model::course_ids_for_user(db, student.id)
                .await?
                .is_empty()
            {
                continue;
            }

            for _ in 0..fastrand::usize(1..=3) {
                let course = &courses[fastrand::usize(..courses.len())];
                match enroll(db, student.id, course.id).await {
                    Ok(()) => {}
                    Err(EnrollmentError::AlreadyEnrolled(_)) => continue,
                    Err(EnrollmentError::Database(e)) => return Err(e),
                    Err(e) => return Err(DbErr::Custom(e.to_string())),
                }

                // Some of the lectures are already watched
                for lecture in sub_section::Model::list_for_course(db, course.id).await? {
                    if fastrand::bool() {
                        let _ = mark_complete(db, student.id, course.id, lecture.id).await;
                    }
                }
            }
        }

        Ok(())
    }
}
