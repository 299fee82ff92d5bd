use crate::seed::Seeder;
use crate::seeds::users_of_type;
use db::models::{
    category,
    course::{self, CourseStatus, NewCourse},
    section,
    sub_section::{self, NewSubSection},
    user::AccountType,
};
use fake::{
    Fake,
    faker::lorem::en::{Paragraph, Sentence, Words},
};
use sea_orm::{DatabaseConnection, DbErr};

pub struct CourseSeeder;

const PRICES: [i64; 5] = [0, 199, 499, 999, 1999];

#[async_trait::async_trait]
impl Seeder for CourseSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let categories = category::Model::all(db).await?;
        if categories.is_empty() {
            return Ok(());
        }

        for teacher in users_of_type(db, AccountType::Teacher).await? {
            if !course::Model::list_by_instructor(db, teacher.id).await?.is_empty() {
                continue;
            }

            for n in 0..4 {
                let category = &categories[fastrand::usize(..categories.len())];
                let title: String = Sentence(2..5).fake();
                let tags: Vec<String> = Words(2..4).fake();
                // Every fourth course stays a draft
                let status = if n == 3 {
                    CourseStatus::Draft
                } else {
                    CourseStatus::Published
                };

                let created = course::Model::create(
                    db,
                    NewCourse {
                        course_name: title.trim_end_matches('.').to_string(),
                        course_description: Paragraph(1..3).fake(),
                        instructor_id: teacher.id,
                        what_you_will_learn: Paragraph(1..2).fake(),
                        price: PRICES[fastrand::usize(..PRICES.len())],
                        thumbnail: format!("https://picsum.photos/seed/course{}/640/360", fastrand::u32(..)),
                        category_id: category.id,
                        tags,
                        instructions: vec![
                            "Bring a laptop".to_string(),
                            "Work through the exercises in order".to_string(),
                        ],
                        status,
                    },
                )
                .await?;

                for s in 1..=fastrand::usize(2..=4) {
                    let section =
                        section::Model::create(db, created.id, &format!("Part {s}")).await?;
                    for _ in 0..fastrand::usize(2..=5) {
                        let lecture: String = Sentence(2..6).fake();
                        sub_section::Model::create(
                            db,
                            section.id,
                            NewSubSection {
                                title: lecture.trim_end_matches('.').to_string(),
                                description: Sentence(6..12).fake(),
                                video_url: "https://samplelib.com/lib/preview/mp4/sample-5s.mp4"
                                    .to_string(),
                                duration_seconds: fastrand::i32(120..1800),
                            },
                        )
                        .await?;
                    }
                }
            }
        }

        Ok(())
    }
}
