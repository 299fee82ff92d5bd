use crate::seed::{Seeder, run_seeder};
use crate::seeds::{
    category::CategorySeeder, course::CourseSeeder, enrollment::EnrollmentSeeder,
    rating::RatingSeeder, user::UserSeeder,
};
use colored::*;

mod seed;
mod seeds;

#[tokio::main]
async fn main() {
    let db = match db::connect().await {
        Ok(db) => db,
        Err(err) => {
            eprintln!("{} {}", "DB connection failed:".red(), err);
            std::process::exit(1);
        }
    };

    for (seeder, name) in [
        (Box::new(UserSeeder) as Box<dyn Seeder + Send + Sync>, "User"),
        (Box::new(CategorySeeder), "Category"),
        (Box::new(CourseSeeder), "Course"),
        (Box::new(EnrollmentSeeder), "Enrollment"),
        (Box::new(RatingSeeder), "Rating"),
    ] {
        run_seeder(&*seeder, name, &db).await;
    }
}
