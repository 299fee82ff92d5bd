use crate::seed::Seeder;
use db::models::category::Model;
use sea_orm::{DatabaseConnection, DbErr};

pub struct CategorySeeder;

const CATEGORIES: [(&str, &str); 6] = [
    ("Web Development", "Servers, browsers and everything between"),
    ("Systems Programming", "Operating systems, memory and performance"),
    ("Data Science", "Statistics, notebooks and machine learning"),
    ("Mobile Development", "Native and cross-platform apps"),
    ("DevOps", "Pipelines, containers and infrastructure"),
    ("Design", "Interfaces, typography and colour"),
];

#[async_trait::async_trait]
impl Seeder for CategorySeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let existing: Vec<String> = Model::all(db).await?.into_iter().map(|c| c.name).collect();
        for (name, description) in CATEGORIES {
            if existing.iter().any(|n| n == name) {
                continue;
            }
            Model::create(db, name, description).await?;
        }
        Ok(())
    }
}
