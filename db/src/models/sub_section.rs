use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{JoinType, PaginatorTrait, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};

/// A single lecture video inside a section.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sub_sections")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub section_id: i64,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub duration_seconds: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::section::Entity",
        from = "Column::SectionId",
        to = "super::section::Column::Id",
        on_delete = "Cascade"
    )]
    Section,
}

impl Related<super::section::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Section.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone)]
pub struct NewSubSection {
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub duration_seconds: i32,
}

#[derive(Debug, Clone, Default)]
pub struct SubSectionChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub duration_seconds: Option<i32>,
}

impl Model {
    pub async fn create(db: &DbConn, section_id: i64, new: NewSubSection) -> Result<Model, DbErr> {
        let now = Utc::now();
        let sub_section = ActiveModel {
            section_id: Set(section_id),
            title: Set(new.title),
            description: Set(new.description),
            video_url: Set(new.video_url),
            duration_seconds: Set(new.duration_seconds.max(0)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        sub_section.insert(db).await
    }

    pub async fn find_in_section(
        db: &DbConn,
        section_id: i64,
        id: i64,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id)
            .filter(Column::SectionId.eq(section_id))
            .one(db)
            .await
    }

    /// The subsection, only if one of `course_id`'s sections holds it.
    pub async fn find_in_course(
        db: &DbConn,
        course_id: i64,
        id: i64,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id)
            .join(JoinType::InnerJoin, Relation::Section.def())
            .filter(super::section::Column::CourseId.eq(course_id))
            .one(db)
            .await
    }

    pub async fn list_for_sections(db: &DbConn, section_ids: &[i64]) -> Result<Vec<Model>, DbErr> {
        if section_ids.is_empty() {
            return Ok(Vec::new());
        }
        Entity::find()
            .filter(Column::SectionId.is_in(section_ids.to_vec()))
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    pub async fn list_for_course(db: &DbConn, course_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .join(JoinType::InnerJoin, Relation::Section.def())
            .filter(super::section::Column::CourseId.eq(course_id))
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    pub async fn count_for_course(db: &DbConn, course_id: i64) -> Result<u64, DbErr> {
        Entity::find()
            .join(JoinType::InnerJoin, Relation::Section.def())
            .filter(super::section::Column::CourseId.eq(course_id))
            .count(db)
            .await
    }

    pub async fn update(db: &DbConn, id: i64, changes: SubSectionChanges) -> Result<Model, DbErr> {
        let mut sub_section = ActiveModel {
            id: Set(id),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        if let Some(title) = changes.title {
            sub_section.title = Set(title);
        }
        if let Some(description) = changes.description {
            sub_section.description = Set(description);
        }
        if let Some(url) = changes.video_url {
            sub_section.video_url = Set(url);
        }
        if let Some(seconds) = changes.duration_seconds {
            sub_section.duration_seconds = Set(seconds.max(0));
        }
        sub_section.update(db).await
    }

    pub async fn delete(db: &DbConn, id: i64) -> Result<(), DbErr> {
        Entity::delete_by_id(id).exec(db).await?;
        Ok(())
    }
}

/// Sum of lecture lengths in seconds.
pub fn total_seconds(sub_sections: &[Model]) -> i64 {
    sub_sections
        .iter()
        .map(|s| i64::from(s.duration_seconds))
        .sum()
}
