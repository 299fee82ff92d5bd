use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sections")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub section_name: String,
    /// Display order inside the course, starting at 1.
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id",
        on_delete = "Cascade"
    )]
    Course,
    #[sea_orm(has_many = "super::sub_section::Entity")]
    SubSections,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::sub_section::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubSections.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Appends a section after the course's current last one.
    pub async fn create(db: &DbConn, course_id: i64, section_name: &str) -> Result<Model, DbErr> {
        let last: Option<i32> = Entity::find()
            .select_only()
            .column(Column::Position)
            .filter(Column::CourseId.eq(course_id))
            .order_by_desc(Column::Position)
            .limit(1)
            .into_tuple()
            .one(db)
            .await?;

        let now = Utc::now();
        let section = ActiveModel {
            course_id: Set(course_id),
            section_name: Set(section_name.trim().to_owned()),
            position: Set(last.unwrap_or(0) + 1),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        section.insert(db).await
    }

    /// The section, only if it belongs to `course_id`.
    pub async fn find_in_course(
        db: &DbConn,
        course_id: i64,
        section_id: i64,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(section_id)
            .filter(Column::CourseId.eq(course_id))
            .one(db)
            .await
    }

    pub async fn list_for_course(db: &DbConn, course_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::CourseId.eq(course_id))
            .order_by_asc(Column::Position)
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    pub async fn rename(db: &DbConn, id: i64, section_name: &str) -> Result<Model, DbErr> {
        let section = ActiveModel {
            id: Set(id),
            section_name: Set(section_name.trim().to_owned()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        section.update(db).await
    }

    pub async fn delete(db: &DbConn, id: i64) -> Result<(), DbErr> {
        Entity::delete_by_id(id).exec(db).await?;
        Ok(())
    }
}
