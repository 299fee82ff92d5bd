use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::QueryOrder;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_name: String,
    pub course_description: String,
    pub instructor_id: i64,
    pub what_you_will_learn: String,
    /// Whole currency units.
    pub price: i64,
    pub thumbnail: String,
    pub category_id: i64,
    /// JSON array of strings.
    #[sea_orm(column_type = "Json")]
    pub tags: Value,
    /// JSON array of strings.
    #[sea_orm(column_type = "Json")]
    pub instructions: Value,
    pub status: CourseStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "course_status")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CourseStatus {
    #[default]
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "published")]
    Published,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::InstructorId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Instructor,
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "Restrict"
    )]
    Category,
    #[sea_orm(has_many = "super::section::Entity")]
    Sections,
    #[sea_orm(has_many = "super::course_enrollment::Entity")]
    Enrollments,
    #[sea_orm(has_many = "super::rating_review::Entity")]
    Ratings,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Instructor.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::section::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sections.def()
    }
}

impl Related<super::course_enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl Related<super::rating_review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ratings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Highest price a course may be listed at, in whole currency units.
pub const MAX_PRICE: i64 = 10_000_000;

/// Everything needed to create a course.
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub course_name: String,
    pub course_description: String,
    pub instructor_id: i64,
    pub what_you_will_learn: String,
    pub price: i64,
    pub thumbnail: String,
    pub category_id: i64,
    pub tags: Vec<String>,
    pub instructions: Vec<String>,
    pub status: CourseStatus,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct CourseChanges {
    pub course_name: Option<String>,
    pub course_description: Option<String>,
    pub what_you_will_learn: Option<String>,
    pub price: Option<i64>,
    pub thumbnail: Option<String>,
    pub category_id: Option<i64>,
    pub tags: Option<Vec<String>>,
    pub instructions: Option<Vec<String>>,
    pub status: Option<CourseStatus>,
}

fn string_list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}

impl Model {
    pub async fn create(db: &DbConn, new: NewCourse) -> Result<Model, DbErr> {
        let now = Utc::now();
        let course = ActiveModel {
            course_name: Set(new.course_name),
            course_description: Set(new.course_description),
            instructor_id: Set(new.instructor_id),
            what_you_will_learn: Set(new.what_you_will_learn),
            price: Set(new.price),
            thumbnail: Set(new.thumbnail),
            category_id: Set(new.category_id),
            tags: Set(Value::from(new.tags)),
            instructions: Set(Value::from(new.instructions)),
            status: Set(new.status),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        course.insert(db).await
    }

    pub async fn find_by_id(db: &DbConn, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn find_published(db: &DbConn, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id)
            .filter(Column::Status.eq(CourseStatus::Published))
            .one(db)
            .await
    }

    pub async fn find_many_by_ids(db: &DbConn, ids: &[i64]) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::Id.is_in(ids.to_vec()))
            .all(db)
            .await
    }

    /// Published courses, newest first.
    pub async fn list_published(db: &DbConn) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::Status.eq(CourseStatus::Published))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(db)
            .await
    }

    pub async fn list_published_in_category(
        db: &DbConn,
        category_id: i64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::CategoryId.eq(category_id))
            .filter(Column::Status.eq(CourseStatus::Published))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(db)
            .await
    }

    /// All of an instructor's courses regardless of status, newest first.
    pub async fn list_by_instructor(db: &DbConn, instructor_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::InstructorId.eq(instructor_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(db)
            .await
    }

    pub async fn update(db: &DbConn, id: i64, changes: CourseChanges) -> Result<Model, DbErr> {
        let mut course = ActiveModel {
            id: Set(id),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };

        if let Some(name) = changes.course_name {
            course.course_name = Set(name);
        }
        if let Some(description) = changes.course_description {
            course.course_description = Set(description);
        }
        if let Some(learn) = changes.what_you_will_learn {
            course.what_you_will_learn = Set(learn);
        }
        if let Some(price) = changes.price {
            course.price = Set(price);
        }
        if let Some(thumbnail) = changes.thumbnail {
            course.thumbnail = Set(thumbnail);
        }
        if let Some(category_id) = changes.category_id {
            course.category_id = Set(category_id);
        }
        if let Some(tags) = changes.tags {
            course.tags = Set(Value::from(tags));
        }
        if let Some(instructions) = changes.instructions {
            course.instructions = Set(Value::from(instructions));
        }
        if let Some(status) = changes.status {
            course.status = Set(status);
        }

        course.update(db).await
    }

    /// Sections, subsections, enrolments, progress and ratings cascade.
    pub async fn delete(db: &DbConn, id: i64) -> Result<(), DbErr> {
        Entity::delete_by_id(id).exec(db).await?;
        Ok(())
    }

    pub fn is_published(&self) -> bool {
        self.status == CourseStatus::Published
    }

    pub fn tag_list(&self) -> Vec<String> {
        string_list(&self.tags)
    }

    pub fn instruction_list(&self) -> Vec<String> {
        string_list(&self.instructions)
    }
}
