use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{FromQueryResult, JoinType, QueryOrder, QuerySelect, SqlErr};
use serde::{Deserialize, Serialize};

use super::course_enrollment::Model as Enrollment;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ratings_and_reviews")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,
    /// 1 to 5 inclusive.
    pub rating: i32,
    pub review: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id",
        on_delete = "Cascade"
    )]
    Course,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, thiserror::Error)]
pub enum RatingError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Rating must be between 1 and 5")]
    OutOfRange,

    #[error("Student is not enrolled in this course")]
    NotEnrolled,

    #[error("Course already reviewed by this user")]
    AlreadyReviewed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AverageRating {
    pub average_rating: f64,
    pub count: u64,
}

/// A review joined with its author and course for public listings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, FromQueryResult)]
pub struct ReviewListing {
    pub id: i64,
    pub rating: i32,
    pub review: String,
    pub created_at: DateTime<Utc>,
    pub course_id: i64,
    pub course_name: String,
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub image: String,
}

#[derive(Debug, FromQueryResult)]
struct RatingAggregate {
    average: Option<f64>,
    count: i64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl Model {
    /// Records a review after checking the range, enrolment and uniqueness rules.
    pub async fn create(
        db: &DbConn,
        user_id: i64,
        course_id: i64,
        rating: i32,
        review: &str,
    ) -> Result<Model, RatingError> {
        if !(1..=5).contains(&rating) {
            return Err(RatingError::OutOfRange);
        }
        if !Enrollment::is_enrolled(db, user_id, course_id).await? {
            return Err(RatingError::NotEnrolled);
        }
        if Self::find_for(db, user_id, course_id).await?.is_some() {
            return Err(RatingError::AlreadyReviewed);
        }

        let model = ActiveModel {
            user_id: Set(user_id),
            course_id: Set(course_id),
            rating: Set(rating),
            review: Set(review.trim().to_owned()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        model.insert(db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => RatingError::AlreadyReviewed,
            _ => RatingError::Database(e),
        })
    }

    pub async fn find_for(
        db: &DbConn,
        user_id: i64,
        course_id: i64,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::CourseId.eq(course_id))
            .one(db)
            .await
    }

    /// Average rounded to two decimals; zero when the course has no reviews.
    pub async fn average_for_course(db: &DbConn, course_id: i64) -> Result<AverageRating, DbErr> {
        let aggregate = Entity::find()
            .select_only()
            .expr_as(Func::avg(Expr::col((Entity, Column::Rating))), "average")
            .expr_as(Func::count(Expr::col((Entity, Column::Id))), "count")
            .filter(Column::CourseId.eq(course_id))
            .into_model::<RatingAggregate>()
            .one(db)
            .await?;

        Ok(match aggregate {
            Some(RatingAggregate { average: Some(avg), count }) if count > 0 => AverageRating {
                average_rating: round2(avg),
                count: count as u64,
            },
            _ => AverageRating::default(),
        })
    }

    /// Every review with author and course name, highest rating first.
    pub async fn list_all(db: &DbConn) -> Result<Vec<ReviewListing>, DbErr> {
        Entity::find()
            .select_only()
            .column(Column::Id)
            .column(Column::Rating)
            .column(Column::Review)
            .column(Column::CreatedAt)
            .column(Column::CourseId)
            .column(Column::UserId)
            .column(super::course::Column::CourseName)
            .column(super::user::Column::FirstName)
            .column(super::user::Column::LastName)
            .column(super::user::Column::Image)
            .join(JoinType::InnerJoin, Relation::User.def())
            .join(JoinType::InnerJoin, Relation::Course.def())
            .order_by_desc(Column::Rating)
            .order_by_desc(Column::CreatedAt)
            .into_model::<ReviewListing>()
            .all(db)
            .await
    }
}
