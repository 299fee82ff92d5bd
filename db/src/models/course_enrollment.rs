use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, PaginatorTrait, QueryOrder};
use serde::{Deserialize, Serialize};

/// A student's access to a course.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "course_enrollments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub course_id: i64,
    pub enrolled_at: DateTime<Utc>,
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

impl Model {
    pub async fn create<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
        course_id: i64,
    ) -> Result<Model, DbErr> {
        let enrollment = ActiveModel {
            user_id: Set(user_id),
            course_id: Set(course_id),
            enrolled_at: Set(Utc::now()),
        };
        enrollment.insert(conn).await
    }

    pub async fn is_enrolled<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
        course_id: i64,
    ) -> Result<bool, DbErr> {
        Ok(Entity::find_by_id((user_id, course_id))
            .one(conn)
            .await?
            .is_some())
    }

    pub async fn count_for_course(db: &DbConn, course_id: i64) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Column::CourseId.eq(course_id))
            .count(db)
            .await
    }

    /// Course ids the user is enrolled in, most recent enrolment first.
    pub async fn course_ids_for_user(db: &DbConn, user_id: i64) -> Result<Vec<i64>, DbErr> {
        Ok(Entity::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_desc(Column::EnrolledAt)
            .all(db)
            .await?
            .into_iter()
            .map(|e| e.course_id)
            .collect())
    }
}
