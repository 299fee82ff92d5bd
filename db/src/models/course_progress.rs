use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::ConnectionTrait;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Progress record created alongside each enrolment.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "course_progress")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,
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
    #[sea_orm(has_many = "super::completed_video::Entity")]
    CompletedVideos,
}

impl Related<super::completed_video::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompletedVideos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
        course_id: i64,
    ) -> Result<Model, DbErr> {
        let progress = ActiveModel {
            user_id: Set(user_id),
            course_id: Set(course_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        progress.insert(conn).await
    }

    pub async fn find_for<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
        course_id: i64,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::CourseId.eq(course_id))
            .one(conn)
            .await
    }
}
