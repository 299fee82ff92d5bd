use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A subsection a student has finished watching.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "completed_videos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub progress_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub sub_section_id: i64,
    pub completed_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course_progress::Entity",
        from = "Column::ProgressId",
        to = "super::course_progress::Column::Id",
        on_delete = "Cascade"
    )]
    Progress,
    #[sea_orm(
        belongs_to = "super::sub_section::Entity",
        from = "Column::SubSectionId",
        to = "super::sub_section::Column::Id",
        on_delete = "Cascade"
    )]
    SubSection,
}

impl Related<super::course_progress::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Progress.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(db: &DbConn, progress_id: i64, sub_section_id: i64) -> Result<Model, DbErr> {
        let completed = ActiveModel {
            progress_id: Set(progress_id),
            sub_section_id: Set(sub_section_id),
            completed_at: Set(Utc::now()),
        };
        completed.insert(db).await
    }

    pub async fn exists(db: &DbConn, progress_id: i64, sub_section_id: i64) -> Result<bool, DbErr> {
        Ok(Entity::find_by_id((progress_id, sub_section_id))
            .one(db)
            .await?
            .is_some())
    }

    pub async fn sub_section_ids(db: &DbConn, progress_id: i64) -> Result<Vec<i64>, DbErr> {
        Ok(Entity::find()
            .filter(Column::ProgressId.eq(progress_id))
            .all(db)
            .await?
            .into_iter()
            .map(|c| c.sub_section_id)
            .collect())
    }
}
