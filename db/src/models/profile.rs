use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Optional personal details, one row per user.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub user_id: i64,
    pub gender: Option<String>,
    /// `YYYY-MM-DD`
    pub date_of_birth: Option<String>,
    pub about: Option<String>,
    pub contact_number: Option<String>,
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
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fields a user may change on their profile. `None` leaves a value untouched.
#[derive(Debug, Default, Clone)]
pub struct ProfileChanges {
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
    pub about: Option<String>,
    pub contact_number: Option<String>,
}

impl Model {
    pub async fn create_empty<C: ConnectionTrait>(
        db: &C,
        user_id: i64,
        contact_number: Option<&str>,
    ) -> Result<Model, DbErr> {
        let profile = ActiveModel {
            user_id: Set(user_id),
            gender: Set(None),
            date_of_birth: Set(None),
            about: Set(None),
            contact_number: Set(contact_number.map(str::to_owned)),
            ..Default::default()
        };
        profile.insert(db).await
    }

    pub async fn find_by_user(db: &DbConn, user_id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::UserId.eq(user_id))
            .one(db)
            .await
    }

    /// Applies `changes`, creating the profile first if the user has none.
    pub async fn update_for_user(
        db: &DbConn,
        user_id: i64,
        changes: ProfileChanges,
    ) -> Result<Model, DbErr> {
        let existing = match Self::find_by_user(db, user_id).await? {
            Some(profile) => profile,
            None => Self::create_empty(db, user_id, None).await?,
        };

        let mut active: ActiveModel = existing.into();
        if let Some(gender) = changes.gender {
            active.gender = Set(Some(gender));
        }
        if let Some(dob) = changes.date_of_birth {
            active.date_of_birth = Set(Some(dob));
        }
        if let Some(about) = changes.about {
            active.about = Set(Some(about));
        }
        if let Some(contact) = changes.contact_number {
            active.contact_number = Set(Some(contact));
        }
        active.update(db).await
    }
}
