use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::ConnectionTrait;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

/// A checkout created with the payment gateway, settled on verification.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub gateway_order_id: String,
    pub user_id: i64,
    /// Minor currency units (paise, cents).
    pub amount: i64,
    pub currency: String,
    /// JSON array of course ids.
    #[sea_orm(column_type = "Json")]
    pub course_ids: Value,
    pub status: PaymentStatus,
    pub payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_status")]
#[strum(serialize_all = "lowercase")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "created")]
    Created,
    #[sea_orm(string_value = "paid")]
    Paid,
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

impl Model {
    pub async fn create(
        db: &DbConn,
        gateway_order_id: &str,
        user_id: i64,
        amount: i64,
        currency: &str,
        course_ids: &[i64],
    ) -> Result<Model, DbErr> {
        let now = Utc::now();
        let order = ActiveModel {
            gateway_order_id: Set(gateway_order_id.to_owned()),
            user_id: Set(user_id),
            amount: Set(amount),
            currency: Set(currency.to_owned()),
            course_ids: Set(Value::from(course_ids.to_vec())),
            status: Set(PaymentStatus::Created),
            payment_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        order.insert(db).await
    }

    pub async fn find_by_gateway_id<C: ConnectionTrait>(
        conn: &C,
        gateway_order_id: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::GatewayOrderId.eq(gateway_order_id))
            .one(conn)
            .await
    }

    pub async fn mark_paid<C: ConnectionTrait>(
        conn: &C,
        id: i64,
        payment_id: &str,
    ) -> Result<Model, DbErr> {
        let order = ActiveModel {
            id: Set(id),
            status: Set(PaymentStatus::Paid),
            payment_id: Set(Some(payment_id.to_owned())),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        order.update(conn).await
    }

    pub fn course_id_list(&self) -> Vec<i64> {
        self.course_ids
            .as_array()
            .map(|ids| ids.iter().filter_map(Value::as_i64).collect())
            .unwrap_or_default()
    }

    pub fn is_paid(&self) -> bool {
        self.status == PaymentStatus::Paid
    }
}
