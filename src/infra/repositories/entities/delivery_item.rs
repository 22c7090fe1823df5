use sea_orm::entity::prelude::*;

use super::parse_column;
use crate::domain::{ContentType, DeliveryItem};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "content_delivery_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub plan_id: Uuid,
    pub organization_id: Uuid,
    pub content_type: String,
    pub quantity: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::delivery_plan::Entity",
        from = "Column::PlanId",
        to = "super::delivery_plan::Column::Id",
        on_delete = "Cascade"
    )]
    Plan,
}

impl Related<super::delivery_plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plan.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for DeliveryItem {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(DeliveryItem {
            content_type: parse_column(
                &model.content_type,
                "content_delivery_items.content_type",
                ContentType::parse,
            )?,
            id: model.id,
            plan_id: model.plan_id,
            organization_id: model.organization_id,
            quantity: model.quantity,
            notes: model.notes,
        })
    }
}
