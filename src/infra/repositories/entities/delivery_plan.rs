use sea_orm::entity::prelude::*;

use crate::domain::DeliveryPlan;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "content_delivery_plans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub month: Date,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::delivery_item::Entity")]
    Items,
}

impl Related<super::delivery_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for DeliveryPlan {
    fn from(model: Model) -> Self {
        DeliveryPlan {
            id: model.id,
            organization_id: model.organization_id,
            name: model.name,
            month: model.month,
            description: model.description,
            created_by: model.created_by,
            created_at: model.created_at,
        }
    }
}
