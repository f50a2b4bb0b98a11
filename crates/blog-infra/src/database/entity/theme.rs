//! Theme entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tb_tema")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Post,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for blog_core::domain::Theme {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            description: model.description,
        }
    }
}

impl From<blog_core::domain::Theme> for ActiveModel {
    fn from(theme: blog_core::domain::Theme) -> Self {
        Self {
            id: Set(theme.id),
            description: Set(theme.description),
        }
    }
}
