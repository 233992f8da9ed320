//! Coach profile entity (one-to-one with a COACH user).

use sea_orm::entity::prelude::*;

use crate::domain::Coach;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "coaches")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub experience_years: i32,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub profile_image_url: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::coach_link_skill::Entity")]
    CoachLinkSkill,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::coach_link_skill::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CoachLinkSkill.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Coach {
    fn from(model: Model) -> Self {
        Coach {
            id: model.id,
            user_id: model.user_id,
            experience_years: model.experience_years,
            description: model.description,
            profile_image_url: model.profile_image_url,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
