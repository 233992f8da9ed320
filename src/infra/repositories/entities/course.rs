//! Course database entity.

use sea_orm::entity::prelude::*;

use crate::domain::Course;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Owning coach's user id
    pub user_id: Uuid,
    pub skill_id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub start_at: DateTimeUtc,
    pub end_at: DateTimeUtc,
    pub max_participants: i32,
    pub meeting_url: String,
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
    #[sea_orm(
        belongs_to = "super::skill::Entity",
        from = "Column::SkillId",
        to = "super::skill::Column::Id"
    )]
    Skill,
    #[sea_orm(has_many = "super::course_booking::Entity")]
    CourseBooking,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::skill::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Skill.def()
    }
}

impl Related<super::course_booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseBooking.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Course {
    fn from(model: Model) -> Self {
        Course {
            id: model.id,
            user_id: model.user_id,
            skill_id: model.skill_id,
            name: model.name,
            description: model.description,
            start_at: model.start_at,
            end_at: model.end_at,
            max_participants: model.max_participants,
            meeting_url: model.meeting_url,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
