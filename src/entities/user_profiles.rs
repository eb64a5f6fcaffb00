use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub user_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::profile_courses::Entity")]
    ProfileCourses,
    #[sea_orm(has_many = "super::profile_interests::Entity")]
    ProfileInterests,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::profile_courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProfileCourses.def()
    }
}

impl Related<super::profile_interests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProfileInterests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
