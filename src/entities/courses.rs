use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: String,
    pub instructor: String,
    pub provider_id: Option<i32>,
    pub url: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::providers::Entity",
        from = "Column::ProviderId",
        to = "super::providers::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Provider,
    #[sea_orm(has_many = "super::course_subjects::Entity")]
    CourseSubjects,
}

impl Related<super::providers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Provider.def()
    }
}

impl Related<super::course_subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseSubjects.def()
    }
}

impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        super::course_subjects::Relation::Subject.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::course_subjects::Relation::Course.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
