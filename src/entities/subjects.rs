use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "subjects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::course_subjects::Entity")]
    CourseSubjects,
}

impl Related<super::course_subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseSubjects.def()
    }
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        super::course_subjects::Relation::Course.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::course_subjects::Relation::Subject.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
