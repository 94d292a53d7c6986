use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub director: String,
    pub year: i32,
    pub poster_url: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_movie::Entity")]
    UserMovie,
}

impl Related<super::user_movie::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserMovie.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_movie::Relation::User.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::user_movie::Relation::Movie.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
