use serde::Deserialize;

/// Movie metadata resolved by the lookup, ready to be favorited.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewMovie {
    pub name: String,
    pub director: String,
    pub year: i32,
    pub poster_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserForm {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct MovieTitleForm {
    pub title: String,
}
