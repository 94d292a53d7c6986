use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info, warn};

use crate::{
    entities::{movie, user, user_movie},
    models::NewMovie,
};

/// Storage operations for users and their favorite movies.
///
/// Failures never escape: reads fall back to empty results, writes roll back
/// and report `false`/`None`. Every failure is logged.
#[derive(Clone)]
pub struct DataManager {
    db: DatabaseConnection,
}

impl DataManager {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn list_users(&self) -> Vec<user::Model> {
        match user::Entity::find().order_by_asc(user::Column::Name).all(&self.db).await {
            Ok(users) => users,
            Err(err) => {
                warn!(error = %err, "failed to list users");
                Vec::new()
            },
        }
    }

    pub async fn find_user(&self, user_id: i32) -> Option<user::Model> {
        match user::Entity::find_by_id(user_id).one(&self.db).await {
            Ok(user) => user,
            Err(err) => {
                warn!(user_id, error = %err, "failed to load user");
                None
            },
        }
    }

    /// Whether the movie is in the user's favorites. `false` on storage error.
    pub async fn has_favorite(&self, user_id: i32, movie_id: i32) -> bool {
        match user_movie::Entity::find_by_id((user_id, movie_id)).one(&self.db).await {
            Ok(relation) => relation.is_some(),
            Err(err) => {
                warn!(user_id, movie_id, error = %err, "failed to load favorite");
                false
            },
        }
    }

    pub async fn list_favorites(&self, user_id: i32) -> Vec<movie::Model> {
        match self.try_list_favorites(user_id).await {
            Ok(movies) => movies,
            Err(err) => {
                warn!(user_id, error = %err, "failed to list favorites");
                Vec::new()
            },
        }
    }

    pub async fn create_user(&self, name: &str) -> Option<user::Model> {
        match self.try_create_user(name).await {
            Ok(user) => {
                info!(user_id = user.id, name = %user.name, "created user");
                Some(user)
            },
            Err(err) => {
                warn!(name, error = %err, "failed to create user");
                None
            },
        }
    }

    /// Favorites a movie, creating the shared movie row on first use.
    ///
    /// Movies are deduplicated by exact `(name, year)`. Favoriting a movie the
    /// user already has is a successful no-op.
    pub async fn add_favorite(&self, user_id: i32, fields: &NewMovie) -> bool {
        match self.try_add_favorite(user_id, fields).await {
            Ok(added) => added,
            Err(err) => {
                warn!(user_id, movie = %fields.name, error = %err, "failed to add favorite");
                false
            },
        }
    }

    /// Renames a movie for every user who favorited it.
    ///
    /// Refused when another movie of the same year already has that name.
    pub async fn update_movie_title(&self, movie_id: i32, new_title: &str) -> bool {
        match self.try_update_movie_title(movie_id, new_title).await {
            Ok(updated) => updated,
            Err(err) => {
                warn!(movie_id, error = %err, "failed to update movie title");
                false
            },
        }
    }

    /// Drops the favorite relation only; the movie row is kept.
    pub async fn remove_favorite(&self, user_id: i32, movie_id: i32) -> bool {
        match self.try_remove_favorite(user_id, movie_id).await {
            Ok(removed) => removed,
            Err(err) => {
                warn!(user_id, movie_id, error = %err, "failed to remove favorite");
                false
            },
        }
    }

    async fn try_list_favorites(&self, user_id: i32) -> Result<Vec<movie::Model>, DbErr> {
        let Some(user) = user::Entity::find_by_id(user_id).one(&self.db).await? else {
            debug!(user_id, "favorites requested for unknown user");
            return Ok(Vec::new());
        };
        user.find_related(movie::Entity).order_by_asc(movie::Column::Name).all(&self.db).await
    }

    async fn try_create_user(&self, name: &str) -> Result<user::Model, DbErr> {
        let txn = self.db.begin().await?;
        let model = user::ActiveModel { id: Default::default(), name: Set(name.to_string()) };
        let result = model.insert(&txn).await;
        finish(txn, result).await
    }

    async fn try_add_favorite(&self, user_id: i32, fields: &NewMovie) -> Result<bool, DbErr> {
        let txn = self.db.begin().await?;
        let result = add_favorite_in(&txn, user_id, fields).await;
        finish(txn, result).await
    }

    async fn try_update_movie_title(&self, movie_id: i32, new_title: &str) -> Result<bool, DbErr> {
        let txn = self.db.begin().await?;
        let result = update_movie_title_in(&txn, movie_id, new_title).await;
        finish(txn, result).await
    }

    async fn try_remove_favorite(&self, user_id: i32, movie_id: i32) -> Result<bool, DbErr> {
        let txn = self.db.begin().await?;
        let result = remove_favorite_in(&txn, user_id, movie_id).await;
        finish(txn, result).await
    }
}

/// Commits on success, rolls back on error.
async fn finish<T>(txn: DatabaseTransaction, result: Result<T, DbErr>) -> Result<T, DbErr> {
    match result {
        Ok(value) => {
            txn.commit().await?;
            Ok(value)
        },
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                warn!(error = %rollback_err, "rollback failed");
            }
            Err(err)
        },
    }
}

async fn add_favorite_in(
    txn: &DatabaseTransaction,
    user_id: i32,
    fields: &NewMovie,
) -> Result<bool, DbErr> {
    let Some(user) = user::Entity::find_by_id(user_id).one(txn).await? else {
        debug!(user_id, "cannot add favorite for unknown user");
        return Ok(false);
    };

    let existing = movie::Entity::find()
        .filter(movie::Column::Name.eq(fields.name.as_str()))
        .filter(movie::Column::Year.eq(fields.year))
        .one(txn)
        .await?;

    let movie = match existing {
        Some(movie) => movie,
        None => {
            let model = movie::ActiveModel {
                id: Default::default(),
                name: Set(fields.name.clone()),
                director: Set(fields.director.clone()),
                year: Set(fields.year),
                poster_url: Set(fields.poster_url.clone()),
            };
            let movie = model.insert(txn).await?;
            debug!(movie_id = movie.id, name = %movie.name, year = movie.year, "created movie");
            movie
        },
    };

    let already = user_movie::Entity::find_by_id((user.id, movie.id)).one(txn).await?;
    if already.is_some() {
        debug!(user_id = user.id, movie_id = movie.id, "movie already in favorites");
        return Ok(true);
    }

    let relation = user_movie::ActiveModel { user_id: Set(user.id), movie_id: Set(movie.id) };
    user_movie::Entity::insert(relation).exec_without_returning(txn).await?;
    info!(user_id = user.id, movie_id = movie.id, name = %movie.name, "added favorite");
    Ok(true)
}

async fn update_movie_title_in(
    txn: &DatabaseTransaction,
    movie_id: i32,
    new_title: &str,
) -> Result<bool, DbErr> {
    let Some(movie) = movie::Entity::find_by_id(movie_id).one(txn).await? else {
        debug!(movie_id, "cannot rename unknown movie");
        return Ok(false);
    };

    let clash = movie::Entity::find()
        .filter(movie::Column::Name.eq(new_title))
        .filter(movie::Column::Year.eq(movie.year))
        .filter(movie::Column::Id.ne(movie.id))
        .one(txn)
        .await?;
    if let Some(other) = clash {
        warn!(
            movie_id,
            other_id = other.id,
            title = new_title,
            year = movie.year,
            "rename would duplicate an existing movie"
        );
        return Ok(false);
    }

    let mut model: movie::ActiveModel = movie.into();
    model.name = Set(new_title.to_string());
    model.update(txn).await?;
    info!(movie_id, title = new_title, "renamed movie");
    Ok(true)
}

async fn remove_favorite_in(
    txn: &DatabaseTransaction,
    user_id: i32,
    movie_id: i32,
) -> Result<bool, DbErr> {
    let user = user::Entity::find_by_id(user_id).one(txn).await?;
    let movie = movie::Entity::find_by_id(movie_id).one(txn).await?;
    if user.is_none() || movie.is_none() {
        debug!(user_id, movie_id, "cannot remove favorite: user or movie not found");
        return Ok(false);
    }

    let res = user_movie::Entity::delete_by_id((user_id, movie_id)).exec(txn).await?;
    if res.rows_affected == 0 {
        debug!(user_id, movie_id, "movie not in favorites");
        return Ok(false);
    }

    info!(user_id, movie_id, "removed favorite");
    Ok(true)
}
