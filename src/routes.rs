use std::sync::Arc;

use axum::{
    extract::{Form, Path, State},
    response::{Html, Redirect},
};
use axum_extra::extract::CookieJar;

use crate::{
    AppState,
    entities::user,
    error::{AppError, AppResult},
    flash,
    models::{CreateUserForm, MovieTitleForm},
    templates::{self, movies_path},
};

pub async fn index(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, Html<String>) {
    let users = state.data.list_users().await;
    let (jar, notice) = flash::take(jar);
    (jar, Html(templates::users_page(&users, notice.as_deref())))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<CreateUserForm>,
) -> (CookieJar, Redirect) {
    let name = form.name.trim();
    let notice = if name.is_empty() {
        "Name is required.".to_string()
    } else {
        match state.data.create_user(name).await {
            Some(user) => format!("User '{}' added.", user.name),
            None => "Could not create user, please try again.".to_string(),
        }
    };
    (flash::set(jar, &notice), Redirect::to("/"))
}

pub async fn user_movies(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Html<String>)> {
    let user = require_user(&state, user_id).await?;
    let movies = state.data.list_favorites(user.id).await;
    let (jar, notice) = flash::take(jar);
    Ok((jar, Html(templates::movies_page(&user, &movies, notice.as_deref()))))
}

pub async fn add_movie(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
    jar: CookieJar,
    Form(form): Form<MovieTitleForm>,
) -> AppResult<(CookieJar, Redirect)> {
    let user = require_user(&state, user_id).await?;
    let title = form.title.trim();

    let notice = if title.is_empty() {
        "Title is required.".to_string()
    } else {
        match state.omdb.lookup(title).await {
            Ok(Some(fields)) => {
                if state.data.add_favorite(user.id, &fields).await {
                    format!("'{}' ({}) is in your favorites.", fields.name, fields.year)
                } else {
                    format!("Could not save '{}', please try again.", fields.name)
                }
            },
            Ok(None) => format!("No movie found for '{title}'."),
            Err(err) => {
                tracing::warn!(user_id = user.id, title, error = %err, "movie lookup failed");
                "Movie lookup is unavailable right now, please try again later.".to_string()
            },
        }
    };

    Ok((flash::set(jar, &notice), Redirect::to(&movies_path(user.id))))
}

/// Renames a movie from a user's favorites page. The new title is global and
/// shows up for every user who favorited the movie.
pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path((user_id, movie_id)): Path<(i32, i32)>,
    jar: CookieJar,
    Form(form): Form<MovieTitleForm>,
) -> AppResult<(CookieJar, Redirect)> {
    let user = require_user(&state, user_id).await?;
    let title = form.title.trim();

    let notice = if title.is_empty() {
        "Title is required.".to_string()
    } else if !state.data.has_favorite(user.id, movie_id).await {
        "That movie is not in the favorites.".to_string()
    } else if state.data.update_movie_title(movie_id, title).await {
        format!("Renamed to '{title}'.")
    } else {
        "Could not rename that movie.".to_string()
    };

    Ok((flash::set(jar, &notice), Redirect::to(&movies_path(user.id))))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path((user_id, movie_id)): Path<(i32, i32)>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Redirect)> {
    let user = require_user(&state, user_id).await?;

    let notice = if state.data.remove_favorite(user.id, movie_id).await {
        "Removed from favorites."
    } else {
        "That movie is not in the favorites."
    };

    Ok((flash::set(jar, notice), Redirect::to(&movies_path(user.id))))
}

pub async fn not_found() -> AppError {
    AppError::NotFound("There is nothing at this address.".to_string())
}

async fn require_user(state: &AppState, user_id: i32) -> AppResult<user::Model> {
    state
        .data
        .find_user(user_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} does not exist.")))
}
