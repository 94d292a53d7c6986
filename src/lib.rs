pub mod config;
pub mod data;
pub mod db;
pub mod entities;
pub mod error;
pub mod flash;
pub mod models;
pub mod omdb;
pub mod routes;
pub mod templates;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{data::DataManager, omdb::OmdbClient};

#[derive(Clone)]
pub struct AppState {
    pub data: DataManager,
    pub omdb: Arc<OmdbClient>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/users", post(routes::create_user))
        .route("/users/{user_id}/movies", get(routes::user_movies))
        .route("/users/{user_id}/add_movie", post(routes::add_movie))
        .route("/users/{user_id}/movies/{movie_id}/update", post(routes::update_movie))
        .route("/users/{user_id}/movies/{movie_id}/delete", post(routes::delete_movie))
        .fallback(routes::not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
