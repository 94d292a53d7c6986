use std::{collections::HashMap, sync::Arc};

use axum::{
    Json, Router,
    body::Body,
    extract::Query,
    http::{Request, StatusCode, header},
    response::Response,
    routing::get,
};
use sea_orm::{ConnectOptions, EntityTrait, PaginatorTrait};
use serde_json::{Value, json};
use tower::ServiceExt;

use moviweb::{
    AppState,
    data::DataManager,
    db,
    entities::{movie, user_movie},
    omdb::OmdbClient,
};

async fn fake_omdb(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let body = match params.get("t").map(String::as_str) {
        Some("Fargo") => json!({
            "Response": "True",
            "Title": "Fargo",
            "Year": "1996",
            "Director": "Joel Coen",
            "Poster": "https://example.com/fargo.jpg"
        }),
        Some("Sherlock") => json!({
            "Response": "True",
            "Title": "Sherlock",
            "Year": "2010–2017",
            "Director": "N/A",
            "Poster": "N/A"
        }),
        _ => json!({ "Response": "False", "Error": "Movie not found!" }),
    };
    Json(body)
}

async fn spawn_fake_omdb() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route("/", get(fake_omdb));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn test_app(omdb_url: String) -> (Router, DataManager) {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    let db = db::connect_and_migrate(options).await.unwrap();
    let data = DataManager::new(db);

    let omdb = OmdbClient::new(reqwest::Client::new(), "test-key".to_string(), omdb_url, 100);
    let state = Arc::new(AppState { data: data.clone(), omdb: Arc::new(omdb) });
    (moviweb::router(state), data)
}

async fn post_form(app: &Router, uri: &str, body: &str) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn get_page(app: &Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn location(response: &Response) -> &str {
    response.headers().get(header::LOCATION).unwrap().to_str().unwrap()
}

fn flash_cookie(response: &Response) -> String {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .find(|v| v.starts_with("flash="))
        .unwrap()
}

#[tokio::test]
async fn index_lists_users() {
    let (app, data) = test_app(spawn_fake_omdb().await).await;
    data.create_user("Alice").await.unwrap();

    let (status, body) = get_page(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Alice"));
    assert!(body.contains("/users/1/movies"));
}

#[tokio::test]
async fn create_user_redirects_home() {
    let (app, data) = test_app(spawn_fake_omdb().await).await;

    let response = post_form(&app, "/users", "name=Alice").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert!(flash_cookie(&response).contains("Alice"));

    let users = data.list_users().await;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].name, "Alice");
}

#[tokio::test]
async fn blank_user_name_is_rejected() {
    let (app, data) = test_app(spawn_fake_omdb().await).await;

    let response = post_form(&app, "/users", "name=++").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(data.list_users().await.is_empty());
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let (app, _) = test_app(spawn_fake_omdb().await).await;

    let (status, body) = get_page(&app, "/users/99/movies").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("User 99 does not exist."));

    let response = post_form(&app, "/users/99/add_movie", "title=Fargo").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let (app, _) = test_app(spawn_fake_omdb().await).await;

    let (status, _) = get_page(&app, "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn add_movie_stores_looked_up_metadata() {
    let (app, data) = test_app(spawn_fake_omdb().await).await;
    let alice = data.create_user("Alice").await.unwrap();

    let response = post_form(&app, &format!("/users/{}/add_movie", alice.id), "title=Fargo").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/users/{}/movies", alice.id));

    let movies = data.list_favorites(alice.id).await;
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].name, "Fargo");
    assert_eq!(movies[0].year, 1996);
    assert_eq!(movies[0].director, "Joel Coen");

    let (status, body) = get_page(&app, &format!("/users/{}/movies", alice.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Fargo"));
    assert!(body.contains("1996"));
}

#[tokio::test]
async fn ranged_year_uses_first_year() {
    let (app, data) = test_app(spawn_fake_omdb().await).await;
    let alice = data.create_user("Alice").await.unwrap();

    post_form(&app, &format!("/users/{}/add_movie", alice.id), "title=Sherlock").await;

    let movies = data.list_favorites(alice.id).await;
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].year, 2010);
    assert_eq!(movies[0].poster_url, None);
}

#[tokio::test]
async fn two_users_share_one_movie_row() {
    let (app, data) = test_app(spawn_fake_omdb().await).await;
    let alice = data.create_user("Alice").await.unwrap();
    let bob = data.create_user("Bob").await.unwrap();

    post_form(&app, &format!("/users/{}/add_movie", alice.id), "title=Fargo").await;
    post_form(&app, &format!("/users/{}/add_movie", bob.id), "title=Fargo").await;
    post_form(&app, &format!("/users/{}/add_movie", bob.id), "title=Fargo").await;

    assert_eq!(movie::Entity::find().count(data.db()).await.unwrap(), 1);
    assert_eq!(user_movie::Entity::find().count(data.db()).await.unwrap(), 2);
}

#[tokio::test]
async fn missing_movie_adds_nothing_and_flashes_notice() {
    let (app, data) = test_app(spawn_fake_omdb().await).await;
    let alice = data.create_user("Alice").await.unwrap();

    let response =
        post_form(&app, &format!("/users/{}/add_movie", alice.id), "title=Nonexistent").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(flash_cookie(&response).contains("found"));

    assert_eq!(movie::Entity::find().count(data.db()).await.unwrap(), 0);
    assert!(data.list_favorites(alice.id).await.is_empty());
}

#[tokio::test]
async fn lookup_outage_adds_nothing() {
    // Nothing listens on the discard port.
    let (app, data) = test_app("http://127.0.0.1:9".to_string()).await;
    let alice = data.create_user("Alice").await.unwrap();

    let response = post_form(&app, &format!("/users/{}/add_movie", alice.id), "title=Fargo").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(flash_cookie(&response).contains("unavailable"));
    assert_eq!(movie::Entity::find().count(data.db()).await.unwrap(), 0);
}

#[tokio::test]
async fn delete_removes_only_the_relation() {
    let (app, data) = test_app(spawn_fake_omdb().await).await;
    let alice = data.create_user("Alice").await.unwrap();
    post_form(&app, &format!("/users/{}/add_movie", alice.id), "title=Fargo").await;
    let movie_id = data.list_favorites(alice.id).await[0].id;

    let response =
        post_form(&app, &format!("/users/{}/movies/{movie_id}/delete", alice.id), "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    assert!(data.list_favorites(alice.id).await.is_empty());
    assert_eq!(movie::Entity::find().count(data.db()).await.unwrap(), 1);
}

#[tokio::test]
async fn update_renames_movie() {
    let (app, data) = test_app(spawn_fake_omdb().await).await;
    let alice = data.create_user("Alice").await.unwrap();
    post_form(&app, &format!("/users/{}/add_movie", alice.id), "title=Fargo").await;
    let movie_id = data.list_favorites(alice.id).await[0].id;

    let response = post_form(
        &app,
        &format!("/users/{}/movies/{movie_id}/update", alice.id),
        "title=Fargo+%28Director%27s+Cut%29",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    assert_eq!(data.list_favorites(alice.id).await[0].name, "Fargo (Director's Cut)");
}

#[tokio::test]
async fn update_requires_favorite() {
    let (app, data) = test_app(spawn_fake_omdb().await).await;
    let alice = data.create_user("Alice").await.unwrap();
    let bob = data.create_user("Bob").await.unwrap();
    post_form(&app, &format!("/users/{}/add_movie", alice.id), "title=Fargo").await;
    let movie_id = data.list_favorites(alice.id).await[0].id;

    let response =
        post_form(&app, &format!("/users/{}/movies/{movie_id}/update", bob.id), "title=Hijacked")
            .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/users/{}/movies", bob.id));
    assert!(flash_cookie(&response).contains("favorites"));

    assert_eq!(data.list_favorites(alice.id).await[0].name, "Fargo");
}

#[tokio::test]
async fn notice_is_shown_once() {
    let (app, _) = test_app(spawn_fake_omdb().await).await;

    let response = post_form(&app, "/users", "name=Alice").await;
    let cookie = flash_cookie(&response);
    let pair = cookie.split(';').next().unwrap().to_string();

    let request =
        Request::builder().uri("/").header(header::COOKIE, pair).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let removal = flash_cookie(&response);
    assert!(removal.starts_with("flash=;"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(body.contains("User &#39;Alice&#39; added.") || body.contains("User 'Alice' added."));
}
