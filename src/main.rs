use std::{sync::Arc, time::Duration};

use moviweb::{AppState, config::Config, data::DataManager, db, omdb::OmdbClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,moviweb=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    let http = reqwest::Client::builder()
        .user_agent("moviweb/0.1")
        .timeout(Duration::from_secs(30))
        .build()?;

    let db = db::connect_and_migrate(config.database_url.as_str()).await?;
    let data = DataManager::new(db);

    if let Some(name) = &config.seed_user
        && data.list_users().await.is_empty()
    {
        tracing::info!(name = %name, "database is empty, seeding first user");
        if data.create_user(name).await.is_none() {
            tracing::warn!(name = %name, "could not seed first user");
        }
    }

    let omdb = OmdbClient::new(
        http,
        config.omdb_api_key.clone(),
        config.omdb_base_url.clone(),
        config.omdb_rps,
    );

    let state = Arc::new(AppState { data, omdb: Arc::new(omdb) });
    let app = moviweb::router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
