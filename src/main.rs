mod app;
mod config;
mod dates;
mod entries;
mod error;
mod forecast;
mod goals;
mod photos;
mod state;
mod stats;
mod storage;

use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "bodytrack=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = state::AppState::init().await?;

    sqlx::migrate!("./migrations")
        .run(&app_state.db)
        .await
        .context("run migrations")?;

    let config = app_state.config.clone();
    tracing::info!(
        database = %config.database_url,
        uploads = %config.upload_dir.display(),
        "state ready"
    );

    let router = app::build_app(app_state);
    app::serve(router, &config).await
}
