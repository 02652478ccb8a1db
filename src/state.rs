use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::config::AppConfig;
use crate::forecast::model::{ForecastModel, LinearTrend};
use crate::storage::{LocalStorage, StorageClient};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub storage: Arc<dyn StorageClient>,
    pub forecaster: Arc<dyn ForecastModel>,
    /// Upload directory guard; removed once the last clone drops.
    #[cfg(test)]
    pub upload_guard: Option<Arc<tempfile::TempDir>>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let options = SqliteConnectOptions::from_str(&config.database_url)
            .with_context(|| format!("parse DATABASE_URL {}", config.database_url))?
            .create_if_missing(true);
        let db = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context("connect to database")?;

        let storage = Arc::new(LocalStorage::new(&config.upload_dir).await?) as Arc<dyn StorageClient>;
        let forecaster = Arc::new(LinearTrend) as Arc<dyn ForecastModel>;

        Ok(Self::from_parts(db, config, storage, forecaster))
    }

    pub fn from_parts(
        db: SqlitePool,
        config: Arc<AppConfig>,
        storage: Arc<dyn StorageClient>,
        forecaster: Arc<dyn ForecastModel>,
    ) -> Self {
        Self {
            db,
            config,
            storage,
            forecaster,
            #[cfg(test)]
            upload_guard: None,
        }
    }
}

#[cfg(test)]
impl AppState {
    /// In-memory database (migrated) plus a throwaway upload directory.
    pub async fn for_tests() -> Self {
        use crate::config::ForecastConfig;

        let upload_guard = tempfile::Builder::new()
            .prefix("bodytrack-test-")
            .tempdir()
            .expect("temp upload dir");
        let upload_dir = upload_guard.path().to_path_buf();

        let options = SqliteConnectOptions::from_str("sqlite::memory:").expect("memory url");
        // A single, never-recycled connection keeps the in-memory database alive.
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .expect("memory pool ok");
        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .expect("migrations ok");

        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            upload_dir: upload_dir.clone(),
            max_upload_bytes: 16 * 1024 * 1024,
            host: "127.0.0.1".into(),
            port: 0,
            forecast: ForecastConfig {
                timeout_ms: 2_000,
                empty_on_unavailable: false,
            },
        });

        let storage = Arc::new(LocalStorage::new(upload_dir).await.expect("upload dir ok"))
            as Arc<dyn StorageClient>;
        let mut state = Self::from_parts(db, config, storage, Arc::new(LinearTrend));
        state.upload_guard = Some(Arc::new(upload_guard));
        state
    }

    pub fn with_forecaster(mut self, forecaster: Arc<dyn ForecastModel>) -> Self {
        self.forecaster = forecaster;
        self
    }

    pub fn with_config(mut self, f: impl FnOnce(&mut AppConfig)) -> Self {
        let mut config = (*self.config).clone();
        f(&mut config);
        self.config = Arc::new(config);
        self
    }
}
