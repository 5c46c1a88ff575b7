use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing::warn;

use crate::config::{AppConfig, JwtConfig};
use crate::store::memory::MemoryStore;
use crate::store::postgres::PgStore;
use crate::store::recipes::RecipeStore;
use crate::store::users::UserStore;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub recipes: Arc<dyn RecipeStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
            warn!(error = %e, "migration failed; continuing");
        }

        let store = Arc::new(PgStore::new(pool));
        Ok(Self {
            users: store.clone(),
            recipes: store,
            config,
        })
    }

    /// State backed by the in-memory store, for tests and offline runs.
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        let config = Arc::new(AppConfig {
            database_url: String::new(),
            jwt: JwtConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_days: 7,
            },
        });
        Self {
            users: store.clone(),
            recipes: store,
            config,
        }
    }
}
