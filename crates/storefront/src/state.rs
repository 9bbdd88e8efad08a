use crate::{
    config::Config,
    di::{DependenciesInject, DependenciesInjectDeps},
};
use anyhow::{Context, Result};
use prometheus_client::registry::Registry;
use shared::{
    abstract_trait::DynJwtService,
    config::{ConnectionManager, ConnectionPool, JwtConfig},
    utils::{SystemMetrics, run_metrics_collector},
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub di_container: DependenciesInject,
    pub jwt_config: DynJwtService,
    pub registry: Arc<Mutex<Registry>>,
    pub system_metrics: Arc<SystemMetrics>,
}

impl AppState {
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = ConnectionManager::new_pool(
            &config.database_url,
            config.db_min_conn,
            config.db_max_conn,
        )
        .await
        .context("Failed to initialize database pool")?;

        if config.run_migrations {
            info!("🗄️ Running database migrations");
            run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;
        }

        let jwt_config = Arc::new(JwtConfig::new(&config.jwt_secret)) as DynJwtService;
        let deps = DependenciesInjectDeps::postgres(pool, config, jwt_config)
            .context("Failed to build service dependencies")?;

        let state = Self::from_deps(deps);

        tokio::spawn(run_metrics_collector(state.system_metrics.clone()));

        Ok(state)
    }

    /// Wires services over already-built dependencies. Does not spawn the
    /// system metrics collector.
    pub fn from_deps(deps: DependenciesInjectDeps) -> Self {
        let jwt_config = deps.jwt.clone();
        let system_metrics = Arc::new(SystemMetrics::new());

        let mut registry = Registry::default();
        let di_container = DependenciesInject::new(deps, &mut registry);
        system_metrics.register(&mut registry);

        Self {
            di_container,
            jwt_config,
            registry: Arc::new(Mutex::new(registry)),
            system_metrics,
        }
    }
}

pub async fn run_migrations(pool: &ConnectionPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;

    Ok(())
}
