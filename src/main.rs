//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run UI.
//! No business logic here; the calculation core lives in the domain layer.

use dotenv::dotenv;
use notenrechner::adapters::persistence::{DemoCatalog, JsonCatalog, SqliteCatalog};
use notenrechner::adapters::ui::tui::PlannerTui;
use notenrechner::ports::{CatalogPort, InputPort};
use notenrechner::shared::config::AppConfig;
use notenrechner::usecases::PlannerService;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    notenrechner::adapters::ui::init_ui();

    let cfg = AppConfig::load().unwrap_or_default();

    let data_path = cfg.data_dir_or_default();
    let data_dir_abs = data_path
        .canonicalize()
        .unwrap_or_else(|_| data_path.clone());
    info!(path = %data_dir_abs.display(), "data directory");

    // --- Catalog store: SQLite if configured, JSON file if present, demo otherwise ---
    let catalog: Arc<dyn CatalogPort> = if let Some(db_path) = cfg.catalog_db() {
        info!(path = %db_path.display(), "using SQLite catalog (NOTEN_CATALOG_DB)");
        Arc::new(
            SqliteCatalog::connect(db_path)
                .await
                .map_err(|e| anyhow::anyhow!("SQLite connect failed: {}", e))?,
        )
    } else {
        let catalog_path = cfg.catalog_path_or_default();
        if tokio::fs::try_exists(&catalog_path).await.unwrap_or(false) {
            info!(path = %catalog_path.display(), "using JSON catalog");
            Arc::new(JsonCatalog::new(&catalog_path))
        } else {
            warn!(
                path = %catalog_path.display(),
                "no catalog found, using built-in demo courses"
            );
            Arc::new(DemoCatalog::new())
        }
    };

    // --- Planner service: loads and sorts the catalog up front ---
    let planner = Arc::new(
        PlannerService::load(catalog, cfg.retake_tuning(), cfg.reports_dir_or_default())
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?,
    );

    let input_port: Arc<dyn InputPort> =
        Arc::new(PlannerTui::new(planner, cfg.initial_weight_mode()));

    // --- Run (main menu -> grades / overview / suggestions / export) ---
    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
