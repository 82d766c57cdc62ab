use std::sync::Arc;

use shutterquote_core::config::AppConfig;
use shutterquote_core::quotation_service::{QuotationService, QuotationServiceSettings};
use shutterquote_db::{connect_with_config, migrations, DbPool, SqlQuotationStore};
use thiserror::Error;
use tracing::info;

pub type SharedQuotationService = Arc<QuotationService<SqlQuotationStore>>;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub quotations: SharedQuotationService,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool =
        connect_with_config(&config.database).await.map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        max_connections = config.database.max_connections,
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let settings = QuotationServiceSettings::from(&config);
    let quotations =
        Arc::new(QuotationService::new(SqlQuotationStore::new(db_pool.clone()), settings));

    Ok(Application { config, db_pool, quotations })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use shutterquote_core::config::{AppConfig, ConfigOverrides, LoadOptions};

    use crate::bootstrap::{bootstrap_with_config, BootstrapError};

    fn config(database_url: &str) -> AppConfig {
        AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                database_url: Some(database_url.to_string()),
                total_tolerance: Some(Decimal::new(5, 2)),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .expect("config should load from overrides")
    }

    #[tokio::test]
    async fn bootstrap_fails_when_database_directory_is_missing() {
        let result =
            bootstrap_with_config(config("sqlite:///shutterquote-missing-dir/quotes.db")).await;

        assert!(matches!(result, Err(BootstrapError::DatabaseConnect(_))));
    }

    #[tokio::test]
    async fn bootstrap_migrates_schema_and_wires_service_settings() {
        let app = bootstrap_with_config(config("sqlite::memory:"))
            .await
            .expect("bootstrap should succeed with an in-memory database");

        let (table_count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master \
             WHERE type = 'table' \
             AND name IN ('customer', 'quotation', 'quotation_surcharge', 'quotation_opening')",
        )
        .fetch_one(&app.db_pool)
        .await
        .expect("schema tables should exist after bootstrap");
        assert_eq!(table_count, 4);

        assert_eq!(app.quotations.settings().total_tolerance, Decimal::new(5, 2));
        assert!(app.quotations.list().await.expect("list").is_empty());

        app.db_pool.close().await;
    }
}
