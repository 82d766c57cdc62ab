use serde_json::json;
use shutterquote_core::errors::ApplicationError;
use shutterquote_core::quotation_service::{QuotationService, QuotationServiceSettings};
use shutterquote_db::{connect_with_config, SqlQuotationStore};

use crate::commands::{load_config, runtime, CommandResult};

pub fn run() -> CommandResult {
    let config = match load_config("report") {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let runtime = match runtime("report") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = connect_with_config(&config.database)
            .await
            .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;
        let service = QuotationService::new(
            SqlQuotationStore::new(pool.clone()),
            QuotationServiceSettings::from(&config),
        );

        let report = async {
            let quotations = service.list().await?;
            let revenue = service.monthly_revenue().await?;
            Ok::<_, ApplicationError>((quotations, revenue))
        }
        .await;
        pool.close().await;

        report.map_err(|error| {
            let class = if error.is_retryable() { "timeout" } else { "persistence" };
            (class, error.to_string(), 5u8)
        })
    });

    match result {
        Ok((quotations, revenue)) => {
            let message =
                format!("{} quotations across {} active months", quotations.len(), revenue.len());
            let revenue: Vec<_> = revenue
                .iter()
                .map(|month| json!({ "label": month.label(), "revenue": month.revenue }))
                .collect();
            CommandResult::success_with_data(
                "report",
                message,
                json!({ "quotations": quotations, "revenue": revenue }),
            )
        }
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("report", error_class, message, exit_code)
        }
    }
}
