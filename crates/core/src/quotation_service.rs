use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::domain::customer::{CustomerInfo, CustomerResolution};
use crate::domain::opening::Opening;
use crate::domain::quotation::{
    MonthlyRevenue, NewQuotation, QuotationId, QuotationRecord, QuotationSummary, SubmitOutcome,
    SubmitRequest,
};
use crate::domain::surcharge::SurchargeSelections;
use crate::errors::{ApplicationError, DomainError};
use crate::pricing::{
    verify_submitted_total, DeterministicPricingEngine, PricingBreakdown, PricingEngine,
};
use crate::validation::{validate_openings, validate_submission};

/// Persistence boundary for quotations and their customers.
#[async_trait]
pub trait QuotationStore: Send + Sync {
    /// Returns the stored customer for `info.email`, inserting one on a miss.
    /// A stored customer is returned unchanged.
    async fn find_or_create_customer(
        &self,
        info: &CustomerInfo,
    ) -> Result<CustomerResolution, ApplicationError>;

    /// Persists the quotation, its surcharge record and all openings as one
    /// unit. On error nothing from the aggregate is visible.
    async fn create_quotation(
        &self,
        quotation: NewQuotation,
    ) -> Result<QuotationRecord, ApplicationError>;

    async fn find_quotation(
        &self,
        id: QuotationId,
    ) -> Result<Option<QuotationRecord>, ApplicationError>;

    /// Newest first.
    async fn list_quotations(&self) -> Result<Vec<QuotationSummary>, ApplicationError>;

    /// At most twelve calendar months that have quotations, newest first.
    async fn monthly_revenue(&self) -> Result<Vec<MonthlyRevenue>, ApplicationError>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuotationServiceSettings {
    pub store_timeout: Duration,
    pub total_tolerance: Decimal,
}

impl Default for QuotationServiceSettings {
    fn default() -> Self {
        Self { store_timeout: Duration::from_secs(30), total_tolerance: Decimal::new(1, 2) }
    }
}

impl From<&AppConfig> for QuotationServiceSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            store_timeout: Duration::from_secs(config.database.timeout_secs),
            total_tolerance: config.pricing.total_tolerance,
        }
    }
}

pub struct QuotationService<S, P = DeterministicPricingEngine> {
    store: S,
    pricing: P,
    settings: QuotationServiceSettings,
}

impl<S: QuotationStore> QuotationService<S> {
    pub fn new(store: S, settings: QuotationServiceSettings) -> Self {
        Self::with_engine(store, DeterministicPricingEngine, settings)
    }
}

impl<S: QuotationStore, P: PricingEngine> QuotationService<S, P> {
    pub fn with_engine(store: S, pricing: P, settings: QuotationServiceSettings) -> Self {
        Self { store, pricing, settings }
    }

    pub fn settings(&self) -> &QuotationServiceSettings {
        &self.settings
    }

    pub fn compute(
        &self,
        openings: &[Opening],
        surcharges: &SurchargeSelections,
    ) -> Result<PricingBreakdown, DomainError> {
        validate_openings(openings)?;
        Ok(self.pricing.price(openings, surcharges))
    }

    /// Validates, reprices and persists a submission. The stored total is the
    /// recomputed one; the submitted total only has to agree within tolerance.
    ///
    /// The customer is resolved before the quotation transaction starts, so a
    /// failed quotation insert can leave a newly created customer behind.
    pub async fn submit(&self, request: SubmitRequest) -> Result<SubmitOutcome, ApplicationError> {
        if let Err(error) = validate_submission(&request) {
            warn!(
                event_name = "quotation.submit.rejected",
                error = %error,
                "submission failed validation"
            );
            return Err(error.into());
        }

        let breakdown = self.pricing.price(&request.openings, &request.surcharges);
        if let Err(error) =
            verify_submitted_total(&breakdown, request.total_cost, self.settings.total_tolerance)
        {
            warn!(
                event_name = "quotation.submit.stale_total",
                submitted = %request.total_cost,
                computed = %breakdown.total,
                "submitted total disagrees with recomputed total"
            );
            return Err(error.into());
        }

        let customer = self.store.find_or_create_customer(&request.customer);
        let resolution = self.bounded("find_or_create_customer", customer).await?;

        let quotation = self
            .bounded_write(
                "create_quotation",
                self.store.create_quotation(NewQuotation {
                    customer_id: resolution.customer.id,
                    total_cost: breakdown.total,
                    surcharges: request.surcharges,
                    openings: request.openings,
                }),
            )
            .await?;

        info!(
            event_name = "quotation.submit.accepted",
            quotation_id = quotation.id.0,
            customer_id = resolution.customer.id.0,
            is_existing_customer = resolution.is_existing,
            total = %quotation.total_cost,
            "quotation persisted"
        );

        Ok(SubmitOutcome { quotation, is_existing_customer: resolution.is_existing })
    }

    pub async fn get(&self, id: QuotationId) -> Result<Option<QuotationRecord>, ApplicationError> {
        self.bounded("find_quotation", self.store.find_quotation(id)).await
    }

    pub async fn list(&self) -> Result<Vec<QuotationSummary>, ApplicationError> {
        self.bounded("list_quotations", self.store.list_quotations()).await
    }

    pub async fn monthly_revenue(&self) -> Result<Vec<MonthlyRevenue>, ApplicationError> {
        self.bounded("monthly_revenue", self.store.monthly_revenue()).await
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, ApplicationError>>,
    ) -> Result<T, ApplicationError> {
        self.with_deadline(operation, true, call).await
    }

    /// An expired write may still commit, so its timeout is not retryable.
    async fn bounded_write<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, ApplicationError>>,
    ) -> Result<T, ApplicationError> {
        self.with_deadline(operation, false, call).await
    }

    async fn with_deadline<T>(
        &self,
        operation: &'static str,
        retryable: bool,
        call: impl Future<Output = Result<T, ApplicationError>>,
    ) -> Result<T, ApplicationError> {
        match tokio::time::timeout(self.settings.store_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                let timeout_secs = self.settings.store_timeout.as_secs();
                warn!(
                    event_name = "store.call.timeout",
                    operation,
                    timeout_secs,
                    retryable,
                    "store call timed out"
                );
                Err(ApplicationError::Timeout {
                    operation: operation.to_string(),
                    timeout_secs,
                    retryable,
                })
            }
        }
    }
}
