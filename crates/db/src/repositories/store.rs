use async_trait::async_trait;
use shutterquote_core::domain::customer::{CustomerInfo, CustomerResolution};
use shutterquote_core::domain::quotation::{
    MonthlyRevenue, NewQuotation, QuotationId, QuotationRecord, QuotationSummary,
};
use shutterquote_core::errors::ApplicationError;
use shutterquote_core::quotation_service::QuotationStore;

use super::{SqlCustomerRepository, SqlQuotationRepository, SqlRevenueRepository};
use crate::DbPool;

/// SQLite-backed [`QuotationStore`] composed from the table repositories.
#[derive(Clone)]
pub struct SqlQuotationStore {
    customers: SqlCustomerRepository,
    quotations: SqlQuotationRepository,
    revenue: SqlRevenueRepository,
}

impl SqlQuotationStore {
    pub fn new(pool: DbPool) -> Self {
        Self {
            customers: SqlCustomerRepository::new(pool.clone()),
            quotations: SqlQuotationRepository::new(pool.clone()),
            revenue: SqlRevenueRepository::new(pool),
        }
    }
}

#[async_trait]
impl QuotationStore for SqlQuotationStore {
    async fn find_or_create_customer(
        &self,
        info: &CustomerInfo,
    ) -> Result<CustomerResolution, ApplicationError> {
        Ok(self.customers.find_or_create(info).await?)
    }

    async fn create_quotation(
        &self,
        quotation: NewQuotation,
    ) -> Result<QuotationRecord, ApplicationError> {
        Ok(self.quotations.create(quotation).await?)
    }

    async fn find_quotation(
        &self,
        id: QuotationId,
    ) -> Result<Option<QuotationRecord>, ApplicationError> {
        Ok(self.quotations.find_by_id(id).await?)
    }

    async fn list_quotations(&self) -> Result<Vec<QuotationSummary>, ApplicationError> {
        Ok(self.quotations.list().await?)
    }

    async fn monthly_revenue(&self) -> Result<Vec<MonthlyRevenue>, ApplicationError> {
        Ok(self.revenue.monthly_revenue().await?)
    }
}
