use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::customer::{Customer, CustomerId, CustomerInfo};
use crate::domain::opening::Opening;
use crate::domain::surcharge::SurchargeSelections;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuotationId(pub i64);

/// Everything needed to persist one quotation aggregate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewQuotation {
    pub customer_id: CustomerId,
    pub total_cost: Decimal,
    pub surcharges: SurchargeSelections,
    pub openings: Vec<Opening>,
}

/// A persisted quotation with its customer, surcharge record and openings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotationRecord {
    pub id: QuotationId,
    pub customer: Customer,
    pub total_cost: Decimal,
    pub surcharges: SurchargeSelections,
    pub openings: Vec<Opening>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotationSummary {
    pub id: QuotationId,
    pub customer_name: String,
    pub total: Decimal,
    pub date: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    pub year: i32,
    /// Calendar month, 1 through 12.
    pub month: u32,
    pub revenue: Decimal,
}

const MONTH_ABBREVIATIONS: [&str; 12] =
    ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

impl MonthlyRevenue {
    pub fn month_label(&self) -> &'static str {
        self.month
            .checked_sub(1)
            .and_then(|index| MONTH_ABBREVIATIONS.get(index as usize))
            .copied()
            .unwrap_or("???")
    }

    /// Chart label such as `Oct 2026`.
    pub fn label(&self) -> String {
        format!("{} {}", self.month_label(), self.year)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub customer: CustomerInfo,
    pub openings: Vec<Opening>,
    #[serde(default)]
    pub surcharges: SurchargeSelections,
    pub total_cost: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOutcome {
    pub quotation: QuotationRecord,
    pub is_existing_customer: bool,
}
