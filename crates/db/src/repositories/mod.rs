use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use shutterquote_core::errors::ApplicationError;
use thiserror::Error;

pub mod customer;
pub mod quotation;
pub mod revenue;
pub mod store;

pub use customer::SqlCustomerRepository;
pub use quotation::SqlQuotationRepository;
pub use revenue::SqlRevenueRepository;
pub use store::SqlQuotationStore;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("customer {0} does not exist")]
    UnknownCustomer(i64),
}

impl From<RepositoryError> for ApplicationError {
    fn from(error: RepositoryError) -> Self {
        ApplicationError::Persistence(error.to_string())
    }
}

/// Current time at the millisecond precision timestamps are stored with, so a
/// value handed back from a write equals the one later read from disk.
pub(crate) fn stored_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

pub(crate) fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

pub(crate) fn parse_rfc3339(field: &str, value: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(value).map(|ts| ts.with_timezone(&Utc)).map_err(|err| {
        RepositoryError::Decode(format!("invalid {field} timestamp '{value}': {err}"))
    })
}

pub(crate) fn parse_decimal(field: &str, value: &str) -> Result<Decimal, RepositoryError> {
    Decimal::from_str(value)
        .map_err(|err| RepositoryError::Decode(format!("invalid {field} decimal '{value}': {err}")))
}

pub(crate) fn to_cents(amount: Decimal) -> Result<i64, RepositoryError> {
    (amount * Decimal::ONE_HUNDRED)
        .round()
        .to_i64()
        .ok_or_else(|| RepositoryError::Decode(format!("amount {amount} does not fit in cents")))
}

pub(crate) fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

pub(crate) fn to_count(field: &str, value: i64) -> Result<u32, RepositoryError> {
    u32::try_from(value)
        .map_err(|_| RepositoryError::Decode(format!("{field} `{value}` is not a valid count")))
}
