use shutterquote_core::domain::quotation::MonthlyRevenue;
use sqlx::{sqlite::SqliteRow, Row};

use super::{from_cents, RepositoryError};
use crate::DbPool;

/// Number of calendar months reported, counting only months with quotations.
pub const REVENUE_MONTHS: i64 = 12;

#[derive(Clone)]
pub struct SqlRevenueRepository {
    pool: DbPool,
}

impl SqlRevenueRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Revenue per UTC calendar month, newest month first. Months without
    /// quotations are absent rather than reported as zero.
    pub async fn monthly_revenue(&self) -> Result<Vec<MonthlyRevenue>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT CAST(strftime('%Y', created_at) AS INTEGER) AS year,
                    CAST(strftime('%m', created_at) AS INTEGER) AS month,
                    SUM(total_cost_cents) AS revenue_cents
             FROM quotation
             GROUP BY year, month
             ORDER BY year DESC, month DESC
             LIMIT ?",
        )
        .bind(REVENUE_MONTHS)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(revenue_from_row).collect()
    }
}

fn revenue_from_row(row: &SqliteRow) -> Result<MonthlyRevenue, RepositoryError> {
    let year: i64 = row.try_get("year")?;
    let month: i64 = row.try_get("month")?;

    Ok(MonthlyRevenue {
        year: i32::try_from(year)
            .map_err(|_| RepositoryError::Decode(format!("invalid revenue year {year}")))?,
        month: u32::try_from(month)
            .ok()
            .filter(|month| (1..=12).contains(month))
            .ok_or_else(|| RepositoryError::Decode(format!("invalid revenue month {month}")))?,
        revenue: from_cents(row.try_get("revenue_cents")?),
    })
}
