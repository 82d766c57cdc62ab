use shutterquote_core::domain::customer::{Customer, CustomerId, CustomerInfo, CustomerResolution};
use sqlx::{sqlite::SqliteRow, Row};
use tracing::info;

use super::{format_timestamp, parse_rfc3339, stored_now, RepositoryError};
use crate::DbPool;

const CUSTOMER_COLUMNS: &str =
    "customer_id, first_name, last_name, email, phone, address, city, state, zip_code, created_at";

#[derive(Clone)]
pub struct SqlCustomerRepository {
    pool: DbPool,
}

impl SqlCustomerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Exact, case-sensitive lookup.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {CUSTOMER_COLUMNS} FROM customer WHERE email = ?"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(customer_from_row).transpose()
    }

    /// Returns the customer stored under `info.email`, creating it on a miss.
    /// An existing row is never updated from `info`.
    pub async fn find_or_create(
        &self,
        info: &CustomerInfo,
    ) -> Result<CustomerResolution, RepositoryError> {
        if let Some(customer) = self.find_by_email(&info.email).await? {
            return Ok(CustomerResolution { customer, is_existing: true });
        }

        self.insert_or_resolve(info).await
    }

    /// Inserts without a prior lookup. Losing a race on the email constraint
    /// resolves to the row that won it.
    pub(crate) async fn insert_or_resolve(
        &self,
        info: &CustomerInfo,
    ) -> Result<CustomerResolution, RepositoryError> {
        let created_at = stored_now();
        let inserted = sqlx::query(
            "INSERT INTO customer
                (first_name, last_name, email, phone, address, city, state, zip_code, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&info.first_name)
        .bind(&info.last_name)
        .bind(&info.email)
        .bind(&info.phone)
        .bind(&info.address)
        .bind(&info.city)
        .bind(&info.state)
        .bind(&info.zip_code)
        .bind(format_timestamp(created_at))
        .execute(&self.pool)
        .await;

        match inserted {
            Ok(result) => Ok(CustomerResolution {
                customer: Customer {
                    id: CustomerId(result.last_insert_rowid()),
                    info: info.clone(),
                    created_at,
                },
                is_existing: false,
            }),
            Err(sqlx::Error::Database(error)) if error.is_unique_violation() => {
                let customer = self.find_by_email(&info.email).await?.ok_or_else(|| {
                    RepositoryError::Decode(format!(
                        "customer email {} conflicted but no row was found",
                        info.email
                    ))
                })?;
                info!(
                    event_name = "customer.conflict.resolved",
                    customer_id = customer.id.0,
                    "concurrent customer insert resolved to existing row"
                );
                Ok(CustomerResolution { customer, is_existing: true })
            }
            Err(error) => Err(error.into()),
        }
    }
}

pub(crate) fn customer_from_row(row: &SqliteRow) -> Result<Customer, RepositoryError> {
    let created_at: String = row.try_get("created_at")?;
    Ok(Customer {
        id: CustomerId(row.try_get("customer_id")?),
        info: CustomerInfo {
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            address: row.try_get("address")?,
            city: row.try_get("city")?,
            state: row.try_get("state")?,
            zip_code: row.try_get("zip_code")?,
        },
        created_at: parse_rfc3339("customer created_at", &created_at)?,
    })
}
