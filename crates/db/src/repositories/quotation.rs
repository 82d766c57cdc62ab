use chrono::{DateTime, Utc};
use shutterquote_core::domain::customer::display_name;
use shutterquote_core::domain::opening::{
    FrameStyle, MountType, Opening, OpeningType, OperatingSystem,
};
use shutterquote_core::domain::quotation::{
    NewQuotation, QuotationId, QuotationRecord, QuotationSummary,
};
use shutterquote_core::domain::surcharge::SurchargeSelections;
use sqlx::{sqlite::SqliteRow, Row, Sqlite, Transaction};

use super::customer::customer_from_row;
use super::{
    format_timestamp, from_cents, parse_decimal, parse_rfc3339, stored_now, to_cents, to_count,
    RepositoryError,
};
use crate::DbPool;

#[derive(Clone)]
pub struct SqlQuotationRepository {
    pool: DbPool,
}

impl SqlQuotationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Writes the quotation row, its surcharge row and every opening in one
    /// transaction. Any failure drops the transaction, which rolls it back.
    pub async fn create(
        &self,
        quotation: NewQuotation,
    ) -> Result<QuotationRecord, RepositoryError> {
        self.create_at(quotation, stored_now()).await
    }

    pub(crate) async fn create_at(
        &self,
        quotation: NewQuotation,
        created_at: DateTime<Utc>,
    ) -> Result<QuotationRecord, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let customer_row = sqlx::query(
            "SELECT customer_id, first_name, last_name, email, phone, address, city, state,
                    zip_code, created_at
             FROM customer WHERE customer_id = ?",
        )
        .bind(quotation.customer_id.0)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::UnknownCustomer(quotation.customer_id.0))?;
        let customer = customer_from_row(&customer_row)?;

        let total_cost_cents = to_cents(quotation.total_cost)?;
        let inserted = sqlx::query(
            "INSERT INTO quotation (customer_id, total_cost_cents, created_at) VALUES (?, ?, ?)",
        )
        .bind(quotation.customer_id.0)
        .bind(total_cost_cents)
        .bind(format_timestamp(created_at))
        .execute(&mut *tx)
        .await?;
        let id = QuotationId(inserted.last_insert_rowid());

        insert_surcharges(&mut tx, id, &quotation.surcharges).await?;
        for (position, opening) in quotation.openings.iter().enumerate() {
            insert_opening(&mut tx, id, position, opening).await?;
        }

        tx.commit().await?;

        Ok(QuotationRecord {
            id,
            customer,
            total_cost: from_cents(total_cost_cents),
            surcharges: quotation.surcharges,
            openings: quotation.openings,
            created_at,
        })
    }

    pub async fn find_by_id(
        &self,
        id: QuotationId,
    ) -> Result<Option<QuotationRecord>, RepositoryError> {
        let Some(row) = sqlx::query(
            "SELECT q.quotation_id, q.total_cost_cents, q.created_at AS quotation_created_at,
                    c.customer_id, c.first_name, c.last_name, c.email, c.phone, c.address,
                    c.city, c.state, c.zip_code, c.created_at
             FROM quotation q
             JOIN customer c ON c.customer_id = q.customer_id
             WHERE q.quotation_id = ?",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let customer = customer_from_row(&row)?;
        let created_at: String = row.try_get("quotation_created_at")?;

        let surcharge_row = sqlx::query(
            "SELECT double_hung, extensions, stainless_hinges, deluxe_valance,
                    french_door_cutouts, extension_poles, specialty_shapes,
                    casing_frame, clearview, hidden_tilt
             FROM quotation_surcharge WHERE quotation_id = ?",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            RepositoryError::Decode(format!("quotation {} has no surcharge record", id.0))
        })?;

        let opening_rows = sqlx::query(
            "SELECT opening_type, width, height, quantity, mount_type, frame_style,
                    operating_system, base_cost
             FROM quotation_opening
             WHERE quotation_id = ?
             ORDER BY position ASC",
        )
        .bind(id.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(QuotationRecord {
            id,
            customer,
            total_cost: from_cents(row.try_get("total_cost_cents")?),
            surcharges: surcharges_from_row(&surcharge_row)?,
            openings: opening_rows.iter().map(opening_from_row).collect::<Result<_, _>>()?,
            created_at: parse_rfc3339("quotation created_at", &created_at)?,
        }))
    }

    /// Every quotation with its customer's display name, newest first.
    pub async fn list(&self) -> Result<Vec<QuotationSummary>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT q.quotation_id, q.total_cost_cents, q.created_at, c.first_name, c.last_name
             FROM quotation q
             JOIN customer c ON c.customer_id = q.customer_id
             ORDER BY q.created_at DESC, q.quotation_id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(summary_from_row).collect()
    }
}

async fn insert_surcharges(
    tx: &mut Transaction<'_, Sqlite>,
    id: QuotationId,
    surcharges: &SurchargeSelections,
) -> Result<(), RepositoryError> {
    sqlx::query(
        "INSERT INTO quotation_surcharge
            (quotation_id, double_hung, extensions, stainless_hinges, deluxe_valance,
             french_door_cutouts, extension_poles, specialty_shapes,
             casing_frame, clearview, hidden_tilt)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id.0)
    .bind(i64::from(surcharges.double_hung))
    .bind(i64::from(surcharges.extensions))
    .bind(i64::from(surcharges.stainless_hinges))
    .bind(i64::from(surcharges.deluxe_valance))
    .bind(i64::from(surcharges.french_door_cutouts))
    .bind(i64::from(surcharges.extension_poles))
    .bind(i64::from(surcharges.specialty_shapes))
    .bind(surcharges.casing_frame)
    .bind(surcharges.clearview)
    .bind(surcharges.hidden_tilt)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn insert_opening(
    tx: &mut Transaction<'_, Sqlite>,
    id: QuotationId,
    position: usize,
    opening: &Opening,
) -> Result<(), RepositoryError> {
    let position = i64::try_from(position)
        .map_err(|_| RepositoryError::Decode(format!("opening position {position} overflows")))?;

    sqlx::query(
        "INSERT INTO quotation_opening
            (quotation_id, position, opening_type, width, height, quantity,
             mount_type, frame_style, operating_system, base_cost)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id.0)
    .bind(position)
    .bind(opening.kind.as_str())
    .bind(opening.width.to_string())
    .bind(opening.height.to_string())
    .bind(i64::from(opening.quantity))
    .bind(opening.mount_type.as_str())
    .bind(opening.frame_style.as_str())
    .bind(opening.operating_system.as_str())
    .bind(opening.base_cost.to_string())
    .execute(&mut **tx)
    .await?;
    Ok(())
}

fn surcharges_from_row(row: &SqliteRow) -> Result<SurchargeSelections, RepositoryError> {
    let count = |field: &str| -> Result<u32, RepositoryError> {
        to_count(field, row.try_get::<i64, _>(field)?)
    };

    Ok(SurchargeSelections {
        double_hung: count("double_hung")?,
        extensions: count("extensions")?,
        stainless_hinges: count("stainless_hinges")?,
        deluxe_valance: count("deluxe_valance")?,
        french_door_cutouts: count("french_door_cutouts")?,
        extension_poles: count("extension_poles")?,
        specialty_shapes: count("specialty_shapes")?,
        casing_frame: row.try_get("casing_frame")?,
        clearview: row.try_get("clearview")?,
        hidden_tilt: row.try_get("hidden_tilt")?,
    })
}

fn opening_from_row(row: &SqliteRow) -> Result<Opening, RepositoryError> {
    let text = |field: &str| -> Result<String, RepositoryError> { Ok(row.try_get(field)?) };
    let invalid = |field: &str, value: &str| {
        RepositoryError::Decode(format!("invalid opening {field}: {value}"))
    };

    let kind = text("opening_type")?;
    let mount_type = text("mount_type")?;
    let frame_style = text("frame_style")?;
    let operating_system = text("operating_system")?;

    Ok(Opening {
        kind: OpeningType::parse(&kind).ok_or_else(|| invalid("type", &kind))?,
        width: parse_decimal("opening width", &text("width")?)?,
        height: parse_decimal("opening height", &text("height")?)?,
        quantity: to_count("opening quantity", row.try_get("quantity")?)?,
        mount_type: MountType::parse(&mount_type)
            .ok_or_else(|| invalid("mount_type", &mount_type))?,
        frame_style: FrameStyle::parse(&frame_style)
            .ok_or_else(|| invalid("frame_style", &frame_style))?,
        operating_system: OperatingSystem::parse(&operating_system)
            .ok_or_else(|| invalid("operating_system", &operating_system))?,
        base_cost: parse_decimal("opening base_cost", &text("base_cost")?)?,
    })
}

fn summary_from_row(row: &SqliteRow) -> Result<QuotationSummary, RepositoryError> {
    let first_name: String = row.try_get("first_name")?;
    let last_name: String = row.try_get("last_name")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(QuotationSummary {
        id: QuotationId(row.try_get("quotation_id")?),
        customer_name: display_name(&first_name, &last_name),
        total: from_cents(row.try_get("total_cost_cents")?),
        date: parse_rfc3339("quotation created_at", &created_at)?.date_naive(),
    })
}
