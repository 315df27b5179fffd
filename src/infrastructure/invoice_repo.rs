use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::invoice::{Invoice, InvoiceChanges, InvoicePage, NewInvoice};
use crate::domain::ports::InvoiceRepository;
use crate::schema::invoices;

use super::models::{InvoiceChangesetRow, InvoiceRow, NewInvoiceRow};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

pub(crate) fn parse_id(raw: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw).map_err(|_| DomainError::InvalidInput(format!("invalid id '{}'", raw)))
}

fn to_column_cents(cents: i64) -> Result<i32, DomainError> {
    i32::try_from(cents)
        .map_err(|_| DomainError::InvalidInput(format!("amount {} cents out of range", cents)))
}

impl TryFrom<InvoiceRow> for Invoice {
    type Error = DomainError;

    fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
        Ok(Invoice {
            id: row.id.to_string(),
            customer_id: row.customer_id,
            amount: i64::from(row.amount),
            status: row
                .status
                .parse()
                .map_err(|e| DomainError::Internal(format!("invoice {}: {}", row.id, e)))?,
            date: row.date,
        })
    }
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselInvoiceRepository {
    pool: DbPool,
}

impl DieselInvoiceRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl InvoiceRepository for DieselInvoiceRepository {
    fn create(&self, invoice: &NewInvoice) -> Result<String, DomainError> {
        let row = NewInvoiceRow {
            id: Uuid::new_v4(),
            customer_id: invoice.customer_id.clone(),
            amount: to_column_cents(invoice.amount_in_cents)?,
            status: invoice.status.as_str().to_string(),
            date: invoice.date,
        };

        let mut conn = self.pool.get()?;
        diesel::insert_into(invoices::table)
            .values(&row)
            .execute(&mut conn)?;

        Ok(row.id.to_string())
    }

    fn update(&self, id: &str, changes: &InvoiceChanges) -> Result<(), DomainError> {
        let id = parse_id(id)?;
        let changeset = InvoiceChangesetRow {
            customer_id: changes.customer_id.clone(),
            amount: to_column_cents(changes.amount_in_cents)?,
            status: changes.status.as_str().to_string(),
        };

        let mut conn = self.pool.get()?;
        // Zero matched rows is not an error.
        diesel::update(invoices::table.find(id))
            .set(&changeset)
            .execute(&mut conn)?;
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), DomainError> {
        let id = parse_id(id)?;
        let mut conn = self.pool.get()?;
        diesel::delete(invoices::table.find(id)).execute(&mut conn)?;
        Ok(())
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Invoice>, DomainError> {
        let id = parse_id(id)?;
        let mut conn = self.pool.get()?;

        invoices::table
            .find(id)
            .select(InvoiceRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(Invoice::try_from)
            .transpose()
    }

    fn list(&self, page: i64, limit: i64) -> Result<InvoicePage, DomainError> {
        let mut conn = self.pool.get()?;

        let offset = (page - 1).saturating_mul(limit);
        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = invoices::table.count().get_result(conn)?;

            let rows = invoices::table
                .select(InvoiceRow::as_select())
                .order((invoices::date.desc(), invoices::id.asc()))
                .limit(limit)
                .offset(offset)
                .load(conn)?;

            Ok(InvoicePage {
                items: rows
                    .into_iter()
                    .map(Invoice::try_from)
                    .collect::<Result<_, _>>()?,
                total,
            })
        })
    }
}
