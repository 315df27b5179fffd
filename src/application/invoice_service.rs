use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::cache::PageCache;
use crate::domain::errors::DomainError;
use crate::domain::invoice::{Invoice, InvoiceChanges, InvoicePage, NewInvoice};
use crate::domain::ports::InvoiceRepository;
use crate::domain::validation::{validate_invoice, FieldErrors, InvoiceForm, ValidatedInvoice};

pub const INVOICES_PATH: &str = "/dashboard/invoices";

/// What a form submission hands back for re-rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct FormState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FormState {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            errors: None,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The form did not validate; nothing was written.
    Invalid(FormState),
    /// The database write failed.
    Failed(FormState),
    /// The write succeeded and the cached list was revalidated.
    Redirect(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(FormState),
    Failed(FormState),
}

impl DeleteOutcome {
    pub fn state(&self) -> &FormState {
        match self {
            DeleteOutcome::Deleted(state) | DeleteOutcome::Failed(state) => state,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InvoiceListResponse {
    pub items: Vec<Invoice>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

pub struct InvoiceService {
    repo: Arc<dyn InvoiceRepository>,
    pages: Arc<PageCache>,
}

impl InvoiceService {
    pub fn new(repo: Arc<dyn InvoiceRepository>, pages: Arc<PageCache>) -> Self {
        Self { repo, pages }
    }

    pub fn create_invoice(&self, form: &InvoiceForm) -> ActionOutcome {
        let valid = match validate_invoice(form) {
            Ok(valid) => valid,
            Err(errors) => {
                log::debug!("create invoice rejected: {:?}", errors);
                return invalid(errors, "Missing fields. Failed to Create Invoice.");
            }
        };

        let result = cents(&valid).and_then(|amount_in_cents| {
            self.repo.create(&NewInvoice {
                customer_id: valid.customer_id.clone(),
                amount_in_cents,
                status: valid.status,
                date: Utc::now().date_naive(),
            })
        });

        match result {
            Ok(id) => {
                log::info!("created invoice {}", id);
                self.pages.revalidate_path(INVOICES_PATH);
                ActionOutcome::Redirect(INVOICES_PATH)
            }
            Err(e) => {
                log::error!("failed to create invoice: {}", e);
                ActionOutcome::Failed(FormState::message(
                    "Database Error: Failed to Create Invoice.",
                ))
            }
        }
    }

    pub fn update_invoice(&self, id: &str, form: &InvoiceForm) -> ActionOutcome {
        let valid = match validate_invoice(form) {
            Ok(valid) => valid,
            Err(errors) => {
                log::debug!("update of invoice {} rejected: {:?}", id, errors);
                return invalid(errors, "Missing fields. Failed to Update Invoice.");
            }
        };

        let result = cents(&valid).and_then(|amount_in_cents| {
            self.repo.update(
                id,
                &InvoiceChanges {
                    customer_id: valid.customer_id.clone(),
                    amount_in_cents,
                    status: valid.status,
                },
            )
        });

        match result {
            Ok(()) => {
                log::info!("updated invoice {}", id);
                self.pages.revalidate_path(INVOICES_PATH);
                ActionOutcome::Redirect(INVOICES_PATH)
            }
            Err(e) => {
                log::error!("failed to update invoice {}: {}", id, e);
                ActionOutcome::Failed(FormState::message(
                    "Database Error: Failed to Update Invoice.",
                ))
            }
        }
    }

    pub fn delete_invoice(&self, id: &str) -> DeleteOutcome {
        match self.repo.delete(id) {
            Ok(()) => {
                log::info!("deleted invoice {}", id);
                self.pages.revalidate_path(INVOICES_PATH);
                DeleteOutcome::Deleted(FormState::message("Deleted Invoice."))
            }
            Err(e) => {
                log::error!("failed to delete invoice {}: {}", id, e);
                DeleteOutcome::Failed(FormState::message(
                    "Database Error: Failed to Delete Invoice.",
                ))
            }
        }
    }

    pub fn get_invoice(&self, id: &str) -> Result<Option<Invoice>, DomainError> {
        self.repo.find_by_id(id)
    }

    /// Rendered invoice list, served from the page cache when possible.
    ///
    /// `page` is clamped so the row offset fits in an `i64`; such pages are
    /// simply empty. Pages past the last invoice are not cached.
    pub fn list_invoices(&self, page: i64, limit: i64) -> Result<serde_json::Value, DomainError> {
        let limit = limit.clamp(1, 100);
        let page = page.clamp(1, i64::MAX / limit);
        let offset = (page - 1) * limit;
        let key = format!("page={}&limit={}", page, limit);

        if let Some(cached) = self.pages.get(INVOICES_PATH, &key) {
            return Ok(cached);
        }

        let generation = self.pages.generation(INVOICES_PATH);
        let InvoicePage { items, total } = self.repo.list(page, limit)?;
        let body = serde_json::to_value(InvoiceListResponse {
            items,
            total,
            page,
            limit,
        })
        .map_err(|e| DomainError::Internal(e.to_string()))?;

        if page == 1 || offset < total {
            self.pages.store(INVOICES_PATH, &key, generation, body.clone());
        } else {
            log::debug!("not caching {} past the last invoice ({} total)", key, total);
        }
        Ok(body)
    }
}

fn invalid(errors: FieldErrors, message: &str) -> ActionOutcome {
    ActionOutcome::Invalid(FormState {
        errors: Some(errors),
        message: Some(message.to_string()),
    })
}

fn cents(valid: &ValidatedInvoice) -> Result<i64, DomainError> {
    valid
        .amount_in_cents()
        .ok_or_else(|| DomainError::InvalidInput(format!("amount {} out of range", valid.amount)))
}
