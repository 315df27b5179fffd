use super::auth::{FormData, SignInError};
use super::errors::DomainError;
use super::invoice::{Invoice, InvoiceChanges, InvoicePage, NewInvoice};

/// Invoice persistence. Ids are the opaque strings received from clients;
/// implementations reject ids they cannot address with `InvalidInput`.
pub trait InvoiceRepository: Send + Sync + 'static {
    fn create(&self, invoice: &NewInvoice) -> Result<String, DomainError>;
    fn update(&self, id: &str, changes: &InvoiceChanges) -> Result<(), DomainError>;
    fn delete(&self, id: &str) -> Result<(), DomainError>;
    fn find_by_id(&self, id: &str) -> Result<Option<Invoice>, DomainError>;
    fn list(&self, page: i64, limit: i64) -> Result<InvoicePage, DomainError>;
}

pub trait Authenticator: Send + Sync + 'static {
    fn sign_in(&self, provider: &str, form: &FormData) -> Result<(), SignInError>;
}
