pub mod auth_service;
pub mod invoice_service;
