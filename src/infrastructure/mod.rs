pub mod credentials;
pub mod invoice_repo;
pub mod models;
pub mod password;
