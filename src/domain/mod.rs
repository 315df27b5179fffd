pub mod auth;
pub mod errors;
pub mod invoice;
pub mod ports;
pub mod validation;
