pub mod auth;
pub mod customers;
pub mod transactions;
pub mod reports;
