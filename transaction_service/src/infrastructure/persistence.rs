pub mod models;
pub mod transaction_repository;
