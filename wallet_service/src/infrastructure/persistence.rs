pub mod models;
pub mod wallet_repository;
