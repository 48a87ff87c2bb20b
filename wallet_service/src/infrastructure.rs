pub mod persistence;
pub mod wallet_lookup;
