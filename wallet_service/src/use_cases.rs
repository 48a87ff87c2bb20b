pub mod create_wallet;
pub mod get_wallet;
pub mod get_wallet_with_balance;
pub mod list_wallets;
pub mod update_wallet_status;
