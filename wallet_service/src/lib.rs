//! Wallet domain and the single HTTP binary for the wallet ledger.
//!
//! `transaction_service` has no network surface of its own; this crate
//! mounts both `/wallets/*` and `/transactions/*` under `/api/v1` and
//! composes its use cases alongside this crate's own.
//!
//! # Modules
//!
//! * `domain` - the `Wallet` entity, its errors, the repository port.
//! * `infrastructure` - the Postgres-backed repository and the
//!   `WalletLookup` adapter `transaction_service` consumes.
//! * `use_cases` - create/get/list/update-status/get-with-balance.
//! * `api` - axum routes, request/response DTOs.

pub mod api;
pub mod domain;
pub mod infrastructure;
pub mod use_cases;
