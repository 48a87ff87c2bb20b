//! Transaction domain as a library crate: no network surface of its own.
//!
//! `wallet_service` is the single axum binary and mounts both `/wallets/*`
//! and `/transactions/*`; this crate exposes its use cases and the
//! [`common::collab::RunningBalance`] implementation wallet_service
//! consumes to compose a wallet with its computed balance.
//!
//! # Modules
//!
//! * `domain` - entities, errors, the ledger reduction/state-machine rules.
//! * `infrastructure` - the Postgres-backed repository.
//! * `use_cases` - create/update-status/running-balance/get/list.

pub mod domain;
pub mod infrastructure;
pub mod use_cases;
