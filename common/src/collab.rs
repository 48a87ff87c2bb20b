//! Narrow collaboration traits binding the wallet and transaction domains
//! without a dependency cycle between their crates.
//!
//! `transaction_service` needs to know whether a wallet exists and is
//! active before it will create a transaction against it; `wallet_service`
//! needs the running balance transaction_service computes. Reimplementing
//! `examples/original_source/internal/app/services/wallets/service.go`'s
//! `transactionService` interface (wallet composes transaction) directly
//! would make `common` depend on both concrete crates, so instead both
//! narrow contracts live here: `transaction_service` implements
//! [`RunningBalance`] and consumes [`WalletLookup`]; `wallet_service`
//! implements [`WalletLookup`] (over its own repository) and consumes
//! [`RunningBalance`].

use async_trait::async_trait;

use crate::error::AppError;
use crate::types::WalletStatus;

#[cfg(any(test, feature = "test-util"))]
use mockall::automock;

/// Just enough of a wallet for the transaction domain to validate against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletRef {
    pub id: String,
    pub status: WalletStatus,
}

#[cfg_attr(any(test, feature = "test-util"), automock)]
#[async_trait]
pub trait WalletLookup: Send + Sync {
    async fn find_wallet(&self, wallet_id: &str) -> Result<Option<WalletRef>, AppError>;
}

#[cfg_attr(any(test, feature = "test-util"), automock)]
#[async_trait]
pub trait RunningBalance: Send + Sync {
    async fn running_balance(&self, wallet_id: &str) -> Result<i64, AppError>;
}
