use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::pagination::Paginator;
use common::txmanager::DbCtx;
use common::types::{TransactionStatus, TransactionType};

use crate::domain::entities::Transaction;
use crate::domain::error::TransactionError;

#[cfg(test)]
use mockall::automock;

/// Filter fields for `List` (spec.md 4.2.5). All fields are additive
/// (AND'd together) and empty/`None` means "don't filter on this".
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub ids: Vec<String>,
    pub wallet_ids: Vec<String>,
    pub statuses: Vec<TransactionStatus>,
    pub types: Vec<TransactionType>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn create(&self, ctx: DbCtx<'_>, transaction: &Transaction) -> Result<Transaction, TransactionError>;

    async fn get_by_id(&self, ctx: DbCtx<'_>, id: &str) -> Result<Option<Transaction>, TransactionError>;

    /// Persists a new status for an existing transaction and returns the
    /// updated row. Callers are expected to have already validated the
    /// transition against the state machine.
    async fn update_status(
        &self,
        ctx: DbCtx<'_>,
        id: &str,
        status: TransactionStatus,
        now: DateTime<Utc>,
    ) -> Result<Transaction, TransactionError>;

    async fn list(
        &self,
        ctx: DbCtx<'_>,
        filter: &TransactionFilter,
        paginator: &Paginator,
    ) -> Result<(Vec<Transaction>, i64), TransactionError>;

    /// The full ledger for a wallet, `created_at` DESC (spec.md 4.2.5).
    async fn list_all_for_wallet(&self, ctx: DbCtx<'_>, wallet_id: &str) -> Result<Vec<Transaction>, TransactionError>;
}
