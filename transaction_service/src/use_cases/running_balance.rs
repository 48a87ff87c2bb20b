use std::sync::Arc;

use async_trait::async_trait;
use common::cache::CacheAdapter;
use common::collab::RunningBalance;
use common::error::AppError;
use common::txmanager::DbCtx;

use crate::domain::balance;
use crate::domain::repository::TransactionRepository;

/// Cache-first running balance (spec.md 4.2.3). Implements the shared
/// [`RunningBalance`] collaboration trait so `wallet_service` can depend on
/// it without depending on this crate's concrete use-case types.
#[derive(Clone)]
pub struct RunningBalanceUseCase {
    transaction_repo: Arc<dyn TransactionRepository>,
    cache: Arc<dyn CacheAdapter>,
}

impl RunningBalanceUseCase {
    pub fn new(transaction_repo: Arc<dyn TransactionRepository>, cache: Arc<dyn CacheAdapter>) -> Self {
        Self {
            transaction_repo,
            cache,
        }
    }

    #[tracing::instrument(name = "RunningBalanceUseCase::execute", skip(self))]
    pub async fn execute(&self, wallet_id: &str) -> Result<i64, AppError> {
        match self.cache.get_balance(wallet_id).await {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, wallet_id, "balance cache read failed, falling back to ledger reduction");
            }
        }

        let lock = self.cache.mutex(wallet_id).await?;
        let result = self.rebuild_under_lock(wallet_id).await;
        let _ = lock.release().await;
        result
    }

    async fn rebuild_under_lock(&self, wallet_id: &str) -> Result<i64, AppError> {
        let ledger = self
            .transaction_repo
            .list_all_for_wallet(DbCtx::pool(), wallet_id)
            .await
            .map_err(AppError::from)?;

        let computed = balance::reduce(&ledger);

        if let Err(e) = self.cache.set_balance(wallet_id, computed).await {
            tracing::warn!(error = %e, wallet_id, "failed to refresh balance cache after rebuild");
        }

        Ok(computed)
    }
}

#[async_trait]
impl RunningBalance for RunningBalanceUseCase {
    async fn running_balance(&self, wallet_id: &str) -> Result<i64, AppError> {
        self.execute(wallet_id).await
    }
}
