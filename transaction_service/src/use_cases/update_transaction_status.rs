use std::sync::Arc;

use common::cache::CacheAdapter;
use common::id::Clock;
use common::txmanager::{DbCtx, TxManager};
use common::types::TransactionStatus;

use crate::domain::balance;
use crate::domain::entities::Transaction;
use crate::domain::error::TransactionError;
use crate::domain::repository::TransactionRepository;

/// Advances a transaction's status through the state machine (spec.md
/// 4.2.2). Unlike `CreateTransactionUseCase`, the cache adjustment here is
/// not best-effort: it runs inside the same DB transaction as the status
/// write, and a cache failure rolls both back.
#[derive(Clone)]
pub struct UpdateTransactionStatusUseCase {
    transaction_repo: Arc<dyn TransactionRepository>,
    cache: Arc<dyn CacheAdapter>,
    tx_manager: TxManager,
    clock: Clock,
}

impl UpdateTransactionStatusUseCase {
    pub fn new(
        transaction_repo: Arc<dyn TransactionRepository>,
        cache: Arc<dyn CacheAdapter>,
        tx_manager: TxManager,
        clock: Clock,
    ) -> Self {
        Self {
            transaction_repo,
            cache,
            tx_manager,
            clock,
        }
    }

    #[tracing::instrument(name = "UpdateTransactionStatusUseCase::execute", skip(self))]
    pub async fn execute(&self, id: &str, new_status: TransactionStatus) -> Result<Transaction, TransactionError> {
        let current = self
            .transaction_repo
            .get_by_id(DbCtx::pool(), id)
            .await?
            .ok_or_else(|| TransactionError::NotFound(id.to_string()))?;

        if current.status == new_status {
            return Ok(current);
        }

        if !current.status.can_transition_to(new_status) {
            return Err(TransactionError::InvalidStatusTransition(
                current.status.to_string(),
                new_status.to_string(),
            ));
        }

        let lock = self
            .cache
            .mutex(&current.wallet_id)
            .await
            .map_err(|e| TransactionError::LockUnavailable(e.to_string()))?;

        let result = self.apply_transition(&current, new_status).await;

        let _ = lock.release().await;
        result
    }

    async fn apply_transition(&self, current: &Transaction, new_status: TransactionStatus) -> Result<Transaction, TransactionError> {
        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| TransactionError::Repository(e.to_string()))?;

        let now = (self.clock)();
        let updated = self
            .transaction_repo
            .update_status(DbCtx::tx(&mut tx), &current.id, new_status, now)
            .await;

        let updated = match updated {
            Ok(t) => t,
            Err(e) => {
                let _ = tx.rollback().await;
                return Err(e);
            }
        };

        if let Err(e) = self.adjust_balance_cache(current, new_status).await {
            let _ = tx.rollback().await;
            return Err(e);
        }

        tx.commit()
            .await
            .map_err(|e| TransactionError::Repository(e.to_string()))?;

        Ok(updated)
    }

    /// Applies the delta for `(type, current.status, new_status)` to the
    /// cached balance, only if an entry is already cached (spec.md 4.2.4:
    /// "apply it to the cached integer only if the key currently exists; on
    /// miss, do nothing"). A genuine cache I/O error is propagated so the
    /// caller rolls back the DB transaction, unlike the best-effort writes
    /// elsewhere in this service.
    async fn adjust_balance_cache(&self, current: &Transaction, new_status: TransactionStatus) -> Result<(), TransactionError> {
        let cached = self
            .cache
            .get_balance(&current.wallet_id)
            .await
            .map_err(|e| TransactionError::Repository(e.to_string()))?;

        let Some(cached) = cached else {
            return Ok(());
        };

        let delta = balance::delta_for_transition(current.transaction_type, current.amount, current.status, new_status);
        if delta == 0 {
            return Ok(());
        }

        self.cache
            .set_balance(&current.wallet_id, cached + delta)
            .await
            .map_err(|e| TransactionError::Repository(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::cache::MockCacheAdapter;
    use common::types::TransactionType;

    fn sample(status: TransactionStatus) -> Transaction {
        let now = Utc::now();
        Transaction {
            id: "id-1".to_string(),
            wallet_id: "wallet-1".to_string(),
            amount: 1000,
            note: None,
            transaction_type: TransactionType::Credit,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn same_status_is_a_no_op_and_takes_no_lock() {
        let mut repo = crate::domain::repository::MockTransactionRepository::new();
        let current = sample(TransactionStatus::Completed);
        let current_clone = current.clone();
        repo.expect_get_by_id().returning(move |_, _| Ok(Some(current_clone.clone())));

        // expect_mutex deliberately not registered: calling it would panic.
        let cache = MockCacheAdapter::new();

        let use_case = UpdateTransactionStatusUseCase::new(
            Arc::new(repo),
            Arc::new(cache),
            TxManager::new(dummy_pool()),
            common::id::system_clock(),
        );

        let result = use_case.execute("id-1", TransactionStatus::Completed).await.unwrap();
        assert_eq!(result.status, TransactionStatus::Completed);
    }

    #[tokio::test]
    async fn illegal_transition_is_rejected_before_any_lock() {
        let mut repo = crate::domain::repository::MockTransactionRepository::new();
        let current = sample(TransactionStatus::Completed);
        repo.expect_get_by_id().returning(move |_, _| Ok(Some(current.clone())));

        let cache = MockCacheAdapter::new();

        let use_case = UpdateTransactionStatusUseCase::new(
            Arc::new(repo),
            Arc::new(cache),
            TxManager::new(dummy_pool()),
            common::id::system_clock(),
        );

        let err = use_case
            .execute("id-1", TransactionStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(err, TransactionError::InvalidStatusTransition(_, _)));
    }

    /// A lazily-connected pool is fine here: these tests never reach
    /// `tx_manager.begin()` because they exit before taking the wallet lock.
    fn dummy_pool() -> sqlx::PgPool {
        sqlx::pool::PoolOptions::new()
            .min_connections(0)
            .connect_lazy("postgres://localhost/doesnotexist")
            .expect("lazy pool construction never touches the network")
    }
}
