use std::sync::Arc;

use common::cache::CacheAdapter;
use common::collab::WalletLookup;
use common::error::FieldError;
use common::id::{Clock, IdGenerator};
use common::txmanager::DbCtx;
use common::types::{TransactionType, WalletStatus};

use crate::domain::balance;
use crate::domain::entities::Transaction;
use crate::domain::error::TransactionError;
use crate::domain::repository::TransactionRepository;

pub struct CreateTransactionInput {
    pub wallet_id: String,
    pub amount: i64,
    pub note: Option<String>,
    pub transaction_type: TransactionType,
    pub idempotency_key: String,
}

impl CreateTransactionInput {
    pub fn validate(&self) -> Result<(), TransactionError> {
        let mut errors = Vec::new();

        if self.amount <= 0 {
            errors.push(FieldError::new("amount", "must be greater than zero"));
        }
        if self.wallet_id.trim().is_empty() {
            errors.push(FieldError::new("wallet_id", "is required"));
        }
        if self.idempotency_key.trim().is_empty() {
            errors.push(FieldError::new("idempotency_key", "is required"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(TransactionError::Validation(errors))
        }
    }
}

/// Creates a transaction under idempotency and per-wallet exclusion
/// (spec.md 4.2.1). Coordinates the two distributed mutexes in the order
/// the concurrency model requires: idempotency lock acquired first, wallet
/// lock acquired and released inside it, idempotency lock released last.
#[derive(Clone)]
pub struct CreateTransactionUseCase {
    transaction_repo: Arc<dyn TransactionRepository>,
    wallet_lookup: Arc<dyn WalletLookup>,
    cache: Arc<dyn CacheAdapter>,
    ids: Arc<IdGenerator>,
    clock: Clock,
}

impl CreateTransactionUseCase {
    pub fn new(
        transaction_repo: Arc<dyn TransactionRepository>,
        wallet_lookup: Arc<dyn WalletLookup>,
        cache: Arc<dyn CacheAdapter>,
        ids: Arc<IdGenerator>,
        clock: Clock,
    ) -> Self {
        Self {
            transaction_repo,
            wallet_lookup,
            cache,
            ids,
            clock,
        }
    }

    #[tracing::instrument(name = "CreateTransactionUseCase::execute", skip(self, input))]
    pub async fn execute(&self, input: CreateTransactionInput) -> Result<Transaction, TransactionError> {
        input.validate()?;

        let idempotency_key = format!("idempotency:{}", input.idempotency_key);
        let idem_lock = self
            .cache
            .mutex(&idempotency_key)
            .await
            .map_err(|e| TransactionError::LockUnavailable(e.to_string()))?;

        let result = self.execute_under_idempotency_lock(&input).await;

        let _ = idem_lock.release().await;
        result
    }

    async fn execute_under_idempotency_lock(&self, input: &CreateTransactionInput) -> Result<Transaction, TransactionError> {
        if let Some(existing) = self.lookup_idempotent(&input.idempotency_key).await {
            return Ok(existing);
        }

        let wallet = self
            .wallet_lookup
            .find_wallet(&input.wallet_id)
            .await
            .map_err(|e| TransactionError::Repository(e.to_string()))?
            .ok_or_else(|| TransactionError::WalletNotFound(input.wallet_id.clone()))?;

        if wallet.status != WalletStatus::Active {
            return Err(TransactionError::WalletNotActive);
        }

        let wallet_lock = self
            .cache
            .mutex(&input.wallet_id)
            .await
            .map_err(|e| TransactionError::LockUnavailable(e.to_string()))?;

        let result = self.create_under_wallet_lock(input).await;

        let _ = wallet_lock.release().await;
        result
    }

    async fn lookup_idempotent(&self, idempotency_key: &str) -> Option<Transaction> {
        match self.cache.get_idempotent_record(idempotency_key).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(t) => Some(t),
                Err(e) => {
                    tracing::warn!(error = %e, "could not deserialize cached idempotency record");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "idempotency cache lookup failed, proceeding as a miss");
                None
            }
        }
    }

    async fn create_under_wallet_lock(&self, input: &CreateTransactionInput) -> Result<Transaction, TransactionError> {
        let ledger = self
            .transaction_repo
            .list_all_for_wallet(DbCtx::pool(), &input.wallet_id)
            .await?;
        let balance = balance::reduce(&ledger);

        if input.transaction_type == TransactionType::Debit && balance < input.amount {
            return Err(TransactionError::InsufficientFunds);
        }

        let now = (self.clock)();
        let id = self.ids.generate(now);
        let transaction = Transaction::new(
            id,
            input.wallet_id.clone(),
            input.amount,
            input.note.clone(),
            input.transaction_type,
            now,
        );

        let saved = self.transaction_repo.create(DbCtx::pool(), &transaction).await?;

        self.publish_idempotent_record(&input.idempotency_key, &saved).await;

        let delta = balance::delta_for_create(saved.transaction_type, saved.amount);
        let new_balance = balance + delta;
        if let Err(e) = self.cache.set_balance(&saved.wallet_id, new_balance).await {
            tracing::warn!(error = %e, wallet_id = %saved.wallet_id, "failed to update balance cache after create");
        }

        Ok(saved)
    }

    async fn publish_idempotent_record(&self, idempotency_key: &str, transaction: &Transaction) {
        let value = match serde_json::to_value(transaction) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize transaction for idempotency cache");
                return;
            }
        };

        if let Err(e) = self.cache.set_idempotent_record(idempotency_key, value).await {
            tracing::warn!(error = %e, "failed to publish idempotency record");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::cache::{Lock, MockCacheAdapter};
    use common::collab::{MockWalletLookup, WalletRef};

    fn sample_input() -> CreateTransactionInput {
        CreateTransactionInput {
            wallet_id: "wallet-1".to_string(),
            amount: 500,
            note: None,
            transaction_type: TransactionType::Credit,
            idempotency_key: "K".to_string(),
        }
    }

    #[tokio::test]
    async fn returns_cached_transaction_on_idempotent_replay() {
        let mut cache = MockCacheAdapter::new();
        cache.expect_mutex().returning(|_| Ok(Lock::noop()));

        let now = Utc::now();
        let existing = Transaction::new("id-1".to_string(), "wallet-1".to_string(), 500, None, TransactionType::Credit, now);
        let existing_json = serde_json::to_value(&existing).unwrap();
        cache
            .expect_get_idempotent_record()
            .returning(move |_| Ok(Some(existing_json.clone())));

        let wallet_lookup = MockWalletLookup::new();
        let repo = crate::domain::repository::MockTransactionRepository::new();

        let use_case = CreateTransactionUseCase::new(
            Arc::new(repo),
            Arc::new(wallet_lookup),
            Arc::new(cache),
            Arc::new(IdGenerator::new()),
            common::id::system_clock(),
        );

        let result = use_case.execute(sample_input()).await.unwrap();
        assert_eq!(result.id, "id-1");
    }

    #[tokio::test]
    async fn rejects_debit_against_insufficient_live_ledger() {
        let mut cache = MockCacheAdapter::new();
        cache.expect_mutex().returning(|_| Ok(Lock::noop()));
        cache.expect_get_idempotent_record().returning(|_| Ok(None));

        let mut wallet_lookup = MockWalletLookup::new();
        wallet_lookup.expect_find_wallet().returning(|id| {
            Ok(Some(WalletRef {
                id: id.to_string(),
                status: WalletStatus::Active,
            }))
        });

        let mut repo = crate::domain::repository::MockTransactionRepository::new();
        repo.expect_list_all_for_wallet().returning(|_, _| Ok(vec![]));

        let use_case = CreateTransactionUseCase::new(
            Arc::new(repo),
            Arc::new(wallet_lookup),
            Arc::new(cache),
            Arc::new(IdGenerator::new()),
            common::id::system_clock(),
        );

        let mut input = sample_input();
        input.transaction_type = TransactionType::Debit;
        input.amount = 1;

        let err = use_case.execute(input).await.unwrap_err();
        assert!(matches!(err, TransactionError::InsufficientFunds));
    }

    #[tokio::test]
    async fn rejects_transactions_against_a_non_active_wallet() {
        let mut cache = MockCacheAdapter::new();
        cache.expect_mutex().returning(|_| Ok(Lock::noop()));
        cache.expect_get_idempotent_record().returning(|_| Ok(None));

        let mut wallet_lookup = MockWalletLookup::new();
        wallet_lookup.expect_find_wallet().returning(|id| {
            Ok(Some(WalletRef {
                id: id.to_string(),
                status: WalletStatus::Frozen,
            }))
        });

        let repo = crate::domain::repository::MockTransactionRepository::new();

        let use_case = CreateTransactionUseCase::new(
            Arc::new(repo),
            Arc::new(wallet_lookup),
            Arc::new(cache),
            Arc::new(IdGenerator::new()),
            common::id::system_clock(),
        );

        let err = use_case.execute(sample_input()).await.unwrap_err();
        assert!(matches!(err, TransactionError::WalletNotActive));
    }

    #[test]
    fn rejects_non_positive_amount_before_touching_any_collaborator() {
        let mut input = sample_input();
        input.amount = 0;
        assert!(input.validate().is_err());
    }
}
