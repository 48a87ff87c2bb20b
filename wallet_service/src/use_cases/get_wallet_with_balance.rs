use std::sync::Arc;

use common::collab::RunningBalance;
use common::error::AppError;
use common::txmanager::DbCtx;

use crate::domain::entities::Wallet;
use crate::domain::error::WalletError;
use crate::domain::repository::WalletRepository;

/// A wallet alongside its derived balance.
#[derive(Debug, Clone)]
pub struct WalletWithBalance {
    pub wallet: Wallet,
    pub balance: i64,
}

/// Composes `WalletRepository::get_by_id` with `transaction_service`'s
/// running-balance computation, the way `WalletService::GetWithBalance`
/// composes `transactionService` in the original (SPEC_FULL.md 4.1). This
/// crate never depends on `transaction_service` directly — only on the
/// narrow [`RunningBalance`] contract in `common`.
#[derive(Clone)]
pub struct GetWalletWithBalanceUseCase {
    wallet_repo: Arc<dyn WalletRepository>,
    running_balance: Arc<dyn RunningBalance>,
}

impl GetWalletWithBalanceUseCase {
    pub fn new(wallet_repo: Arc<dyn WalletRepository>, running_balance: Arc<dyn RunningBalance>) -> Self {
        Self {
            wallet_repo,
            running_balance,
        }
    }

    #[tracing::instrument(name = "GetWalletWithBalanceUseCase::execute", skip(self))]
    pub async fn execute(&self, id: &str) -> Result<WalletWithBalance, WalletError> {
        let wallet = self
            .wallet_repo
            .get_by_id(DbCtx::pool(), id)
            .await?
            .ok_or_else(|| WalletError::NotFound(id.to_string()))?;

        let balance = self
            .running_balance
            .running_balance(id)
            .await
            .map_err(|e: AppError| WalletError::Repository(e.to_string()))?;

        Ok(WalletWithBalance { wallet, balance })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::collab::MockRunningBalance;

    #[tokio::test]
    async fn composes_the_wallet_with_its_computed_balance() {
        let mut repo = crate::domain::repository::MockWalletRepository::new();
        repo.expect_get_by_id().returning(|_, _| {
            Ok(Some(
                Wallet::builder()
                    .owner_id("owner-1".to_string())
                    .currency("USD".to_string())
                    .build("id-1".to_string(), chrono::Utc::now())
                    .unwrap(),
            ))
        });

        let mut running_balance = MockRunningBalance::new();
        running_balance.expect_running_balance().returning(|_| Ok(4200));

        let use_case = GetWalletWithBalanceUseCase::new(Arc::new(repo), Arc::new(running_balance));
        let result = use_case.execute("id-1").await.unwrap();
        assert_eq!(result.balance, 4200);
        assert_eq!(result.wallet.id(), "id-1");
    }

    #[tokio::test]
    async fn propagates_not_found_without_touching_the_balance() {
        let mut repo = crate::domain::repository::MockWalletRepository::new();
        repo.expect_get_by_id().returning(|_, _| Ok(None));

        let running_balance = MockRunningBalance::new();

        let use_case = GetWalletWithBalanceUseCase::new(Arc::new(repo), Arc::new(running_balance));
        let err = use_case.execute("missing").await.unwrap_err();
        assert!(matches!(err, WalletError::NotFound(_)));
    }
}
