use std::sync::Arc;

use common::id::Clock;
use common::txmanager::DbCtx;
use common::types::WalletStatus;

use crate::domain::entities::Wallet;
use crate::domain::error::WalletError;
use crate::domain::repository::WalletRepository;

/// Wallet status has no state-machine guard (spec.md 4.1): every status is
/// reachable from every other. Still a no-op, taking no write, when the
/// requested status matches the current one.
#[derive(Clone)]
pub struct UpdateWalletStatusUseCase {
    wallet_repo: Arc<dyn WalletRepository>,
    clock: Clock,
}

impl UpdateWalletStatusUseCase {
    pub fn new(wallet_repo: Arc<dyn WalletRepository>, clock: Clock) -> Self {
        Self { wallet_repo, clock }
    }

    #[tracing::instrument(name = "UpdateWalletStatusUseCase::execute", skip(self))]
    pub async fn execute(&self, id: &str, status: WalletStatus) -> Result<Wallet, WalletError> {
        let current = self
            .wallet_repo
            .get_by_id(DbCtx::pool(), id)
            .await?
            .ok_or_else(|| WalletError::NotFound(id.to_string()))?;

        if current.status() == status {
            return Ok(current);
        }

        let now = (self.clock)();
        self.wallet_repo.update_status(DbCtx::pool(), id, status, now).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::id::system_clock;

    fn wallet(status: WalletStatus) -> Wallet {
        let mut w = Wallet::builder()
            .owner_id("owner-1".to_string())
            .currency("USD".to_string())
            .build("id-1".to_string(), chrono::Utc::now())
            .unwrap();
        w.set_status(status, chrono::Utc::now());
        w
    }

    #[tokio::test]
    async fn same_status_is_a_no_op() {
        let mut repo = crate::domain::repository::MockWalletRepository::new();
        repo.expect_get_by_id()
            .returning(|_, _| Ok(Some(wallet(WalletStatus::Frozen))));
        // expect_update_status deliberately not registered.

        let use_case = UpdateWalletStatusUseCase::new(Arc::new(repo), system_clock());
        let result = use_case.execute("id-1", WalletStatus::Frozen).await.unwrap();
        assert_eq!(result.status(), WalletStatus::Frozen);
    }

    #[tokio::test]
    async fn any_status_transitions_freely() {
        let mut repo = crate::domain::repository::MockWalletRepository::new();
        repo.expect_get_by_id()
            .returning(|_, _| Ok(Some(wallet(WalletStatus::Active))));
        repo.expect_update_status()
            .returning(|_, _, status, _| Ok(wallet(status)));

        let use_case = UpdateWalletStatusUseCase::new(Arc::new(repo), system_clock());
        let result = use_case.execute("id-1", WalletStatus::Inactive).await.unwrap();
        assert_eq!(result.status(), WalletStatus::Inactive);
    }
}
