use std::sync::Arc;

use async_trait::async_trait;
use common::collab::{WalletLookup, WalletRef};
use common::error::AppError;
use common::txmanager::DbCtx;

use crate::domain::repository::WalletRepository;

/// Adapts this crate's `WalletRepository` to the narrow `WalletLookup`
/// contract `transaction_service::CreateTransactionUseCase` consumes, so
/// that crate never depends on `wallet_service` directly (common::collab's
/// module doc explains the cycle this avoids).
pub struct WalletRepositoryLookup {
    wallet_repo: Arc<dyn WalletRepository>,
}

impl WalletRepositoryLookup {
    pub fn new(wallet_repo: Arc<dyn WalletRepository>) -> Self {
        Self { wallet_repo }
    }
}

#[async_trait]
impl WalletLookup for WalletRepositoryLookup {
    async fn find_wallet(&self, wallet_id: &str) -> Result<Option<WalletRef>, AppError> {
        let wallet = self
            .wallet_repo
            .get_by_id(DbCtx::pool(), wallet_id)
            .await
            .map_err(AppError::from)?;

        Ok(wallet.map(|w| WalletRef {
            id: w.id().to_string(),
            status: w.status(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::types::WalletStatus;

    #[tokio::test]
    async fn maps_a_found_wallet_into_a_wallet_ref() {
        let mut repo = crate::domain::repository::MockWalletRepository::new();
        repo.expect_get_by_id().returning(|_, _| {
            Ok(Some(
                crate::domain::entities::Wallet::builder()
                    .owner_id("owner-1".to_string())
                    .currency("USD".to_string())
                    .build("id-1".to_string(), chrono::Utc::now())
                    .unwrap(),
            ))
        });

        let lookup = WalletRepositoryLookup::new(Arc::new(repo));
        let found = lookup.find_wallet("id-1").await.unwrap().unwrap();
        assert_eq!(found.id, "id-1");
        assert_eq!(found.status, WalletStatus::Active);
    }

    #[tokio::test]
    async fn returns_none_when_the_wallet_does_not_exist() {
        let mut repo = crate::domain::repository::MockWalletRepository::new();
        repo.expect_get_by_id().returning(|_, _| Ok(None));

        let lookup = WalletRepositoryLookup::new(Arc::new(repo));
        assert!(lookup.find_wallet("missing").await.unwrap().is_none());
    }
}
