use std::sync::Arc;

use common::txmanager::DbCtx;

use crate::domain::entities::Wallet;
use crate::domain::error::WalletError;
use crate::domain::repository::WalletRepository;

#[derive(Clone)]
pub struct GetWalletUseCase {
    wallet_repo: Arc<dyn WalletRepository>,
}

impl GetWalletUseCase {
    pub fn new(wallet_repo: Arc<dyn WalletRepository>) -> Self {
        Self { wallet_repo }
    }

    #[tracing::instrument(name = "GetWalletUseCase::execute", skip(self))]
    pub async fn execute(&self, id: &str) -> Result<Wallet, WalletError> {
        self.wallet_repo
            .get_by_id(DbCtx::pool(), id)
            .await?
            .ok_or_else(|| WalletError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_the_wallet_when_found() {
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

        let use_case = GetWalletUseCase::new(Arc::new(repo));
        let wallet = use_case.execute("id-1").await.unwrap();
        assert_eq!(wallet.id(), "id-1");
    }

    #[tokio::test]
    async fn returns_not_found_when_missing() {
        let mut repo = crate::domain::repository::MockWalletRepository::new();
        repo.expect_get_by_id().returning(|_, _| Ok(None));

        let use_case = GetWalletUseCase::new(Arc::new(repo));
        let err = use_case.execute("missing").await.unwrap_err();
        assert!(matches!(err, WalletError::NotFound(_)));
    }
}
