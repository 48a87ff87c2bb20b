use std::sync::Arc;

use common::pagination::{Pagination, Paginator};
use common::txmanager::DbCtx;

use crate::domain::entities::Wallet;
use crate::domain::error::WalletError;
use crate::domain::repository::{WalletFilter, WalletRepository};

#[derive(Clone)]
pub struct ListWalletsUseCase {
    wallet_repo: Arc<dyn WalletRepository>,
}

impl ListWalletsUseCase {
    pub fn new(wallet_repo: Arc<dyn WalletRepository>) -> Self {
        Self { wallet_repo }
    }

    #[tracing::instrument(name = "ListWalletsUseCase::execute", skip(self, filter))]
    pub async fn execute(
        &self,
        filter: WalletFilter,
        paginator: Paginator,
    ) -> Result<(Vec<Wallet>, Pagination), WalletError> {
        let (rows, total) = self.wallet_repo.list(DbCtx::pool(), &filter, &paginator).await?;

        let (page, per_page) = paginator.normalized();
        let pagination = Pagination::new(page, rows.len() as i64, total, per_page);

        Ok((rows, pagination))
    }
}
