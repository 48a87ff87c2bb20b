use std::sync::Arc;

use common::pagination::{Pagination, Paginator};
use common::txmanager::DbCtx;

use crate::domain::entities::Transaction;
use crate::domain::error::TransactionError;
use crate::domain::repository::{TransactionFilter, TransactionRepository};

#[derive(Clone)]
pub struct ListTransactionsUseCase {
    transaction_repo: Arc<dyn TransactionRepository>,
}

impl ListTransactionsUseCase {
    pub fn new(transaction_repo: Arc<dyn TransactionRepository>) -> Self {
        Self { transaction_repo }
    }

    #[tracing::instrument(name = "ListTransactionsUseCase::execute", skip(self, filter))]
    pub async fn execute(
        &self,
        filter: TransactionFilter,
        paginator: Paginator,
    ) -> Result<(Vec<Transaction>, Pagination), TransactionError> {
        let (rows, total) = self
            .transaction_repo
            .list(DbCtx::pool(), &filter, &paginator)
            .await?;

        let (page, per_page) = paginator.normalized();
        let pagination = Pagination::new(page, rows.len() as i64, total, per_page);

        Ok((rows, pagination))
    }
}
