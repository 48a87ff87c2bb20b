use std::sync::Arc;

use common::txmanager::DbCtx;

use crate::domain::entities::Transaction;
use crate::domain::error::TransactionError;
use crate::domain::repository::TransactionRepository;

#[derive(Clone)]
pub struct GetTransactionUseCase {
    transaction_repo: Arc<dyn TransactionRepository>,
}

impl GetTransactionUseCase {
    pub fn new(transaction_repo: Arc<dyn TransactionRepository>) -> Self {
        Self { transaction_repo }
    }

    #[tracing::instrument(name = "GetTransactionUseCase::execute", skip(self))]
    pub async fn execute(&self, id: &str) -> Result<Transaction, TransactionError> {
        self.transaction_repo
            .get_by_id(DbCtx::pool(), id)
            .await?
            .ok_or_else(|| TransactionError::NotFound(id.to_string()))
    }
}
