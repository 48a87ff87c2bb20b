use chrono::{DateTime, Utc};
use common::types::{TransactionStatus, TransactionType};
use sqlx::FromRow;
use std::str::FromStr;

use crate::domain::entities::Transaction;
use crate::domain::error::TransactionError;

/// Row shape for the `transactions` table. Enums are stored as plain text
/// and converted at this boundary rather than via `sqlx::Type`, matching
/// the teacher's persistence models (`WalletModel`/`TransactionModel`
/// convert through `From` impls rather than binding enums directly).
#[derive(Debug, FromRow)]
pub struct TransactionModel {
    pub id: String,
    pub wallet_id: String,
    pub amount: i64,
    pub note: Option<String>,
    pub transaction_type: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Transaction> for TransactionModel {
    fn from(t: &Transaction) -> Self {
        Self {
            id: t.id.clone(),
            wallet_id: t.wallet_id.clone(),
            amount: t.amount,
            note: t.note.clone(),
            transaction_type: t.transaction_type.to_string(),
            status: t.status.to_string(),
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

impl TryFrom<TransactionModel> for Transaction {
    type Error = TransactionError;

    fn try_from(m: TransactionModel) -> Result<Self, Self::Error> {
        let transaction_type = TransactionType::from_str(&m.transaction_type)
            .map_err(TransactionError::Repository)?;
        let status = TransactionStatus::from_str(&m.status).map_err(TransactionError::Repository)?;

        Ok(Self {
            id: m.id,
            wallet_id: m.wallet_id,
            amount: m.amount,
            note: m.note,
            transaction_type,
            status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}
