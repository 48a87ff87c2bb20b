use chrono::{DateTime, Utc};
use common::types::{TransactionStatus, TransactionType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub wallet_id: String,
    pub amount: i64,
    pub note: Option<String>,
    pub transaction_type: TransactionType,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Builds a brand-new pending transaction. `id` and `now` are supplied
    /// by the caller (minted from the injected clock/id generator) rather
    /// than defaulted here, so use cases stay in control of exactly when
    /// and from what instant they are derived.
    pub fn new(
        id: String,
        wallet_id: String,
        amount: i64,
        note: Option<String>,
        transaction_type: TransactionType,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            wallet_id,
            amount,
            note,
            transaction_type,
            status: TransactionStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}
