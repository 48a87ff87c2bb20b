use chrono::{DateTime, Utc};
use common::types::{Currency, WalletStatus};
use sqlx::FromRow;
use std::str::FromStr;

use crate::domain::entities::Wallet;
use crate::domain::error::WalletError;

/// Row shape for the `wallets` table. Enums are stored as plain text and
/// converted at this boundary rather than via `sqlx::Type`, matching
/// `transaction_service`'s `TransactionModel`.
#[derive(Debug, FromRow)]
pub struct WalletModel {
    pub id: String,
    pub owner_id: String,
    pub currency: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<&Wallet> for WalletModel {
    fn from(w: &Wallet) -> Self {
        Self {
            id: w.id().to_string(),
            owner_id: w.owner_id().to_string(),
            currency: w.currency().to_string(),
            status: w.status().to_string(),
            created_at: w.created_at(),
            updated_at: w.updated_at(),
            deleted_at: w.deleted_at(),
        }
    }
}

impl TryFrom<WalletModel> for Wallet {
    type Error = WalletError;

    fn try_from(m: WalletModel) -> Result<Self, Self::Error> {
        let currency = Currency::from_str(&m.currency).map_err(WalletError::Repository)?;
        let status = WalletStatus::from_str(&m.status).map_err(WalletError::Repository)?;

        Wallet::reconstitute(
            m.id,
            m.owner_id,
            currency,
            status,
            m.created_at,
            m.updated_at,
            m.deleted_at,
        )
    }
}
