use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::entities::Wallet;
use crate::use_cases::get_wallet_with_balance::WalletWithBalance;

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub status: &'static str,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success",
            data,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WalletResponse {
    pub id: String,
    pub owner_id: String,
    pub currency: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<i64>,
}

impl From<&Wallet> for WalletResponse {
    fn from(w: &Wallet) -> Self {
        Self {
            id: w.id().to_string(),
            owner_id: w.owner_id().to_string(),
            currency: w.currency().to_string(),
            status: w.status().to_string(),
            created_at: w.created_at(),
            updated_at: w.updated_at(),
            balance: None,
        }
    }
}

impl From<&WalletWithBalance> for WalletResponse {
    fn from(w: &WalletWithBalance) -> Self {
        let mut response = WalletResponse::from(&w.wallet);
        response.balance = Some(w.balance);
        response
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransactionResponse {
    pub id: String,
    pub wallet_id: String,
    pub amount: i64,
    pub note: Option<String>,
    pub transaction_type: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&transaction_service::domain::entities::Transaction> for TransactionResponse {
    fn from(t: &transaction_service::domain::entities::Transaction) -> Self {
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
