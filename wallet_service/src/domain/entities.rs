use chrono::{DateTime, Utc};
use common::types::{Currency, WalletStatus};
use serde::{Deserialize, Serialize};

use crate::domain::error::WalletError;

/// Owner-scoped wallet, denominated in a single currency. Balance is
/// deliberately not a field here: it is always derived from the ledger
/// (`common::collab::RunningBalance`), never stored.
///
/// # Examples
/// ```
/// use wallet_service::domain::entities::Wallet;
/// use chrono::Utc;
///
/// let wallet = Wallet::builder()
///     .owner_id("owner-1".to_string())
///     .currency("USD".to_string())
///     .build("01ARZ3NDEKTSV4RRFFQ69G5FAV".to_string(), Utc::now());
/// assert!(wallet.is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    id: String,
    owner_id: String,
    currency: Currency,
    status: WalletStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl Wallet {
    pub fn builder() -> WalletBuilder {
        WalletBuilder::default()
    }

    /// Reconstructs a wallet loaded from persistence, re-running the same
    /// validation a fresh build does since a row could in principle have
    /// been written by another process.
    pub fn reconstitute(
        id: String,
        owner_id: String,
        currency: Currency,
        status: WalletStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Result<Self, WalletError> {
        if owner_id.trim().is_empty() {
            return Err(WalletError::InvalidData("owner_id cannot be blank".to_string()));
        }

        Ok(Self {
            id,
            owner_id,
            currency,
            status,
            created_at,
            updated_at,
            deleted_at,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn status(&self) -> WalletStatus {
        self.status
    }

    /// Wallet status has no state-machine guard (spec.md 4.1): any status is
    /// reachable from any other, unlike `TransactionStatus`.
    pub fn set_status(&mut self, status: WalletStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Builder ensuring a freshly-minted `Wallet` always satisfies its
/// invariants (non-blank owner, valid currency) before it exists.
#[derive(Default)]
pub struct WalletBuilder {
    owner_id: Option<String>,
    currency: Option<String>,
}

impl WalletBuilder {
    pub fn owner_id(mut self, owner_id: String) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn currency(mut self, currency: String) -> Self {
        self.currency = Some(currency);
        self
    }

    /// Builds a new `active` wallet stamped with `id`/`now` from the
    /// caller's id generator and clock.
    pub fn build(self, id: String, now: DateTime<Utc>) -> Result<Wallet, WalletError> {
        let owner_id = self
            .owner_id
            .ok_or_else(|| WalletError::InvalidData("owner_id is required".to_string()))?;
        let currency = self
            .currency
            .ok_or_else(|| WalletError::InvalidData("currency is required".to_string()))?;

        if owner_id.trim().is_empty() {
            return Err(WalletError::InvalidData("owner_id cannot be blank".to_string()));
        }

        let currency: Currency = currency.parse().map_err(WalletError::InvalidData)?;

        Ok(Wallet {
            id,
            owner_id,
            currency,
            status: WalletStatus::Active,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_rejects_blank_owner_id() {
        let result = Wallet::builder()
            .owner_id("   ".to_string())
            .currency("USD".to_string())
            .build("id-1".to_string(), Utc::now());
        assert!(matches!(result, Err(WalletError::InvalidData(_))));
    }

    #[test]
    fn builder_rejects_unknown_currency() {
        let result = Wallet::builder()
            .owner_id("owner-1".to_string())
            .currency("XYZ".to_string())
            .build("id-1".to_string(), Utc::now());
        assert!(result.is_err());
    }

    #[test]
    fn a_fresh_wallet_starts_active() {
        let wallet = Wallet::builder()
            .owner_id("owner-1".to_string())
            .currency("EUR".to_string())
            .build("id-1".to_string(), Utc::now())
            .unwrap();
        assert_eq!(wallet.status(), WalletStatus::Active);
        assert!(!wallet.is_deleted());
    }
}
