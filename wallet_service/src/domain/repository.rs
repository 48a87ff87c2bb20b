use async_trait::async_trait;
use common::pagination::Paginator;
use common::txmanager::DbCtx;
use common::types::{Currency, WalletStatus};

use crate::domain::entities::Wallet;
use crate::domain::error::WalletError;

#[cfg(test)]
use mockall::automock;

/// Filter fields for `List`. All fields are additive (AND'd together) and
/// empty means "don't filter on this" — fixing the dropped-filter bug the
/// original wallet repository carried (spec.md 9).
#[derive(Debug, Clone, Default)]
pub struct WalletFilter {
    pub ids: Vec<String>,
    pub owner_ids: Vec<String>,
    pub currencies: Vec<Currency>,
    pub statuses: Vec<WalletStatus>,
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait WalletRepository: Send + Sync {
    async fn create(&self, ctx: DbCtx<'_>, wallet: &Wallet) -> Result<Wallet, WalletError>;

    async fn get_by_id(&self, ctx: DbCtx<'_>, id: &str) -> Result<Option<Wallet>, WalletError>;

    async fn update_status(
        &self,
        ctx: DbCtx<'_>,
        id: &str,
        status: WalletStatus,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<Wallet, WalletError>;

    async fn list(
        &self,
        ctx: DbCtx<'_>,
        filter: &WalletFilter,
        paginator: &Paginator,
    ) -> Result<(Vec<Wallet>, i64), WalletError>;
}
