//! End-to-end lifecycle across the wallet use cases against an in-memory
//! fake repository: create, duplicate rejection, status update, balance
//! composition. `WalletRepository`'s `automock` is only visible to
//! `wallet_service`'s own `#[cfg(test)]` unit tests, not to this external
//! binary, so the fake is hand-written here the way the teacher's own
//! integration test hand-rolls its doubles.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::collab::MockRunningBalance;
use common::id::IdGenerator;
use common::pagination::Paginator;
use common::txmanager::DbCtx;
use common::types::{Currency, WalletStatus};

use wallet_service::domain::entities::Wallet;
use wallet_service::domain::error::WalletError;
use wallet_service::domain::repository::{WalletFilter, WalletRepository};
use wallet_service::use_cases::create_wallet::{CreateWalletInput, CreateWalletUseCase};
use wallet_service::use_cases::get_wallet::GetWalletUseCase;
use wallet_service::use_cases::get_wallet_with_balance::GetWalletWithBalanceUseCase;
use wallet_service::use_cases::update_wallet_status::UpdateWalletStatusUseCase;

#[derive(Default)]
struct FakeWalletRepository {
    rows: Mutex<HashMap<String, Wallet>>,
}

#[async_trait]
impl WalletRepository for FakeWalletRepository {
    async fn create(&self, _ctx: DbCtx<'_>, wallet: &Wallet) -> Result<Wallet, WalletError> {
        let mut rows = self.rows.lock().unwrap();
        rows.insert(wallet.id().to_string(), wallet.clone());
        Ok(wallet.clone())
    }

    async fn get_by_id(&self, _ctx: DbCtx<'_>, id: &str) -> Result<Option<Wallet>, WalletError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(id)
            .filter(|w| !w.is_deleted())
            .cloned())
    }

    async fn update_status(
        &self,
        _ctx: DbCtx<'_>,
        id: &str,
        status: WalletStatus,
        now: DateTime<Utc>,
    ) -> Result<Wallet, WalletError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows.get_mut(id).ok_or_else(|| WalletError::NotFound(id.to_string()))?;
        row.set_status(status, now);
        Ok(row.clone())
    }

    async fn list(
        &self,
        _ctx: DbCtx<'_>,
        filter: &WalletFilter,
        _paginator: &Paginator,
    ) -> Result<(Vec<Wallet>, i64), WalletError> {
        let rows: Vec<_> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|w| !w.is_deleted())
            .filter(|w| filter.owner_ids.is_empty() || filter.owner_ids.contains(&w.owner_id().to_string()))
            .filter(|w| filter.currencies.is_empty() || filter.currencies.contains(&w.currency()))
            .cloned()
            .collect();
        let total = rows.len() as i64;
        Ok((rows, total))
    }
}

struct Harness {
    repo: Arc<FakeWalletRepository>,
    create: CreateWalletUseCase,
    get: GetWalletUseCase,
    update_status: UpdateWalletStatusUseCase,
}

fn harness() -> Harness {
    let repo = Arc::new(FakeWalletRepository::default());
    Harness {
        repo: repo.clone(),
        create: CreateWalletUseCase::new(repo.clone(), Arc::new(IdGenerator::new()), common::id::system_clock()),
        get: GetWalletUseCase::new(repo.clone()),
        update_status: UpdateWalletStatusUseCase::new(repo.clone(), common::id::system_clock()),
    }
}

fn create_input(owner_id: &str, currency: &str) -> CreateWalletInput {
    CreateWalletInput {
        owner_id: owner_id.to_string(),
        currency: currency.to_string(),
    }
}

#[tokio::test]
async fn owner_gets_one_wallet_per_currency() {
    let h = harness();

    let usd = h.create.execute(create_input("owner-1", "USD")).await.unwrap();
    assert_eq!(usd.currency(), Currency::Usd);

    let err = h.create.execute(create_input("owner-1", "USD")).await.unwrap_err();
    assert!(matches!(err, WalletError::Conflict));

    let eur = h.create.execute(create_input("owner-1", "EUR")).await.unwrap();
    assert_ne!(usd.id(), eur.id());
}

#[tokio::test]
async fn status_updates_round_trip_through_get() {
    let h = harness();
    let wallet = h.create.execute(create_input("owner-2", "GBP")).await.unwrap();

    let updated = h.update_status.execute(wallet.id(), WalletStatus::Frozen).await.unwrap();
    assert_eq!(updated.status(), WalletStatus::Frozen);

    let reloaded = h.get.execute(wallet.id()).await.unwrap();
    assert_eq!(reloaded.status(), WalletStatus::Frozen);
}

#[tokio::test]
async fn get_with_balance_composes_the_running_balance_collaborator() {
    let h = harness();
    let wallet = h.create.execute(create_input("owner-3", "SAR")).await.unwrap();

    let mut running_balance = MockRunningBalance::new();
    running_balance.expect_running_balance().returning(|_| Ok(7_500));

    let use_case = GetWalletWithBalanceUseCase::new(h.repo.clone(), Arc::new(running_balance));
    let result = use_case.execute(wallet.id()).await.unwrap();

    assert_eq!(result.balance, 7_500);
    assert_eq!(result.wallet.id(), wallet.id());
}

#[tokio::test]
async fn get_on_an_unknown_id_is_not_found() {
    let h = harness();
    let err = h.get.execute("does-not-exist").await.unwrap_err();
    assert!(matches!(err, WalletError::NotFound(_)));
}
