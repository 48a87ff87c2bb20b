use std::sync::Arc;

use common::error::FieldError;
use common::id::{Clock, IdGenerator};
use common::pagination::Paginator;
use common::txmanager::DbCtx;
use common::types::Currency;

use crate::domain::entities::Wallet;
use crate::domain::error::WalletError;
use crate::domain::repository::{WalletFilter, WalletRepository};

pub struct CreateWalletInput {
    pub owner_id: String,
    pub currency: String,
}

impl CreateWalletInput {
    pub fn validate(&self) -> Result<(), WalletError> {
        let mut errors = Vec::new();

        if self.owner_id.trim().is_empty() {
            errors.push(FieldError::new("owner_id", "is required"));
        }
        if self.currency.trim().is_empty() {
            errors.push(FieldError::new("currency", "is required"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(WalletError::Validation(errors))
        }
    }
}

/// Creates a wallet for an owner, enforcing at most one wallet per
/// (owner_id, currency) pair (spec.md 4.1, SPEC_FULL.md 4.1): the service
/// checks this itself rather than relying solely on a DB unique
/// constraint, so the API always raises a `Conflict`, not a raw constraint
/// violation.
#[derive(Clone)]
pub struct CreateWalletUseCase {
    wallet_repo: Arc<dyn WalletRepository>,
    ids: Arc<IdGenerator>,
    clock: Clock,
}

impl CreateWalletUseCase {
    pub fn new(wallet_repo: Arc<dyn WalletRepository>, ids: Arc<IdGenerator>, clock: Clock) -> Self {
        Self {
            wallet_repo,
            ids,
            clock,
        }
    }

    #[tracing::instrument(name = "CreateWalletUseCase::execute", skip(self, input))]
    pub async fn execute(&self, input: CreateWalletInput) -> Result<Wallet, WalletError> {
        input.validate()?;

        let currency: Currency = input.currency.parse().map_err(WalletError::InvalidData)?;

        let filter = WalletFilter {
            owner_ids: vec![input.owner_id.clone()],
            currencies: vec![currency],
            ..Default::default()
        };
        let (existing, _) = self
            .wallet_repo
            .list(DbCtx::pool(), &filter, &Paginator::default())
            .await?;

        if !existing.is_empty() {
            return Err(WalletError::Conflict);
        }

        let now = (self.clock)();
        let id = self.ids.generate(now);
        let wallet = Wallet::builder()
            .owner_id(input.owner_id)
            .currency(input.currency)
            .build(id, now)?;

        self.wallet_repo.create(DbCtx::pool(), &wallet).await
    }
}
