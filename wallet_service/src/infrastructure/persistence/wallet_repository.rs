use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::pagination::Paginator;
use common::txmanager::DbCtx;
use common::types::WalletStatus;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::domain::entities::Wallet;
use crate::domain::error::WalletError;
use crate::domain::repository::{WalletFilter, WalletRepository};
use crate::infrastructure::persistence::models::WalletModel;

/// Runs a query built against the pool when `ctx` carries none, or against
/// the caller's open transaction when it does.
macro_rules! run {
    ($ctx:expr, $pool:expr, $method:ident, $query:expr) => {
        match $ctx {
            DbCtx::Pool => $query.$method($pool).await,
            DbCtx::Tx(tx) => $query.$method(&mut **tx).await,
        }
    };
}

pub struct PostgresWalletRepository {
    pool: PgPool,
}

impl PostgresWalletRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_err(e: sqlx::Error) -> WalletError {
        WalletError::Repository(e.to_string())
    }
}

#[async_trait]
impl WalletRepository for PostgresWalletRepository {
    async fn create(&self, ctx: DbCtx<'_>, wallet: &Wallet) -> Result<Wallet, WalletError> {
        let model = WalletModel::from(wallet);

        let saved = run!(
            ctx,
            &self.pool,
            fetch_one,
            sqlx::query_as::<_, WalletModel>(
                r#"
                INSERT INTO wallets (id, owner_id, currency, status, created_at, updated_at, deleted_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
                "#,
            )
            .bind(model.id)
            .bind(model.owner_id)
            .bind(model.currency)
            .bind(model.status)
            .bind(model.created_at)
            .bind(model.updated_at)
            .bind(model.deleted_at)
        )
        .map_err(Self::map_err)?;

        saved.try_into()
    }

    async fn get_by_id(&self, ctx: DbCtx<'_>, id: &str) -> Result<Option<Wallet>, WalletError> {
        let found = run!(
            ctx,
            &self.pool,
            fetch_optional,
            sqlx::query_as::<_, WalletModel>(
                r#"SELECT * FROM wallets WHERE id = $1 AND deleted_at IS NULL"#,
            )
            .bind(id)
        )
        .map_err(Self::map_err)?;

        found.map(TryInto::try_into).transpose()
    }

    async fn update_status(
        &self,
        ctx: DbCtx<'_>,
        id: &str,
        status: WalletStatus,
        now: DateTime<Utc>,
    ) -> Result<Wallet, WalletError> {
        let updated = run!(
            ctx,
            &self.pool,
            fetch_optional,
            sqlx::query_as::<_, WalletModel>(
                r#"UPDATE wallets SET status = $1, updated_at = $2 WHERE id = $3 AND deleted_at IS NULL RETURNING *"#,
            )
            .bind(status.to_string())
            .bind(now)
            .bind(id)
        )
        .map_err(Self::map_err)?;

        match updated {
            Some(model) => model.try_into(),
            None => Err(WalletError::NotFound(id.to_string())),
        }
    }

    async fn list(
        &self,
        ctx: DbCtx<'_>,
        filter: &WalletFilter,
        paginator: &Paginator,
    ) -> Result<(Vec<Wallet>, i64), WalletError> {
        let (offset, limit) = paginator.offset_limit();

        let mut count_qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*) FROM wallets");
        push_filters(&mut count_qb, filter);
        let total: i64 = run!(ctx, &self.pool, fetch_one, count_qb.build_query_scalar::<i64>())
            .map_err(Self::map_err)?;

        let mut select_qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM wallets");
        push_filters(&mut select_qb, filter);
        select_qb
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let models = run!(ctx, &self.pool, fetch_all, select_qb.build_query_as::<WalletModel>())
            .map_err(Self::map_err)?;

        let rows = models
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((rows, total))
    }
}

/// Appends every non-empty filter field as an `AND`-ed condition, always
/// excluding soft-deleted rows. Unlike the dropped-filter bug noted in
/// spec.md 9, every branch here reassigns into the same builder so no
/// filter is silently lost.
fn push_filters(qb: &mut QueryBuilder<Postgres>, filter: &WalletFilter) {
    qb.push(" WHERE deleted_at IS NULL");

    if !filter.ids.is_empty() {
        qb.push(" AND id = ANY(").push_bind(filter.ids.clone()).push(")");
    }

    if !filter.owner_ids.is_empty() {
        qb.push(" AND owner_id = ANY(").push_bind(filter.owner_ids.clone()).push(")");
    }

    if !filter.currencies.is_empty() {
        let currencies: Vec<String> = filter.currencies.iter().map(|c| c.to_string()).collect();
        qb.push(" AND currency = ANY(").push_bind(currencies).push(")");
    }

    if !filter.statuses.is_empty() {
        let statuses: Vec<String> = filter.statuses.iter().map(|s| s.to_string()).collect();
        qb.push(" AND status = ANY(").push_bind(statuses).push(")");
    }
}
