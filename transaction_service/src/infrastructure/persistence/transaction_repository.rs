use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::pagination::Paginator;
use common::txmanager::DbCtx;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::domain::entities::Transaction;
use crate::domain::error::TransactionError;
use crate::domain::repository::{TransactionFilter, TransactionRepository};
use crate::infrastructure::persistence::models::TransactionModel;

/// Runs a query built against the pool when `ctx` carries none, or against
/// the caller's open transaction when it does — the two `Executor` impls
/// sqlx gives us (`&PgPool` and `&mut Transaction`) aren't object-safe to
/// unify, so every call site matches on `ctx` once.
macro_rules! run {
    ($ctx:expr, $pool:expr, $method:ident, $query:expr) => {
        match $ctx {
            DbCtx::Pool => $query.$method($pool).await,
            DbCtx::Tx(tx) => $query.$method(&mut **tx).await,
        }
    };
}

pub struct PostgresTransactionRepository {
    pool: PgPool,
}

impl PostgresTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_err(e: sqlx::Error) -> TransactionError {
        TransactionError::Repository(e.to_string())
    }
}

#[async_trait]
impl TransactionRepository for PostgresTransactionRepository {
    async fn create(&self, ctx: DbCtx<'_>, transaction: &Transaction) -> Result<Transaction, TransactionError> {
        let model = TransactionModel::from(transaction);

        let saved = run!(
            ctx,
            &self.pool,
            fetch_one,
            sqlx::query_as::<_, TransactionModel>(
                r#"
                INSERT INTO transactions (id, wallet_id, amount, note, transaction_type, status, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING *
                "#,
            )
            .bind(model.id)
            .bind(model.wallet_id)
            .bind(model.amount)
            .bind(model.note)
            .bind(model.transaction_type)
            .bind(model.status)
            .bind(model.created_at)
            .bind(model.updated_at)
        )
        .map_err(Self::map_err)?;

        saved.try_into()
    }

    async fn get_by_id(&self, ctx: DbCtx<'_>, id: &str) -> Result<Option<Transaction>, TransactionError> {
        let found = run!(
            ctx,
            &self.pool,
            fetch_optional,
            sqlx::query_as::<_, TransactionModel>(r#"SELECT * FROM transactions WHERE id = $1"#).bind(id)
        )
        .map_err(Self::map_err)?;

        found.map(TryInto::try_into).transpose()
    }

    async fn update_status(
        &self,
        ctx: DbCtx<'_>,
        id: &str,
        status: common::types::TransactionStatus,
        now: DateTime<Utc>,
    ) -> Result<Transaction, TransactionError> {
        let updated = run!(
            ctx,
            &self.pool,
            fetch_optional,
            sqlx::query_as::<_, TransactionModel>(
                r#"UPDATE transactions SET status = $1, updated_at = $2 WHERE id = $3 RETURNING *"#,
            )
            .bind(status.to_string())
            .bind(now)
            .bind(id)
        )
        .map_err(Self::map_err)?;

        match updated {
            Some(model) => model.try_into(),
            None => Err(TransactionError::NotFound(id.to_string())),
        }
    }

    async fn list(
        &self,
        ctx: DbCtx<'_>,
        filter: &TransactionFilter,
        paginator: &Paginator,
    ) -> Result<(Vec<Transaction>, i64), TransactionError> {
        let (offset, limit) = paginator.offset_limit();

        let mut count_qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*) FROM transactions");
        push_filters(&mut count_qb, filter);
        let total: i64 = run!(ctx, &self.pool, fetch_one, count_qb.build_query_scalar::<i64>())
            .map_err(Self::map_err)?;

        let mut select_qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM transactions");
        push_filters(&mut select_qb, filter);
        select_qb
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let models = run!(
            ctx,
            &self.pool,
            fetch_all,
            select_qb.build_query_as::<TransactionModel>()
        )
        .map_err(Self::map_err)?;

        let rows = models
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((rows, total))
    }

    async fn list_all_for_wallet(&self, ctx: DbCtx<'_>, wallet_id: &str) -> Result<Vec<Transaction>, TransactionError> {
        let models = run!(
            ctx,
            &self.pool,
            fetch_all,
            sqlx::query_as::<_, TransactionModel>(
                r#"SELECT * FROM transactions WHERE wallet_id = $1 ORDER BY created_at DESC"#,
            )
            .bind(wallet_id)
        )
        .map_err(Self::map_err)?;

        models.into_iter().map(TryInto::try_into).collect()
    }
}

/// Appends every non-empty filter field as an `AND`-ed condition. Unlike
/// the wallet-side bug noted in spec.md 9, every branch here reassigns into
/// the same builder so no filter is silently dropped.
fn push_filters(qb: &mut QueryBuilder<Postgres>, filter: &TransactionFilter) {
    let mut has_where = false;
    let mut clause = |qb: &mut QueryBuilder<Postgres>, has_where: &mut bool| {
        qb.push(if *has_where { " AND " } else { " WHERE " });
        *has_where = true;
    };

    if !filter.ids.is_empty() {
        clause(qb, &mut has_where);
        qb.push("id = ANY(").push_bind(filter.ids.clone()).push(")");
    }

    if !filter.wallet_ids.is_empty() {
        clause(qb, &mut has_where);
        qb.push("wallet_id = ANY(").push_bind(filter.wallet_ids.clone()).push(")");
    }

    if !filter.statuses.is_empty() {
        clause(qb, &mut has_where);
        let statuses: Vec<String> = filter.statuses.iter().map(|s| s.to_string()).collect();
        qb.push("status = ANY(").push_bind(statuses).push(")");
    }

    if !filter.types.is_empty() {
        clause(qb, &mut has_where);
        let types: Vec<String> = filter.types.iter().map(|t| t.to_string()).collect();
        qb.push("transaction_type = ANY(").push_bind(types).push(")");
    }

    if let Some(from) = filter.created_from {
        clause(qb, &mut has_where);
        qb.push("created_at >= ").push_bind(from);
    }

    if let Some(to) = filter.created_to {
        clause(qb, &mut has_where);
        qb.push("created_at <= ").push_bind(to);
    }
}
