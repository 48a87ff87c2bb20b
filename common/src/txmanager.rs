//! Transactional execution context for repositories.
//!
//! Reimplements the contract of
//! `examples/original_source/internal/util/dblib/tx.go`'s `TxManager`:
//! `DB(ctx)` returns the transactional handle bound to the current context if
//! one exists, else the pool; `Tx(ctx, body)` runs `body` inside a DB
//! transaction, reusing an already-bound one if the caller is nested.
//!
//! Go threads this through an ambient `context.Context` value. Rust has no
//! equivalent ambient store, so per spec.md 9 ("maps cleanly to an explicit
//! parameter":) every repository method takes an explicit [`DbCtx`] instead.

use sqlx::{PgPool, Postgres, Transaction};

/// Which handle a repository call should run against: the shared pool, or a
/// transaction already opened by an enclosing `TxManager::tx` call.
pub enum DbCtx<'a> {
    Pool,
    Tx(&'a mut Transaction<'static, Postgres>),
}

impl<'a> DbCtx<'a> {
    pub fn pool() -> DbCtx<'static> {
        DbCtx::Pool
    }

    pub fn tx(tx: &'a mut Transaction<'static, Postgres>) -> Self {
        DbCtx::Tx(tx)
    }
}

/// Owns the connection pool and mints transactions on demand.
#[derive(Clone)]
pub struct TxManager {
    pool: PgPool,
}

impl TxManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Begins a new transaction. The caller is responsible for threading the
    /// returned handle into subsequent repository calls via [`DbCtx::tx`]
    /// and for committing or rolling it back.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }
}
