//! Distributed locks, running-balance cache, and idempotency cache.
//!
//! Reimplements `examples/original_source/internal/app/cache` (a Redis
//! client wrapped in `go-redsync`) as a `redis`-backed `CacheAdapter`. The
//! idempotency cache stores a self-describing JSON blob rather than a typed
//! `Transaction` — `common` sits below `transaction_service` in the
//! workspace and must not depend on it; the caller (de)serializes its own
//! domain type.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::AppError;

#[cfg(any(test, feature = "test-util"))]
use mockall::automock;

pub const MUTEX_TTL: Duration = Duration::from_secs(15);
pub const MUTEX_TRIES: u32 = 100;
pub const MUTEX_RETRY_DELAY: Duration = Duration::from_millis(100);
pub const BALANCE_TTL_SECS: i64 = 24 * 60 * 60;
pub const IDEMPOTENCY_TTL_SECS: i64 = 24 * 60 * 60;

/// A held distributed lock. Release is idempotent: it may be called
/// explicitly (the normal path, on every exit from a critical section) and
/// is additionally attempted best-effort on drop if the caller forgot,
/// mirroring the "release must be safe to call on all exit paths" contract
/// in spec.md 4.3.
pub struct Lock {
    conn: Option<ConnectionManager>,
    key: String,
    token: String,
    released: Arc<AtomicBool>,
}

impl Lock {
    fn held(conn: ConnectionManager, key: String, token: String) -> Self {
        Self {
            conn: Some(conn),
            key,
            token,
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A lock that was never backed by Redis, for tests that don't exercise
    /// real locking (e.g. unit tests against `MockCacheAdapter`).
    pub fn noop() -> Self {
        Self {
            conn: None,
            key: String::new(),
            token: String::new(),
            released: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Release the lock, verifying ownership via the token before deleting
    /// it (spec.md 9: "compare-and-delete to avoid releasing another
    /// holder's lock after TTL expiry").
    pub async fn release(mut self) -> Result<(), AppError> {
        self.released.store(true, Ordering::SeqCst);

        let Some(mut conn) = self.conn.take() else {
            return Ok(());
        };

        release_by_token(&mut conn, &self.key, &self.token).await
    }
}

impl Drop for Lock {
    fn drop(&mut self) {
        if self.released.swap(true, Ordering::SeqCst) {
            return;
        }

        if let Some(conn) = self.conn.take() {
            let key = self.key.clone();
            let token = self.token.clone();
            tokio::spawn(async move {
                let mut conn = conn;
                let _ = release_by_token(&mut conn, &key, &token).await;
            });
        }
    }
}

const RELEASE_SCRIPT: &str = r#"
if redis.call("get", KEYS[1]) == ARGV[1] then
    return redis.call("del", KEYS[1])
else
    return 0
end
"#;

async fn release_by_token(conn: &mut ConnectionManager, key: &str, token: &str) -> Result<(), AppError> {
    redis::Script::new(RELEASE_SCRIPT)
        .key(key)
        .arg(token)
        .invoke_async::<_, i64>(conn)
        .await
        .map_err(AppError::internal)?;

    Ok(())
}

#[cfg_attr(any(test, feature = "test-util"), automock)]
#[async_trait]
pub trait CacheAdapter: Send + Sync {
    /// Blocking acquire with the retry budget from spec.md 4.3 (TTL 15s, up
    /// to 100 attempts at 100ms). Fails with `LockUnavailable` when the
    /// budget is exhausted.
    async fn mutex(&self, key: &str) -> Result<Lock, AppError>;

    async fn get_balance(&self, wallet_id: &str) -> Result<Option<i64>, AppError>;
    async fn set_balance(&self, wallet_id: &str, balance: i64) -> Result<(), AppError>;

    async fn get_idempotent_record(&self, key: &str) -> Result<Option<serde_json::Value>, AppError>;
    async fn set_idempotent_record(&self, key: &str, value: serde_json::Value) -> Result<(), AppError>;
}

pub struct RedisCacheAdapter {
    conn: ConnectionManager,
    app_name: String,
}

impl RedisCacheAdapter {
    pub async fn connect(url: &str, app_name: impl Into<String>) -> Result<Self, AppError> {
        let client = redis::Client::open(url).map_err(AppError::internal)?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(AppError::internal)?;

        Ok(Self {
            conn,
            app_name: app_name.into(),
        })
    }

    fn make_key(&self, category: &str, id: &str) -> String {
        format!("{}:{}:{}", self.app_name, category, id)
    }
}

#[async_trait]
impl CacheAdapter for RedisCacheAdapter {
    async fn mutex(&self, key: &str) -> Result<Lock, AppError> {
        let redis_key = self.make_key("mutex", key);
        let token = uuid_like_token();
        let mut conn = self.conn.clone();

        for attempt in 0..MUTEX_TRIES {
            let acquired: bool = redis::cmd("SET")
                .arg(&redis_key)
                .arg(&token)
                .arg("NX")
                .arg("PX")
                .arg(MUTEX_TTL.as_millis() as u64)
                .query_async::<_, Option<String>>(&mut conn)
                .await
                .map_err(AppError::internal)?
                .is_some();

            if acquired {
                return Ok(Lock::held(conn, redis_key, token));
            }

            if attempt + 1 < MUTEX_TRIES {
                tokio::time::sleep(MUTEX_RETRY_DELAY).await;
            }
        }

        Err(AppError::LockUnavailable(key.to_string()))
    }

    async fn get_balance(&self, wallet_id: &str) -> Result<Option<i64>, AppError> {
        let key = self.make_key("balance", wallet_id);
        let mut conn = self.conn.clone();

        let value: Option<i64> = conn.get(&key).await.map_err(AppError::internal)?;
        Ok(value)
    }

    async fn set_balance(&self, wallet_id: &str, balance: i64) -> Result<(), AppError> {
        let key = self.make_key("balance", wallet_id);
        let mut conn = self.conn.clone();

        conn.set_ex::<_, _, ()>(&key, balance, BALANCE_TTL_SECS as u64)
            .await
            .map_err(AppError::internal)
    }

    async fn get_idempotent_record(&self, key: &str) -> Result<Option<serde_json::Value>, AppError> {
        let redis_key = self.make_key("idempotency", key);
        let mut conn = self.conn.clone();

        let raw: Option<String> = conn.get(&redis_key).await.map_err(AppError::internal)?;
        match raw {
            None => Ok(None),
            Some(raw) => serde_json::from_str(&raw).map(Some).map_err(AppError::internal),
        }
    }

    async fn set_idempotent_record(&self, key: &str, value: serde_json::Value) -> Result<(), AppError> {
        let redis_key = self.make_key("idempotency", key);
        let mut conn = self.conn.clone();
        let raw = serde_json::to_string(&value).map_err(AppError::internal)?;

        conn.set_ex::<_, _, ()>(&redis_key, raw, IDEMPOTENCY_TTL_SECS as u64)
            .await
            .map_err(AppError::internal)
    }
}

fn uuid_like_token() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
