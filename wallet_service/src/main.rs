use std::env;
use std::sync::{Arc, OnceLock};

use common::cache::RedisCacheAdapter;
use common::id::{system_clock, IdGenerator};
use common::txmanager::TxManager;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use transaction_service::infrastructure::persistence::transaction_repository::PostgresTransactionRepository;
use transaction_service::use_cases::create_transaction::CreateTransactionUseCase;
use transaction_service::use_cases::get_transaction::GetTransactionUseCase;
use transaction_service::use_cases::list_transactions::ListTransactionsUseCase;
use transaction_service::use_cases::running_balance::RunningBalanceUseCase;
use transaction_service::use_cases::update_transaction_status::UpdateTransactionStatusUseCase;

use wallet_service::api::http_routes::{routes, AppState};
use wallet_service::infrastructure::persistence::wallet_repository::PostgresWalletRepository;
use wallet_service::infrastructure::wallet_lookup::WalletRepositoryLookup;
use wallet_service::use_cases::create_wallet::CreateWalletUseCase;
use wallet_service::use_cases::get_wallet::GetWalletUseCase;
use wallet_service::use_cases::get_wallet_with_balance::GetWalletWithBalanceUseCase;
use wallet_service::use_cases::list_wallets::ListWalletsUseCase;
use wallet_service::use_cases::update_wallet_status::UpdateWalletStatusUseCase;

#[derive(OpenApi)]
#[openapi(
    paths(
        wallet_service::api::http_routes::create_wallet,
        wallet_service::api::http_routes::get_wallet,
        wallet_service::api::http_routes::list_wallets,
        wallet_service::api::http_routes::update_wallet_status,
        wallet_service::api::http_routes::get_wallet_with_balance,
        wallet_service::api::http_routes::create_transaction,
        wallet_service::api::http_routes::get_transaction,
        wallet_service::api::http_routes::list_transactions,
        wallet_service::api::http_routes::update_transaction_status,
    ),
    components(schemas(
        wallet_service::api::http_routes::CreateWalletRequest,
        wallet_service::api::http_routes::UpdateWalletStatusRequest,
        wallet_service::api::http_routes::CreateTransactionRequest,
        wallet_service::api::http_routes::UpdateTransactionStatusRequest,
        wallet_service::api::response::WalletResponse,
        wallet_service::api::response::TransactionResponse,
    ))
)]
struct ApiDoc;

/// Immutable configuration snapshot read once from the environment, the
/// only in-process global state this service carries (spec.md 5).
struct Config {
    app_name: String,
    app_debug: bool,
    app_port: String,
    database_dsn: String,
    redis_url: String,
}

fn config() -> &'static Config {
    static CONFIG: OnceLock<Config> = OnceLock::new();
    CONFIG.get_or_init(|| Config {
        app_name: env::var("APP_NAME").unwrap_or_else(|_| "wallet_ledger".to_string()),
        app_debug: env::var("APP_DEBUG").map(|v| v == "true" || v == "1").unwrap_or(false),
        app_port: env::var("APP_PORT").unwrap_or_else(|_| "3000".to_string()),
        database_dsn: env::var("DATABASE_DSN").expect("DATABASE_DSN must be set"),
        redis_url: env::var("REDIS_URL").expect("REDIS_URL must be set"),
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config().app_debug {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    } else {
        tracing_subscriber::fmt().json().with_env_filter(env_filter).init();
    }

    let cfg = config();
    info!(app_name = %cfg.app_name, "starting wallet ledger");

    let pool = PgPoolOptions::new()
        .max_connections(100)
        .min_connections(10)
        .max_lifetime(std::time::Duration::from_secs(60 * 60))
        .connect(&cfg.database_dsn)
        .await?;
    info!("connected to postgres");

    let cache: Arc<dyn common::cache::CacheAdapter> =
        Arc::new(RedisCacheAdapter::connect(&cfg.redis_url, cfg.app_name.clone()).await?);
    info!("connected to redis");

    let wallet_repo = Arc::new(PostgresWalletRepository::new(pool.clone()));
    let transaction_repo = Arc::new(PostgresTransactionRepository::new(pool.clone()));

    let ids = Arc::new(IdGenerator::new());
    let clock = system_clock();
    let tx_manager = TxManager::new(pool.clone());

    let wallet_lookup = Arc::new(WalletRepositoryLookup::new(wallet_repo.clone()));
    let running_balance = Arc::new(RunningBalanceUseCase::new(transaction_repo.clone(), cache.clone()));

    let state = Arc::new(AppState {
        create_wallet: CreateWalletUseCase::new(wallet_repo.clone(), ids.clone(), clock.clone()),
        get_wallet: GetWalletUseCase::new(wallet_repo.clone()),
        list_wallets: ListWalletsUseCase::new(wallet_repo.clone()),
        update_wallet_status: UpdateWalletStatusUseCase::new(wallet_repo.clone(), clock.clone()),
        get_wallet_with_balance: GetWalletWithBalanceUseCase::new(wallet_repo.clone(), running_balance.clone()),
        create_transaction: CreateTransactionUseCase::new(
            transaction_repo.clone(),
            wallet_lookup.clone(),
            cache.clone(),
            ids.clone(),
            clock.clone(),
        ),
        get_transaction: GetTransactionUseCase::new(transaction_repo.clone()),
        list_transactions: ListTransactionsUseCase::new(transaction_repo.clone()),
        update_transaction_status: UpdateTransactionStatusUseCase::new(
            transaction_repo.clone(),
            cache.clone(),
            tx_manager.clone(),
            clock.clone(),
        ),
    });

    let app = routes(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let addr = format!("0.0.0.0:{}", cfg.app_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, draining in-flight requests");
}
