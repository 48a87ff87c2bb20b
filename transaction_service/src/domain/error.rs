use common::error::{AppError, FieldError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransactionError {
    #[error("transaction not found: {0}")]
    NotFound(String),

    #[error("wallet not found: {0}")]
    WalletNotFound(String),

    #[error("wallet is not active")]
    WalletNotActive,

    #[error("insufficient funds")]
    InsufficientFunds,

    #[error("invalid status transition: {0} -> {1}")]
    InvalidStatusTransition(String, String),

    #[error("validation error")]
    Validation(Vec<FieldError>),

    #[error("could not acquire lock: {0}")]
    LockUnavailable(String),

    #[error("transaction repository error: {0}")]
    Repository(String),
}

impl From<TransactionError> for AppError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::NotFound(id) => AppError::NotFound(format!("transaction {id}")),
            TransactionError::WalletNotFound(id) => AppError::NotFound(format!("wallet {id}")),
            TransactionError::WalletNotActive => AppError::WalletNotActive,
            TransactionError::InsufficientFunds => AppError::InsufficientFunds,
            TransactionError::InvalidStatusTransition(from, to) => {
                AppError::InvalidStatusTransition(format!("{from} -> {to}"))
            }
            TransactionError::Validation(errors) => AppError::Validation(errors),
            TransactionError::LockUnavailable(key) => AppError::LockUnavailable(key),
            TransactionError::Repository(msg) => AppError::internal(RepositoryFailure(msg)),
        }
    }
}

#[derive(Debug, Error)]
#[error("{0}")]
struct RepositoryFailure(String);
