use common::error::{AppError, FieldError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("wallet not found: {0}")]
    NotFound(String),

    #[error("a wallet already exists for this owner and currency")]
    Conflict,

    #[error("invalid wallet data: {0}")]
    InvalidData(String),

    #[error("validation error")]
    Validation(Vec<FieldError>),

    #[error("wallet repository error: {0}")]
    Repository(String),
}

impl From<WalletError> for AppError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::NotFound(id) => AppError::NotFound(format!("wallet {id}")),
            WalletError::Conflict => {
                AppError::Conflict("a wallet already exists for this owner and currency".to_string())
            }
            WalletError::InvalidData(msg) => AppError::Validation(vec![FieldError::new("currency", msg)]),
            WalletError::Validation(errors) => AppError::Validation(errors),
            WalletError::Repository(msg) => AppError::internal(RepositoryFailure(msg)),
        }
    }
}

#[derive(Debug, Error)]
#[error("{0}")]
struct RepositoryFailure(String);
