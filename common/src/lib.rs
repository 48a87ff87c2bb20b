pub mod cache;
pub mod collab;
pub mod error;
pub mod id;
pub mod pagination;
pub mod txmanager;
pub mod types;

pub use cache::CacheAdapter;
pub use error::AppError;
pub use id::{Clock, IdGenerator};
pub use txmanager::{DbCtx, TxManager};
