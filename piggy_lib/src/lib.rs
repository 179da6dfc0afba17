//! Library layer for piggy: persisted token storage, an authenticated
//! session over the API client, and the recent-transactions view model.

pub mod error;
pub mod session;
pub mod storage;
pub mod transactions;
pub mod validation;

pub use piggy_api;
pub use piggy_api::types;
pub use piggy_api::{ApiConfig, Client, Problem};

pub use error::PiggyError;
pub use session::Session;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError, AUTH_TOKEN_KEY};
pub use transactions::{group_by_day, recent_query, recent_range, DateRange, TransactionSection};
