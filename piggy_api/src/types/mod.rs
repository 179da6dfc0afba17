mod meta;
pub use self::meta::{Envelope, ItemsPage};

mod repo;
pub(crate) use self::repo::RepoPayload;
pub use self::repo::Repo;

mod auth;
pub use self::auth::{AuthToken, Credentials};

mod transaction;
pub use self::transaction::{TransactionItem, TransactionQuery};
