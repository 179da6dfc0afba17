//! Session wrapper: couples the API client with persisted token storage.

use piggy_api::types::{AuthToken, Credentials, Repo, TransactionItem, TransactionQuery};
use piggy_api::{Client, Problem};

use crate::error::PiggyError;
use crate::storage::{KeyValueStore, StorageError, AUTH_TOKEN_KEY};
use crate::transactions::{group_by_day, TransactionSection};

/// API client plus the store the auth token is persisted in.
///
/// The token is read from the store on each authenticated call and handed to
/// the client for that request only; the client itself never holds it.
pub struct Session<S> {
    api: Client,
    store: S,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(api: Client, store: S) -> Self {
        Self { api, store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The persisted token, if any. An empty stored value counts as none.
    pub fn stored_token(&self) -> Result<Option<AuthToken>, StorageError> {
        Ok(self
            .store
            .load_string(AUTH_TOKEN_KEY)?
            .filter(|t| !t.is_empty())
            .map(AuthToken::from))
    }

    /// Authenticates and persists the returned token.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthToken, PiggyError> {
        let token = self.api.authenticate(credentials).await?;
        self.store.save_string(AUTH_TOKEN_KEY, token.as_str())?;
        tracing::info!(
            "Logged in as {} (tenant {})",
            credentials.username_or_email_address,
            credentials.tenancy_name
        );
        Ok(token)
    }

    /// Forgets the persisted token.
    pub fn logout(&self) -> Result<(), PiggyError> {
        self.store.remove(AUTH_TOKEN_KEY)?;
        Ok(())
    }

    pub async fn get_repo(&self, repo: &str) -> Result<Repo, Problem> {
        self.api.get_repo(repo).await
    }

    /// Fetches transactions with the persisted token attached.
    ///
    /// A store that cannot be read is treated as holding no token; the server
    /// then decides, usually with `unauthorized`.
    pub async fn get_transactions(
        &self,
        query: &TransactionQuery,
    ) -> Result<Vec<TransactionItem>, Problem> {
        let token = self.stored_token().unwrap_or_else(|e| {
            tracing::warn!("Could not read stored auth token: {}", e);
            None
        });
        if token.is_none() {
            tracing::debug!("No stored auth token, sending unauthenticated request");
        }
        self.api.get_transactions(query, token.as_ref()).await
    }

    /// Fetches transactions and groups them into day sections.
    pub async fn recent_transactions(
        &self,
        query: &TransactionQuery,
    ) -> Result<Vec<TransactionSection>, Problem> {
        Ok(group_by_day(self.get_transactions(query).await?))
    }
}
