//! HTTP client for the piggy finance service.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    config::ApiConfig,
    problem::{classify, HttpOutcome},
    types::{
        AuthToken, Credentials, Envelope, ItemsPage, Repo, RepoPayload, TransactionItem,
        TransactionQuery,
    },
    Error, Problem,
};

const AUTHENTICATE_PATH: [&str; 2] = ["Account", "Authenticate"];
const TRANSACTIONS_PATH: [&str; 4] = ["services", "app", "transaction", "GetTransactionsAsync"];

/// Single point of contact with the remote service.
///
/// Owns one `reqwest::Client` configured with the base timeout and the
/// `Accept` header. Every operation performs one round trip and returns
/// either the projected payload or exactly one [`Problem`]. The client holds
/// no per-user state: the bearer token is passed to each call that needs it,
/// so a shared client can serve concurrent calls for different users.
#[derive(Clone, Debug)]
pub struct Client {
    http: reqwest::Client,
    config: ApiConfig,
}

impl Client {
    /// Creates a client from the given configuration.
    pub fn new(config: ApiConfig) -> Result<Self, Error> {
        Url::parse(&config.url).map_err(|e| Error::InvalidBaseUrl {
            url: config.url.clone(),
            reason: e.to_string(),
        })?;

        let accept = HeaderValue::from_str(&config.accept)
            .map_err(|_| Error::InvalidAcceptHeader(config.accept.clone()))?;
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, accept);

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { http, config })
    }

    /// Creates a client with default settings and a custom base URL. Used for
    /// testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Self::new(ApiConfig::default().with_url(base_url))
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn get_url<'a, I>(&self, segments: I) -> Result<Url, Problem>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut url = Url::parse(&self.config.url).map_err(|e| {
            tracing::error!("Invalid base URL {}: {}", self.config.url, e);
            Problem::Unknown
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                tracing::error!("Base URL {} cannot carry a path", self.config.url);
                Problem::Unknown
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T>(&self, label: &str, request: RequestBuilder) -> Result<T, Problem>
    where
        T: DeserializeOwned,
    {
        tracing::debug!("{}: sending request", label);
        let resp = request.send().await.map_err(|e| transport_problem(label, &e))?;

        let status = resp.status();
        if !status.is_success() {
            if let Some(problem) = classify(&HttpOutcome::status(status.as_u16())) {
                tracing::warn!("{} failed with status {}: {}", label, status, problem.kind());
                return Err(problem);
            }
        }

        let body = resp.text().await.map_err(|e| transport_problem(label, &e))?;

        serde_json::from_str::<T>(&body).map_err(|e| {
            tracing::warn!(
                "{} returned unexpected data: {} | body: {}",
                label,
                e,
                truncate_body(&body)
            );
            Problem::BadData
        })
    }

    /// Looks up a repository (`owner/name`) and projects it into a [`Repo`].
    ///
    /// Each part of the identifier becomes one percent-encoded path segment.
    /// Empty, `.` and `..` parts are refused locally with `rejected`.
    pub async fn get_repo(&self, repo: &str) -> Result<Repo, Problem> {
        let parts: Vec<&str> = repo.split('/').collect();
        if parts.iter().any(|p| p.is_empty() || *p == "." || *p == "..") {
            tracing::warn!("getRepo: refusing malformed repository identifier {:?}", repo);
            return Err(Problem::Rejected);
        }
        let url = self.get_url(std::iter::once("repos").chain(parts))?;
        let payload: RepoPayload = self.send("getRepo", self.http.get(url)).await?;
        Ok(payload.into())
    }

    /// Exchanges credentials for an auth token. Single attempt, no retry.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<AuthToken, Problem> {
        let url = self.get_url(AUTHENTICATE_PATH)?;
        let envelope: Envelope<AuthToken> = self
            .send("authenticate", self.http.post(url).json(credentials))
            .await?;
        Ok(envelope.result)
    }

    /// Fetches transactions matching `query`.
    ///
    /// When a token is given it is attached as `Authorization: Bearer <token>`
    /// to this request only.
    pub async fn get_transactions(
        &self,
        query: &TransactionQuery,
        token: Option<&AuthToken>,
    ) -> Result<Vec<TransactionItem>, Problem> {
        let url = self.get_url(TRANSACTIONS_PATH)?;
        let mut request = self.http.post(url).json(query);
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&token.bearer()).map_err(|_| {
                tracing::warn!("getTransactions: stored token is not a valid header value");
                Problem::Unauthorized
            })?;
            value.set_sensitive(true);
            request = request.header(AUTHORIZATION, value);
        }

        let envelope: Envelope<ItemsPage<TransactionItem>> =
            self.send("getTransactions", request).await?;
        Ok(envelope.result.items)
    }
}

fn transport_problem(label: &str, err: &reqwest::Error) -> Problem {
    let problem = classify(&HttpOutcome::from_reqwest(err)).unwrap_or(Problem::Unknown);
    tracing::warn!("{} failed: {} ({})", label, err, problem.kind());
    problem
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &body[..end])
}
