mod client;
mod config;
mod errors;
mod problem;
pub mod types;
pub use self::client::Client;
pub use self::config::{ApiConfig, DEFAULT_ACCEPT, DEFAULT_API_URL, DEFAULT_TIMEOUT_MS};
pub use self::errors::Error;
pub use self::problem::{classify, HttpOutcome, Problem, TransportFailure};
