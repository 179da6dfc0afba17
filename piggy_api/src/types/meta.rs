use serde::{Deserialize, Serialize};

/// Envelope used by the ABP-style endpoints: `{ "result": ... }`.
#[derive(Serialize, Deserialize)]
pub struct Envelope<T> {
    pub result: T,
}

/// Page of items nested under `result`.
#[derive(Serialize, Deserialize)]
pub struct ItemsPage<T> {
    pub items: Vec<T>,
}
