//! Repository lookup types.

use serde::{Deserialize, Serialize};

/// A repository, projected from the upstream `/repos/{repo}` payload.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Repo {
    pub id: u64,
    pub name: String,
    /// Flattened from `owner.login`.
    pub owner: String,
}

/// Wire shape of the upstream repo payload. Only the projected fields are
/// required; everything else in the body is ignored.
#[derive(Deserialize)]
pub(crate) struct RepoPayload {
    id: u64,
    name: String,
    owner: OwnerPayload,
}

#[derive(Deserialize)]
struct OwnerPayload {
    login: String,
}

impl From<RepoPayload> for Repo {
    fn from(payload: RepoPayload) -> Self {
        Repo {
            id: payload.id,
            name: payload.name,
            owner: payload.owner.login,
        }
    }
}
