//! Authentication types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Login payload for `POST /Account/Authenticate`. Sent as is.
#[derive(Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub tenancy_name: String,
    pub username_or_email_address: String,
    pub password: String,
}

impl Credentials {
    pub fn new(
        tenancy_name: impl Into<String>,
        username_or_email_address: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            tenancy_name: tenancy_name.into(),
            username_or_email_address: username_or_email_address.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("tenancy_name", &self.tenancy_name)
            .field("username_or_email_address", &self.username_or_email_address)
            .field("password", &"***")
            .finish()
    }
}

/// Opaque bearer credential returned by a successful login.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

impl From<String> for AuthToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}
