use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maximum length of a GitHub login.
pub const MAX_LOGIN_LEN: usize = 39;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubUser {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl GitHubUser {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.login)
    }
}

/// Strips everything outside `[A-Za-z0-9-]` and caps the result at 39 chars.
pub fn sanitize_login(raw: &str) -> Result<String> {
    let login: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .take(MAX_LOGIN_LEN)
        .collect();

    if login.is_empty() {
        return Err(Error::InvalidUsername(raw.to_string()));
    }
    Ok(login)
}
