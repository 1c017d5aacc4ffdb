//! Configuration types for catalog client construction.

use std::collections::BTreeMap;
use std::fmt::{self, Debug, Display};
use std::num::NonZeroU32;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_PAGE_SIZE: NonZeroU32 = NonZeroU32::new(10).unwrap();
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for catalog client construction.
///
/// Built once at startup and shared read-only between requests.
#[derive(Debug, Clone)]
pub struct CatalogClientConfig {
    /// Base URL for the FOLIO API gateway, without a trailing path.
    pub api_base_url: String,
    /// Tenant identifier sent as `x-okapi-tenant` on every request.
    pub tenant: String,
    /// Login credentials exchanged for an access token.
    pub credentials: Credentials,
    /// Rule selecting the login response cookie that carries the token.
    pub token_cookie: TokenCookieMatcher,
    /// Number of records requested per result page.
    pub page_size: NonZeroU32,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub user_agent: Option<String>,
    /// Additional headers to include in requests.
    pub extra_headers: BTreeMap<String, String>,
}

impl CatalogClientConfig {
    /// A config with default paging, timeouts and token matching.
    pub fn new(
        api_base_url: impl Into<String>,
        tenant: impl Into<String>,
        credentials: Credentials,
    ) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            tenant: tenant.into(),
            credentials,
            token_cookie: TokenCookieMatcher::default(),
            page_size: DEFAULT_PAGE_SIZE,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
            extra_headers: BTreeMap::new(),
        }
    }
}

/// Username and password posted to the login endpoint.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Which login response cookie holds the access token.
///
/// Gateways have been observed to name the cookie differently, so the rule is
/// part of the configuration rather than fixed in code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum TokenCookieMatcher {
    /// The cookie name contains the needle, ignoring ASCII case.
    Contains(String),
    /// The cookie name equals the given name exactly.
    Exact(String),
}

impl TokenCookieMatcher {
    pub fn matches(&self, cookie_name: &str) -> bool {
        match self {
            TokenCookieMatcher::Contains(needle) => cookie_name
                .to_ascii_lowercase()
                .contains(&needle.to_ascii_lowercase()),
            TokenCookieMatcher::Exact(name) => cookie_name == name,
        }
    }
}

impl Default for TokenCookieMatcher {
    fn default() -> Self {
        TokenCookieMatcher::Contains("token".to_string())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid token cookie rule '{0}', expected 'contains:<text>' or 'exact:<name>'")]
pub struct ParseMatcherError(String);

impl FromStr for TokenCookieMatcher {
    type Err = ParseMatcherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, value) = s
            .split_once(':')
            .ok_or_else(|| ParseMatcherError(s.to_string()))?;
        let value = value.trim();
        if value.is_empty() {
            return Err(ParseMatcherError(s.to_string()));
        }
        match kind.trim() {
            "contains" => Ok(TokenCookieMatcher::Contains(value.to_string())),
            "exact" => Ok(TokenCookieMatcher::Exact(value.to_string())),
            _ => Err(ParseMatcherError(s.to_string())),
        }
    }
}

impl TryFrom<String> for TokenCookieMatcher {
    type Error = ParseMatcherError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Display for TokenCookieMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenCookieMatcher::Contains(needle) => write!(f, "contains:{needle}"),
            TokenCookieMatcher::Exact(name) => write!(f, "exact:{name}"),
        }
    }
}

impl From<TokenCookieMatcher> for String {
    fn from(matcher: TokenCookieMatcher) -> Self {
        matcher.to_string()
    }
}
