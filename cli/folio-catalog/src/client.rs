//! Session authentication and instance search against the FOLIO API.

use std::fmt::Debug;
use std::num::NonZeroU32;
use std::str::FromStr;

use enum_dispatch::enum_dispatch;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, instrument};

use crate::config::CatalogClientConfig;
use crate::error::{AuthError, CatalogError, SearchError, error_body};
use crate::mock::MockClient;
use crate::types::{RawInstancesResponse, SearchQuery, SearchResultPage, page_offset};

pub const LOGIN_PATH: &str = "authn/login-with-expiry";
pub const SEARCH_PATH: &str = "search/instances";
pub const INVENTORY_PATH: &str = "inventory/instances";

pub const TENANT_HEADER: &str = "x-okapi-tenant";
pub const TOKEN_HEADER: &str = "x-okapi-token";

// ---------------------------------------------------------------------------
// Session authenticator
// ---------------------------------------------------------------------------

/// Log in with the configured credentials and return a channel that carries
/// the tenant and token headers on every request.
///
/// Fails if the login call does not succeed or if no response cookie matches
/// [`CatalogClientConfig::token_cookie`].
#[instrument(skip_all, fields(tenant = %config.tenant, username = %config.credentials.username))]
pub async fn authenticate(config: &CatalogClientConfig) -> Result<AuthenticatedChannel, AuthError> {
    let mut headers = base_headers(config)?;
    let login_client = build_http_client(config, headers.clone())?;

    debug!(api_base_url = %config.api_base_url, "logging in");
    let response = login_client
        .post(endpoint(&config.api_base_url, LOGIN_PATH))
        .json(&config.credentials)
        .send()
        .await
        .map_err(AuthError::Request)?;

    let status = response.status();
    if !status.is_success() {
        return Err(AuthError::Status {
            status,
            body: error_body(response).await,
        });
    }

    let token = response
        .cookies()
        .find(|cookie| config.token_cookie.matches(cookie.name()) && !cookie.value().is_empty())
        .map(|cookie| cookie.value().to_string())
        .ok_or(AuthError::TokenNotFound)?;
    debug!(matcher = %config.token_cookie, "found access token cookie");

    headers.insert(
        HeaderName::from_static(TOKEN_HEADER),
        sensitive_value(TOKEN_HEADER, &token)?,
    );
    headers.insert(
        header::AUTHORIZATION,
        sensitive_value(header::AUTHORIZATION.as_str(), &format!("Bearer {token}"))?,
    );

    let client = build_http_client(config, headers.clone())?;
    Ok(AuthenticatedChannel {
        client,
        base_url: config.api_base_url.clone(),
        headers,
    })
}

/// An HTTP client holding a tenant header and an access token.
///
/// Only [`authenticate`] creates channels, so both headers are present before
/// any search is issued. Channels are meant to live for a single request.
pub struct AuthenticatedChannel {
    client: reqwest::Client,
    base_url: String,
    headers: HeaderMap,
}

impl Debug for AuthenticatedChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedChannel")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl AuthenticatedChannel {
    /// Headers sent with every request on this channel.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Search instances whose subjects exactly match the query subject.
    #[instrument(skip_all, fields(subject = %query.subject, page = query.page.get()))]
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResultPage, SearchError> {
        let params = [
            ("expandAll", "true".to_string()),
            ("query", query.cql()),
            ("limit", query.limit().to_string()),
            ("offset", query.offset().to_string()),
        ];
        let raw = self.get_instances(SEARCH_PATH, &params).await?;
        let page = SearchResultPage::from(raw);

        debug!(
            total_records = page.total_records,
            n_records = page.records.len(),
            "received search results"
        );
        Ok(page)
    }

    /// List inventory instances without a filter.
    #[instrument(skip(self))]
    pub async fn inventory(
        &self,
        limit: NonZeroU32,
        offset: u64,
    ) -> Result<SearchResultPage, SearchError> {
        let params = [
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ];
        let raw = self.get_instances(INVENTORY_PATH, &params).await?;
        Ok(SearchResultPage::from(raw))
    }

    async fn get_instances(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<RawInstancesResponse, SearchError> {
        let response = self
            .client
            .get(endpoint(&self.base_url, path))
            .query(params)
            .send()
            .await
            .map_err(SearchError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status {
                status,
                body: error_body(response).await,
            });
        }

        response
            .json::<RawInstancesResponse>()
            .await
            .map_err(SearchError::Decode)
    }
}

// ---------------------------------------------------------------------------
// Catalog trait
// ---------------------------------------------------------------------------

/// Either a client for the actual catalog service,
/// or a mock client for testing.
#[derive(Debug)]
#[enum_dispatch(ClientTrait)]
pub enum Client {
    Catalog(CatalogClient),
    Mock(MockClient),
}

/// The request-scoped catalog operations used by the front end.
#[enum_dispatch]
#[allow(async_fn_in_trait)]
pub trait ClientTrait {
    /// Number of records shown per page.
    fn page_size(&self) -> NonZeroU32;

    /// Search instances by subject heading.
    ///
    /// A blank subject yields an empty page without contacting the catalog.
    async fn search_subject(
        &self,
        subject: &str,
        page: NonZeroU32,
    ) -> Result<SearchResultPage, CatalogError>;

    /// List one page of inventory instances.
    async fn browse(&self, page: NonZeroU32) -> Result<SearchResultPage, CatalogError>;
}

/// A client for the FOLIO catalog.
///
/// Holds configuration only; every call logs in from scratch and drops the
/// resulting [`AuthenticatedChannel`] when done.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    config: CatalogClientConfig,
}

impl CatalogClient {
    pub fn new(config: CatalogClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CatalogClientConfig {
        &self.config
    }
}

impl ClientTrait for CatalogClient {
    fn page_size(&self) -> NonZeroU32 {
        self.config.page_size
    }

    async fn search_subject(
        &self,
        subject: &str,
        page: NonZeroU32,
    ) -> Result<SearchResultPage, CatalogError> {
        let subject = subject.trim();
        if subject.is_empty() {
            debug!("empty subject, skipping search");
            return Ok(SearchResultPage::empty());
        }

        let channel = authenticate(&self.config).await?;
        let query = SearchQuery::new(subject, page, self.config.page_size);
        Ok(channel.search(&query).await?)
    }

    async fn browse(&self, page: NonZeroU32) -> Result<SearchResultPage, CatalogError> {
        let channel = authenticate(&self.config).await?;
        let page_size = self.config.page_size;
        Ok(channel
            .inventory(page_size, page_offset(page, page_size))
            .await?)
    }
}

// ---------------------------------------------------------------------------
// HTTP client builder
// ---------------------------------------------------------------------------

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{path}", base_url.trim_end_matches('/'))
}

/// Headers sent before a token is known: tenant plus configured extras.
fn base_headers(config: &CatalogClientConfig) -> Result<HeaderMap, AuthError> {
    let mut headers = HeaderMap::new();

    headers.insert(
        HeaderName::from_static(TENANT_HEADER),
        HeaderValue::from_str(&config.tenant)
            .map_err(|_| AuthError::InvalidHeader(TENANT_HEADER.to_string()))?,
    );

    for (key, value) in &config.extra_headers {
        headers.insert(
            HeaderName::from_str(key).map_err(|_| AuthError::InvalidHeader(key.clone()))?,
            HeaderValue::from_str(value).map_err(|_| AuthError::InvalidHeader(key.clone()))?,
        );
    }

    Ok(headers)
}

fn sensitive_value(name: &str, value: &str) -> Result<HeaderValue, AuthError> {
    let mut value =
        HeaderValue::from_str(value).map_err(|_| AuthError::InvalidHeader(name.to_string()))?;
    value.set_sensitive(true);
    Ok(value)
}

fn build_http_client(
    config: &CatalogClientConfig,
    headers: HeaderMap,
) -> Result<reqwest::Client, AuthError> {
    debug!(
        n_headers = headers.len(),
        connect_timeout = ?config.connect_timeout,
        timeout = ?config.timeout,
        "building catalog HTTP client"
    );

    let client_builder = reqwest::Client::builder()
        .default_headers(headers)
        .connect_timeout(config.connect_timeout)
        .timeout(config.timeout);

    let client_builder = if let Some(ref user_agent) = config.user_agent {
        client_builder.user_agent(user_agent)
    } else {
        client_builder
    };

    client_builder.build().map_err(AuthError::BuildClient)
}
