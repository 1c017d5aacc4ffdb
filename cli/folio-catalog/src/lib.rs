//! HTTP client for searching FOLIO instance records.
//!
//! This crate provides:
//! - Session authentication against the FOLIO API gateway
//! - Subject search and inventory listing on an authenticated channel
//! - Normalization of loosely shaped instance records for display
//! - A mock client for front end tests
//!
//! ## Usage
//!
//! ```ignore
//! use folio_catalog::{CatalogClient, CatalogClientConfig, ClientTrait, Credentials};
//!
//! let config = CatalogClientConfig::new(
//!     "https://folio.example.org",
//!     "diku",
//!     Credentials::new(username, password),
//! );
//!
//! let client = CatalogClient::new(config);
//! let page = client.search_subject("Fishing -- Michigan", NonZeroU32::MIN).await?;
//! ```

mod client;
mod config;
mod error;
mod mock;
mod normalize;
mod types;

pub use client::{
    AuthenticatedChannel,
    CatalogClient,
    Client,
    ClientTrait,
    TENANT_HEADER,
    TOKEN_HEADER,
    authenticate,
};
pub use config::{
    CatalogClientConfig,
    Credentials,
    DEFAULT_CONNECT_TIMEOUT,
    DEFAULT_PAGE_SIZE,
    DEFAULT_TIMEOUT,
    ParseMatcherError,
    TokenCookieMatcher,
};
pub use error::{AuthError, CatalogError, SearchError};
pub use mock::{FOLIO_CATALOG_MOCK_DATA_VAR, MockCall, MockClient, MockDataError, MockResponse};
pub use normalize::{NO_TITLE, NOT_AVAILABLE, format_created_date};
pub use types::{
    DisplayRecord,
    OneOrMany,
    RawField,
    RawInstance,
    RawInstancesResponse,
    RawMetadata,
    SearchQuery,
    SearchResultPage,
    page_offset,
};
