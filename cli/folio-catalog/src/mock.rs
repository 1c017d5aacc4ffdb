//! A catalog client answering from canned responses.
//!
//! Used by front end tests and for running the front end without access to
//! a FOLIO gateway.

use std::collections::VecDeque;
use std::num::NonZeroU32;
use std::path::Path;
use std::sync::{Arc, Mutex};

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::client::ClientTrait;
use crate::config::DEFAULT_PAGE_SIZE;
use crate::error::{AuthError, CatalogError, SearchError};
use crate::types::SearchResultPage;

pub const FOLIO_CATALOG_MOCK_DATA_VAR: &str = "_FOLIO_USE_CATALOG_MOCK";

// Arc allows pushing responses after the client has been shared
type MockField<T> = Arc<Mutex<T>>;

/// A canned answer to the next catalog call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MockResponse {
    Page(SearchResultPage),
    /// Login answered with a non-success status.
    LoginFailed { status: u16 },
    /// Login succeeded but carried no token cookie.
    TokenNotFound,
    /// The search call answered with a non-success status.
    SearchFailed {
        status: u16,
        #[serde(default)]
        body: String,
    },
}

/// A call received by a [`MockClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Search { subject: String, page: u32 },
    Browse { page: u32 },
}

#[derive(Debug, Error)]
pub enum MockDataError {
    #[error("failed to read mock response file")]
    ReadMockFile(#[source] std::io::Error),
    #[error("failed to parse mock data as JSON")]
    ParseJson(#[source] serde_json::Error),
}

/// A catalog client that can be seeded with mock responses.
///
/// Responses are consumed in order. Once exhausted, calls return empty pages.
#[derive(Debug, Clone)]
pub struct MockClient {
    pub page_size: NonZeroU32,
    pub mock_responses: MockField<VecDeque<MockResponse>>,
    pub calls: MockField<Vec<MockCall>>,
}

impl Default for MockClient {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            mock_responses: Default::default(),
            calls: Default::default(),
        }
    }
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock client from a JSON array of [`MockResponse`]s on disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MockDataError> {
        let contents = std::fs::read_to_string(path).map_err(MockDataError::ReadMockFile)?;
        let responses: Vec<MockResponse> =
            serde_json::from_str(&contents).map_err(MockDataError::ParseJson)?;
        debug!(n_responses = responses.len(), "loaded mock catalog responses");

        let client = Self::default();
        client
            .mock_responses
            .lock()
            .expect("couldn't acquire mock lock")
            .extend(responses);
        Ok(client)
    }

    /// Push a new response into the list of mock responses
    pub fn push_response(&self, response: MockResponse) {
        self.mock_responses
            .lock()
            .expect("couldn't acquire mock lock")
            .push_back(response);
    }

    /// Calls received so far, oldest first.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().expect("couldn't acquire mock lock").clone()
    }

    fn respond(&self, call: MockCall) -> Result<SearchResultPage, CatalogError> {
        self.calls
            .lock()
            .expect("couldn't acquire mock lock")
            .push(call);

        let next = self
            .mock_responses
            .lock()
            .expect("couldn't acquire mock lock")
            .pop_front();

        match next {
            None => Ok(SearchResultPage::empty()),
            Some(MockResponse::Page(page)) => Ok(page),
            Some(MockResponse::LoginFailed { status }) => Err(AuthError::Status {
                status: status_code(status),
                body: String::new(),
            }
            .into()),
            Some(MockResponse::TokenNotFound) => Err(AuthError::TokenNotFound.into()),
            Some(MockResponse::SearchFailed { status, body }) => Err(SearchError::Status {
                status: status_code(status),
                body,
            }
            .into()),
        }
    }
}

fn status_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl ClientTrait for MockClient {
    fn page_size(&self) -> NonZeroU32 {
        self.page_size
    }

    async fn search_subject(
        &self,
        subject: &str,
        page: NonZeroU32,
    ) -> Result<SearchResultPage, CatalogError> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Ok(SearchResultPage::empty());
        }
        self.respond(MockCall::Search {
            subject: subject.to_string(),
            page: page.get(),
        })
    }

    async fn browse(&self, page: NonZeroU32) -> Result<SearchResultPage, CatalogError> {
        self.respond(MockCall::Browse { page: page.get() })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::types::DisplayRecord;

    fn page_one() -> NonZeroU32 {
        NonZeroU32::MIN
    }

    #[tokio::test]
    async fn responses_are_consumed_in_order() {
        let client = MockClient::new();
        let page = SearchResultPage {
            total_records: 1,
            records: vec![DisplayRecord {
                title: "Walden".to_string(),
                ..Default::default()
            }],
        };
        client.push_response(MockResponse::Page(page.clone()));
        client.push_response(MockResponse::TokenNotFound);

        assert_eq!(
            client.search_subject("Ponds", page_one()).await.unwrap(),
            page
        );
        assert!(matches!(
            client.search_subject("Ponds", page_one()).await,
            Err(CatalogError::Auth(AuthError::TokenNotFound))
        ));
        assert_eq!(
            client.search_subject("Ponds", page_one()).await.unwrap(),
            SearchResultPage::empty()
        );
    }

    #[tokio::test]
    async fn blank_subject_is_not_recorded() {
        let client = MockClient::new();
        client.search_subject(" ", page_one()).await.unwrap();
        client.browse(page_one()).await.unwrap();
        assert_eq!(client.calls(), vec![MockCall::Browse { page: 1 }]);
    }

    #[test]
    fn reads_responses_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"kind": "page", "totalRecords": 0, "records": []}},
                {{"kind": "search_failed", "status": 400, "body": "bad query"}}
            ]"#
        )
        .unwrap();

        let client = MockClient::from_file(file.path()).unwrap();
        let responses = client.mock_responses.lock().unwrap().clone();
        assert_eq!(responses, VecDeque::from([
            MockResponse::Page(SearchResultPage::empty()),
            MockResponse::SearchFailed {
                status: 400,
                body: "bad query".to_string()
            },
        ]));
    }
}
