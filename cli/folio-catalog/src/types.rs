//! Catalog interaction types.
//!
//! `Raw*` types mirror the upstream JSON loosely enough to accept the field
//! shapes seen across FOLIO releases. [`DisplayRecord`] is the stable shape
//! handed to rendering.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// A subject search for one result page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Matched exactly against the upstream `subjects` field.
    pub subject: String,
    /// 1-based page number.
    pub page: NonZeroU32,
    pub page_size: NonZeroU32,
}

impl SearchQuery {
    pub fn new(subject: impl Into<String>, page: NonZeroU32, page_size: NonZeroU32) -> Self {
        Self {
            subject: subject.into(),
            page,
            page_size,
        }
    }

    pub fn limit(&self) -> u32 {
        self.page_size.get()
    }

    pub fn offset(&self) -> u64 {
        page_offset(self.page, self.page_size)
    }

    /// The CQL expression sent as the `query` parameter.
    ///
    /// The subject is used verbatim; escaping `"` and `\` so that it stays a
    /// single CQL term is the only transformation applied.
    pub fn cql(&self) -> String {
        let mut escaped = String::with_capacity(self.subject.len());
        for c in self.subject.chars() {
            if matches!(c, '"' | '\\') {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        format!("subjects==\"{escaped}\"")
    }
}

/// Number of records preceding `page` when pages hold `page_size` records.
pub fn page_offset(page: NonZeroU32, page_size: NonZeroU32) -> u64 {
    (page.get() as u64 - 1) * page_size.get() as u64
}

// ---------------------------------------------------------------------------
// Upstream shapes
// ---------------------------------------------------------------------------

/// A loosely typed upstream value.
///
/// Subjects, contributors and even titles arrive either as plain values or
/// as objects carrying the interesting part under a known key.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawField {
    Structured(Map<String, Value>),
    Scalar(Value),
}

impl RawField {
    /// The display text of this entry, `None` for nulls.
    ///
    /// Objects yield the value stored under `key`; anything else, including
    /// objects lacking `key`, yields its own string representation.
    pub fn display(&self, key: &str) -> Option<String> {
        match self {
            RawField::Structured(map) => match map.get(key) {
                Some(value) => value_to_string(value),
                None => Some(Value::Object(map.clone()).to_string()),
            },
            RawField::Scalar(value) => value_to_string(value),
        }
    }
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// A list field that some records carry as a single bare entry.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMetadata {
    pub created_date: Option<RawField>,
}

/// An instance record as returned by the search and inventory APIs.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInstance {
    pub title: Option<RawField>,
    pub subjects: Option<OneOrMany<RawField>>,
    pub contributors: Option<OneOrMany<RawField>>,
    pub metadata: Option<RawMetadata>,
}

/// Response body of `GET /search/instances` and `GET /inventory/instances`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInstancesResponse {
    pub total_records: Option<u64>,
    pub instances: Option<Vec<RawInstance>>,
}

// ---------------------------------------------------------------------------
// Display shapes
// ---------------------------------------------------------------------------

/// A normalized instance, ready for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRecord {
    pub title: String,
    pub subjects: Vec<String>,
    pub contributors: Vec<String>,
    /// `YYYY-MM-DD HH:MM`, the raw upstream value, or `N/A`.
    pub created_date: String,
}

/// One page of normalized results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultPage {
    /// Total number of matches as reported upstream.
    pub total_records: u64,
    pub records: Vec<DisplayRecord>,
}

impl SearchResultPage {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of pages needed to show all matches.
    pub fn page_count(&self, page_size: NonZeroU32) -> u64 {
        self.total_records.div_ceil(page_size.get() as u64)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;

    fn nz(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn offset_is_derived_from_page() {
        assert_eq!(SearchQuery::new("Fish", nz(1), nz(10)).offset(), 0);
        assert_eq!(SearchQuery::new("Fish", nz(2), nz(10)).offset(), 10);
        assert_eq!(SearchQuery::new("Fish", nz(5), nz(25)).offset(), 100);
    }

    #[test]
    fn cql_keeps_subject_case() {
        let query = SearchQuery::new("Fishing -- Michigan", nz(1), nz(10));
        assert_eq!(query.cql(), r#"subjects=="Fishing -- Michigan""#);
    }

    #[test]
    fn cql_escapes_quotes() {
        let query = SearchQuery::new(r#"The "Great" Lakes"#, nz(1), nz(10));
        assert_eq!(query.cql(), r#"subjects=="The \"Great\" Lakes""#);
    }

    #[test]
    fn raw_field_accepts_objects_and_scalars() {
        let fields: Vec<RawField> =
            serde_json::from_value(json!([{"value": "Rivers"}, "Lakes", 42, {"other": 1}]))
                .unwrap();

        let displayed = fields
            .iter()
            .map(|field| field.display("value"))
            .collect::<Vec<_>>();
        assert_eq!(displayed, vec![
            Some("Rivers".to_string()),
            Some("Lakes".to_string()),
            Some("42".to_string()),
            Some(r#"{"other":1}"#.to_string()),
        ]);
    }

    #[test]
    fn null_raw_fields_have_no_display() {
        let fields: Vec<RawField> =
            serde_json::from_value(json!([null, {"value": null}, ""])).unwrap();

        let displayed = fields
            .iter()
            .map(|field| field.display("value"))
            .collect::<Vec<_>>();
        assert_eq!(displayed, vec![None, None, Some(String::new())]);
    }

    #[test]
    fn one_or_many_accepts_bare_entries() {
        let many: OneOrMany<RawField> = serde_json::from_value(json!(["Lakes", "Rivers"])).unwrap();
        assert_eq!(many.into_vec().len(), 2);

        let one: OneOrMany<RawField> = serde_json::from_value(json!({"value": "Lakes"})).unwrap();
        assert_eq!(one.into_vec(), vec![RawField::Structured(
            json!({"value": "Lakes"}).as_object().unwrap().clone()
        )]);
    }

    #[test]
    fn raw_instance_tolerates_missing_and_null_fields() {
        let instance: RawInstance =
            serde_json::from_value(json!({"title": null, "unrelated": true})).unwrap();
        assert_eq!(instance, RawInstance::default());
    }

    #[test]
    fn page_count_rounds_up() {
        let page = SearchResultPage {
            total_records: 25,
            records: vec![],
        };
        assert_eq!(page.page_count(nz(10)), 3);
        assert_eq!(SearchResultPage::empty().page_count(nz(10)), 0);
    }

    proptest! {
        #[test]
        fn offsets_partition_results(page in 1..10_000_u32, page_size in 1..500_u32) {
            let (page, page_size) = (nz(page), nz(page_size));
            let offset = page_offset(page, page_size);
            prop_assert_eq!(offset % page_size.get() as u64, 0);
            prop_assert_eq!(offset / page_size.get() as u64 + 1, page.get() as u64);
        }
    }
}
