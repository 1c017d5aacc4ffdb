//! Mapping of upstream instance records to [`DisplayRecord`]s.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::types::{
    DisplayRecord,
    OneOrMany,
    RawField,
    RawInstance,
    RawInstancesResponse,
    SearchResultPage,
};

pub const NO_TITLE: &str = "No Title";
pub const NOT_AVAILABLE: &str = "N/A";

const DISPLAY_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

impl From<RawInstance> for DisplayRecord {
    fn from(raw: RawInstance) -> Self {
        let created_date = raw
            .metadata
            .and_then(|metadata| metadata.created_date)
            .and_then(|created_date| created_date.display("value"));

        DisplayRecord {
            title: raw
                .title
                .and_then(|title| title.display("value"))
                .unwrap_or_else(|| NO_TITLE.to_string()),
            subjects: display_fields(raw.subjects, "value"),
            contributors: display_fields(raw.contributors, "name"),
            created_date: format_created_date(created_date.as_deref()),
        }
    }
}

impl From<RawInstancesResponse> for SearchResultPage {
    fn from(raw: RawInstancesResponse) -> Self {
        SearchResultPage {
            total_records: raw.total_records.unwrap_or_default(),
            records: raw
                .instances
                .unwrap_or_default()
                .into_iter()
                .map(DisplayRecord::from)
                .collect(),
        }
    }
}

/// Null entries are dropped rather than shown as blanks.
fn display_fields(fields: Option<OneOrMany<RawField>>, key: &str) -> Vec<String> {
    fields
        .map(OneOrMany::into_vec)
        .unwrap_or_default()
        .iter()
        .filter_map(|field| field.display(key))
        .collect()
}

/// Formats `metadata.createdDate` for display.
///
/// Timestamps are shown as `YYYY-MM-DD HH:MM` in their own offset. Values
/// that don't parse are returned unchanged, a missing value becomes `N/A`.
pub fn format_created_date(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return NOT_AVAILABLE.to_string();
    };
    match parse_timestamp(raw) {
        Some(formatted) => formatted,
        None => {
            tracing::trace!(created_date = raw, "keeping unparsable created date");
            raw.to_string()
        },
    }
}

fn parse_timestamp(raw: &str) -> Option<String> {
    let trimmed = raw.trim();

    // RFC 3339 covers the `Z` suffix as well as `+hh:mm` offsets.
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(timestamp.format(DISPLAY_DATE_FORMAT).to_string());
    }
    // FOLIO metadata often carries `+0000` style offsets.
    if let Ok(timestamp) = DateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(timestamp.format(DISPLAY_DATE_FORMAT).to_string());
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(timestamp.format(DISPLAY_DATE_FORMAT).to_string());
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.format(DISPLAY_DATE_FORMAT).to_string());
    }
    None
}
