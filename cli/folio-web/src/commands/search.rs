use std::fmt::Write;
use std::num::NonZeroU32;

use anyhow::{Context, Result};
use bpaf::Bpaf;
use folio_catalog::{Client, ClientTrait, SearchResultPage};
use tracing::instrument;

use crate::utils::message;

const FIRST_PAGE: NonZeroU32 = NonZeroU32::MIN;

/// Search instances by subject heading
#[derive(Debug, Bpaf, Clone)]
pub struct Search {
    /// Display results as JSON
    #[bpaf(long)]
    pub json: bool,

    /// Result page to show, starting at 1
    #[bpaf(long, argument("N"), fallback(FIRST_PAGE))]
    pub page: NonZeroU32,

    /// The exact subject heading, e.g. 'Fishing -- Michigan'
    #[bpaf(positional("subject"))]
    pub subject: String,
}

impl Search {
    #[instrument(name = "search", fields(subject = self.subject, page = self.page.get()), skip_all)]
    pub async fn handle(self, client: Client) -> Result<()> {
        if self.subject.trim().is_empty() {
            message::plain("No subject given, nothing to search for.");
            return Ok(());
        }

        let results = client
            .search_subject(&self.subject, self.page)
            .await
            .context("catalog search failed")?;

        print_results(&results, self.page, client.page_size(), self.json)
    }
}

/// List inventory instances
#[derive(Debug, Bpaf, Clone)]
pub struct Browse {
    /// Display results as JSON
    #[bpaf(long)]
    pub json: bool,

    /// Result page to show, starting at 1
    #[bpaf(long, argument("N"), fallback(FIRST_PAGE))]
    pub page: NonZeroU32,
}

impl Browse {
    #[instrument(name = "browse", fields(page = self.page.get()), skip_all)]
    pub async fn handle(self, client: Client) -> Result<()> {
        let results = client
            .browse(self.page)
            .await
            .context("catalog listing failed")?;

        print_results(&results, self.page, client.page_size(), self.json)
    }
}

fn print_results(
    results: &SearchResultPage,
    page: NonZeroU32,
    page_size: NonZeroU32,
    json: bool,
) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
        return Ok(());
    }

    if results.records.is_empty() {
        message::plain("No records found.");
        return Ok(());
    }

    println!("{}", format_results(results, page, page_size));
    Ok(())
}

fn format_results(results: &SearchResultPage, page: NonZeroU32, page_size: NonZeroU32) -> String {
    let mut out = String::new();
    for record in &results.records {
        let _ = writeln!(out, "{}", record.title);
        if !record.subjects.is_empty() {
            let _ = writeln!(out, "  subjects:     {}", record.subjects.join("; "));
        }
        if !record.contributors.is_empty() {
            let _ = writeln!(out, "  contributors: {}", record.contributors.join("; "));
        }
        let _ = writeln!(out, "  created:      {}", record.created_date);
    }
    let _ = write!(
        out,
        "{} records, page {page} of {}",
        results.total_records,
        results.page_count(page_size)
    );
    out
}
