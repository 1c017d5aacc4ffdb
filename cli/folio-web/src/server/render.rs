//! HTML pages of the search front end.

use std::fmt::Write;
use std::num::NonZeroU32;

use folio_catalog::{DisplayRecord, SearchResultPage};
use indoc::{formatdoc, indoc};
use url::form_urlencoded;

const STYLE: &str = indoc! {"
    body { font-family: sans-serif; margin: 2rem auto; max-width: 60rem; }
    form input[type=text] { width: 30rem; }
    .record { border-bottom: 1px solid #ddd; padding: 0.75rem 0; }
    .record h2 { font-size: 1.1rem; margin: 0 0 0.25rem; }
    .meta { color: #555; margin: 0.1rem 0; }
    .error { color: #a00; }
    .pages a, .pages span { margin-right: 1rem; }
"};

/// Everything shown on a results page.
#[derive(Debug)]
pub struct ResultsView<'a> {
    pub heading: &'a str,
    /// Route the pagination links point to.
    pub path: &'a str,
    /// The searched subject, empty when listing the inventory.
    pub subject: &'a str,
    pub page: NonZeroU32,
    pub page_size: NonZeroU32,
    pub results: &'a SearchResultPage,
    pub error: Option<&'a str>,
}

pub fn index_page() -> String {
    layout("Subject search", &search_form(""))
}

pub fn results_page(view: &ResultsView<'_>) -> String {
    let mut body = search_form(view.subject);

    if let Some(error) = view.error {
        let _ = writeln!(body, r#"<p class="error">{}</p>"#, escape(error));
    }

    let _ = writeln!(body, "<h1>{}</h1>", escape(view.heading));
    if view.error.is_none() {
        let _ = writeln!(body, "{}", summary(view));
    }

    for record in &view.results.records {
        body.push_str(&record_html(record));
    }

    body.push_str(&pagination(view));
    layout(view.heading, &body)
}

fn layout(title: &str, body: &str) -> String {
    formatdoc! {r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
        <meta charset="utf-8">
        <title>{title}</title>
        <style>
        {STYLE}</style>
        </head>
        <body>
        {body}
        </body>
        </html>
    "#, title = escape(title)}
}

fn search_form(subject: &str) -> String {
    formatdoc! {r#"
        <form action="/results" method="get">
        <label for="subject">Subject</label>
        <input type="text" id="subject" name="subject" value="{subject}" placeholder="e.g. Fishing -- Michigan">
        <button type="submit">Search</button>
        <a href="/browse">Browse all</a>
        </form>
    "#, subject = escape(subject)}
}

fn summary(view: &ResultsView<'_>) -> String {
    let total = view.results.total_records;
    if total == 0 {
        return "<p>No records found.</p>".to_string();
    }
    let pages = view.results.page_count(view.page_size);
    format!(
        "<p>{total} record{} found, page {} of {pages}.</p>",
        if total == 1 { "" } else { "s" },
        view.page
    )
}

fn record_html(record: &DisplayRecord) -> String {
    formatdoc! {r#"
        <div class="record">
        <h2>{title}</h2>
        <p class="meta">Subjects: {subjects}</p>
        <p class="meta">Contributors: {contributors}</p>
        <p class="meta">Created: {created}</p>
        </div>
    "#,
        title = escape(&record.title),
        subjects = join_or_none(&record.subjects),
        contributors = join_or_none(&record.contributors),
        created = escape(&record.created_date),
    }
}

fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        return "none".to_string();
    }
    values
        .iter()
        .map(|value| escape(value))
        .collect::<Vec<_>>()
        .join("; ")
}

fn pagination(view: &ResultsView<'_>) -> String {
    let page = view.page.get() as u64;
    let pages = view.results.page_count(view.page_size);

    let mut links = Vec::new();
    if page > 1 {
        links.push(page_link(view, page - 1, "Previous"));
    }
    if page < pages {
        links.push(page_link(view, page + 1, "Next"));
    }

    if links.is_empty() {
        return String::new();
    }
    format!("<p class=\"pages\">{}</p>\n", links.join(""))
}

fn page_link(view: &ResultsView<'_>, page: u64, label: &str) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    if !view.subject.is_empty() {
        query.append_pair("subject", view.subject);
    }
    query.append_pair("page", &page.to_string());
    format!(
        r#"<a href="{}?{}">{label}</a>"#,
        view.path,
        escape(&query.finish())
    )
}

/// Escape text for use in HTML content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nz(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    fn view<'a>(subject: &'a str, page: u32, results: &'a SearchResultPage) -> ResultsView<'a> {
        ResultsView {
            heading: "Results",
            path: "/results",
            subject,
            page: nz(page),
            page_size: nz(10),
            results,
            error: None,
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn record_fields_are_escaped() {
        let results = SearchResultPage {
            total_records: 1,
            records: vec![DisplayRecord {
                title: "<script>alert(1)</script>".to_string(),
                subjects: vec!["A & B".to_string()],
                contributors: vec![],
                created_date: "N/A".to_string(),
            }],
        };
        let html = results_page(&view("A & B", 1, &results));

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("Subjects: A &amp; B"));
        assert!(html.contains("Contributors: none"));
        assert!(html.contains(r#"value="A &amp; B""#));
    }

    #[test]
    fn middle_page_links_both_ways() {
        let results = SearchResultPage {
            total_records: 25,
            records: vec![],
        };
        let html = results_page(&view("Fishing -- Michigan", 2, &results));

        assert!(html.contains("25 records found, page 2 of 3."));
        assert!(html.contains(r#"<a href="/results?subject=Fishing+--+Michigan&amp;page=1">Previous</a>"#));
        assert!(html.contains(r#"<a href="/results?subject=Fishing+--+Michigan&amp;page=3">Next</a>"#));
    }

    #[test]
    fn single_page_has_no_links() {
        let results = SearchResultPage {
            total_records: 1,
            records: vec![DisplayRecord::default()],
        };
        let html = results_page(&view("Lakes", 1, &results));

        assert!(html.contains("1 record found, page 1 of 1."));
        assert!(!html.contains("Previous"));
        assert!(!html.contains("Next"));
    }

    #[test]
    fn error_is_shown() {
        let results = SearchResultPage::empty();
        let html = results_page(&ResultsView {
            error: Some("login failed: 401 Unauthorized"),
            ..view("Lakes", 1, &results)
        });

        assert!(html.contains(r#"<p class="error">login failed: 401 Unauthorized</p>"#));
    }

    #[test]
    fn index_has_search_form() {
        let html = index_page();
        assert!(html.contains(r#"<form action="/results" method="get">"#));
        assert!(html.contains(r#"name="subject""#));
    }
}
