//! The subject search web front end.

pub mod render;

use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use folio_catalog::{CatalogError, Client, ClientTrait, SearchResultPage};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use self::render::{ResultsView, index_page, results_page};

/// Shared, read-only state of the web server.
#[derive(Debug)]
pub struct AppState {
    pub client: Client,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/results", get(results))
        .route("/browse", get(browse))
        .route("/healthz", get(healthz))
        .with_state(state)
}

/// Serve the front end on `bind` until Ctrl+C or SIGTERM.
pub async fn serve(state: Arc<AppState>, bind: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("could not bind to {bind}"))?;
    let local_addr = listener.local_addr().context("could not read bound address")?;
    info!(%local_addr, "listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server failed")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(%err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("received terminate signal, shutting down");
            },
            Err(err) => {
                warn!(%err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[derive(Debug, Deserialize)]
struct ResultsParams {
    #[serde(default)]
    subject: String,
    page: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BrowseParams {
    page: Option<String>,
}

/// Page numbers start at 1; anything that isn't a positive number means 1.
fn parse_page(raw: Option<&str>) -> NonZeroU32 {
    raw.and_then(|raw| raw.trim().parse::<NonZeroU32>().ok())
        .unwrap_or(NonZeroU32::MIN)
}

async fn index() -> Html<String> {
    Html(index_page())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn results(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResultsParams>,
) -> Html<String> {
    let subject = params.subject.trim();
    let page = parse_page(params.page.as_deref());

    let outcome = if subject.is_empty() {
        Ok(SearchResultPage::empty())
    } else {
        state.client.search_subject(subject, page).await
    };

    render_outcome(&state, "Search results", "/results", subject, page, outcome)
}

async fn browse(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BrowseParams>,
) -> Html<String> {
    let page = parse_page(params.page.as_deref());
    let outcome = state.client.browse(page).await;
    render_outcome(&state, "All instances", "/browse", "", page, outcome)
}

fn render_outcome(
    state: &AppState,
    heading: &str,
    path: &str,
    subject: &str,
    page: NonZeroU32,
    outcome: Result<SearchResultPage, CatalogError>,
) -> Html<String> {
    let page_size = state.client.page_size();
    let html = match outcome {
        Ok(results) => results_page(&ResultsView {
            heading,
            path,
            subject,
            page,
            page_size,
            results: &results,
            error: None,
        }),
        Err(err) => {
            warn!(%err, subject, "catalog request failed");
            let message = err.to_string();
            results_page(&ResultsView {
                heading,
                path,
                subject,
                page: NonZeroU32::MIN,
                page_size,
                results: &SearchResultPage::empty(),
                error: Some(&message),
            })
        },
    };
    Html(html)
}
