use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use bpaf::Bpaf;
use folio_catalog::Client;
use tracing::instrument;

use crate::config::Config;
use crate::server::{self, AppState};

/// Run the web front end
#[derive(Debug, Bpaf, Clone)]
pub struct Serve {
    /// Address to listen on [default: the configured 'bind' address]
    #[bpaf(long, argument("ADDR"))]
    pub bind: Option<SocketAddr>,
}

impl Serve {
    #[instrument(name = "serve", skip_all)]
    pub async fn handle(self, config: Config, client: Client) -> Result<()> {
        let bind = match self.bind {
            Some(bind) => bind,
            None => config
                .bind
                .parse()
                .with_context(|| format!("invalid bind address '{}'", config.bind))?,
        };

        server::serve(Arc::new(AppState { client }), bind).await
    }
}
