use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use folio_catalog::{CatalogClient, Client, FOLIO_CATALOG_MOCK_DATA_VAR, MockClient};
use tracing::debug;

use crate::config::Config;

/// Initialize the catalog client
///
/// - Initialize a mock client if `_FOLIO_USE_CATALOG_MOCK` points at a file of mock responses
/// - Initialize a real client otherwise
pub fn init_catalog_client(config: &Config) -> Result<Client> {
    if let Ok(path_str) = std::env::var(FOLIO_CATALOG_MOCK_DATA_VAR) {
        let path = PathBuf::from(path_str);
        if !path.exists() {
            bail!("path to mock data file doesn't exist: {}", path.display());
        }

        debug!(mock_data_path = %path.display(), "using mock catalog client");
        let mut client = MockClient::from_file(&path)
            .with_context(|| format!("could not load mock data from {}", path.display()))?;
        client.page_size = config.page_size;
        return Ok(client.into());
    }

    let client_config = config.catalog_client_config()?;
    debug!(
        api_base_url = %client_config.api_base_url,
        tenant = %client_config.tenant,
        "using catalog client"
    );
    Ok(CatalogClient::new(client_config).into())
}
