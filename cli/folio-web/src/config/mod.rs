use std::collections::HashMap;
use std::env;
use std::fmt::{self, Debug};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use config::{Config as HierarchicalConfig, Environment};
use folio_catalog::{CatalogClientConfig, Credentials, TokenCookieMatcher};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;
use xdg::BaseDirectories;

/// Name of folio-web managed directories
const FOLIO_WEB_DIR_NAME: &str = "folio-web";
pub const FOLIO_WEB_CONFIG_FILE: &str = "folio-web.toml";
const ENV_PREFIX: &str = "FOLIO_";

pub const DEFAULT_BIND: &str = "127.0.0.1:8000";

/// Process-wide configuration, read once at startup.
///
/// Connection settings are optional here so that commands that don't talk
/// to the catalog (or use the mock client) can run without them.
/// [Config::catalog_client_config] validates them.
#[derive(Clone, Deserialize, Serialize)]
pub struct Config {
    /// Base URL of the FOLIO API gateway
    pub api_base_url: Option<String>,
    /// FOLIO tenant identifier
    pub tenant: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,

    /// Which login cookie holds the access token,
    /// either `contains:<text>` or `exact:<name>`
    pub token_cookie: TokenCookieMatcher,
    /// Records shown per result page
    pub page_size: NonZeroU32,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
    pub user_agent: Option<String>,

    /// Address the web server listens on
    pub bind: String,
}

impl Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_base_url", &self.api_base_url)
            .field("tenant", &self.tenant)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("token_cookie", &self.token_cookie)
            .field("page_size", &self.page_size)
            .field("bind", &self.bind)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Creates a [Config] from config files and `FOLIO_*` environment variables
    ///
    /// Files are read in order of increasing precedence:
    /// `/etc/folio-web/folio-web.toml`, `$XDG_CONFIG_DIRS`, `$XDG_CONFIG_HOME`
    /// and finally `explicit_file` if given, which must exist.
    pub fn parse(explicit_file: Option<&Path>) -> Result<Config> {
        let mut files = vec![(
            PathBuf::from("/etc")
                .join(FOLIO_WEB_DIR_NAME)
                .join(FOLIO_WEB_CONFIG_FILE),
            false,
        )];

        let dirs = BaseDirectories::with_prefix(FOLIO_WEB_DIR_NAME);
        // find_config_files yields the most important file last
        files.extend(
            dirs.find_config_files(FOLIO_WEB_CONFIG_FILE)
                .map(|file| (file, false)),
        );

        if let Some(file) = explicit_file {
            if !file.exists() {
                bail!("config file '{}' does not exist", file.display());
            }
            files.push((file.to_path_buf(), true));
        }

        let envs = env::vars()
            .filter_map(|(k, v)| k.strip_prefix(ENV_PREFIX).map(|k| (k.to_owned(), v)))
            .collect::<HashMap<_, _>>();

        Self::from_sources(&files, envs)
    }

    /// Build a [Config] from explicit sources.
    ///
    /// `files` pairs a path with whether it is required,
    /// `envs` holds environment overrides with the prefix already stripped.
    pub fn from_sources(files: &[(PathBuf, bool)], envs: HashMap<String, String>) -> Result<Config> {
        let mut builder = HierarchicalConfig::builder()
            .set_default("token_cookie", TokenCookieMatcher::default().to_string())?
            .set_default("page_size", folio_catalog::DEFAULT_PAGE_SIZE.get() as i64)?
            .set_default(
                "connect_timeout_secs",
                folio_catalog::DEFAULT_CONNECT_TIMEOUT.as_secs() as i64,
            )?
            .set_default("timeout_secs", folio_catalog::DEFAULT_TIMEOUT.as_secs() as i64)?
            .set_default("bind", DEFAULT_BIND)?;

        for (file, required) in files {
            debug!(path = %file.display(), required, "adding config source");
            builder = builder.add_source(
                config::File::from(file.as_path())
                    .format(config::FileFormat::Toml)
                    .required(*required),
            );
        }

        let final_config = builder
            .add_source(
                Environment::default()
                    .source(Some(envs))
                    .try_parsing(true),
            )
            .build()
            .context("Could not read config")?;

        final_config
            .try_deserialize()
            .context("Could not parse config")
    }

    /// Validated settings for the catalog client.
    pub fn catalog_client_config(&self) -> Result<CatalogClientConfig> {
        let api_base_url = required(&self.api_base_url, "api_base_url")?;
        Url::parse(api_base_url)
            .with_context(|| format!("invalid 'api_base_url' in configuration: {api_base_url}"))?;

        let credentials = Credentials::new(
            required(&self.username, "username")?,
            required(&self.password, "password")?,
        );

        let mut client_config = CatalogClientConfig::new(
            api_base_url.trim_end_matches('/'),
            required(&self.tenant, "tenant")?,
            credentials,
        );
        client_config.token_cookie = self.token_cookie.clone();
        client_config.page_size = self.page_size;
        client_config.connect_timeout = Duration::from_secs(self.connect_timeout_secs);
        client_config.timeout = Duration::from_secs(self.timeout_secs);
        client_config.user_agent = Some(
            self.user_agent
                .clone()
                .unwrap_or_else(|| format!("folio-web/{}", env!("CARGO_PKG_VERSION"))),
        );

        Ok(client_config)
    }
}

fn required<'a>(value: &'a Option<String>, key: &str) -> Result<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => bail!(
            "missing '{key}' in configuration (set it in {FOLIO_WEB_CONFIG_FILE} or ${ENV_PREFIX}{})",
            key.to_uppercase()
        ),
    }
}
