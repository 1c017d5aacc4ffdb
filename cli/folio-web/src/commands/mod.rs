mod search;
mod serve;

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use bpaf::{Bpaf, ShellComp};
use indoc::indoc;
use tracing::debug;

use self::search::{Browse, Search};
use self::serve::Serve;
use crate::config::Config;
use crate::utils::init::init_catalog_client;

const SHELL_COMPLETION_FILE: ShellComp = ShellComp::File { mask: None };

static FOLIO_WEB_DESCRIPTION: &'_ str = indoc! {"
    Subject search front end for a FOLIO library catalog.

    Serves a search form and paginated result pages, or runs one-off searches
    from the command line."
};

fn vec_len<T>(x: Vec<T>) -> usize {
    Vec::len(&x)
}

#[derive(Bpaf, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verbosity {
    Verbose(
        /// Increase logging verbosity
        ///
        /// Invoke multiple times for increasing detail.
        #[bpaf(short('v'), long("verbose"), req_flag(()), many, map(vec_len))]
        usize,
    ),

    /// Silence logs except for errors
    #[bpaf(short, long)]
    Quiet,
}

impl Default for Verbosity {
    fn default() -> Self {
        Verbosity::Verbose(0)
    }
}

#[derive(Bpaf)]
#[bpaf(options, descr(FOLIO_WEB_DESCRIPTION))]
pub struct FolioCli(#[bpaf(external(folio_args))] pub FolioArgs);

/// Main argument parser
///
/// To parse the full command line, use [`FolioCli`] via [`folio_cli()`].
#[derive(Debug, Bpaf)]
#[bpaf(ignore_rustdoc)]
pub struct FolioArgs {
    /// Verbose mode
    ///
    /// Invoke multiple times for increasing detail.
    #[bpaf(external, fallback(Default::default()))]
    pub verbosity: Verbosity,

    /// Read configuration from this file in addition to the default locations
    #[bpaf(long, argument("PATH"), complete_shell(SHELL_COMPLETION_FILE))]
    pub config: Option<PathBuf>,

    #[bpaf(external(commands))]
    command: Commands,
}

impl FolioArgs {
    /// Load configuration, set up the catalog client and run the command.
    pub async fn handle(self) -> Result<()> {
        let config = Config::parse(self.config.as_deref()).context("failed to load configuration")?;
        debug!(?config, "loaded configuration");

        let client = init_catalog_client(&config).context("failed to set up catalog client")?;

        match self.command {
            Commands::Serve(args) => args.handle(config, client).await,
            Commands::Search(args) => args.handle(client).await,
            Commands::Browse(args) => args.handle(client).await,
        }
    }
}

#[derive(Bpaf, Clone)]
enum Commands {
    /// Run the web front end
    #[bpaf(command)]
    Serve(#[bpaf(external(serve::serve))] Serve),

    /// Search the catalog by subject and print one page of results
    #[bpaf(command)]
    Search(#[bpaf(external(search::search))] Search),

    /// List one page of inventory instances
    #[bpaf(command)]
    Browse(#[bpaf(external(search::browse))] Browse),
}

impl fmt::Debug for Commands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Commands::Serve(_) => write!(f, "serve"),
            Commands::Search(_) => write!(f, "search"),
            Commands::Browse(_) => write!(f, "browse"),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(args: &[&str]) -> FolioArgs {
        let FolioCli(args) = folio_cli().run_inner(args).unwrap();
        args
    }

    #[test]
    fn verbosity_counts_flags() {
        assert_eq!(parse(&["-vv", "browse"]).verbosity, Verbosity::Verbose(2));
        assert_eq!(parse(&["-q", "browse"]).verbosity, Verbosity::Quiet);
        assert_eq!(parse(&["browse"]).verbosity, Verbosity::Verbose(0));
    }

    #[test]
    fn search_takes_subject_and_page() {
        let args = parse(&["--config", "/tmp/folio.toml", "search", "Lakes", "--page", "3", "--json"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/folio.toml")));
        let Commands::Search(search) = args.command else {
            panic!("expected search command");
        };
        assert_eq!(search.subject, "Lakes");
        assert_eq!(search.page.get(), 3);
        assert!(search.json);
    }

    #[test]
    fn zero_page_is_rejected() {
        assert!(folio_cli().run_inner(&["browse", "--page", "0"]).is_err());
    }

    #[test]
    fn serve_bind_is_optional() {
        let Commands::Serve(serve) = parse(&["serve"]).command else {
            panic!("expected serve command");
        };
        assert_eq!(serve.bind, None);
    }
}
