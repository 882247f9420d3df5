//! tmplfind - Browse and search video-editing templates
//!
//! A command-line front end over the template catalog APIs, with a short-lived
//! local cache of API responses.

use std::io::{self, Write};

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tmplfind::ads::AutoGrantGate;
use tmplfind::app::App;
use tmplfind::cache::{CacheManager, KvStore, MemoryStore};
use tmplfind::cli::{CacheLocation, Cli, CliError, Command, StartupConfig};
use tmplfind::data::TemplateClient;

/// Initialize the tracing subscriber for logging.
///
/// `--debug` sets the level to DEBUG. Otherwise `RUST_LOG` applies, falling
/// back to WARN. Logs go to stderr so command output stays clean.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("tmplfind=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tmplfind=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Builds the client on top of `cache`, applying endpoint overrides
fn build_client<S: KvStore>(cache: CacheManager<S>, config: &StartupConfig) -> TemplateClient<S> {
    let mut client = TemplateClient::new(cache);
    if let Some(url) = &config.collection_url {
        client = client.with_collection_url(url);
    }
    if let Some(url) = &config.search_url {
        client = client.with_search_url(url);
    }
    client
}

async fn run<S: KvStore>(
    cache: CacheManager<S>,
    config: &StartupConfig,
    command: &Command,
) -> Result<String, Box<dyn std::error::Error>> {
    let app = App::new(build_client(cache, config), AutoGrantGate);
    Ok(app.run(command).await?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("tmplfind starting with args: {:?}", cli);

    let config = StartupConfig::from_cli(&cli);

    let output = match &config.cache {
        CacheLocation::Memory => {
            run(CacheManager::with_store(MemoryStore::new()), &config, &cli.command).await?
        }
        CacheLocation::Dir(dir) => run(CacheManager::with_dir(dir.clone()), &config, &cli.command).await?,
        CacheLocation::Default => {
            let cache = CacheManager::new().ok_or(CliError::NoCacheDir)?;
            run(cache, &config, &cli.command).await?
        }
    };

    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;

    Ok(())
}
