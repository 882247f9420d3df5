//! Command-line interface parsing for tmplfind
//!
//! This module handles parsing of CLI arguments using clap and resolves them,
//! together with environment overrides, into a validated `StartupConfig`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use thiserror::Error;

use crate::catalog::{SortOrder, TemplateFilter};
use crate::data::{get_category_by_id, DEFAULT_CATEGORY_ID, DEFAULT_COLLECTION_COUNT};

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified sort order is not recognized
    #[error("Invalid sort order: '{0}'. Valid orders: default, used, liked, newest, shortest, longest")]
    InvalidSort(String),

    /// The specified category id is not in the catalog
    #[error("Unknown category: {0}. Run `tmplfind categories` to list them")]
    UnknownCategory(u64),

    /// The search terms were blank after trimming
    #[error("Search query is empty")]
    EmptyQuery,

    /// No cache directory was given and none could be determined
    #[error("Could not determine a cache directory; pass --cache-dir or --no-cache")]
    NoCacheDir,
}

/// tmplfind - Browse and search video-editing templates
#[derive(Parser, Debug)]
#[command(name = "tmplfind")]
#[command(about = "Browse and search video-editing templates")]
#[command(version)]
pub struct Cli {
    /// Directory for cached API responses
    #[arg(long, global = true, env = "TMPLFIND_CACHE_DIR", value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Keep cached responses in memory only for this run (overrides --cache-dir)
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Override the collection endpoint URL
    #[arg(long, global = true, env = "TMPLFIND_COLLECTION_URL", value_name = "URL")]
    pub collection_url: Option<String>,

    /// Override the search endpoint URL
    #[arg(long, global = true, env = "TMPLFIND_SEARCH_URL", value_name = "URL")]
    pub search_url: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the available categories
    Categories,

    /// List templates in a category
    List {
        /// Category id (see `tmplfind categories`)
        #[arg(long, short = 'c', default_value_t = DEFAULT_CATEGORY_ID)]
        category: u64,

        /// Number of templates to request
        #[arg(long, default_value_t = DEFAULT_COLLECTION_COUNT)]
        count: u32,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Search templates by keyword
    Search {
        /// Search terms
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Show details and links for a single template
    Show {
        /// The template's web id
        web_id: String,
    },

    /// Fetch every category into the cache
    Prefetch {
        /// Number of templates to request per category
        #[arg(long, default_value_t = DEFAULT_COLLECTION_COUNT)]
        count: u32,
    },

    /// Manage the response cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

/// Cache maintenance actions
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CacheAction {
    /// Delete every cached response
    Clear,
    /// Delete a single cached response by key (e.g. `collection_6001_200`)
    Remove { key: String },
}

/// Options controlling how a listing is arranged and printed
#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// Sort order: default, used, liked, newest, shortest, longest
    #[arg(long, short = 's', value_name = "ORDER")]
    pub sort: Option<String>,

    /// Only templates up to this many seconds long
    #[arg(long, value_name = "SECS")]
    pub max_duration: Option<u64>,

    /// Only templates with at most this many clips
    #[arg(long, value_name = "N")]
    pub max_clips: Option<u32>,

    /// Only templates with an animated preview
    #[arg(long)]
    pub with_preview: bool,

    /// Show at most this many templates
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Where cached responses live for this run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLocation {
    /// A specific directory
    Dir(PathBuf),
    /// The XDG cache directory
    Default,
    /// Process memory only
    Memory,
}

/// Resolved listing options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewConfig {
    pub sort: SortOrder,
    pub filter: TemplateFilter,
    pub limit: Option<usize>,
    pub json: bool,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    pub cache: CacheLocation,
    pub collection_url: Option<String>,
    pub search_url: Option<String>,
    pub debug: bool,
}

/// Parses a sort order argument.
///
/// # Returns
/// * `Ok(SortOrder)` if the string matches a known order or alias
/// * `Err(CliError::InvalidSort)` otherwise
pub fn parse_sort_arg(s: &str) -> Result<SortOrder, CliError> {
    SortOrder::from_str(s).ok_or_else(|| CliError::InvalidSort(s.to_string()))
}

/// Checks that a category id is part of the catalog
pub fn validate_category(id: u64) -> Result<u64, CliError> {
    get_category_by_id(id)
        .map(|c| c.id)
        .ok_or(CliError::UnknownCategory(id))
}

impl ViewConfig {
    /// Resolves listing options from parsed arguments
    pub fn from_args(args: &ViewArgs) -> Result<Self, CliError> {
        let sort = match &args.sort {
            Some(s) => parse_sort_arg(s)?,
            None => SortOrder::Default,
        };

        Ok(ViewConfig {
            sort,
            filter: TemplateFilter {
                max_duration_secs: args.max_duration,
                max_clips: args.max_clips,
                with_preview: args.with_preview,
            },
            limit: args.limit,
            json: args.json,
        })
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments
    pub fn from_cli(cli: &Cli) -> Self {
        let cache = if cli.no_cache {
            CacheLocation::Memory
        } else {
            match &cli.cache_dir {
                Some(dir) => CacheLocation::Dir(dir.clone()),
                None => CacheLocation::Default,
            }
        };

        StartupConfig {
            cache,
            collection_url: cli.collection_url.clone(),
            search_url: cli.search_url.clone(),
            debug: cli.debug,
        }
    }
}
