//! Template API client with a get-or-fetch-and-populate cache protocol
//!
//! Both upstream endpoints go through the same steps: build a normalized
//! cache key, try the cache, fall back to the network, normalize the response
//! shape, and write the cache only when the normalized page is non-empty.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::{null_as_default, Template, TemplatePage};
use crate::cache::{CacheManager, FileStore, KvStore};

/// Base URL for the collection endpoint
const COLLECTION_API_URL: &str = "https://cc-list.onrender.com/get_collection_templates";

/// Base URL for the search endpoint
const SEARCH_API_URL: &str = "https://cc-search.onrender.com/";

/// Number of templates requested per collection when the caller has no preference
pub const DEFAULT_COLLECTION_COUNT: u32 = 200;

/// Errors that can occur when fetching templates
#[derive(Debug, Error)]
pub enum FetchError {
    /// The endpoint answered with a non-success status
    #[error("{endpoint} endpoint returned HTTP {status}")]
    Network { endpoint: &'static str, status: u16 },

    /// HTTP request failed before a status was received
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse API response: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Raw response shared by both endpoints
#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    ret: String,
    #[serde(default, deserialize_with = "null_as_default")]
    errmsg: String,
    data: Option<ApiData>,
}

/// Payload of an API response; the list lives under either field name
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiData {
    #[serde(deserialize_with = "null_as_default")]
    total: u64,
    item_list: Option<Vec<Template>>,
    video_templates: Option<Vec<Template>>,
    #[serde(deserialize_with = "null_as_default")]
    has_more: bool,
}

impl ApiData {
    /// Builds a page, preferring `video_templates` and falling back to `item_list`
    fn into_page(self, ret: String, errmsg: String) -> TemplatePage {
        TemplatePage {
            ret,
            errmsg,
            total: self.total,
            templates: self.video_templates.or(self.item_list).unwrap_or_default(),
            has_more: self.has_more,
        }
    }
}

/// Cache key for a collection listing
pub fn collection_key(collection_id: u64, count: u32) -> String {
    format!("collection_{}_{}", collection_id, count)
}

/// Cache key for a search; the term is trimmed and lowercased
pub fn search_key(query: &str) -> String {
    format!("search_{}", query.trim().to_lowercase())
}

/// Client for the collection and search endpoints
#[derive(Debug, Clone)]
pub struct TemplateClient<S = FileStore> {
    /// HTTP client for making requests
    http_client: Client,
    /// Cache for normalized pages
    cache: CacheManager<S>,
    collection_url: String,
    search_url: String,
}

impl<S: KvStore> TemplateClient<S> {
    /// Creates a client against the public endpoints
    pub fn new(cache: CacheManager<S>) -> Self {
        Self::with_base_urls(cache, COLLECTION_API_URL, SEARCH_API_URL)
    }

    /// Creates a client with custom endpoint URLs
    pub fn with_base_urls(
        cache: CacheManager<S>,
        collection_url: impl Into<String>,
        search_url: impl Into<String>,
    ) -> Self {
        Self {
            http_client: Client::new(),
            cache,
            collection_url: collection_url.into(),
            search_url: search_url.into(),
        }
    }

    /// Overrides the collection endpoint URL
    pub fn with_collection_url(mut self, url: impl Into<String>) -> Self {
        self.collection_url = url.into();
        self
    }

    /// Overrides the search endpoint URL
    pub fn with_search_url(mut self, url: impl Into<String>) -> Self {
        self.search_url = url.into();
        self
    }

    /// Returns the cache this client populates
    pub fn cache(&self) -> &CacheManager<S> {
        &self.cache
    }

    /// Fetches a collection listing, served from cache when fresh
    ///
    /// # Returns
    /// * `Ok(TemplatePage)` - the normalized page, possibly empty
    /// * `Err(FetchError)` - on a non-success status, transport failure or unparseable body
    ///
    /// Empty pages are returned but never cached, so the next call retries.
    pub async fn get_collection_templates(
        &self,
        collection_id: u64,
        count: u32,
    ) -> Result<TemplatePage, FetchError> {
        let cache_key = collection_key(collection_id, count);

        if let Some(cached) = self.cache.get::<TemplatePage>(&cache_key) {
            debug!(collection_id, "Loading collection from cache");
            return Ok(cached);
        }

        let response = self
            .fetch(
                "collection",
                &self.collection_url,
                &[("id", collection_id.to_string()), ("count", count.to_string())],
            )
            .await?;

        let page = match response.data {
            Some(data) => data.into_page(response.ret, response.errmsg),
            None => TemplatePage {
                ret: response.ret,
                errmsg: response.errmsg,
                ..Default::default()
            },
        };

        self.store_if_populated(&cache_key, &page);
        Ok(page)
    }

    /// Searches templates by keyword, served from cache when fresh
    ///
    /// The cache key is normalized but the request carries the query as given.
    /// A response without a templates list yields `TemplatePage::malformed()`.
    pub async fn search_templates(&self, query: &str) -> Result<TemplatePage, FetchError> {
        let cache_key = search_key(query);

        if let Some(cached) = self.cache.get::<TemplatePage>(&cache_key) {
            debug!(query, "Loading search results from cache");
            return Ok(cached);
        }

        let response = self
            .fetch("search", &self.search_url, &[("search", query.to_string())])
            .await?;

        let page = match response.data {
            Some(data) if data.video_templates.is_some() => {
                data.into_page(response.ret, response.errmsg)
            }
            _ => {
                warn!(query, ret = %response.ret, "Invalid search response structure");
                return Ok(TemplatePage::malformed());
            }
        };

        self.store_if_populated(&cache_key, &page);
        Ok(page)
    }

    /// Issues a GET and decodes the body, failing on non-success statuses
    async fn fetch(
        &self,
        endpoint: &'static str,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<ApiResponse, FetchError> {
        let response = self.http_client.get(url).query(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Network {
                endpoint,
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    fn store_if_populated(&self, cache_key: &str, page: &TemplatePage) {
        if page.is_empty() {
            debug!(cache_key, "Skipping cache write for empty page");
            return;
        }
        self.cache.set(cache_key, page);
    }
}
