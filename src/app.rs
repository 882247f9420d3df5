//! Application command handling
//!
//! Ties the template client, the client-side catalog helpers and the ad gate
//! together. Each command renders its output to a `String` so the binary
//! only has to print it.

use std::fmt::Write as _;

use futures::future::join_all;
use thiserror::Error;
use tracing::{info, warn};

use crate::ads::{gated_search, unlock_links, AdGate, AutoGrantGate};
use crate::cache::{FileStore, KvStore};
use crate::catalog::{arrange, find_template, format_duration, format_usage};
use crate::cli::{validate_category, CacheAction, CliError, Command, ViewConfig};
use crate::data::{all_categories, get_category_by_id, FetchError, Template, TemplateClient, TemplatePage};

/// Errors surfaced to the user by a command
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Cli(#[from] CliError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// No category contained the requested template
    #[error("Template not found: {0}")]
    NotFound(String),

    /// The rewarded ad was declined, so the search did not run
    #[error("Search requires watching an ad to completion")]
    SearchBlocked,

    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Main application state
pub struct App<S = FileStore, G = AutoGrantGate> {
    /// Client used for every template fetch
    client: TemplateClient<S>,
    /// Gate consulted before unlocking actions
    gate: G,
}

impl<S: KvStore, G: AdGate> App<S, G> {
    /// Creates a new App instance
    pub fn new(client: TemplateClient<S>, gate: G) -> Self {
        Self { client, gate }
    }

    /// Returns the template client
    pub fn client(&self) -> &TemplateClient<S> {
        &self.client
    }

    /// Runs a command and returns its rendered output
    pub async fn run(&self, command: &Command) -> Result<String, AppError> {
        match command {
            Command::Categories => Ok(render_categories()),
            Command::List { category, count, view } => {
                let category = validate_category(*category)?;
                let view = ViewConfig::from_args(view)?;
                self.list(category, *count, &view).await
            }
            Command::Search { query, view } => {
                let view = ViewConfig::from_args(view)?;
                self.search(&query.join(" "), &view).await
            }
            Command::Show { web_id } => self.show(web_id).await,
            Command::Prefetch { count } => Ok(self.prefetch(*count).await),
            Command::Cache { action } => Ok(self.cache(action)),
        }
    }

    async fn list(&self, category: u64, count: u32, view: &ViewConfig) -> Result<String, AppError> {
        let page = self.client.get_collection_templates(category, count).await?;

        let heading = get_category_by_id(category)
            .map(|c| format!("{} {}", c.emoji, c.display_name))
            .unwrap_or_else(|| "Templates".to_string());

        render_page(&heading, page, view)
    }

    async fn search(&self, query: &str, view: &ViewConfig) -> Result<String, AppError> {
        // Blank queries never reach the gate
        if query.trim().is_empty() {
            return Err(CliError::EmptyQuery.into());
        }
        if !gated_search(&self.gate).await {
            return Err(AppError::SearchBlocked);
        }

        let page = self.client.search_templates(query).await?;
        render_page(&format!("Results for \"{}\"", query.trim()), page, view)
    }

    async fn show(&self, web_id: &str) -> Result<String, AppError> {
        self.gate.show_interstitial().await;

        let template = find_template(&self.client, web_id)
            .await
            .ok_or_else(|| AppError::NotFound(web_id.to_string()))?;

        let mut out = render_detail(&template);
        match unlock_links(&self.gate, &template).await {
            Some(links) => {
                let _ = writeln!(out, "Open in app:  {}", links.app_url);
                let _ = writeln!(out, "Open on web:  {}", links.web_url);
            }
            None => {
                let _ = writeln!(out, "Watch an ad to completion to unlock the template links.");
            }
        }
        Ok(out)
    }

    async fn prefetch(&self, count: u32) -> String {
        let categories = all_categories();
        let results = join_all(
            categories
                .iter()
                .map(|c| self.client.get_collection_templates(c.id, count)),
        )
        .await;

        let mut loaded = 0;
        let mut templates = 0;
        for (category, result) in categories.iter().zip(results) {
            match result {
                Ok(page) => {
                    loaded += 1;
                    templates += page.templates.len();
                }
                Err(e) => warn!(category = category.id, error = %e, "Prefetch failed"),
            }
        }

        info!(loaded, templates, "Prefetch finished");
        format!(
            "Fetched {}/{} categories ({} templates)\n",
            loaded,
            categories.len(),
            templates
        )
    }

    fn cache(&self, action: &CacheAction) -> String {
        match action {
            CacheAction::Clear => {
                self.client.cache().clear();
                "Cache cleared\n".to_string()
            }
            CacheAction::Remove { key } => {
                self.client.cache().remove(key);
                format!("Removed {}\n", key)
            }
        }
    }
}

fn render_categories() -> String {
    let mut out = String::new();
    for category in all_categories() {
        let _ = writeln!(out, "{:>6}  {} {}", category.id, category.emoji, category.display_name);
    }
    out
}

/// Renders a page after applying the view's filter, sort and limit
fn render_page(heading: &str, page: TemplatePage, view: &ViewConfig) -> Result<String, AppError> {
    let is_error = page.is_error();
    let errmsg = page.errmsg.clone();
    let total = page.total;

    let mut templates = arrange(page.templates, &view.filter, view.sort);
    if let Some(limit) = view.limit {
        templates.truncate(limit);
    }

    if view.json {
        let mut json = serde_json::to_string_pretty(&templates)?;
        json.push('\n');
        return Ok(json);
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", heading);

    if templates.is_empty() {
        if is_error {
            let _ = writeln!(out, "No templates found ({})", errmsg);
        } else {
            let _ = writeln!(out, "No templates found");
        }
        return Ok(out);
    }

    let _ = writeln!(out, "Showing {} of {} templates\n", templates.len(), total.max(templates.len() as u64));
    for template in &templates {
        let _ = writeln!(out, "{}", render_row(template));
    }
    Ok(out)
}

fn render_row(template: &Template) -> String {
    format!(
        "{:<20}  {:<40}  {}  {:>7} uses  {:>7} likes",
        template.web_id,
        truncate(template.display_title(), 40),
        format_duration(template.duration),
        format_usage(template.usage_amount),
        format_usage(template.like_count),
    )
}

fn render_detail(template: &Template) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", template.display_title());
    let _ = writeln!(out, "by {} (@{})", template.author.name, template.author.unique_id);
    let _ = writeln!(out);
    let _ = writeln!(out, "Duration:   {}", format_duration(template.duration));
    let _ = writeln!(out, "Clips:      {}", template.fragment_count);
    let _ = writeln!(out, "Uses:       {}", format_usage(template.usage_amount));
    let _ = writeln!(out, "Plays:      {}", format_usage(template.play_amount));
    let _ = writeln!(out, "Likes:      {}", format_usage(template.like_count));
    let _ = writeln!(out, "Favorites:  {}", format_usage(template.favorite_count));
    if let Some(seg) = &template.draft_seg_info {
        let _ = writeln!(
            out,
            "Segments:   {} video, {} text",
            seg.video_seg_len, seg.text_seg_len
        );
    }
    let _ = writeln!(out, "Cover:      {}", template.cover_url);
    if let Some(cover) = template.video_dynamic_cover.as_ref().filter(|c| !c.url.is_empty()) {
        let _ = writeln!(out, "Preview:    {}", cover.url);
    }
    let _ = writeln!(out);
    out
}

/// Shortens `s` to at most `max` characters, marking the cut with an ellipsis
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut cut: String = s.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
