//! Client-side browsing helpers for template listings.
//!
//! Sorting, filtering and deduplication run on already-fetched pages. This
//! module also holds the display formatters and the cross-category detail
//! lookup.

use serde::Serialize;
use tracing::warn;

use crate::cache::KvStore;
use crate::data::{all_categories, Template, TemplateClient, DEFAULT_COLLECTION_COUNT};

/// Ordering applied to a listing before display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Keep upstream order
    #[default]
    Default,
    /// Highest usage first
    MostUsed,
    /// Highest like count first
    MostLiked,
    /// Most recently created first
    Newest,
    /// Shortest duration first
    Shortest,
    /// Longest duration first
    Longest,
}

impl SortOrder {
    /// Returns a slice containing all sort orders.
    pub fn all() -> &'static [SortOrder] {
        &[
            SortOrder::Default,
            SortOrder::MostUsed,
            SortOrder::MostLiked,
            SortOrder::Newest,
            SortOrder::Shortest,
            SortOrder::Longest,
        ]
    }

    /// Returns a human-readable label for the sort order.
    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Default => "Default",
            SortOrder::MostUsed => "Most used",
            SortOrder::MostLiked => "Most liked",
            SortOrder::Newest => "Newest",
            SortOrder::Shortest => "Shortest",
            SortOrder::Longest => "Longest",
        }
    }

    /// Parses user input into a SortOrder.
    ///
    /// Matching is case-insensitive and supports aliases:
    /// - "default" | "none" -> Default
    /// - "used" | "usage" | "popular" -> MostUsed
    /// - "liked" | "likes" -> MostLiked
    /// - "new" | "newest" | "recent" -> Newest
    /// - "short" | "shortest" -> Shortest
    /// - "long" | "longest" -> Longest
    ///
    /// Returns `None` if the input doesn't match any order.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<SortOrder> {
        match s.to_lowercase().trim() {
            "default" | "none" => Some(SortOrder::Default),
            "used" | "usage" | "popular" => Some(SortOrder::MostUsed),
            "liked" | "likes" => Some(SortOrder::MostLiked),
            "new" | "newest" | "recent" => Some(SortOrder::Newest),
            "short" | "shortest" => Some(SortOrder::Shortest),
            "long" | "longest" => Some(SortOrder::Longest),
            _ => None,
        }
    }
}

/// Criteria a template must meet to be shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateFilter {
    /// Maximum duration in seconds
    pub max_duration_secs: Option<u64>,
    /// Maximum number of clips to fill in
    pub max_clips: Option<u32>,
    /// Only templates with an animated preview
    pub with_preview: bool,
}

impl TemplateFilter {
    /// Whether `template` passes every criterion
    pub fn matches(&self, template: &Template) -> bool {
        if let Some(max_secs) = self.max_duration_secs {
            if template.duration > max_secs.saturating_mul(1000) {
                return false;
            }
        }
        if let Some(max_clips) = self.max_clips {
            if template.fragment_count > max_clips {
                return false;
            }
        }
        !self.with_preview || template.has_preview()
    }
}

/// Removes repeated `web_id`s, keeping the first occurrence.
pub fn dedup_by_web_id(templates: Vec<Template>) -> Vec<Template> {
    let mut seen = std::collections::HashSet::new();
    templates
        .into_iter()
        .filter(|t| seen.insert(t.web_id.clone()))
        .collect()
}

/// Deduplicates, filters and sorts a listing. Sorting is stable.
pub fn arrange(templates: Vec<Template>, filter: &TemplateFilter, order: SortOrder) -> Vec<Template> {
    let mut templates: Vec<Template> = dedup_by_web_id(templates)
        .into_iter()
        .filter(|t| filter.matches(t))
        .collect();

    match order {
        SortOrder::Default => {}
        SortOrder::MostUsed => templates.sort_by(|a, b| b.usage_amount.cmp(&a.usage_amount)),
        SortOrder::MostLiked => templates.sort_by(|a, b| b.like_count.cmp(&a.like_count)),
        SortOrder::Newest => templates.sort_by(|a, b| b.create_time.cmp(&a.create_time)),
        SortOrder::Shortest => templates.sort_by_key(|t| t.duration),
        SortOrder::Longest => templates.sort_by(|a, b| b.duration.cmp(&a.duration)),
    }

    templates
}

/// Formats a usage counter, e.g. `1234` -> `1.2K`.
pub fn format_usage(amount: u64) -> String {
    if amount >= 1000 {
        format!("{:.1}K", amount as f64 / 1000.0)
    } else {
        amount.to_string()
    }
}

/// Formats a duration in milliseconds as `MM:SS`.
pub fn format_duration(ms: u64) -> String {
    let total_seconds = ms / 1000;
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Links that open a template in the editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateLinks {
    /// Deep link handled by the mobile app
    pub app_url: String,
    /// Web page for the template
    pub web_url: String,
}

impl TemplateLinks {
    pub fn for_template(template: &Template) -> Self {
        Self {
            app_url: format!("https://www.capcut.com/t/{}", template.web_id),
            web_url: format!("https://www.capcut.com/template-detail/{}", template.web_id),
        }
    }
}

/// Finds a template by `web_id` by walking every category in display order.
///
/// Lookups go through the client, so categories fetched recently are served
/// from the cache. Categories that fail to load are skipped.
pub async fn find_template<S: KvStore>(client: &TemplateClient<S>, web_id: &str) -> Option<Template> {
    for category in all_categories() {
        match client
            .get_collection_templates(category.id, DEFAULT_COLLECTION_COUNT)
            .await
        {
            Ok(page) => {
                if let Some(found) = page.templates.into_iter().find(|t| t.web_id == web_id) {
                    return Some(found);
                }
            }
            Err(e) => {
                warn!(category = category.id, error = %e, "Failed to load category");
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::VideoDynamicCover;

    fn template(web_id: &str, usage: u64, likes: u64, created: i64, duration: u64) -> Template {
        Template {
            web_id: web_id.to_string(),
            usage_amount: usage,
            like_count: likes,
            create_time: created,
            duration,
            ..Default::default()
        }
    }

    fn ids(templates: &[Template]) -> Vec<&str> {
        templates.iter().map(|t| t.web_id.as_str()).collect()
    }

    fn sample() -> Vec<Template> {
        vec![
            template("a", 10, 300, 100, 30_000),
            template("b", 5_000, 20, 300, 9_000),
            template("c", 700, 1_000, 200, 61_000),
        ]
    }

    #[test]
    fn test_sort_order_aliases() {
        assert_eq!(SortOrder::from_str("popular"), Some(SortOrder::MostUsed));
        assert_eq!(SortOrder::from_str("USAGE"), Some(SortOrder::MostUsed));
        assert_eq!(SortOrder::from_str("likes"), Some(SortOrder::MostLiked));
        assert_eq!(SortOrder::from_str("recent"), Some(SortOrder::Newest));
        assert_eq!(SortOrder::from_str(" short "), Some(SortOrder::Shortest));
        assert_eq!(SortOrder::from_str("long"), Some(SortOrder::Longest));
        assert_eq!(SortOrder::from_str("none"), Some(SortOrder::Default));
        assert_eq!(SortOrder::from_str("random"), None);
    }

    #[test]
    fn test_sort_order_labels_are_distinct() {
        let labels: std::collections::HashSet<_> = SortOrder::all().iter().map(|o| o.label()).collect();
        assert_eq!(labels.len(), SortOrder::all().len());
    }

    #[test]
    fn test_arrange_sort_orders() {
        let filter = TemplateFilter::default();
        assert_eq!(ids(&arrange(sample(), &filter, SortOrder::Default)), vec!["a", "b", "c"]);
        assert_eq!(ids(&arrange(sample(), &filter, SortOrder::MostUsed)), vec!["b", "c", "a"]);
        assert_eq!(ids(&arrange(sample(), &filter, SortOrder::MostLiked)), vec!["c", "a", "b"]);
        assert_eq!(ids(&arrange(sample(), &filter, SortOrder::Newest)), vec!["b", "c", "a"]);
        assert_eq!(ids(&arrange(sample(), &filter, SortOrder::Shortest)), vec!["b", "a", "c"]);
        assert_eq!(ids(&arrange(sample(), &filter, SortOrder::Longest)), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_filter_by_duration_and_clips() {
        let mut templates = sample();
        templates[0].fragment_count = 3;
        templates[1].fragment_count = 12;
        templates[2].fragment_count = 5;

        let filter = TemplateFilter {
            max_duration_secs: Some(30),
            ..Default::default()
        };
        assert_eq!(ids(&arrange(templates.clone(), &filter, SortOrder::Default)), vec!["a", "b"]);

        let filter = TemplateFilter {
            max_clips: Some(5),
            ..Default::default()
        };
        assert_eq!(ids(&arrange(templates, &filter, SortOrder::Default)), vec!["a", "c"]);
    }

    #[test]
    fn test_filter_with_huge_max_duration_keeps_everything() {
        let filter = TemplateFilter {
            max_duration_secs: Some(u64::MAX),
            ..Default::default()
        };
        assert!(filter.matches(&Template::default()));
        assert!(filter.matches(&template("long", 0, 0, 0, u64::MAX)));
    }

    #[test]
    fn test_filter_with_preview() {
        let mut templates = sample();
        templates[1].video_dynamic_cover = Some(VideoDynamicCover {
            url: "https://example.com/p.mp4".to_string(),
            width: 360,
            height: 640,
        });
        let filter = TemplateFilter {
            with_preview: true,
            ..Default::default()
        };
        assert_eq!(ids(&arrange(templates, &filter, SortOrder::Default)), vec!["b"]);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let mut templates = sample();
        let mut dup = template("a", 99_999, 0, 0, 0);
        dup.title = "duplicate".to_string();
        templates.push(dup);

        let deduped = dedup_by_web_id(templates);

        assert_eq!(ids(&deduped), vec!["a", "b", "c"]);
        assert_eq!(deduped[0].usage_amount, 10);
    }

    #[test]
    fn test_format_usage() {
        assert_eq!(format_usage(0), "0");
        assert_eq!(format_usage(999), "999");
        assert_eq!(format_usage(1000), "1.0K");
        assert_eq!(format_usage(1234), "1.2K");
        assert_eq!(format_usage(120_500), "120.5K");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "00:00");
        assert_eq!(format_duration(15_300), "00:15");
        assert_eq!(format_duration(61_000), "01:01");
        assert_eq!(format_duration(3_600_000), "60:00");
    }

    #[test]
    fn test_template_links() {
        let links = TemplateLinks::for_template(&template("7301", 0, 0, 0, 0));
        assert_eq!(links.app_url, "https://www.capcut.com/t/7301");
        assert_eq!(links.web_url, "https://www.capcut.com/template-detail/7301");
    }
}
