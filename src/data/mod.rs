//! Core data models for the template catalog
//!
//! This module contains the template records returned by the upstream APIs,
//! the normalized page shape the rest of the crate consumes, and the static
//! category list.

pub mod categories;
pub mod client;

pub use categories::{all_categories, get_category_by_id, Category, DEFAULT_CATEGORY_ID};
pub use client::{collection_key, search_key, FetchError, TemplateClient, DEFAULT_COLLECTION_COUNT};

use serde::{Deserialize, Deserializer, Serialize};

/// Decodes an explicit JSON `null` as the field's default value
///
/// The upstream sends `null` for counters and strings it has no value for.
/// Missing fields are already covered by `#[serde(default)]`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The creator of a template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    #[serde(deserialize_with = "null_as_default")]
    pub uid: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub web_uid: String,
    #[serde(deserialize_with = "null_as_default")]
    pub unique_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub avatar_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
}

/// Animated preview shown in place of the static cover
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoDynamicCover {
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub width: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub height: u32,
}

/// Segment counts of the template's draft
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftSegInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub text_seg_len: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub video_seg_len: u32,
}

/// A single video template as returned by either endpoint
///
/// Fields missing from the upstream payload, or sent as `null`, decode to
/// their defaults, so a partially filled record never fails a whole page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Template {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    /// Natural key used for lookup and deduplication
    #[serde(deserialize_with = "null_as_default")]
    pub web_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub short_title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub author: Author,
    #[serde(deserialize_with = "null_as_default")]
    pub cover_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub cover_width: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub cover_height: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub video_url: String,
    /// Length in milliseconds
    #[serde(deserialize_with = "null_as_default")]
    pub duration: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub template_url: String,
    /// Number of clips the user fills in
    #[serde(deserialize_with = "null_as_default")]
    pub fragment_count: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub usage_amount: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub play_amount: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub like_count: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub favorite_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_dynamic_cover: Option<VideoDynamicCover>,
    /// Creation time in epoch seconds
    #[serde(deserialize_with = "null_as_default")]
    pub create_time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft_seg_info: Option<DraftSegInfo>,
}

impl Template {
    /// Title to display, falling back to the short title
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.short_title
        } else {
            &self.title
        }
    }

    /// Whether an animated preview is available
    pub fn has_preview(&self) -> bool {
        self.video_dynamic_cover
            .as_ref()
            .is_some_and(|cover| !cover.url.is_empty())
    }
}

/// A page of templates with one canonical list field
///
/// Both endpoints are normalized into this shape before anything is cached
/// or handed to callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatePage {
    /// Upstream status marker; `"error"` for locally synthesized failures
    pub ret: String,
    /// Upstream message, if any
    pub errmsg: String,
    /// Total number of templates the upstream reports
    pub total: u64,
    /// The templates, in upstream order
    pub templates: Vec<Template>,
    /// Whether the upstream has more results beyond this page
    pub has_more: bool,
}

impl TemplatePage {
    /// Marker placed in `ret` for locally synthesized failures
    pub const ERROR_RET: &'static str = "error";

    /// Empty page returned when a search response lacks a templates list
    pub fn malformed() -> Self {
        Self {
            ret: Self::ERROR_RET.to_string(),
            errmsg: "Invalid response structure".to_string(),
            total: 0,
            templates: Vec::new(),
            has_more: false,
        }
    }

    /// Whether this page carries the local error marker
    pub fn is_error(&self) -> bool {
        self.ret == Self::ERROR_RET
    }

    /// Whether the page holds no templates
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_decodes_full_record() {
        let json = r#"{
            "id": 7301234567890123456,
            "web_id": "7301234567890123456",
            "title": "Summer vibes",
            "short_title": "Summer",
            "author": {
                "uid": 42,
                "web_uid": "w42",
                "unique_id": "editor42",
                "name": "Editor",
                "avatar_url": "https://example.com/a.png",
                "description": ""
            },
            "cover_url": "https://example.com/c.jpg",
            "cover_width": 720,
            "cover_height": 1280,
            "video_url": "https://example.com/v.mp4",
            "duration": 15300,
            "template_url": "https://example.com/t",
            "fragment_count": 8,
            "usage_amount": 120500,
            "play_amount": 900000,
            "like_count": 3400,
            "favorite_count": 210,
            "video_dynamic_cover": {"url": "https://example.com/d.mp4", "width": 360, "height": 640},
            "create_time": 1700000000,
            "draft_seg_info": {"text_seg_len": 2, "video_seg_len": 8}
        }"#;

        let template: Template = serde_json::from_str(json).unwrap();

        assert_eq!(template.id, 7301234567890123456);
        assert_eq!(template.author.name, "Editor");
        assert_eq!(template.duration, 15300);
        assert!(template.has_preview());
        assert_eq!(template.draft_seg_info.unwrap().video_seg_len, 8);
    }

    #[test]
    fn test_template_defaults_missing_fields() {
        let template: Template = serde_json::from_str(r#"{"web_id": "abc"}"#).unwrap();

        assert_eq!(template.web_id, "abc");
        assert_eq!(template.usage_amount, 0);
        assert!(template.video_dynamic_cover.is_none());
        assert!(!template.has_preview());
    }

    #[test]
    fn test_template_treats_null_fields_as_defaults() {
        let json = r#"{
            "web_id": "abc",
            "title": null,
            "short_title": "Short",
            "usage_amount": null,
            "create_time": null,
            "author": {"name": null, "uid": 7},
            "video_dynamic_cover": null,
            "draft_seg_info": {"text_seg_len": null, "video_seg_len": 3}
        }"#;

        let template: Template = serde_json::from_str(json).unwrap();

        assert_eq!(template.web_id, "abc");
        assert_eq!(template.display_title(), "Short");
        assert_eq!(template.usage_amount, 0);
        assert_eq!(template.create_time, 0);
        assert_eq!(template.author.name, "");
        assert_eq!(template.author.uid, 7);
        assert!(template.video_dynamic_cover.is_none());
        assert_eq!(template.draft_seg_info.unwrap().text_seg_len, 0);

        let template: Template = serde_json::from_str(r#"{"web_id": "def", "author": null}"#).unwrap();
        assert_eq!(template.author, Author::default());
    }

    #[test]
    fn test_display_title_falls_back_to_short_title() {
        let template = Template {
            title: "  ".to_string(),
            short_title: "Short".to_string(),
            ..Default::default()
        };
        assert_eq!(template.display_title(), "Short");
    }

    #[test]
    fn test_malformed_page() {
        let page = TemplatePage::malformed();
        assert!(page.is_error());
        assert!(page.is_empty());
        assert_eq!(page.total, 0);
        assert!(!page.has_more);
    }
}
