//! Static list of template collections
//!
//! Each category maps to an upstream collection id that can be passed to the
//! collection endpoint.

use serde::Serialize;

/// Collection shown when no category is selected
pub const DEFAULT_CATEGORY_ID: u64 = 6001;

/// A browsable template collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Upstream collection id
    pub id: u64,
    /// Human-readable name
    pub display_name: &'static str,
    pub emoji: &'static str,
}

/// Static array of all browsable collections, in display order
pub static CATEGORIES: [Category; 22] = [
    Category { id: 6001, display_name: "For You", emoji: "✨" },
    Category { id: 6003, display_name: "TikTok", emoji: "🎵" },
    Category { id: 6011, display_name: "Lifestyle", emoji: "🌟" },
    Category { id: 4010, display_name: "Business", emoji: "💼" },
    Category { id: 6086, display_name: "Student", emoji: "📚" },
    Category { id: 6008, display_name: "Velocity", emoji: "⚡" },
    Category { id: 6007, display_name: "Lyrics", emoji: "🎤" },
    Category { id: 6019, display_name: "Fitness", emoji: "💪" },
    Category { id: 6010, display_name: "Memes", emoji: "😂" },
    Category { id: 6002, display_name: "Effects", emoji: "✨" },
    Category { id: 6004, display_name: "Celebrate", emoji: "🎉" },
    Category { id: 6005, display_name: "Fandom", emoji: "💜" },
    Category { id: 6080, display_name: "Editor's Picks", emoji: "🏆" },
    Category { id: 6029, display_name: "Gaming", emoji: "🎮" },
    Category { id: 6104, display_name: "Daily VLOG", emoji: "📹" },
    Category { id: 6105, display_name: "Travel VLOG", emoji: "✈️" },
    Category { id: 6107, display_name: "Collage", emoji: "🖼️" },
    Category { id: 6108, display_name: "Slideshow", emoji: "📸" },
    Category { id: 6113, display_name: "Hot", emoji: "🔥" },
    Category { id: 6094, display_name: "AI Filter", emoji: "🤖" },
    Category { id: 6038, display_name: "Aesthetic", emoji: "🌸" },
    Category { id: 6009, display_name: "Friends", emoji: "👯" },
];

/// Returns all categories in display order
pub fn all_categories() -> &'static [Category] {
    &CATEGORIES
}

/// Looks up a category by its collection id
pub fn get_category_by_id(id: u64) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.id == id)
}
