//! Lifestyle and destination guides. Also the fallback for categories the
//! other templates do not claim.

use crate::data::Item;
use crate::views::markup::escape;
use crate::views::templates::sections::{self, SectionMarker};
use crate::views::templates::{GuideRenderer, RenderContext};

const SECTION_ICONS: &[&str] = &["🎯", "📍", "🛣️", "🏕️", "🍽️", "🎭", "📸", "🛒"];

#[derive(Debug, Clone, Copy, Default)]
pub struct TravelTemplate;

impl GuideRenderer for TravelTemplate {
    fn render(&self, guide: &Item, cx: &RenderContext) -> String {
        let category = sections::category(guide, "travel-tips");
        let all_tips = sections::tips(guide, cx);
        let safety: Vec<_> = all_tips
            .iter()
            .filter(|t| t.is_one_of(&["warning", "danger", "safety"]))
            .cloned()
            .collect();
        let cultural: Vec<_> = all_tips
            .iter()
            .filter(|t| t.is_one_of(&["tip", "info"]))
            .cloned()
            .collect();

        let mut badges = sections::category_badge("badge-travel", category);
        if let Some(region) = guide.str_field("region").filter(|r| !r.is_empty()) {
            badges.push_str(&sections::badge("badge-region", &format!("📍 {region}")));
        }

        let season = guide
            .str_field("bestSeason")
            .filter(|s| !s.is_empty())
            .map(|s| format!(r#"<p class="best-season">Best season: {}</p>"#, escape(s)))
            .unwrap_or_default();

        let mut html = sections::open(guide, cx, "travel-guide", &badges);
        html.push_str(&sections::title_block(guide, cx, "travel", icon(category), &season));
        if !safety.is_empty() {
            html.push_str(&sections::notice("safety-notes", "🛡️", "Safety Information", None, &safety, cx));
        }
        html.push_str(&sections::content_sections(
            guide,
            cx,
            "travel-section",
            "📖 Guide Details",
            SectionMarker::Icons(SECTION_ICONS),
        ));
        html.push_str(&sections::tip_list("cultural", "💡 Local Insights", &cultural, cx));
        html.push_str(&sections::extra_info(guide, cx));
        html.push_str(&sections::references(guide));
        html.push_str(&sections::close(guide, "travel", category));
        html
    }
}

fn icon(category: &str) -> &'static str {
    match category {
        "travel-tips" => "🗺️",
        "lifestyle" => "🏡",
        "safety" => "🛡️",
        "family-travel" => "👨‍👩‍👧‍👦",
        "community" => "🤝",
        "educational" => "📚",
        "shopping" => "🛒",
        "cooking" | "cooking-equipment" => "🍳",
        _ => "✈️",
    }
}
