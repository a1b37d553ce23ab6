//! Regulation and paperwork guides.

use crate::data::Item;
use crate::views::markup::escape;
use crate::views::templates::sections::{self, SectionMarker};
use crate::views::templates::{GuideRenderer, RenderContext};

const NOTICE_HEADING: &str = "Important Legal Notice";
const DEFAULT_DISCLAIMER: &str = "This guide is provided for informational purposes only and should not be considered legal advice. Regulations change frequently. Always verify current requirements with official government sources before making any decisions.";
const SHORT_DISCLAIMER: &str =
    "This guide is provided for informational purposes only. Always verify with official sources.";

/// Disclaimer first, then numbered key-information sections.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegalTemplate;

impl GuideRenderer for LegalTemplate {
    fn render(&self, guide: &Item, cx: &RenderContext) -> String {
        let category = sections::category(guide, "legal");
        let jurisdiction = guide
            .str_field("jurisdiction")
            .filter(|j| !j.is_empty())
            .unwrap_or("Europe");
        let (notes, regular) = sections::partition_tips(sections::tips(guide, cx), &["warning", "danger"]);

        let mut badges = sections::category_badge("badge-legal", category);
        badges.push_str(&sections::badge("badge-jurisdiction", &format!("🌍 {jurisdiction}")));

        let mut html = sections::open(guide, cx, "legal-guide", &badges);
        let intro = if notes.is_empty() {
            DEFAULT_DISCLAIMER
        } else {
            SHORT_DISCLAIMER
        };
        html.push_str(&sections::notice("legal-disclaimer", "⚠️", NOTICE_HEADING, Some(intro), &notes, cx));

        let updated = guide
            .str_field("lastUpdated")
            .filter(|d| !d.is_empty())
            .map(|d| format!(r#"<p class="last-updated">Last verified: {}</p>"#, escape(d)))
            .unwrap_or_default();
        html.push_str(&sections::title_block(guide, cx, "legal", "⚖️", &updated));
        html.push_str(&sections::content_sections(
            guide,
            cx,
            "legal-section",
            "📖 Key Information",
            SectionMarker::Numbered,
        ));
        html.push_str(&sections::tip_list("legal", "💡 Helpful Tips", &regular, cx));
        html.push_str(&sections::extra_info(guide, cx));
        html.push_str(&sections::references(guide));
        html.push_str(&sections::close(guide, "legal", category));
        html
    }
}
