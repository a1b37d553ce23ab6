//! Maintenance and systems guides.

use crate::data::Item;
use crate::views::markup::escape;
use crate::views::templates::sections::{self, SectionMarker};
use crate::views::templates::{GuideRenderer, RenderContext};

const SAFETY_KINDS: &[&str] = &["warning", "danger", "safety"];

/// Safety banner first, then tools, numbered steps and pro tips.
#[derive(Debug, Clone, Copy, Default)]
pub struct TechnicalTemplate;

impl GuideRenderer for TechnicalTemplate {
    fn render(&self, guide: &Item, cx: &RenderContext) -> String {
        let category = sections::category(guide, "maintenance");
        let difficulty = guide.str_field("difficulty").unwrap_or("intermediate");
        let (warnings, regular) = sections::partition_tips(sections::tips(guide, cx), SAFETY_KINDS);

        let mut badges = sections::category_badge("badge-technical", category);
        badges.push_str(&sections::badge(cx.difficulty_class(difficulty), &cx.difficulty_label(difficulty)));
        if let Some(time) = guide.str_field("estimatedTime").filter(|t| !t.is_empty()) {
            badges.push_str(&sections::badge("badge-time", &format!("⏱️ {time}")));
        }

        let mut html = sections::open(guide, cx, "technical-guide", &badges);
        if !warnings.is_empty() {
            html.push_str(&sections::notice(
                "safety-banner",
                "⚠️",
                "Safety First - Read Before Starting",
                None,
                &warnings,
                cx,
            ));
        }
        html.push_str(&sections::title_block(guide, cx, "technical", "🔧", &safety_level(guide)));
        html.push_str(&tools(guide, cx));
        html.push_str(&sections::content_sections(
            guide,
            cx,
            "step",
            "📋 Step-by-Step Instructions",
            SectionMarker::Numbered,
        ));
        html.push_str(&sections::tip_list("pro", "💡 Pro Tips", &regular, cx));
        html.push_str(&sections::extra_info(guide, cx));
        html.push_str(&sections::references(guide));
        html.push_str(&sections::close(guide, "technical", category));
        html
    }
}

fn safety_level(guide: &Item) -> String {
    let level = guide.str_field("safetyLevel").unwrap_or("medium");
    format!(r#"<p class="safety-level">Safety level: {}</p>"#, escape(level))
}

fn tools(guide: &Item, cx: &RenderContext) -> String {
    let tools = guide.list("tools");
    if tools.is_empty() {
        return r#"<div class="tools-placeholder"><span>🧰</span><span>Tools and materials will vary based on your specific vehicle and setup. Check manufacturer recommendations.</span></div>"#.to_string();
    }
    let items: String = tools
        .iter()
        .map(|tool| {
            format!(
                r#"<div class="tool-item"><span class="tool-icon">🔧</span><span>{}</span></div>"#,
                escape(&cx.text(Some(tool)))
            )
        })
        .collect();
    format!(r#"<div class="tools-section"><h2>🧰 Tools &amp; Materials Needed</h2><div class="tools-grid">{items}</div></div>"#)
}
