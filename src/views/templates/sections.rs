//! Building blocks shared by the guide templates.
//!
//! Every builder escapes the text it takes from the guide. Builders for
//! optional sections return an empty string when there is nothing to show.

use serde_json::Value;

use crate::data::Item;
use crate::views::markup::{escape, humanize, scalar};
use crate::views::templates::RenderContext;

/// A guide tip with its text already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tip<'a> {
    pub kind: Option<&'a str>,
    pub text: String,
}

impl Tip<'_> {
    pub fn is_one_of(&self, kinds: &[&str]) -> bool {
        self.kind.is_some_and(|kind| kinds.contains(&kind))
    }
}

/// The guide's `tips` array, resolved in the context language.
pub fn tips<'a>(guide: &'a Item, cx: &RenderContext) -> Vec<Tip<'a>> {
    guide
        .list("tips")
        .iter()
        .map(|tip| Tip {
            kind: tip.get("type").and_then(Value::as_str),
            text: cx.text(tip.get("text")),
        })
        .collect()
}

/// Split tips into those whose type is in `kinds` and the rest.
pub fn partition_tips<'a>(tips: Vec<Tip<'a>>, kinds: &[&str]) -> (Vec<Tip<'a>>, Vec<Tip<'a>>) {
    tips.into_iter().partition(|tip| tip.is_one_of(kinds))
}

/// The guide's category, or `fallback` when missing.
pub fn category<'a>(guide: &'a Item, fallback: &'a str) -> &'a str {
    guide
        .str_field("category")
        .filter(|c| !c.is_empty())
        .unwrap_or(fallback)
}

/// Opening container plus the back link, language toggle and badge row.
/// `badges` is markup and is inserted as is.
pub fn open(guide: &Item, cx: &RenderContext, template_class: &str, badges: &str) -> String {
    let (arrow, back) = if cx.is_rtl() {
        ("→", "חזרה למדריכים")
    } else {
        ("←", "Back to Guides")
    };
    format!(
        r##"<div class="guide-detail-container {template_class}" dir="{dir}"><div class="guide-detail-header"><a href="#guides" class="back-link"><span class="back-arrow">{arrow}</span> {back}</a><div class="guide-badges">{toggle}{badges}</div></div>"##,
        dir = cx.dir(),
        toggle = language_toggle(guide, cx),
    )
}

/// Link to the same guide in the other language.
pub fn language_toggle(guide: &Item, cx: &RenderContext) -> String {
    let target = cx.language.other();
    let label = match target {
        crate::data::Language::En => "EN 🇬🇧",
        crate::data::Language::He => "עב 🇮🇱",
    };
    format!(
        r##"<a href="#guide/{}?lang={}" class="lang-toggle">{label}</a>"##,
        escape(&guide.id),
        target.code(),
    )
}

pub fn badge(class: &str, text: &str) -> String {
    format!(r#"<span class="badge {class}">{}</span>"#, escape(text))
}

pub fn category_badge(class: &str, category: &str) -> String {
    badge(class, &humanize(category))
}

/// Title block at the top of the article. `extra` is markup.
pub fn title_block(guide: &Item, cx: &RenderContext, prefix: &str, icon: &str, extra: &str) -> String {
    format!(
        r#"<article class="guide-article"><header class="guide-title-section {prefix}-header"><div class="{prefix}-icon">{icon}</div><h1 class="guide-title">{}</h1><p class="guide-summary">{}</p>{extra}</header>"#,
        escape(&cx.text(guide.field("title"))),
        escape(&cx.text(guide.field("summary"))),
    )
}

/// Highlighted box listing tips, such as safety warnings or disclaimers.
pub fn notice(prefix: &str, icon: &str, heading: &str, intro: Option<&str>, items: &[Tip<'_>], cx: &RenderContext) -> String {
    let intro = intro
        .map(|text| format!(r#"<p class="disclaimer-text">{}</p>"#, escape(text)))
        .unwrap_or_default();
    let entries: String = items
        .iter()
        .map(|tip| {
            format!(
                r#"<div class="{prefix}-item"><span>{}</span><span>{}</span></div>"#,
                cx.tip_icon(tip.kind),
                escape(&tip.text),
            )
        })
        .collect();
    let list = if entries.is_empty() {
        String::new()
    } else {
        format!(r#"<div class="{prefix}-items">{entries}</div>"#)
    };
    format!(
        r#"<div class="{prefix}"><div class="{prefix}-header"><span class="{prefix}-icon">{icon}</span><h3>{}</h3></div>{intro}{list}</div>"#,
        escape(heading),
    )
}

/// How a content section is marked in its card header.
#[derive(Debug, Clone, Copy)]
pub enum SectionMarker {
    /// `step` field, else the 1-based position.
    Numbered,
    /// Icons cycled by position.
    Icons(&'static [&'static str]),
}

/// The guide's `content` array as a list of cards. Empty when no content.
pub fn content_sections(guide: &Item, cx: &RenderContext, prefix: &str, heading: &str, marker: SectionMarker) -> String {
    let content = guide.list("content");
    if content.is_empty() {
        return String::new();
    }
    let cards: String = content
        .iter()
        .enumerate()
        .map(|(index, section)| {
            let mark = match marker {
                SectionMarker::Numbered => escape(&scalar(section.get("step"), &(index + 1).to_string())),
                SectionMarker::Icons(icons) => icons[index % icons.len()].to_string(),
            };
            format!(
                r#"<div class="{prefix}-card"><div class="{prefix}-card-header"><span class="{prefix}-marker">{mark}</span><span class="{prefix}-card-title">{}</span></div><div class="{prefix}-card-body">{}</div></div>"#,
                escape(&cx.text(section.get("title"))),
                escape(&cx.text(section.get("description"))),
            )
        })
        .collect();
    format!(r#"<div class="{prefix}-sections"><h2>{heading}</h2><div class="sections-list">{cards}</div></div>"#)
}

/// Tips as a titled list. Empty when no tips.
pub fn tip_list(prefix: &str, heading: &str, items: &[Tip<'_>], cx: &RenderContext) -> String {
    if items.is_empty() {
        return String::new();
    }
    let entries: String = items
        .iter()
        .map(|tip| {
            format!(
                r#"<div class="{prefix}-tip-item"><span class="{prefix}-tip-icon">{}</span><span class="{prefix}-tip-text">{}</span></div>"#,
                cx.tip_icon(tip.kind),
                escape(&tip.text),
            )
        })
        .collect();
    format!(r#"<div class="{prefix}-tips-section"><h2>{heading}</h2><div class="{prefix}-tips-list">{entries}</div></div>"#)
}

/// `extra_info` as escaped text. Empty when missing.
pub fn extra_info(guide: &Item, cx: &RenderContext) -> String {
    let text = cx.text(guide.field("extra_info"));
    if text.is_empty() {
        return String::new();
    }
    format!(
        r#"<div class="extra-info-section"><h2>📚 Additional Information</h2><div class="extra-info-content">{}</div></div>"#,
        escape(&text)
    )
}

fn reference_group(kind: &str) -> (&'static str, String) {
    match kind {
        "official" => ("🏢", "🏢 Official Resources".into()),
        "purchase" => ("🛒", "🛒 Where to Buy".into()),
        "info" => ("ℹ️", "ℹ️ Useful Links".into()),
        "appstore" => ("📱", "📱 Apps".into()),
        "video" => ("🎬", "🎬 Videos".into()),
        "technical" => ("🔧", "🔧 Technical Resources".into()),
        "government" => ("🏛️", "🏛️ Government Resources".into()),
        "insurance" => ("🛡️", "🛡️ Insurance".into()),
        other => ("🔗", escape(other)),
    }
}

/// `references` grouped by `type` in first-seen order. Empty when none.
pub fn references(guide: &Item) -> String {
    let mut groups: Vec<(&str, Vec<&Value>)> = Vec::new();
    for reference in guide.list("references") {
        let kind = reference
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("info");
        match groups.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, refs)) => refs.push(reference),
            None => groups.push((kind, vec![reference])),
        }
    }
    if groups.is_empty() {
        return String::new();
    }

    let mut out = String::from(r#"<div class="references-section"><h2>🔗 References &amp; Links</h2><div class="references-grid">"#);
    for (kind, refs) in groups {
        let (icon, label) = reference_group(kind);
        out.push_str(&format!(r#"<div class="reference-group"><h3>{label}</h3><div class="reference-list">"#));
        for reference in refs {
            let url = reference.get("url").and_then(Value::as_str).unwrap_or("#");
            let name = reference.get("name").and_then(Value::as_str).unwrap_or(url);
            out.push_str(&format!(
                r#"<a href="{}" target="_blank" rel="noopener noreferrer" class="reference-item"><span class="reference-icon">{icon}</span><span class="reference-name">{}</span><span class="reference-external">↗</span></a>"#,
                escape(url),
                escape(name),
            ));
        }
        out.push_str("</div></div>");
    }
    out.push_str("</div></div>");
    out
}

/// Footer with id and category, closing the article and container.
pub fn close(guide: &Item, prefix: &str, category: &str) -> String {
    format!(
        r##"<div class="{prefix}-footer"><div class="footer-meta"><div class="footer-meta-item"><span class="footer-meta-label">Guide ID</span><span class="footer-meta-value">{}</span></div><div class="footer-meta-item"><span class="footer-meta-label">Category</span><span class="footer-meta-value">{}</span></div></div><a href="#guides" class="btn btn-outline">← Back to All Guides</a></div></article></div>"##,
        escape(&guide.id),
        escape(&humanize(category)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Language;
    use serde_json::json;

    fn guide(value: Value) -> Item {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_language_toggle_targets_other_language() {
        let g = guide(json!({"id": "g1"}));
        let en = language_toggle(&g, &RenderContext::new(Language::En));
        assert!(en.contains("#guide/g1?lang=he"));
        let he = language_toggle(&g, &RenderContext::new(Language::He));
        assert!(he.contains("#guide/g1?lang=en"));
    }

    #[test]
    fn test_open_sets_direction() {
        let g = guide(json!({"id": "g1"}));
        let html = open(&g, &RenderContext::new(Language::He), "travel-guide", "");
        assert!(html.contains(r#"dir="rtl""#));
        assert!(html.contains("חזרה למדריכים"));
    }

    #[test]
    fn test_tips_partition() {
        let g = guide(json!({"id": "g1", "tips": [
            {"type": "warning", "text": "Hot"},
            {"type": "tip", "text": {"en": "Use gloves"}},
            {"text": "No type"}
        ]}));
        let cx = RenderContext::default();
        let (warnings, rest) = partition_tips(tips(&g, &cx), &["warning", "danger"]);
        assert_eq!(warnings.len(), 1);
        assert_eq!(rest.len(), 2);
        assert_eq!(rest[0].text, "Use gloves");
    }

    #[test]
    fn test_numbered_sections_use_step_field() {
        let g = guide(json!({"id": "g1", "content": [
            {"step": 3, "title": "Check", "description": "Look"},
            {"title": "Fix"}
        ]}));
        let html = content_sections(&g, &RenderContext::default(), "step", "Steps", SectionMarker::Numbered);
        assert!(html.contains(r#"<span class="step-marker">3</span>"#));
        assert!(html.contains(r#"<span class="step-marker">2</span>"#));
    }

    #[test]
    fn test_empty_sections_render_nothing() {
        let g = guide(json!({"id": "g1"}));
        let cx = RenderContext::default();
        assert!(content_sections(&g, &cx, "x", "X", SectionMarker::Numbered).is_empty());
        assert!(tip_list("x", "X", &[], &cx).is_empty());
        assert!(extra_info(&g, &cx).is_empty());
        assert!(references(&g).is_empty());
    }

    #[test]
    fn test_references_grouped_in_order() {
        let g = guide(json!({"id": "g1", "references": [
            {"type": "video", "url": "https://v.example/1", "name": "Clip"},
            {"url": "https://i.example", "name": "Info"},
            {"type": "video", "url": "https://v.example/2", "name": "Clip 2"}
        ]}));
        let html = references(&g);
        let videos = html.find("🎬 Videos").unwrap();
        let info = html.find("ℹ️ Useful Links").unwrap();
        assert!(videos < info);
        assert_eq!(html.matches("reference-item").count(), 3);
    }

    #[test]
    fn test_extra_info_escaped() {
        let g = guide(json!({"id": "g1", "extra_info": "<script>x</script>"}));
        let html = extra_info(&g, &RenderContext::default());
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
