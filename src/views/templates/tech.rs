//! Technology and connectivity guides.

use serde_json::Value;

use crate::data::Item;
use crate::views::markup::{escape, scalar};
use crate::views::templates::sections::{self, SectionMarker};
use crate::views::templates::{GuideRenderer, RenderContext};

/// Compatibility notes, quick specs and products ahead of the sections.
#[derive(Debug, Clone, Copy, Default)]
pub struct TechTemplate;

impl GuideRenderer for TechTemplate {
    fn render(&self, guide: &Item, cx: &RenderContext) -> String {
        let category = sections::category(guide, "technology");
        let (notes, tips) =
            sections::partition_tips(sections::tips(guide, cx), &["warning", "compatibility"]);

        let badges = sections::category_badge("badge-tech", category);
        let mut html = sections::open(guide, cx, "tech-guide", &badges);
        html.push_str(&sections::title_block(guide, cx, "tech", icon(category), ""));
        if !notes.is_empty() {
            html.push_str(&sections::notice("compatibility", "⚠️", "Compatibility Notes", None, &notes, cx));
        }
        html.push_str(&quick_specs(guide, category));
        html.push_str(&products(guide, cx));
        html.push_str(&sections::content_sections(
            guide,
            cx,
            "tech-section",
            "📖 Detailed Information",
            SectionMarker::Numbered,
        ));
        html.push_str(&sections::tip_list("tech", "💡 Pro Tips", &tips, cx));
        html.push_str(&sections::extra_info(guide, cx));
        html.push_str(&sections::references(guide));
        html.push_str(&sections::close(guide, "tech", category));
        html
    }
}

fn icon(category: &str) -> &'static str {
    match category {
        "technology" => "📱",
        "navigation" => "🧭",
        "connectivity" => "📡",
        "electronics" => "⚡",
        "solar-power" => "☀️",
        "internet-connectivity" => "🌐",
        "navigation-software" => "🗺️",
        "communication" => "📞",
        _ => "💻",
    }
}

fn default_specs(category: &str) -> &'static [(&'static str, &'static str)] {
    match category {
        "navigation" => &[
            ("Platform", "iOS/Android"),
            ("Offline Maps", "Available"),
            ("Truck Mode", "Yes"),
            ("Updates", "Regular"),
        ],
        "connectivity" => &[
            ("Technology", "Satellite/Cellular"),
            ("Speed", "Variable"),
            ("Coverage", "Global/Regional"),
            ("Monthly Cost", "Variable"),
        ],
        "solar-power" => &[
            ("Panel Type", "Rigid/Flexible"),
            ("Output", "100-400W"),
            ("Installation", "Professional"),
            ("ROI", "2-3 Years"),
        ],
        _ => &[
            ("Type", "Mobile/Fixed"),
            ("Power", "12V/220V"),
            ("Coverage", "Europe-wide"),
            ("Setup", "DIY Possible"),
        ],
    }
}

/// The guide's `specifications` object, or typical values for the category.
fn quick_specs(guide: &Item, category: &str) -> String {
    let specs: Vec<(String, String)> = match guide.field("specifications").and_then(Value::as_object) {
        Some(map) if !map.is_empty() => map
            .iter()
            .map(|(label, value)| (label.clone(), scalar(Some(value), "N/A")))
            .collect(),
        _ => default_specs(category)
            .iter()
            .map(|(label, value)| (label.to_string(), value.to_string()))
            .collect(),
    };
    let cards: String = specs
        .iter()
        .map(|(label, value)| {
            format!(
                r#"<div class="spec-card"><div class="spec-label">{}</div><div class="spec-value">{}</div></div>"#,
                escape(label),
                escape(value),
            )
        })
        .collect();
    format!(r#"<div class="quick-specs"><h2>📊 Quick Specifications</h2><div class="specs-grid">{cards}</div></div>"#)
}

fn products(guide: &Item, cx: &RenderContext) -> String {
    let products = guide.list("products");
    if products.is_empty() {
        return String::new();
    }
    let cards: String = products
        .iter()
        .map(|product| {
            let name = match product {
                Value::Object(_) => cx.text(product.get("name")),
                other => cx.text(Some(other)),
            };
            let price = product
                .get("price")
                .map(|p| format!(r#"<span class="product-price">{}</span>"#, escape(&scalar(Some(p), ""))))
                .unwrap_or_default();
            format!(
                r#"<div class="product-card"><span class="product-name">{}</span>{price}</div>"#,
                escape(&name)
            )
        })
        .collect();
    format!(r#"<div class="products-section"><h2>🛒 Recommended Products</h2><div class="products-grid">{cards}</div></div>"#)
}
