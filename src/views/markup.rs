//! Small markup helpers shared by views and templates.

use serde_json::Value;

use crate::data::{localized_text, Item};

/// Escape text for use in element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `gas-systems` → `Gas systems`.
pub fn humanize(slug: &str) -> String {
    let spaced = slug.replace(['-', '_'], " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Page heading block used by the list views.
pub fn page_header(icon: &str, title: &str, subtitle: &str) -> String {
    format!(
        r#"<header class="page-header"><div class="page-icon">{icon}</div><h1>{}</h1><p class="page-subtitle">{}</p></header>"#,
        escape(title),
        escape(subtitle),
    )
}

/// Empty-state block.
pub fn empty_state(message: &str) -> String {
    format!(r#"<div class="empty-state"><p>{}</p></div>"#, escape(message))
}

/// Human-readable address: `fullAddress` if present, else city, region,
/// country joined with commas.
pub fn full_address(location: &Item) -> String {
    let Some(address) = location.field("address") else {
        return "Location not specified".to_string();
    };
    if let Some(full) = address.get("fullAddress") {
        let text = localized_text(Some(full));
        if !text.is_empty() {
            return text;
        }
    }
    if let Value::String(s) = address {
        return s.clone();
    }
    let parts: Vec<&str> = ["city", "region", "country"]
        .iter()
        .filter_map(|key| address.get(*key).and_then(Value::as_str))
        .filter(|s| !s.is_empty())
        .collect();
    if parts.is_empty() {
        "Location not specified".to_string()
    } else {
        parts.join(", ")
    }
}

/// Emoji for a known amenity, or the amenity name itself.
pub fn amenity_icon(amenity: &str) -> &str {
    match amenity {
        "water" => "💧",
        "dump_station" => "🚽",
        "grey_water_disposal" => "💦",
        "electricity" => "⚡",
        "wifi" => "📶",
        "security" => "🔒",
        other => other,
    }
}

/// `Free` or `€<amount>` from a location's `cost` object.
pub fn cost_label(location: &Item) -> (&'static str, String) {
    let cost = location.field("cost");
    let is_free = cost
        .and_then(|c| c.get("type"))
        .and_then(Value::as_str)
        == Some("free");
    if is_free {
        return ("free", "Free".to_string());
    }
    let amount = match cost.and_then(|c| c.get("amount")) {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => "?".to_string(),
    };
    ("paid", format!("€{amount}"))
}

/// Render a plain scalar (string or number) field, or `fallback`.
pub fn scalar(value: Option<&Value>, fallback: &str) -> String {
    match value {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => fallback.to_string(),
    }
}
