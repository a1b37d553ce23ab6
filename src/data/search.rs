//! Text search across loaded categories.
//!
//! # Matching
//! The query is lowercased and matched as a substring against a fixed field
//! set per category. Plain string fields match directly; localized fields
//! match if either language contains the query. Fields of any other shape
//! never match.
//!
//! # Ordering
//! Locations, then guides, then routes, each in dataset order. The result cap
//! is applied once, after all passes, so a query with many location hits can
//! crowd out later categories.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::SearchConfig;
use crate::data::item::Item;
use crate::data::localized::{localized_text, LocalizedText};

/// What a search hit points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultKind {
    Location,
    Guide,
    Route,
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResultKind::Location => "Location",
            ResultKind::Guide => "Guide",
            ResultKind::Route => "Route",
        })
    }
}

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "type")]
    pub kind: ResultKind,
    pub title: String,
    pub description: String,
    /// Fragment of the view showing this item, without the leading `#`.
    pub route: String,
}

struct Pass {
    kind: ResultKind,
    fields: &'static [&'static str],
    title: &'static str,
    description: &'static str,
    route: &'static str,
}

const LOCATIONS: Pass = Pass {
    kind: ResultKind::Location,
    fields: &["name", "description", "address"],
    title: "name",
    description: "description",
    route: "locations",
};

const GUIDES: Pass = Pass {
    kind: ResultKind::Guide,
    fields: &["title", "content", "category"],
    title: "title",
    description: "content",
    route: "guide",
};

const ROUTES: Pass = Pass {
    kind: ResultKind::Route,
    fields: &["name", "description"],
    title: "name",
    description: "description",
    route: "routes",
};

impl Pass {
    fn run(&self, items: &[Item], needle: &str, config: &SearchConfig, out: &mut Vec<SearchResult>) {
        for item in items.iter().filter(|item| matches(item, needle, self.fields)) {
            out.push(SearchResult {
                kind: self.kind,
                title: localized_text(item.field(self.title)),
                description: truncate(
                    &localized_text(item.field(self.description)),
                    config.description_chars,
                ),
                route: format!("{}/{}", self.route, item.id),
            });
        }
    }
}

fn matches(item: &Item, needle: &str, fields: &[&str]) -> bool {
    fields.iter().any(|field| {
        item.field(field)
            .and_then(LocalizedText::from_value)
            .is_some_and(|text| text.contains_lowercase(needle))
    })
}

/// English text only: a plain string, or the `en` entry of a translation.
fn english(value: Option<&Value>) -> Option<&str> {
    match value.and_then(LocalizedText::from_value)? {
        LocalizedText::Plain(s) => Some(s),
        LocalizedText::Translated { en, .. } => en,
    }
}

/// Location lookup for the map panel. Matches the English name, the
/// `city`, `region` and `country` of a structured address, and its English
/// `fullAddress`. `needle` must already be lowercase and trimmed.
pub fn location_matches(location: &Item, needle: &str) -> bool {
    let address = location.field("address");
    let candidates = [
        english(location.field("name")),
        address.and_then(|a| a.get("city")).and_then(Value::as_str),
        address.and_then(|a| a.get("country")).and_then(Value::as_str),
        address.and_then(|a| a.get("region")).and_then(Value::as_str),
        english(address.and_then(|a| a.get("fullAddress"))),
    ];
    candidates
        .into_iter()
        .flatten()
        .any(|text| text.to_lowercase().contains(needle))
}

/// Cut `text` to `max_chars` characters, marking the cut with `...`.
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Search the given category slices. `None` means the category is not
/// loaded and is skipped.
pub fn search_items(
    query: &str,
    locations: &[Item],
    guides: Option<&[Item]>,
    routes: Option<&[Item]>,
    config: &SearchConfig,
) -> Vec<SearchResult> {
    if query.is_empty() {
        return Vec::new();
    }

    let needle = query.to_lowercase();
    let mut results = Vec::new();

    LOCATIONS.run(locations, &needle, config, &mut results);
    if let Some(guides) = guides {
        GUIDES.run(guides, &needle, config, &mut results);
    }
    if let Some(routes) = routes {
        ROUTES.run(routes, &needle, config, &mut results);
    }

    results.truncate(config.max_results);
    results
}
