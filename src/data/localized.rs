//! Localized text resolution.
//!
//! Text-bearing fields are either a plain string or an object keyed by
//! language code (`en`, `he`). Resolution prefers the requested language and
//! falls back to the other one, then to the empty string. Empty strings count
//! as missing.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Display language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    He,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::He => "he",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Language::En),
            "he" => Some(Language::He),
            _ => None,
        }
    }

    /// Reads `lang=xx` from a query string such as `lang=he&x=1`.
    pub fn from_query(query: &str) -> Option<Self> {
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "lang")
            .and_then(|(_, value)| Language::from_code(&value))
    }

    /// Hebrew renders right-to-left.
    pub fn is_rtl(self) -> bool {
        matches!(self, Language::He)
    }

    /// The language a toggle link switches to.
    pub fn other(self) -> Self {
        match self {
            Language::En => Language::He,
            Language::He => Language::En,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Borrowed view over a localized text value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalizedText<'a> {
    Plain(&'a str),
    Translated {
        en: Option<&'a str>,
        he: Option<&'a str>,
    },
}

impl<'a> LocalizedText<'a> {
    /// Returns `None` for nulls, numbers, arrays and empty strings.
    pub fn from_value(value: &'a Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(LocalizedText::Plain(s)),
            Value::Object(map) => {
                let pick = |key: &str| {
                    map.get(key)
                        .and_then(Value::as_str)
                        .filter(|s| !s.is_empty())
                };
                Some(LocalizedText::Translated {
                    en: pick("en"),
                    he: pick("he"),
                })
            }
            _ => None,
        }
    }

    pub fn resolve(&self, lang: Language) -> &'a str {
        match *self {
            LocalizedText::Plain(s) => s,
            LocalizedText::Translated { en, he } => {
                let (first, second) = match lang {
                    Language::En => (en, he),
                    Language::He => (he, en),
                };
                first.or(second).unwrap_or("")
            }
        }
    }

    /// Case-insensitive substring match; `needle` must already be lowercase.
    /// Translated values match if either language contains the needle.
    pub fn contains_lowercase(&self, needle: &str) -> bool {
        match *self {
            LocalizedText::Plain(s) => s.to_lowercase().contains(needle),
            LocalizedText::Translated { en, he } => [en, he]
                .into_iter()
                .flatten()
                .any(|s| s.to_lowercase().contains(needle)),
        }
    }
}

/// Resolve a possibly missing value in `lang`.
pub fn resolve_text(value: Option<&Value>, lang: Language) -> String {
    value
        .and_then(LocalizedText::from_value)
        .map(|text| text.resolve(lang).to_string())
        .unwrap_or_default()
}

/// English-first resolution used outside the guide detail view.
pub fn localized_text(value: Option<&Value>) -> String {
    resolve_text(value, Language::En)
}
