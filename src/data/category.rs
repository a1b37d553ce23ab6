//! Dataset partitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One partition of the knowledge base, backed by one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Locations,
    Guides,
    Routes,
    Costs,
    Contacts,
    Tips,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Locations,
        Category::Guides,
        Category::Routes,
        Category::Costs,
        Category::Contacts,
        Category::Tips,
    ];

    /// Position in [`Category::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// The key used in resource documents and the unified dataset.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Locations => "locations",
            Category::Guides => "guides",
            Category::Routes => "routes",
            Category::Costs => "costs",
            Category::Contacts => "contacts",
            Category::Tips => "tips",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
