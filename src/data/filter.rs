//! Location filters shared by the list and map views.

use std::fmt;

use serde_json::Value;

use crate::data::item::Item;

/// One active filter on the location list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationFilter {
    /// `cost.type` is `free`.
    Free,
    /// `amenities` lists this amenity (`water`, `dump_station`, ...).
    Amenity(String),
}

impl LocationFilter {
    /// Filters offered on the location list, in display order.
    pub const OFFERED: [(&'static str, &'static str); 4] = [
        ("water", "💧 Water Available"),
        ("dump_station", "🚽 Dump Station"),
        ("electricity", "⚡ Electricity"),
        ("free", "🆓 Free Only"),
    ];

    pub fn new(name: &str) -> Option<Self> {
        match name.trim() {
            "" => None,
            "free" => Some(LocationFilter::Free),
            amenity => Some(LocationFilter::Amenity(amenity.to_string())),
        }
    }

    /// Parse a comma separated list such as `water,free`. Duplicates collapse.
    pub fn parse_list(list: &str) -> Vec<LocationFilter> {
        let mut filters: Vec<LocationFilter> = Vec::new();
        for filter in list.split(',').filter_map(LocationFilter::new) {
            if !filters.contains(&filter) {
                filters.push(filter);
            }
        }
        filters
    }

    pub fn name(&self) -> &str {
        match self {
            LocationFilter::Free => "free",
            LocationFilter::Amenity(amenity) => amenity,
        }
    }

    pub fn matches(&self, location: &Item) -> bool {
        match self {
            LocationFilter::Free => location
                .field("cost")
                .and_then(|cost| cost.get("type"))
                .and_then(Value::as_str)
                == Some("free"),
            LocationFilter::Amenity(amenity) => location
                .list("amenities")
                .iter()
                .any(|a| a.as_str() == Some(amenity.as_str())),
        }
    }
}

impl fmt::Display for LocationFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// True when `location` passes every filter. No filters pass everything.
pub fn passes_all(location: &Item, filters: &[LocationFilter]) -> bool {
    filters.iter().all(|filter| filter.matches(location))
}
