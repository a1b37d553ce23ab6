//! Map of all locations.
//!
//! The markup only reserves the map element; markers are attached as a
//! [`Widget::Map`] after the swap, for the embedding map library to draw.
//! `#map/<type>?q=<text>` narrows the markers to one location type (`all`
//! keeps every type) and to locations whose name or address matches.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::app::container::{Container, Marker, Widget};
use crate::data::{localized_text, DataLoader, Item};
use crate::error::RenderError;
use crate::routing::query_param;
use crate::views::locations::strip_query;
use crate::views::markup::{cost_label, escape, full_address};
use crate::views::View;

const MAP_ELEMENT: &str = "locations-map";

/// Type filter buttons, `all` first.
const TYPES: [(&str, &str); 6] = [
    ("all", "All"),
    ("parking", "🅿️ Parking"),
    ("campground", "🏕️ Campgrounds"),
    ("service", "🔧 Services"),
    ("storage", "🏪 Storage"),
    ("scenic", "🌄 Scenic"),
];

/// Marker emoji by location type.
pub fn marker_icon(kind: Option<&str>) -> &'static str {
    match kind {
        Some("parking") => "🅿️",
        Some("campground") => "🏕️",
        Some("service") => "🔧",
        Some("storage") => "🏪",
        Some("scenic") => "🌄",
        _ => "📍",
    }
}

/// Markers for every location with usable coordinates.
pub fn markers(locations: &[Item]) -> Vec<Marker> {
    locations
        .iter()
        .filter_map(|location| {
            let coords = location.coordinates()?;
            let title = localized_text(location.field("name"));
            let (cost_class, cost) = cost_label(location);
            let popup = format!(
                r#"<div class="popup-content"><h3>{}</h3><p>{}</p><p class="popup-address">{}</p><span class="cost {cost_class}">{}</span></div>"#,
                escape(&title),
                escape(&localized_text(location.field("description"))),
                escape(&full_address(location)),
                escape(&cost),
            );
            Some(Marker {
                id: location.id.clone(),
                lat: coords.lat,
                lng: coords.lng,
                icon: marker_icon(location.str_field("type")),
                title,
                popup,
            })
        })
        .collect()
}

pub struct MapView {
    loader: Arc<DataLoader>,
    kind: String,
    query: String,
    markers: Vec<Marker>,
}

impl MapView {
    pub fn new(loader: Arc<DataLoader>) -> Self {
        Self {
            loader,
            kind: "all".to_string(),
            query: String::new(),
            markers: Vec::new(),
        }
    }

    /// Read `#map[/<type>][?q=<text>]`.
    pub fn params(mut self, param: Option<&str>) -> Self {
        if let Some(param) = param {
            let kind = strip_query(param);
            if !kind.is_empty() {
                self.kind = kind.to_string();
            }
            self.query = query_param(param, "q").unwrap_or_default();
        }
        self
    }

    fn toolbar(&self, shown: usize, total: usize) -> String {
        let query = if self.query.trim().is_empty() {
            String::new()
        } else {
            format!("?q={}", url::form_urlencoded::byte_serialize(self.query.as_bytes()).collect::<String>())
        };
        let buttons: String = TYPES
            .iter()
            .map(|(kind, label)| {
                format!(
                    r##"<a class="filter-btn{}" data-type="{kind}" href="#map/{kind}{}">{label}</a>"##,
                    if *kind == self.kind { " active" } else { "" },
                    escape(&query),
                )
            })
            .collect();
        format!(
            r#"<div class="map-toolbar"><input type="search" class="map-search" placeholder="Search locations..." value="{}"><div class="map-filters">{buttons}</div><span class="map-count">{shown} of {total} locations mapped</span></div>"#,
            escape(&self.query),
        )
    }
}

impl View for MapView {
    fn render(&mut self) -> BoxFuture<'_, Result<String, RenderError>> {
        async move {
            let total = self.loader.locations().await?.len();
            let mut matched = self.loader.search_locations(&self.query).await?;
            if self.kind != "all" {
                matched.retain(|l| l.str_field("type") == Some(self.kind.as_str()));
            }
            self.markers = markers(&matched);
            Ok(format!(
                r#"<div class="map-container">{}<div id="{MAP_ELEMENT}" class="map"></div></div>"#,
                self.toolbar(self.markers.len(), total),
            ))
        }
        .boxed()
    }

    fn after_render(&self, container: &Container) {
        container.attach(Widget::Map {
            element: MAP_ELEMENT.to_string(),
            markers: self.markers.clone(),
            fit_bounds: !self.markers.is_empty(),
        });
    }
}
