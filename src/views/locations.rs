//! Location list.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde_json::Value;

use crate::data::{localized_text, DataLoader, Item, LocationFilter};
use crate::error::RenderError;
use crate::routing::query_param;
use crate::views::markup::{amenity_icon, cost_label, empty_state, escape, full_address, page_header};
use crate::views::View;

pub struct LocationsView {
    loader: Arc<DataLoader>,
    focus: Option<String>,
    filters: Vec<LocationFilter>,
}

impl LocationsView {
    pub fn new(loader: Arc<DataLoader>) -> Self {
        Self {
            loader,
            focus: None,
            filters: Vec::new(),
        }
    }

    /// Read `#locations[/<id>][?filter=water,free]`: the id highlights one
    /// card, the filters hide cards that do not pass all of them.
    pub fn params(self, param: Option<&str>) -> Self {
        let filters = param
            .and_then(|p| query_param(p, "filter"))
            .map(|list| LocationFilter::parse_list(&list))
            .unwrap_or_default();
        self.focus(param.map(str::to_string)).filters(filters)
    }

    /// Highlight the location with this id (from `#locations/<id>`).
    pub fn focus(mut self, id: Option<String>) -> Self {
        self.focus = id
            .map(|id| strip_query(&id).to_string())
            .filter(|id| !id.is_empty());
        self
    }

    pub fn filters(mut self, filters: Vec<LocationFilter>) -> Self {
        self.filters = filters;
        self
    }

    /// Checkbox-style links; each toggles its filter in the fragment.
    fn filter_bar(&self) -> String {
        let chips: String = LocationFilter::OFFERED
            .iter()
            .map(|(name, label)| {
                let active = self.filters.iter().any(|f| f.name() == *name);
                let toggled: Vec<&str> = self
                    .filters
                    .iter()
                    .map(LocationFilter::name)
                    .filter(|f| f != name)
                    .chain((!active).then_some(*name))
                    .collect();
                let href = if toggled.is_empty() {
                    "#locations".to_string()
                } else {
                    format!("#locations?filter={}", toggled.join(","))
                };
                format!(
                    r#"<a class="filter-checkbox{}" data-filter="{name}" href="{}">{label}</a>"#,
                    if active { " active" } else { "" },
                    escape(&href),
                )
            })
            .collect();
        format!(r#"<div class="locations-filters"><h3>Filter Locations</h3><div class="filter-group">{chips}</div></div>"#)
    }

    fn card(&self, location: &Item) -> String {
        let name = localized_text(location.field("name"));
        let description = localized_text(location.field("description"));
        let kind = location.str_field("type").unwrap_or("Location");
        let (cost_class, cost) = cost_label(location);
        let amenities: String = location
            .list("amenities")
            .iter()
            .filter_map(Value::as_str)
            .map(|a| format!(r#"<span class="amenity" title="{0}">{1}</span>"#, escape(a), escape(amenity_icon(a))))
            .collect();
        let selected = if self.focus.as_deref() == Some(location.id.as_str()) {
            " selected"
        } else {
            ""
        };

        format!(
            r#"<div class="location-card card{selected}" data-location-id="{}"><div class="card-header"><h3>{}</h3><span class="badge badge-primary">{}</span></div><p class="location-description">{}</p><p class="location-address">📍 {}</p><div class="location-footer"><div class="amenities">{amenities}</div><span class="cost {cost_class}">{}</span></div></div>"#,
            escape(&location.id),
            escape(&name),
            escape(kind),
            escape(&description),
            escape(&full_address(location)),
            escape(&cost),
        )
    }

    fn markup(&self, locations: &[Item]) -> String {
        let shown: Vec<&Item> = locations
            .iter()
            .filter(|l| self.filters.iter().all(|f| f.matches(l)))
            .collect();
        let list = if locations.is_empty() {
            empty_state("No locations available.")
        } else if shown.is_empty() {
            empty_state("No locations match the selected filters.")
        } else {
            shown.iter().map(|l| self.card(l)).collect()
        };
        format!(
            r#"<div class="locations-container">{}<div class="locations-content">{}<div class="locations-list">{list}</div></div></div>"#,
            page_header(
                "🗺️",
                "Locations & Navigation",
                &format!(
                    "Discover {} verified motorhome parking locations across Europe and beyond",
                    locations.len()
                ),
            ),
            self.filter_bar(),
        )
    }
}

/// `L1?lang=he` → `L1`.
pub(crate) fn strip_query(param: &str) -> &str {
    param.split_once('?').map_or(param, |(id, _)| id)
}

impl View for LocationsView {
    fn render(&mut self) -> BoxFuture<'_, Result<String, RenderError>> {
        async move {
            let locations = self.loader.locations().await?;
            Ok(self.markup(&locations))
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Category, MemorySource};
    use serde_json::json;

    fn loader() -> Arc<DataLoader> {
        let source = MemorySource::new().with(
            Category::Locations,
            json!({"locations": [
                {"id": "L1", "name": {"en": "Alpine Spot"}, "type": "parking",
                 "amenities": ["water", "electricity"], "cost": {"type": "free"}},
                {"id": "L2", "name": "Harbour <Quay>", "cost": {"amount": 15}}
            ]}),
        );
        Arc::new(DataLoader::new(Arc::new(source)))
    }

    #[tokio::test]
    async fn test_cards_render() {
        let html = LocationsView::new(loader()).render().await.unwrap();
        assert!(html.contains("Alpine Spot"));
        assert!(html.contains("Discover 2 verified"));
        assert!(html.contains("💧"));
        assert!(html.contains("Harbour &lt;Quay&gt;"));
        assert!(html.contains("€15"));
        assert!(!html.contains("selected"));
    }

    #[tokio::test]
    async fn test_focused_card() {
        let html = LocationsView::new(loader())
            .focus(Some("L2?lang=en".to_string()))
            .render()
            .await
            .unwrap();
        assert!(html.contains(r#"class="location-card card selected" data-location-id="L2""#));
    }

    #[tokio::test]
    async fn test_filters_hide_cards() {
        let html = LocationsView::new(loader())
            .params(Some("?filter=water,free"))
            .render()
            .await
            .unwrap();
        assert!(html.contains("Alpine Spot"));
        assert!(!html.contains("Harbour &lt;Quay&gt;"));
        // The subtitle still counts the whole dataset.
        assert!(html.contains("Discover 2 verified"));
        assert!(html.contains(r##"class="filter-checkbox active" data-filter="water" href="#locations?filter=free""##));
        assert!(html.contains(r##"data-filter="electricity" href="#locations?filter=water,free,electricity""##));
        assert!(!html.contains("selected"));
    }

    #[tokio::test]
    async fn test_no_location_passes_filters() {
        let html = LocationsView::new(loader())
            .params(Some("L2?filter=dump_station"))
            .render()
            .await
            .unwrap();
        assert!(html.contains("No locations match the selected filters."));
        assert!(html.contains(r##"data-filter="dump_station" href="#locations""##));
    }

    #[test]
    fn test_strip_query() {
        assert_eq!(strip_query("guide-010-005?lang=he"), "guide-010-005");
        assert_eq!(strip_query("plain"), "plain");
    }
}
