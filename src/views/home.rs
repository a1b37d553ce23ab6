//! Landing page: dataset counts and section cards.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::data::{DataLoader, Stats};
use crate::error::RenderError;
use crate::views::markup::escape;
use crate::views::View;

struct Section {
    route: &'static str,
    icon: &'static str,
    title: &'static str,
    blurb: &'static str,
}

const SECTIONS: [Section; 4] = [
    Section {
        route: "locations",
        icon: "🗺️",
        title: "Locations",
        blurb: "Verified motorhome parking and service points",
    },
    Section {
        route: "map",
        icon: "📍",
        title: "Map",
        blurb: "Every location on an interactive map",
    },
    Section {
        route: "guides",
        icon: "📚",
        title: "Guides",
        blurb: "Technical, legal and travel knowledge",
    },
    Section {
        route: "routes",
        icon: "🛣️",
        title: "Routes",
        blurb: "Scenic drives with highlights and distances",
    },
];

pub struct HomeView {
    loader: Arc<DataLoader>,
}

impl HomeView {
    pub fn new(loader: Arc<DataLoader>) -> Self {
        Self { loader }
    }

    fn stat_card(count: usize, label: &str) -> String {
        format!(
            r#"<div class="stat-card"><span class="stat-number">{count}</span><span class="stat-label">{label}</span></div>"#
        )
    }

    fn markup(&self, stats: Stats) -> String {
        let metadata = self.loader.metadata();
        let cards: String = SECTIONS
            .iter()
            .map(|s| {
                format!(
                    r##"<a class="category-card" href="#{}"><div class="category-icon">{}</div><h3>{}</h3><p>{}</p></a>"##,
                    s.route, s.icon, s.title, s.blurb
                )
            })
            .collect();

        format!(
            r#"<div class="home-container"><header class="home-header"><h1 class="home-title">🚐 {}</h1><p class="home-subtitle">{}</p><div class="stats-grid">{}{}{}{}</div></header><div class="categories-grid">{}</div></div>"#,
            escape(&metadata.project),
            escape(&metadata.description),
            Self::stat_card(stats.total_locations, "Locations"),
            Self::stat_card(stats.total_guides, "Guides"),
            Self::stat_card(stats.total_routes, "Routes"),
            Self::stat_card(stats.total_tips, "Tips"),
            cards,
        )
    }
}

impl View for HomeView {
    fn render(&mut self) -> BoxFuture<'_, Result<String, RenderError>> {
        async move {
            let stats = self.loader.stats().await?;
            Ok(self.markup(stats))
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Category, MemorySource};
    use serde_json::json;

    #[tokio::test]
    async fn test_home_shows_counts() {
        let source = Arc::new(
            MemorySource::new()
                .with(Category::Locations, json!([{"id": "l1"}, {"id": "l2"}, {"id": "l3"}]))
                .with(Category::Guides, json!([{"id": "g1"}]))
                .with(Category::Routes, json!([]))
                .with(Category::Tips, json!({"tips": [{"id": "t1"}, {"id": "t2"}]})),
        );
        let mut view = HomeView::new(Arc::new(DataLoader::new(source)));

        let html = view.render().await.unwrap();
        assert!(html.contains(r#"<span class="stat-number">3</span><span class="stat-label">Locations</span>"#));
        assert!(html.contains(r#"<span class="stat-number">2</span><span class="stat-label">Tips</span>"#));
        assert!(html.contains(r##"href="#map""##));
    }

    #[tokio::test]
    async fn test_missing_category_fails_render() {
        let source = Arc::new(MemorySource::new().with(Category::Locations, json!([])));
        let mut view = HomeView::new(Arc::new(DataLoader::new(source)));
        assert!(matches!(view.render().await, Err(RenderError::Fetch(_))));
    }
}
