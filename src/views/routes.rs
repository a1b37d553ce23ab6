//! Scenic route list.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::data::{localized_text, DataLoader, Item};
use crate::error::RenderError;
use crate::views::locations::strip_query;
use crate::views::markup::{empty_state, escape, page_header, scalar};
use crate::views::View;

pub struct RoutesView {
    loader: Arc<DataLoader>,
    focus: Option<String>,
}

impl RoutesView {
    pub fn new(loader: Arc<DataLoader>) -> Self {
        Self { loader, focus: None }
    }

    /// Highlight the route with this id (from `#routes/<id>`).
    pub fn focus(mut self, id: Option<String>) -> Self {
        self.focus = id.map(|id| strip_query(&id).to_string());
        self
    }

    fn card(&self, route: &Item) -> String {
        let highlights: String = route
            .list("highlights")
            .iter()
            .map(|h| format!("<li>{}</li>", escape(&localized_text(Some(h)))))
            .collect();
        let highlights = if highlights.is_empty() {
            String::new()
        } else {
            format!(r#"<ul class="route-highlights">{highlights}</ul>"#)
        };
        let selected = if self.focus.as_deref() == Some(route.id.as_str()) {
            " selected"
        } else {
            ""
        };
        let meta = |label: &str, field: &str| {
            format!(
                r#"<div class="route-meta-item"><div class="route-meta-label">{label}</div><div class="route-meta-value">{}</div></div>"#,
                escape(&scalar(route.field(field), "N/A"))
            )
        };

        format!(
            r#"<div class="route-card{selected}" data-route-id="{}"><h3>{}</h3><p>{}</p><div class="route-meta">{}{}{}</div>{highlights}</div>"#,
            escape(&route.id),
            escape(&localized_text(route.field("name"))),
            escape(&localized_text(route.field("description"))),
            meta("Duration", "duration"),
            meta("Distance", "distance"),
            meta("Difficulty", "difficulty"),
        )
    }

    fn markup(&self, routes: &[Item]) -> String {
        let list = if routes.is_empty() {
            empty_state("No routes available.")
        } else {
            routes.iter().map(|r| self.card(r)).collect()
        };
        format!(
            r#"<div class="routes-container">{}<div class="routes-list">{list}</div></div>"#,
            page_header(
                "🛣️",
                "Scenic Routes",
                &format!("{} curated motorhome routes", routes.len()),
            ),
        )
    }
}

impl View for RoutesView {
    fn render(&mut self) -> BoxFuture<'_, Result<String, RenderError>> {
        async move {
            let routes = self.loader.routes().await?;
            Ok(self.markup(&routes))
        }
        .boxed()
    }
}
