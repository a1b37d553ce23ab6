//! Guide index grouped by category.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::data::{localized_text, DataLoader, Item};
use crate::error::RenderError;
use crate::views::locations::strip_query;
use crate::views::markup::{empty_state, escape, humanize, page_header};
use crate::views::templates::RenderContext;
use crate::views::View;

/// Guides sharing a `category` value, in dataset order.
#[derive(Debug)]
pub struct GuideGroup<'a> {
    pub name: &'a str,
    pub guides: Vec<&'a Item>,
}

/// Group guides by category in order of first appearance. Guides without a
/// category land in `uncategorized`.
pub fn group_by_category(guides: &[Item]) -> Vec<GuideGroup<'_>> {
    let mut groups: Vec<GuideGroup<'_>> = Vec::new();
    for guide in guides {
        let name = guide.str_field("category").unwrap_or("uncategorized");
        match groups.iter_mut().find(|g| g.name == name) {
            Some(group) => group.guides.push(guide),
            None => groups.push(GuideGroup {
                name,
                guides: vec![guide],
            }),
        }
    }
    groups
}

pub struct GuidesView {
    loader: Arc<DataLoader>,
    category: Option<String>,
}

impl GuidesView {
    pub fn new(loader: Arc<DataLoader>) -> Self {
        Self {
            loader,
            category: None,
        }
    }

    /// Show only one category (from `#guides/<category>`).
    pub fn category(mut self, name: Option<String>) -> Self {
        self.category = name
            .map(|n| strip_query(&n).to_string())
            .filter(|n| !n.is_empty());
        self
    }

    fn card(guide: &Item) -> String {
        let cx = RenderContext::default();
        let difficulty = guide.str_field("difficulty").unwrap_or("beginner");
        format!(
            r##"<a class="guide-card card" href="#guide/{}"><h3>{}</h3><p class="guide-summary">{}</p><span class="badge {}">{}</span></a>"##,
            escape(&guide.id),
            escape(&localized_text(guide.field("title"))),
            escape(&localized_text(guide.field("summary"))),
            cx.difficulty_class(difficulty),
            escape(&cx.difficulty_label(difficulty)),
        )
    }

    fn markup(guides: &[Item]) -> String {
        let groups = group_by_category(guides);
        let sidebar: String = groups
            .iter()
            .map(|g| {
                format!(
                    r##"<a class="category-link" href="#guides/{0}">{1} <span class="count">{2}</span></a>"##,
                    escape(g.name),
                    escape(&humanize(g.name)),
                    g.guides.len()
                )
            })
            .collect();
        let sections: String = if groups.is_empty() {
            empty_state("No guides available.")
        } else {
            groups
                .iter()
                .map(|g| {
                    let cards: String = g.guides.iter().map(|guide| Self::card(guide)).collect();
                    format!(
                        r#"<section class="guide-category" id="category-{}"><h2>{}</h2><div class="guides-grid">{cards}</div></section>"#,
                        escape(g.name),
                        escape(&humanize(g.name)),
                    )
                })
                .collect()
        };

        format!(
            r#"<div class="guides-container">{}<div class="guides-content"><aside class="categories-sidebar"><h3>Categories</h3><div class="category-list">{sidebar}</div></aside><div class="guides-list">{sections}</div></div></div>"#,
            page_header(
                "📚",
                "Knowledge Guides",
                &format!(
                    "{} comprehensive guides across {} categories",
                    guides.len(),
                    groups.len()
                ),
            ),
        )
    }
}

impl View for GuidesView {
    fn render(&mut self) -> BoxFuture<'_, Result<String, RenderError>> {
        async move {
            let html = match &self.category {
                Some(name) => Self::markup(&self.loader.guides_by_category(name).await?),
                None => Self::markup(&self.loader.guides().await?),
            };
            Ok(html)
        }
        .boxed()
    }
}
