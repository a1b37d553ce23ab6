//! Single guide page (`#guide/<id>[?lang=xx]`).

use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::data::{DataLoader, Language};
use crate::error::RenderError;
use crate::views::templates::{RenderContext, TemplateSet};
use crate::views::View;

const NOT_FOUND: &str = r##"<div class="guide-not-found empty-state"><h2>Guide Not Found</h2><p>The guide you are looking for does not exist or has been moved.</p><a href="#guides" class="btn btn-primary">← Back to Guides</a></div>"##;

pub struct GuideDetailView {
    loader: Arc<DataLoader>,
    templates: Arc<TemplateSet>,
    id: Option<String>,
    language: Language,
}

impl GuideDetailView {
    /// `param` is the raw route parameter, e.g. `guide-010-005?lang=he`.
    pub fn new(loader: Arc<DataLoader>, templates: Arc<TemplateSet>, param: Option<&str>) -> Self {
        let (id, language) = match param {
            Some(param) => {
                let (id, query) = param.split_once('?').unwrap_or((param, ""));
                (Some(id.to_string()), Language::from_query(query).unwrap_or_default())
            }
            None => (None, Language::default()),
        };
        Self {
            loader,
            templates,
            id: id.filter(|id| !id.is_empty()),
            language,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

impl View for GuideDetailView {
    fn render(&mut self) -> BoxFuture<'_, Result<String, RenderError>> {
        async move {
            let Some(id) = self.id.as_deref() else {
                return Ok(NOT_FOUND.to_string());
            };
            match self.loader.guide_by_id(id).await? {
                Some(guide) => Ok(self.templates.render(&guide, &RenderContext::new(self.language))),
                None => {
                    tracing::debug!(guide = %id, "Guide not found");
                    Ok(NOT_FOUND.to_string())
                }
            }
        }
        .boxed()
    }
}
