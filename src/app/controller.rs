//! Render cycle for dispatched routes.
//!
//! Each dispatch takes a new navigation sequence number. A render whose
//! number is no longer the latest when it resolves is discarded, so a slow
//! view never overwrites a newer one.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::app::container::Container;
use crate::error::RenderError;
use crate::observability::metrics;
use crate::routing::Params;
use crate::views::{ViewContext, ViewRegistry};

pub const LOADING_MARKUP: &str = r#"<div class="loading">Loading</div>"#;
pub const ERROR_MARKUP: &str = r#"<div class="error">Error loading content. Please try again.</div>"#;

/// What happened to one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The view's markup is in the container.
    Committed,
    /// A newer navigation started first; nothing was committed.
    Superseded,
    /// Rendering failed; the error message is in the container.
    Failed,
}

/// Builds views for routes and swaps their markup into the container.
pub struct Controller {
    registry: ViewRegistry,
    context: ViewContext,
    container: Container,
    sequence: AtomicU64,
}

impl Controller {
    pub fn new(registry: ViewRegistry, context: ViewContext, container: Container) -> Self {
        Self {
            registry,
            context,
            container,
            sequence: AtomicU64::new(0),
        }
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn context(&self) -> &ViewContext {
        &self.context
    }

    pub fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    /// Latest navigation sequence number handed out.
    pub fn sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    fn is_current(&self, seq: u64) -> bool {
        self.sequence.load(Ordering::SeqCst) == seq
    }

    /// Render `route` into the container.
    pub async fn render(&self, route: &str, params: Params) -> RenderOutcome {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        self.container.replace_if(LOADING_MARKUP, || self.is_current(seq));

        let mut view = self.registry.build(route, &self.context, params);
        let rendered = match view.as_mut() {
            Some(view) => view.render().await,
            None => Err(RenderError::NotFound {
                what: "view",
                id: route.to_string(),
            }),
        };

        let markup = match &rendered {
            Ok(html) => html.as_str(),
            Err(_) => ERROR_MARKUP,
        };
        // The sequence check and the swap happen under the container lock, so
        // a newer render cannot commit in between.
        let Some(committed) = self.container.replace_if(markup, || self.is_current(seq)) else {
            tracing::debug!(route = %route, seq, latest = self.sequence(), "Discarding stale render");
            metrics::record_render(route, "stale");
            return RenderOutcome::Superseded;
        };

        match rendered {
            Ok(_) => {
                if let Some(view) = &view {
                    view.after_render(&committed);
                }
                tracing::debug!(route = %route, seq, "Render committed");
                metrics::record_render(route, "ok");
                RenderOutcome::Committed
            }
            Err(error) => {
                tracing::error!(route = %route, error = %error, "Error loading view");
                metrics::record_render(route, "error");
                RenderOutcome::Failed
            }
        }
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("registry", &self.registry)
            .field("sequence", &self.sequence())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use futures_util::future::BoxFuture;
    use futures_util::FutureExt;
    use serde_json::json;

    use crate::data::{Category, DataLoader, MemorySource};
    use crate::views::View;

    struct Sleepy {
        delay: Duration,
        label: &'static str,
    }

    impl View for Sleepy {
        fn render(&mut self) -> BoxFuture<'_, Result<String, RenderError>> {
            async move {
                tokio::time::sleep(self.delay).await;
                Ok(self.label.to_string())
            }
            .boxed()
        }
    }

    fn controller(source: MemorySource) -> Arc<Controller> {
        let loader = Arc::new(DataLoader::new(Arc::new(source)));
        let mut registry = ViewRegistry::builtin();
        registry.register("slow", |_, _| {
            Box::new(Sleepy {
                delay: Duration::from_millis(80),
                label: "slow",
            })
        });
        registry.register("fast", |_, _| {
            Box::new(Sleepy {
                delay: Duration::from_millis(5),
                label: "fast",
            })
        });
        registry.register("instant", |_, _| {
            Box::new(Sleepy {
                delay: Duration::ZERO,
                label: "instant",
            })
        });
        Arc::new(Controller::new(registry, ViewContext::new(loader), Container::new()))
    }

    #[tokio::test]
    async fn test_commit_replaces_loading() {
        let source = MemorySource::new().with(
            Category::Locations,
            json!({"locations": [{"id": "L1", "name": {"en": "Alpine Spot"}}]}),
        );
        let controller = controller(source);
        let outcome = controller.render("locations", Vec::new()).await;

        assert_eq!(outcome, RenderOutcome::Committed);
        let html = controller.container().html();
        assert!(html.contains("Alpine Spot"));
        assert!(!html.contains(LOADING_MARKUP));
    }

    #[tokio::test]
    async fn test_fetch_failure_shows_error_message() {
        let controller = controller(MemorySource::new());
        let outcome = controller.render("locations", Vec::new()).await;

        assert_eq!(outcome, RenderOutcome::Failed);
        assert_eq!(controller.container().html(), ERROR_MARKUP);
    }

    #[tokio::test]
    async fn test_stale_render_discarded() {
        let controller = controller(MemorySource::new());

        let slow = tokio::spawn({
            let controller = controller.clone();
            async move { controller.render("slow", Vec::new()).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        let fast = controller.render("fast", Vec::new()).await;

        assert_eq!(fast, RenderOutcome::Committed);
        assert_eq!(slow.await.unwrap(), RenderOutcome::Superseded);
        assert_eq!(controller.container().html(), "fast");
        assert_eq!(controller.sequence(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_renders_commit_latest_only() {
        let controller = controller(MemorySource::new());

        for _ in 0..200 {
            let (a, b) = tokio::join!(
                tokio::spawn({
                    let controller = controller.clone();
                    async move { controller.render("fast", Vec::new()).await }
                }),
                tokio::spawn({
                    let controller = controller.clone();
                    async move { controller.render("instant", Vec::new()).await }
                }),
            );
            let (fast, instant) = (a.unwrap(), b.unwrap());
            let html = controller.container().html();

            // The displayed markup belongs to a committed render, and a
            // superseded render never ends up on display.
            match html.as_str() {
                "fast" => assert_eq!(fast, RenderOutcome::Committed),
                "instant" => assert_eq!(instant, RenderOutcome::Committed),
                other => panic!("unexpected markup {other:?}"),
            }
            if fast == RenderOutcome::Superseded {
                assert_eq!(html, "instant");
            }
            if instant == RenderOutcome::Superseded {
                assert_eq!(html, "fast");
            }
        }
    }

    #[tokio::test]
    async fn test_unregistered_view_fails_softly() {
        let controller = controller(MemorySource::new());
        assert_eq!(controller.render("nope", Vec::new()).await, RenderOutcome::Failed);
        assert_eq!(controller.container().html(), ERROR_MARKUP);
    }
}
