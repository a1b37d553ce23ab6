//! View subsystem.
//!
//! # Data Flow
//! ```text
//! route name + params
//!     → ViewRegistry::build (factory per route name)
//!     → View::render (awaits DataLoader, returns markup)
//!     → controller swaps markup into the Container
//!     → View::after_render (attach widgets to the Container)
//! ```
//!
//! # Design Decisions
//! - Views see the data only through the shared [`DataLoader`]
//! - Guide detail markup is delegated to a pluggable [`TemplateSet`]
//! - All interpolated dataset text is HTML-escaped

use std::collections::HashMap;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::app::container::Container;
use crate::data::DataLoader;
use crate::error::RenderError;
use crate::routing::Params;

pub mod guide_detail;
pub mod guides;
pub mod home;
pub mod locations;
pub mod map;
pub mod markup;
pub mod routes;
pub mod templates;

pub use guide_detail::GuideDetailView;
pub use guides::GuidesView;
pub use home::HomeView;
pub use locations::LocationsView;
pub use map::MapView;
pub use routes::RoutesView;
pub use templates::{GuideRenderer, RenderContext, TemplateKind, TemplateSet};

/// A render-capable object for one route.
pub trait View: Send {
    /// Produce the markup for the container.
    fn render(&mut self) -> BoxFuture<'_, Result<String, RenderError>>;

    /// Runs after the markup has been committed to the container.
    fn after_render(&self, _container: &Container) {}
}

/// What a view is constructed with.
#[derive(Clone)]
pub struct ViewContext {
    pub loader: Arc<DataLoader>,
    pub templates: Arc<TemplateSet>,
}

impl ViewContext {
    pub fn new(loader: Arc<DataLoader>) -> Self {
        Self {
            loader,
            templates: Arc::new(TemplateSet::default()),
        }
    }

    pub fn with_templates(mut self, templates: TemplateSet) -> Self {
        self.templates = Arc::new(templates);
        self
    }
}

/// Builds a view for a dispatched route.
pub type ViewFactory = Arc<dyn Fn(&ViewContext, Params) -> Box<dyn View> + Send + Sync>;

/// Route name → view factory.
#[derive(Clone, Default)]
pub struct ViewRegistry {
    factories: HashMap<String, ViewFactory>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `home`, `map`, `locations`, `guides`, `routes` and `guide/<id>`.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register("home", |cx, _| Box::new(HomeView::new(cx.loader.clone())));
        registry.register("map", |cx, params| {
            Box::new(MapView::new(cx.loader.clone()).params(params.first().map(String::as_str)))
        });
        registry.register("locations", |cx, params| {
            Box::new(LocationsView::new(cx.loader.clone()).params(params.first().map(String::as_str)))
        });
        registry.register("guides", |cx, params| {
            Box::new(GuidesView::new(cx.loader.clone()).category(params.first().cloned()))
        });
        registry.register("routes", |cx, params| {
            Box::new(RoutesView::new(cx.loader.clone()).focus(params.first().cloned()))
        });
        registry.register("guide", |cx, params| {
            Box::new(GuideDetailView::new(
                cx.loader.clone(),
                cx.templates.clone(),
                params.first().map(String::as_str),
            ))
        });
        registry
    }

    pub fn register<F>(&mut self, route: impl Into<String>, factory: F)
    where
        F: Fn(&ViewContext, Params) -> Box<dyn View> + Send + Sync + 'static,
    {
        self.factories.insert(route.into(), Arc::new(factory));
    }

    pub fn routes(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn factory(&self, route: &str) -> Option<ViewFactory> {
        self.factories.get(route).cloned()
    }

    pub fn build(&self, route: &str, cx: &ViewContext, params: Params) -> Option<Box<dyn View>> {
        self.factories.get(route).map(|factory| factory(cx, params))
    }
}

impl std::fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut routes: Vec<_> = self.routes().collect();
        routes.sort_unstable();
        f.debug_struct("ViewRegistry").field("routes", &routes).finish()
    }
}
