//! Application wiring.
//!
//! # Data Flow
//! ```text
//! HashLocation change
//!     → Router::handle_route (route name + params)
//!     → Controller::render (loading → view render → sequence check → commit)
//!     → Container (markup + widgets)
//! ```
//!
//! # Design Decisions
//! - One route per registered view; the router never knows about views
//! - `run_until` spawns each dispatch so a slow render never blocks newer
//!   navigations; the controller's sequence guard decides what is committed
//! - Locations are preloaded on start, everything else loads on first use

pub mod container;
pub mod controller;

use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::config::AppConfig;
use crate::data::{self, Category, DataLoader, DataSource};
use crate::error::Result;
use crate::routing::{Dispatch, HashLocation, Router};
use crate::views::{TemplateSet, ViewContext, ViewRegistry};

pub use container::{Container, Marker, Widget};
pub use controller::{Controller, RenderOutcome, ERROR_MARKUP, LOADING_MARKUP};

/// A configured router, loader and controller sharing one container.
#[derive(Clone)]
pub struct App {
    config: Arc<AppConfig>,
    loader: Arc<DataLoader>,
    router: Arc<Router>,
    controller: Arc<Controller>,
}

pub struct AppBuilder {
    config: AppConfig,
    source: Option<Arc<dyn DataSource>>,
    location: HashLocation,
    container: Container,
    templates: Option<TemplateSet>,
    registry: ViewRegistry,
}

impl AppBuilder {
    fn new() -> Self {
        Self {
            config: AppConfig::default(),
            source: None,
            location: HashLocation::default(),
            container: Container::new(),
            templates: None,
            registry: ViewRegistry::builtin(),
        }
    }

    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Data source to use instead of the one `config.data` describes.
    pub fn source(mut self, source: Arc<dyn DataSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn location(mut self, location: HashLocation) -> Self {
        self.location = location;
        self
    }

    pub fn container(mut self, container: Container) -> Self {
        self.container = container;
        self
    }

    pub fn templates(mut self, templates: TemplateSet) -> Self {
        self.templates = Some(templates);
        self
    }

    /// Replace the built-in views. Every registered name becomes a route.
    pub fn views(mut self, registry: ViewRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn build(self) -> Result<App> {
        let source = match self.source {
            Some(source) => source,
            None => data::source::from_config(&self.config.data)?,
        };
        let loader = Arc::new(
            DataLoader::new(source)
                .with_search_config(self.config.search.clone())
                .with_metadata(self.config.metadata.clone()),
        );

        let mut context = ViewContext::new(loader.clone());
        if let Some(templates) = self.templates {
            context = context.with_templates(templates);
        }

        let route_names: Vec<String> = self.registry.routes().map(str::to_string).collect();
        let controller = Arc::new(Controller::new(self.registry, context, self.container));

        let mut router = Router::new(self.location);
        for name in route_names {
            let controller = controller.clone();
            let route = name.clone();
            router.add_route(name, move |params| {
                let controller = controller.clone();
                let route = route.clone();
                async move {
                    controller.render(&route, params).await;
                }
            });
        }
        router.set_default_route(self.config.router.default_route.clone());

        tracing::debug!(router = ?router, "Application assembled");

        Ok(App {
            config: Arc::new(self.config),
            loader,
            router: Arc::new(router),
            controller,
        })
    }
}

impl App {
    pub fn builder() -> AppBuilder {
        AppBuilder::new()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn loader(&self) -> &Arc<DataLoader> {
        &self.loader
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn container(&self) -> &Container {
        self.controller.container()
    }

    pub fn location(&self) -> &HashLocation {
        self.router.location()
    }

    /// Preload locations, then render the current fragment.
    ///
    /// A failed preload is logged and does not stop the first render; the
    /// view that needs locations retries the fetch and shows the error.
    pub async fn start(&self) -> Dispatch {
        match self.loader.preload(&[Category::Locations]).await {
            Ok(()) => tracing::info!("Locations preloaded"),
            Err(error) => tracing::warn!(error = %error, "Failed to preload locations"),
        }
        self.dispatch().await
    }

    /// Set the fragment and render it.
    ///
    /// Intended for hosts that drive navigation directly. When `run_until`
    /// is also running it sees the same change and renders it too.
    pub async fn navigate(&self, path: &str) -> Dispatch {
        self.router.navigate_to(path);
        self.dispatch().await
    }

    /// Dispatch the current fragment, following one redirect to the default
    /// route.
    pub async fn dispatch(&self) -> Dispatch {
        match self.router.handle_route().await {
            Dispatch::Redirected { .. } => self.router.handle_route().await,
            other => other,
        }
    }

    /// Render every fragment change until `shutdown` resolves.
    pub async fn run_until<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut changes = self.router.location().subscribe();
        changes.borrow_and_update();
        let mut renders = JoinSet::new();
        tokio::pin!(shutdown);

        tracing::info!(fragment = %self.router.location().fragment(), "Listening for navigation");

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                changed = changes.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let fragment = changes.borrow_and_update().clone();
                    tracing::debug!(fragment = %fragment, "Fragment changed");
                    let router = self.router.clone();
                    renders.spawn(async move { router.handle_route().await });
                }
                Some(joined) = renders.join_next(), if !renders.is_empty() => {
                    if let Err(error) = joined {
                        tracing::error!(error = %error, "Render task failed");
                    }
                }
            }
        }

        renders.abort_all();
        tracing::info!("Navigation listener stopped");
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("router", &self.router)
            .field("loader", &self.loader)
            .finish_non_exhaustive()
    }
}
