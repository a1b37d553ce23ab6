//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store handlers by exact route name
//! - Split the fragment into a main route name and parameters
//! - Dispatch to the matching handler, or redirect to the default route
//!
//! # Design Decisions
//! - O(1) lookup via HashMap; re-registering a name replaces the handler
//! - Parameters keep any `?query` suffix; consumers strip what they need
//! - Dispatching lasts until the handler's future completes

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::routing::location::HashLocation;

/// Path segments after the main route name.
pub type Params = Vec<String>;

type Handler = Arc<dyn Fn(Params) -> BoxFuture<'static, ()> + Send + Sync>;

/// Whether any dispatch is currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterState {
    Idle,
    Dispatching,
}

/// Outcome of [`Router::handle_route`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The handler for `route` ran to completion.
    Handled { route: String },
    /// No handler matched; the fragment was set to the default route.
    Redirected { to: String },
    /// No handler matched and there is no default route.
    Ignored,
}

/// Hash-fragment router.
pub struct Router {
    location: HashLocation,
    routes: HashMap<String, Handler>,
    default_route: Option<String>,
    in_flight: AtomicUsize,
}

struct DispatchGuard<'a>(&'a AtomicUsize);

impl<'a> DispatchGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Router {
    pub fn new(location: HashLocation) -> Self {
        Self {
            location,
            routes: HashMap::new(),
            default_route: None,
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Register `handler` for the exact route name `name`.
    pub fn add_route<F, Fut>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(Params) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handler: Handler = Arc::new(move |params| handler(params).boxed());
        self.routes.insert(name.into(), handler);
    }

    /// Route used for empty fragments and unknown routes.
    pub fn set_default_route(&mut self, name: impl Into<String>) {
        self.default_route = Some(name.into());
    }

    pub fn default_route(&self) -> Option<&str> {
        self.default_route.as_deref()
    }

    pub fn has_route(&self, name: &str) -> bool {
        self.routes.contains_key(name)
    }

    pub fn location(&self) -> &HashLocation {
        &self.location
    }

    /// Main route name: the first `/` segment of the fragment, or of the
    /// default route when the fragment is empty.
    pub fn current_route(&self) -> String {
        let fragment = self.location.fragment();
        let path = if fragment.is_empty() {
            self.default_route.as_deref().unwrap_or_default()
        } else {
            fragment.as_str()
        };
        split_route(path).0.to_string()
    }

    /// Every `/` segment after the first, unmodified.
    pub fn route_params(&self) -> Params {
        split_route(&self.location.fragment()).1
    }

    pub fn state(&self) -> RouterState {
        if self.in_flight.load(Ordering::SeqCst) > 0 {
            RouterState::Dispatching
        } else {
            RouterState::Idle
        }
    }

    /// Resolve the current fragment and run its handler.
    pub async fn handle_route(&self) -> Dispatch {
        let route = self.current_route();

        if let Some(handler) = self.routes.get(&route) {
            let params = self.route_params();
            tracing::debug!(route = %route, params = ?params, "Dispatching route");

            let _guard = DispatchGuard::enter(&self.in_flight);
            handler(params).await;
            return Dispatch::Handled { route };
        }

        match &self.default_route {
            Some(default) => {
                tracing::debug!(route = %route, default = %default, "No handler for route, redirecting");
                self.location.set(default);
                Dispatch::Redirected {
                    to: default.clone(),
                }
            }
            None => {
                tracing::debug!(route = %route, "No handler and no default route");
                Dispatch::Ignored
            }
        }
    }

    /// Set the fragment; subscribers see a change like any user navigation.
    pub fn navigate_to(&self, path: &str) {
        self.location.set(path);
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.routes.keys().collect();
        names.sort();
        f.debug_struct("Router")
            .field("routes", &names)
            .field("default_route", &self.default_route)
            .field("state", &self.state())
            .finish()
    }
}

/// `guide/g1?lang=he` → (`guide`, [`g1?lang=he`]). The query stays on the
/// last segment; on a bare route name it becomes the only parameter, so
/// `locations?filter=free` → (`locations`, [`?filter=free`]).
pub fn split_route(path: &str) -> (&str, Params) {
    let (path, query) = match path.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (path, None),
    };
    let mut segments = path.split('/');
    let name = segments.next().unwrap_or_default();
    let mut params: Params = segments.map(str::to_string).collect();
    if let Some(query) = query {
        match params.last_mut() {
            Some(last) => {
                last.push('?');
                last.push_str(query);
            }
            None => params.push(format!("?{query}")),
        }
    }
    (name, params)
}

/// Value of `key` in the query suffix of a route parameter, e.g. `water,free`
/// for `filter` in `?filter=water,free`.
pub fn query_param(param: &str, key: &str) -> Option<String> {
    let (_, query) = param.split_once('?')?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.into_owned())
}
