//! The content element the controller renders into.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

/// One map marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    pub icon: &'static str,
    pub title: String,
    /// Popup markup, already escaped.
    pub popup: String,
}

/// Interactive component attached by a view's post-render hook.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Widget {
    Map {
        /// Id of the element the map mounts into.
        element: String,
        markers: Vec<Marker>,
        /// Fit the viewport to the markers.
        fit_bounds: bool,
    },
}

#[derive(Debug, Default)]
struct ContainerState {
    html: String,
    widgets: Vec<Widget>,
    commits: u64,
}

/// Shared handle to the content element. Clones refer to the same element.
///
/// Replacing the markup drops every attached widget, the way replacing
/// `innerHTML` drops listeners and embedded components.
#[derive(Debug, Clone, Default)]
pub struct Container {
    state: Arc<Mutex<ContainerState>>,
    /// Set on handles returned by [`Container::replace_if`]: widgets are
    /// only attached while this commit is still the one on display.
    revision: Option<u64>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ContainerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn html(&self) -> String {
        self.lock().html.clone()
    }

    /// Replace the markup wholesale.
    pub fn replace(&self, html: impl Into<String>) {
        let mut state = self.lock();
        state.html = html.into();
        state.widgets.clear();
        state.commits += 1;
    }

    /// Replace the markup only if `is_current` still holds once the lock is
    /// held. Returns a handle pinned to the new markup, for post-render hooks.
    pub fn replace_if(
        &self,
        html: impl Into<String>,
        is_current: impl FnOnce() -> bool,
    ) -> Option<Container> {
        let mut state = self.lock();
        if !is_current() {
            return None;
        }
        state.html = html.into();
        state.widgets.clear();
        state.commits += 1;
        Some(Container {
            state: Arc::clone(&self.state),
            revision: Some(state.commits),
        })
    }

    pub fn clear(&self) {
        self.replace(String::new());
    }

    pub fn attach(&self, widget: Widget) {
        let mut state = self.lock();
        if self.revision.is_some_and(|revision| revision != state.commits) {
            tracing::trace!(revision = ?self.revision, current = state.commits, "Dropping widget for replaced markup");
            return;
        }
        state.widgets.push(widget);
    }

    pub fn widgets(&self) -> Vec<Widget> {
        self.lock().widgets.clone()
    }

    /// Number of markup replacements so far.
    pub fn commits(&self) -> u64 {
        self.lock().commits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_drops_widgets() {
        let container = Container::new();
        container.replace("<div id=\"map\"></div>");
        container.attach(Widget::Map {
            element: "map".into(),
            markers: Vec::new(),
            fit_bounds: false,
        });
        assert_eq!(container.widgets().len(), 1);

        let other = container.clone();
        other.replace("<p>next</p>");
        assert!(container.widgets().is_empty());
        assert_eq!(container.html(), "<p>next</p>");
        assert_eq!(container.commits(), 2);
    }

    fn map_widget() -> Widget {
        Widget::Map {
            element: "map".into(),
            markers: Vec::new(),
            fit_bounds: false,
        }
    }

    #[test]
    fn test_replace_if_checks_under_lock() {
        let container = Container::new();
        assert!(container.replace_if("<p>old</p>", || false).is_none());
        assert_eq!(container.html(), "");
        assert_eq!(container.commits(), 0);

        let pinned = container.replace_if("<p>new</p>", || true).unwrap();
        assert_eq!(container.html(), "<p>new</p>");
        pinned.attach(map_widget());
        assert_eq!(container.widgets().len(), 1);
    }

    #[test]
    fn test_pinned_handle_ignores_widgets_after_replace() {
        let container = Container::new();
        let pinned = container.replace_if("<div id=\"map\"></div>", || true).unwrap();

        container.replace("<p>loading</p>");
        pinned.attach(map_widget());

        assert!(container.widgets().is_empty());
        assert_eq!(pinned.html(), "<p>loading</p>");
    }
}
