//! The current URL fragment.

use std::sync::Arc;

use tokio::sync::watch;

/// Shared, observable URL fragment (the part after `#`).
///
/// Clones share the same fragment. Every change is published to
/// subscribers, which is what drives navigation.
#[derive(Debug, Clone)]
pub struct HashLocation {
    tx: Arc<watch::Sender<String>>,
}

fn strip_hash(fragment: &str) -> &str {
    fragment.strip_prefix('#').unwrap_or(fragment)
}

impl HashLocation {
    pub fn new(initial: &str) -> Self {
        let (tx, _) = watch::channel(strip_hash(initial).to_string());
        Self { tx: Arc::new(tx) }
    }

    /// The fragment without the leading `#`.
    pub fn fragment(&self) -> String {
        self.tx.borrow().clone()
    }

    /// Replace the fragment. Returns false, and notifies no one, when the
    /// fragment already has this value.
    pub fn set(&self, fragment: &str) -> bool {
        let fragment = strip_hash(fragment);
        self.tx.send_if_modified(|current| {
            if current.as_str() == fragment {
                false
            } else {
                *current = fragment.to_string();
                true
            }
        })
    }

    /// Receive change notifications.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.tx.subscribe()
    }
}

impl Default for HashLocation {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_hash_stripped() {
        let location = HashLocation::new("#guides");
        assert_eq!(location.fragment(), "guides");
        location.set("#routes/r1");
        assert_eq!(location.fragment(), "routes/r1");
    }

    #[tokio::test]
    async fn test_only_changes_notify() {
        let location = HashLocation::new("home");
        let mut rx = location.subscribe();

        assert!(!location.set("home"));
        assert!(!rx.has_changed().unwrap());

        assert!(location.set("map"));
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), "map");
    }

    #[test]
    fn test_clones_share_fragment() {
        let a = HashLocation::default();
        let b = a.clone();
        b.set("locations");
        assert_eq!(a.fragment(), "locations");
    }
}
