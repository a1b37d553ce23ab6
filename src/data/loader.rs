//! Lazy, caching category loader.
//!
//! # Responsibilities
//! - Load a category from its [`DataSource`] on first access
//! - Normalize the document into a list of [`Item`]s
//! - Serve cached lists and filtered/searched views of them
//!
//! # Design Decisions
//! - One `OnceCell` per category: concurrent first accesses await the same
//!   in-flight load instead of issuing duplicate fetches
//! - A failed load leaves its cell empty, so the next access retries
//! - Cached lists are shared as `Arc<Vec<Item>>` and never evicted

use std::sync::{Arc, OnceLock};

use futures_util::future::try_join_all;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tokio::sync::OnceCell;

use crate::config::{Metadata, SearchConfig};
use crate::data::filter::{passes_all, LocationFilter};
use crate::data::item::Item;
use crate::data::search::{location_matches, search_items, SearchResult};
use crate::data::source::DataSource;
use crate::data::Category;
use crate::error::FetchError;
use crate::observability::metrics;

/// Item counts shown on the home view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_locations: usize,
    pub total_guides: usize,
    pub total_routes: usize,
    pub total_tips: usize,
}

/// Per-category loader and cache.
pub struct DataLoader {
    source: Arc<dyn DataSource>,
    cells: [OnceCell<Arc<Vec<Item>>>; 6],
    search: SearchConfig,
    metadata: Metadata,
    /// `metadata` object found next to the locations array, if any.
    locations_metadata: OnceLock<Value>,
}

impl DataLoader {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self {
            source,
            cells: std::array::from_fn(|_| OnceCell::new()),
            search: SearchConfig::default(),
            metadata: Metadata::default(),
            locations_metadata: OnceLock::new(),
        }
    }

    pub fn with_search_config(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    fn cell(&self, category: Category) -> &OnceCell<Arc<Vec<Item>>> {
        &self.cells[category.index()]
    }

    /// Load `category`, fetching only if it is not cached yet.
    pub async fn load_category(&self, category: Category) -> Result<Arc<Vec<Item>>, FetchError> {
        let cell = self.cell(category);
        if let Some(items) = cell.get() {
            tracing::trace!(%category, "Category cache hit");
            return Ok(Arc::clone(items));
        }

        cell.get_or_try_init(|| self.fetch(category))
            .await
            .map(Arc::clone)
    }

    async fn fetch(&self, category: Category) -> Result<Arc<Vec<Item>>, FetchError> {
        let resource = self.source.describe(category);
        tracing::debug!(%category, %resource, "Loading category");

        let result = match self.source.fetch(category).await {
            Ok(document) => {
                if category == Category::Locations {
                    if let Some(metadata) = document.get("metadata").filter(|m| m.is_object()) {
                        let _ = self.locations_metadata.set(metadata.clone());
                    }
                }
                unwrap_category(category, document, &resource)
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(items) => {
                tracing::info!(%category, items = items.len(), "Category loaded");
                metrics::record_category_fetch(category, "ok");
                Ok(Arc::new(items))
            }
            Err(e) => {
                tracing::error!(%category, %resource, error = %e, "Failed to load category");
                metrics::record_category_fetch(category, if e.is_parse() { "parse_error" } else { "network_error" });
                Err(e)
            }
        }
    }

    /// True once `category` has been loaded successfully.
    pub fn is_loaded(&self, category: Category) -> bool {
        self.cell(category).initialized()
    }

    /// Categories loaded so far, in [`Category::ALL`] order.
    pub fn loaded_categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.is_loaded(*c))
            .collect()
    }

    /// The cached list, without triggering a load.
    pub fn cached(&self, category: Category) -> Option<Arc<Vec<Item>>> {
        self.cell(category).get().cloned()
    }

    /// Load several categories concurrently.
    pub async fn preload(&self, categories: &[Category]) -> Result<(), FetchError> {
        try_join_all(categories.iter().map(|c| self.load_category(*c))).await?;
        Ok(())
    }

    pub async fn locations(&self) -> Result<Arc<Vec<Item>>, FetchError> {
        self.load_category(Category::Locations).await
    }

    pub async fn guides(&self) -> Result<Arc<Vec<Item>>, FetchError> {
        self.load_category(Category::Guides).await
    }

    pub async fn routes(&self) -> Result<Arc<Vec<Item>>, FetchError> {
        self.load_category(Category::Routes).await
    }

    pub async fn tips(&self) -> Result<Arc<Vec<Item>>, FetchError> {
        self.load_category(Category::Tips).await
    }

    pub async fn costs(&self) -> Result<Arc<Vec<Item>>, FetchError> {
        self.load_category(Category::Costs).await
    }

    pub async fn contacts(&self) -> Result<Arc<Vec<Item>>, FetchError> {
        self.load_category(Category::Contacts).await
    }

    /// Guides whose `category` field equals `name`.
    pub async fn guides_by_category(&self, name: &str) -> Result<Vec<Item>, FetchError> {
        Ok(filter_by(&self.guides().await?, "category", name))
    }

    /// Locations whose `type` field equals `kind`; `all` returns every location.
    pub async fn locations_by_type(&self, kind: &str) -> Result<Vec<Item>, FetchError> {
        let locations = self.locations().await?;
        if kind == "all" {
            return Ok(locations.to_vec());
        }
        Ok(filter_by(&locations, "type", kind))
    }

    /// Locations passing every filter, in dataset order.
    pub async fn filter_locations(&self, filters: &[LocationFilter]) -> Result<Vec<Item>, FetchError> {
        Ok(self
            .locations()
            .await?
            .iter()
            .filter(|location| passes_all(location, filters))
            .cloned()
            .collect())
    }

    /// Map-panel lookup by name or address. A blank query returns every
    /// location.
    pub async fn search_locations(&self, query: &str) -> Result<Vec<Item>, FetchError> {
        let locations = self.locations().await?;
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(locations.to_vec());
        }
        Ok(locations
            .iter()
            .filter(|location| location_matches(location, &needle))
            .cloned()
            .collect())
    }

    pub async fn location_by_id(&self, id: &str) -> Result<Option<Item>, FetchError> {
        Ok(self.locations().await?.iter().find(|l| l.id == id).cloned())
    }

    pub async fn guide_by_id(&self, id: &str) -> Result<Option<Item>, FetchError> {
        Ok(self.guides().await?.iter().find(|g| g.id == id).cloned())
    }

    /// Search locations plus whichever of guides and routes are already
    /// cached. Locations are loaded if needed; guides and routes never are.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, FetchError> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let locations = self.locations().await?;
        let guides = self.cached(Category::Guides);
        let routes = self.cached(Category::Routes);

        let results = search_items(
            query,
            &locations,
            guides.as_deref().map(Vec::as_slice),
            routes.as_deref().map(Vec::as_slice),
            &self.search,
        );
        tracing::debug!(query, results = results.len(), "Search complete");
        metrics::record_search(results.len());
        Ok(results)
    }

    /// Counts for the home view. Loads locations, guides, routes and tips.
    pub async fn stats(&self) -> Result<Stats, FetchError> {
        Ok(Stats {
            total_locations: self.locations().await?.len(),
            total_guides: self.guides().await?.len(),
            total_routes: self.routes().await?.len(),
            total_tips: self.tips().await?.len(),
        })
    }

    /// The configured description of the dataset.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// The configured description overlaid with whatever the dataset says
    /// about itself: the source's own `metadata` (or the one stored next to
    /// the locations array) and its `statistics`, when present.
    pub async fn dataset_metadata(&self) -> Result<Value, FetchError> {
        let info = self.source.dataset_info().await?;
        let dataset = match info.metadata {
            Some(metadata) => Some(metadata),
            None => {
                self.locations().await?;
                self.locations_metadata.get().cloned()
            }
        };

        let mut merged = Map::new();
        merged.insert("project".into(), json!(self.metadata.project));
        merged.insert("dataVersion".into(), json!(self.metadata.data_version));
        merged.insert("description".into(), json!(self.metadata.description));
        if let Some(Value::Object(dataset)) = dataset {
            merged.extend(dataset);
        }
        if let Some(statistics) = info.statistics {
            merged.insert("statistics".into(), statistics);
        }
        Ok(Value::Object(merged))
    }

    pub fn search_config(&self) -> &SearchConfig {
        &self.search
    }
}

impl std::fmt::Debug for DataLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataLoader")
            .field("loaded", &self.loaded_categories())
            .finish_non_exhaustive()
    }
}

fn filter_by(items: &[Item], field: &str, value: &str) -> Vec<Item> {
    items
        .iter()
        .filter(|item| item.str_field(field) == Some(value))
        .cloned()
        .collect()
}

/// Accept either a bare array or an object holding the array under the
/// category's key. A `null` under that key is an empty category.
pub(crate) fn unwrap_category(
    category: Category,
    document: Value,
    resource: &str,
) -> Result<Vec<Item>, FetchError> {
    let list = match document {
        Value::Array(_) => document,
        Value::Object(mut map) => match map.remove(category.as_str()) {
            Some(Value::Null) => return Ok(Vec::new()),
            Some(inner @ Value::Array(_)) => inner,
            Some(_) => {
                return Err(FetchError::parse(
                    resource,
                    format!("field '{}' is not an array", category),
                ))
            }
            None => {
                return Err(FetchError::parse(
                    resource,
                    format!("expected an array or an object with a '{}' field", category),
                ))
            }
        },
        _ => {
            return Err(FetchError::parse(
                resource,
                "expected an array or an object",
            ))
        }
    };

    serde_json::from_value(list).map_err(|e| FetchError::parse(resource, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::source::MemorySource;
    use futures_util::future::BoxFuture;
    use futures_util::FutureExt;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn loader_with(source: MemorySource) -> (Arc<MemorySource>, DataLoader) {
        let source = Arc::new(source);
        let loader = DataLoader::new(source.clone());
        (source, loader)
    }

    #[test]
    fn test_unwrap_bare_and_wrapped() {
        let bare = unwrap_category(Category::Tips, json!([{"id": "t1"}]), "tips").unwrap();
        let wrapped = unwrap_category(
            Category::Tips,
            json!({"metadata": {"count": 1}, "tips": [{"id": "t1"}]}),
            "tips",
        )
        .unwrap();
        assert_eq!(bare, wrapped);
        assert_eq!(bare[0].id, "t1");
    }

    #[test]
    fn test_unwrap_rejects_other_shapes() {
        let wrong_key = unwrap_category(Category::Tips, json!({"guides": []}), "tips");
        assert!(wrong_key.unwrap_err().is_parse());

        let scalar = unwrap_category(Category::Tips, json!("tips"), "tips");
        assert!(scalar.unwrap_err().is_parse());

        let bad_item = unwrap_category(Category::Tips, json!([{"title": "no id"}]), "tips");
        assert!(bad_item.unwrap_err().is_parse());
    }

    #[test]
    fn test_unwrap_null_is_empty() {
        let items = unwrap_category(Category::Costs, json!({"costs": null}), "costs").unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_second_load_is_cached() {
        let (source, loader) = loader_with(
            MemorySource::new().with(Category::Guides, json!({"guides": [{"id": "g1"}]})),
        );

        let first = loader.load_category(Category::Guides).await.unwrap();
        let second = loader.load_category(Category::Guides).await.unwrap();

        assert_eq!(source.fetch_count(Category::Guides), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(loader.is_loaded(Category::Guides));
        assert_eq!(loader.loaded_categories(), vec![Category::Guides]);
    }

    #[tokio::test]
    async fn test_concurrent_loads_share_one_fetch() {
        let (source, loader) = loader_with(
            MemorySource::new()
                .with(Category::Routes, json!([{"id": "r1"}, {"id": "r2"}]))
                .with_delay(Duration::from_millis(50)),
        );

        let (a, b, c) = tokio::join!(
            loader.routes(),
            loader.routes(),
            loader.load_category(Category::Routes)
        );

        assert_eq!(a.unwrap().len(), 2);
        assert_eq!(b.unwrap().len(), 2);
        assert_eq!(c.unwrap().len(), 2);
        assert_eq!(source.fetch_count(Category::Routes), 1);
    }

    struct FlakySource {
        calls: AtomicUsize,
    }

    impl DataSource for FlakySource {
        fn describe(&self, category: Category) -> String {
            format!("flaky:{category}")
        }

        fn fetch(&self, _category: Category) -> BoxFuture<'_, Result<Value, FetchError>> {
            async move {
                if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(FetchError::Network {
                        resource: "flaky".into(),
                        status: 503,
                    })
                } else {
                    Ok(json!([{"id": "L1"}]))
                }
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let source = Arc::new(FlakySource {
            calls: AtomicUsize::new(0),
        });
        let loader = DataLoader::new(source.clone());

        let err = loader.locations().await.unwrap_err();
        assert!(matches!(err, FetchError::Network { status: 503, .. }));
        assert!(!loader.is_loaded(Category::Locations));

        let items = loader.locations().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_filters_use_exact_match() {
        let (source, loader) = loader_with(
            MemorySource::new()
                .with(
                    Category::Guides,
                    json!([
                        {"id": "g1", "category": "gas_systems"},
                        {"id": "g2", "category": "legal"},
                        {"id": "g3", "category": "gas_systems_extra"}
                    ]),
                )
                .with(
                    Category::Locations,
                    json!([{"id": "l1", "type": "parking"}, {"id": "l2", "type": "campground"}]),
                ),
        );

        let gas = loader.guides_by_category("gas_systems").await.unwrap();
        assert_eq!(gas.iter().map(|g| g.id.as_str()).collect::<Vec<_>>(), vec!["g1"]);

        let parking = loader.locations_by_type("parking").await.unwrap();
        assert_eq!(parking.len(), 1);

        assert_eq!(source.total_fetches(), 2);
    }

    #[tokio::test]
    async fn test_type_all_returns_everything() {
        let (_, loader) = loader_with(MemorySource::new().with(
            Category::Locations,
            json!([{"id": "l1", "type": "parking"}, {"id": "l2", "type": "scenic"}]),
        ));
        assert_eq!(loader.locations_by_type("all").await.unwrap().len(), 2);
        assert_eq!(loader.locations_by_type("scenic").await.unwrap()[0].id, "l2");
        assert!(loader.locations_by_type("storage").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_filter_locations() {
        let (_, loader) = loader_with(MemorySource::new().with(
            Category::Locations,
            json!([
                {"id": "l1", "amenities": ["water"], "cost": {"type": "free"}},
                {"id": "l2", "amenities": ["water", "electricity"], "cost": {"type": "paid"}},
                {"id": "l3"}
            ]),
        ));
        let ids = |items: Vec<Item>| items.into_iter().map(|i| i.id).collect::<Vec<_>>();

        let water = loader.filter_locations(&LocationFilter::parse_list("water")).await.unwrap();
        assert_eq!(ids(water), vec!["l1", "l2"]);
        let free = loader.filter_locations(&[LocationFilter::Free]).await.unwrap();
        assert_eq!(ids(free), vec!["l1"]);
        assert_eq!(loader.filter_locations(&[]).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_search_locations() {
        let (_, loader) = loader_with(MemorySource::new().with(
            Category::Locations,
            json!([
                {"id": "l1", "name": {"en": "Dolomites Pass"}, "address": {"city": "Bolzano", "country": "Italy"}},
                {"id": "l2", "name": "Lake Bled", "address": {"country": "Slovenia"}}
            ]),
        ));
        assert_eq!(loader.search_locations("  BOLZANO ").await.unwrap()[0].id, "l1");
        assert_eq!(loader.search_locations("slovenia").await.unwrap()[0].id, "l2");
        assert_eq!(loader.search_locations("   ").await.unwrap().len(), 2);
        assert!(loader.search_locations("croatia").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dataset_metadata_from_locations_document() {
        let (_, loader) = loader_with(MemorySource::new().with(
            Category::Locations,
            json!({
                "metadata": {"dataVersion": "3.1", "totalLocations": 1},
                "locations": [{"id": "l1"}]
            }),
        ));
        let metadata = loader.dataset_metadata().await.unwrap();
        assert_eq!(metadata["dataVersion"], "3.1");
        assert_eq!(metadata["totalLocations"], 1);
        assert_eq!(metadata["project"], "Ultimate Motorhome Knowledge Library");
        assert!(metadata.get("statistics").is_none());
    }

    #[tokio::test]
    async fn test_dataset_metadata_defaults_to_config() {
        let (_, loader) = loader_with(MemorySource::new().with(Category::Locations, json!([])));
        let metadata = loader.dataset_metadata().await.unwrap();
        assert_eq!(metadata["dataVersion"], "2.0-categorized");
        assert_eq!(metadata["description"], "Categorized dataset with lazy loading");
    }

    #[tokio::test]
    async fn test_lookup_by_id() {
        let (_, loader) = loader_with(
            MemorySource::new().with(Category::Guides, json!([{"id": "guide-010-005"}])),
        );
        assert!(loader.guide_by_id("guide-010-005").await.unwrap().is_some());
        assert!(loader.guide_by_id("guide-999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_does_not_load_guides_or_routes() {
        let (source, loader) = loader_with(
            MemorySource::new()
                .with(Category::Locations, json!([{"id": "L1", "name": "Solar farm parking"}]))
                .with(Category::Guides, json!([{"id": "G1", "title": "Solar power"}])),
        );

        let results = loader.search("solar").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(source.fetch_count(Category::Guides), 0);

        loader.guides().await.unwrap();
        let results = loader.search("solar").await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(source.fetch_count(Category::Locations), 1);
    }

    #[tokio::test]
    async fn test_empty_search_loads_nothing() {
        let (source, loader) = loader_with(MemorySource::new());
        assert!(loader.search("").await.unwrap().is_empty());
        assert_eq!(source.total_fetches(), 0);
    }

    #[tokio::test]
    async fn test_stats_loads_four_categories() {
        let (source, loader) = loader_with(
            MemorySource::new()
                .with(Category::Locations, json!([{"id": "l1"}, {"id": "l2"}]))
                .with(Category::Guides, json!({"guides": [{"id": "g1"}]}))
                .with(Category::Routes, json!([]))
                .with(Category::Tips, json!({"tips": null})),
        );

        let stats = loader.stats().await.unwrap();
        assert_eq!(
            stats,
            Stats {
                total_locations: 2,
                total_guides: 1,
                total_routes: 0,
                total_tips: 0,
            }
        );
        assert_eq!(source.fetch_count(Category::Costs), 0);
        assert_eq!(source.fetch_count(Category::Contacts), 0);
    }
}
