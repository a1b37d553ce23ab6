//! Category resource retrieval.
//!
//! # Responsibilities
//! - Fetch the raw JSON document for one category
//! - Map transport failures into [`FetchError`]
//!
//! # Design Decisions
//! - Sources never cache; caching belongs to the loader
//! - Sources return the document as-is; unwrapping `{ <category>: [...] }`
//!   happens in the loader so every source gets the same normalization
//! - The unified source is the exception: it reads one document holding
//!   every category and keeps it, since splitting it is its whole job

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde_json::Value;
use tokio::sync::OnceCell;
use url::Url;

use crate::config::schema::{CategoryPaths, DataConfig, SourceKind};
use crate::data::Category;
use crate::error::FetchError;

/// What a dataset says about itself outside the category arrays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetInfo {
    pub metadata: Option<Value>,
    pub statistics: Option<Value>,
}

/// Retrieves raw category documents.
pub trait DataSource: Send + Sync {
    /// Human-readable resource name used in logs and errors.
    fn describe(&self, category: Category) -> String;

    /// Fetch the document for `category`.
    fn fetch(&self, category: Category) -> BoxFuture<'_, Result<Value, FetchError>>;

    /// Dataset-level `metadata` and `statistics`, for sources that keep them
    /// outside the category documents.
    fn dataset_info(&self) -> BoxFuture<'_, Result<DatasetInfo, FetchError>> {
        async { Ok(DatasetInfo::default()) }.boxed()
    }
}

/// Build the source selected by the configuration.
pub fn from_config(config: &DataConfig) -> Result<Arc<dyn DataSource>, FetchError> {
    let source: Arc<dyn DataSource> = match config.source {
        SourceKind::Http => Arc::new(HttpSource::from_config(config)?),
        SourceKind::File => Arc::new(FileSource::new(&config.root, config.paths.clone())),
        SourceKind::Unified => Arc::new(UnifiedSource::new(
            PathBuf::from(&config.root).join(&config.unified_path),
        )),
    };
    Ok(source)
}

fn parse_json(resource: &str, bytes: &[u8]) -> Result<Value, FetchError> {
    serde_json::from_slice(bytes).map_err(|e| FetchError::parse(resource, e))
}

/// Fetches each category from `<base_url>/<path>`.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base: Url,
    paths: CategoryPaths,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(base: Url, paths: CategoryPaths, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base,
            paths,
            timeout,
        }
    }

    pub fn from_config(config: &DataConfig) -> Result<Self, FetchError> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| FetchError::parse(config.base_url.clone(), e))?;
        Ok(Self::new(
            base,
            config.paths.clone(),
            Duration::from_secs(config.timeout_secs),
        ))
    }

    fn url_for(&self, category: Category) -> Result<Url, FetchError> {
        let path = self.paths.get(category);
        self.base
            .join(path)
            .map_err(|e| FetchError::parse(path.to_string(), e))
    }

    async fn fetch_inner(&self, category: Category) -> Result<Value, FetchError> {
        let url = self.url_for(category)?;
        let resource = url.to_string();

        tracing::debug!(%category, url = %resource, "Fetching category over HTTP");

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|source| {
                if source.is_timeout() {
                    FetchError::Timeout {
                        resource: resource.clone(),
                        secs: self.timeout.as_secs(),
                    }
                } else {
                    FetchError::Transport {
                        resource: resource.clone(),
                        source,
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Network {
                resource,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|source| FetchError::Transport {
            resource: resource.clone(),
            source,
        })?;
        parse_json(&resource, &body)
    }
}

impl DataSource for HttpSource {
    fn describe(&self, category: Category) -> String {
        self.url_for(category)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| self.paths.get(category).to_string())
    }

    fn fetch(&self, category: Category) -> BoxFuture<'_, Result<Value, FetchError>> {
        self.fetch_inner(category).boxed()
    }
}

/// Reads each category from a file under a root directory.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
    paths: CategoryPaths,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>, paths: CategoryPaths) -> Self {
        Self {
            root: root.into(),
            paths,
        }
    }

    fn path_for(&self, category: Category) -> PathBuf {
        self.root.join(self.paths.get(category))
    }
}

impl DataSource for FileSource {
    fn describe(&self, category: Category) -> String {
        self.path_for(category).display().to_string()
    }

    fn fetch(&self, category: Category) -> BoxFuture<'_, Result<Value, FetchError>> {
        async move {
            let path = self.path_for(category);
            let resource = path.display().to_string();
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|source| FetchError::Io {
                    resource: resource.clone(),
                    source,
                })?;
            parse_json(&resource, &bytes)
        }
        .boxed()
    }
}

/// Serves every category out of one document of the form
/// `{ "metadata": {..}, "statistics": {..}, "data": { "<category>": [...] } }`.
#[derive(Debug)]
pub struct UnifiedSource {
    path: PathBuf,
    document: OnceCell<Arc<Value>>,
}

impl UnifiedSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            document: OnceCell::new(),
        }
    }

    async fn document(&self) -> Result<Arc<Value>, FetchError> {
        self.document
            .get_or_try_init(|| async {
                let resource = self.path.display().to_string();
                let bytes = tokio::fs::read(&self.path)
                    .await
                    .map_err(|source| FetchError::Io {
                        resource: resource.clone(),
                        source,
                    })?;
                let document = parse_json(&resource, &bytes)?;
                if !document.get("data").is_some_and(Value::is_object) {
                    return Err(FetchError::parse(resource, "missing 'data' object"));
                }
                tracing::info!(path = %resource, "Unified dataset loaded");
                Ok(Arc::new(document))
            })
            .await
            .cloned()
    }

    /// The `metadata` object of the unified document, if any.
    pub async fn metadata(&self) -> Result<Option<Value>, FetchError> {
        Ok(self.document().await?.get("metadata").cloned())
    }

    /// The `statistics` object of the unified document, if any.
    pub async fn statistics(&self) -> Result<Option<Value>, FetchError> {
        Ok(self.document().await?.get("statistics").cloned())
    }
}

impl DataSource for UnifiedSource {
    fn describe(&self, category: Category) -> String {
        format!("{}#data.{}", self.path.display(), category)
    }

    fn dataset_info(&self) -> BoxFuture<'_, Result<DatasetInfo, FetchError>> {
        async move {
            Ok(DatasetInfo {
                metadata: self.metadata().await?,
                statistics: self.statistics().await?,
            })
        }
        .boxed()
    }

    fn fetch(&self, category: Category) -> BoxFuture<'_, Result<Value, FetchError>> {
        async move {
            let document = self.document().await?;
            // A category absent from the unified document is simply empty.
            Ok(document
                .get("data")
                .and_then(|data| data.get(category.as_str()))
                .cloned()
                .unwrap_or_else(|| Value::Array(Vec::new())))
        }
        .boxed()
    }
}

/// In-memory documents, for embedding and tests. Counts fetches per category.
#[derive(Debug, Default)]
pub struct MemorySource {
    documents: HashMap<Category, Value>,
    fetches: [AtomicUsize; 6],
    delay: Option<Duration>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, category: Category, document: Value) -> Self {
        self.documents.insert(category, document);
        self
    }

    /// Delay every fetch, to widen the window for concurrent callers.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn fetch_count(&self, category: Category) -> usize {
        self.fetches[category.index()].load(Ordering::SeqCst)
    }

    pub fn total_fetches(&self) -> usize {
        Category::ALL.iter().map(|c| self.fetch_count(*c)).sum()
    }
}

impl DataSource for MemorySource {
    fn describe(&self, category: Category) -> String {
        format!("memory:{}", category)
    }

    fn fetch(&self, category: Category) -> BoxFuture<'_, Result<Value, FetchError>> {
        async move {
            self.fetches[category.index()].fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.documents
                .get(&category)
                .cloned()
                .ok_or_else(|| FetchError::Network {
                    resource: self.describe(category),
                    status: 404,
                })
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("roadbook-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_file_source_reads_configured_path() {
        let dir = temp_dir("file-source");
        let mut paths = CategoryPaths::default();
        paths.tips = "tips.json".to_string();
        std::fs::write(dir.join("tips.json"), r#"{"tips": [{"id": "t1"}]}"#).unwrap();

        let source = FileSource::new(&dir, paths);
        let doc = source.fetch(Category::Tips).await.unwrap();
        assert_eq!(doc, json!({"tips": [{"id": "t1"}]}));

        let err = source.fetch(Category::Costs).await.unwrap_err();
        assert!(matches!(err, FetchError::Io { .. }));

        std::fs::remove_dir_all(&dir).unwrap_or_default();
    }

    #[tokio::test]
    async fn test_file_source_malformed_json() {
        let dir = temp_dir("file-source-bad");
        let mut paths = CategoryPaths::default();
        paths.routes = "routes.json".to_string();
        std::fs::write(dir.join("routes.json"), "{ not json").unwrap();

        let err = FileSource::new(&dir, paths)
            .fetch(Category::Routes)
            .await
            .unwrap_err();
        assert!(err.is_parse());

        std::fs::remove_dir_all(&dir).unwrap_or_default();
    }

    #[tokio::test]
    async fn test_unified_source_splits_categories() {
        let dir = temp_dir("unified");
        let path = dir.join("dataset-unified.json");
        std::fs::write(
            &path,
            r#"{"metadata": {"version": "1"}, "data": {"locations": [{"id": "L1"}], "guides": []}}"#,
        )
        .unwrap();

        let source = UnifiedSource::new(&path);
        assert_eq!(
            source.fetch(Category::Locations).await.unwrap(),
            json!([{"id": "L1"}])
        );
        assert_eq!(source.fetch(Category::Tips).await.unwrap(), json!([]));
        assert_eq!(source.metadata().await.unwrap(), Some(json!({"version": "1"})));
        assert_eq!(source.statistics().await.unwrap(), None);
        assert_eq!(
            source.dataset_info().await.unwrap(),
            DatasetInfo {
                metadata: Some(json!({"version": "1"})),
                statistics: None,
            }
        );

        std::fs::remove_dir_all(&dir).unwrap_or_default();
    }

    #[tokio::test]
    async fn test_unified_source_requires_data_object() {
        let dir = temp_dir("unified-bad");
        let path = dir.join("dataset-unified.json");
        std::fs::write(&path, r#"{"locations": []}"#).unwrap();

        let err = UnifiedSource::new(&path)
            .fetch(Category::Locations)
            .await
            .unwrap_err();
        assert!(err.is_parse());

        std::fs::remove_dir_all(&dir).unwrap_or_default();
    }

    #[test]
    fn test_http_source_joins_base_url() {
        let source = HttpSource::new(
            Url::parse("https://kb.example.org/app/").unwrap(),
            CategoryPaths::default(),
            Duration::from_secs(5),
        );
        assert_eq!(
            source.describe(Category::Guides),
            "https://kb.example.org/app/datasets/dataset-guides.json"
        );
    }
}
