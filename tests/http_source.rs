//! Category loading over HTTP against a mock dataset server.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use url::Url;

use roadbook::config::schema::CategoryPaths;
use roadbook::config::{AppConfig, SourceKind};
use roadbook::data::{Category, DataLoader, HttpSource};
use roadbook::error::FetchError;
use roadbook::App;

mod common;

fn loader_for(addr: std::net::SocketAddr) -> DataLoader {
    let base = Url::parse(&format!("http://{addr}/")).unwrap();
    let source = HttpSource::new(base, CategoryPaths::default(), Duration::from_secs(5));
    DataLoader::new(Arc::new(source))
}

#[tokio::test]
async fn test_one_request_per_category() {
    let hits: Arc<Mutex<HashMap<String, u32>>> = Arc::default();
    let recorded = hits.clone();
    let addr = common::start_programmable_backend(move |path| {
        *recorded.lock().unwrap().entry(path.clone()).or_default() += 1;
        async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            if path.ends_with("dataset-guides.json") {
                (200, r#"{"guides": [{"id": "G1", "title": "Solar basics"}]}"#.to_string())
            } else {
                (200, r#"[{"id": "L1", "name": "Alpine Spot"}]"#.to_string())
            }
        }
    })
    .await;

    let loader = Arc::new(loader_for(addr));
    let mut tasks = Vec::new();
    for _ in 0..5 {
        let loader = loader.clone();
        tasks.push(tokio::spawn(async move { loader.locations().await }));
    }
    for task in tasks {
        assert_eq!(task.await.unwrap().unwrap().len(), 1);
    }
    let guides = loader.guides().await.unwrap();
    assert_eq!(guides[0].id, "G1");
    loader.guides().await.unwrap();

    let hits = hits.lock().unwrap();
    assert_eq!(hits.get("/datasets/mvp-locations-curated.json"), Some(&1));
    assert_eq!(hits.get("/datasets/dataset-guides.json"), Some(&1));
    assert_eq!(hits.len(), 2);
}

#[tokio::test]
async fn test_server_error_is_not_cached() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let addr = common::start_programmable_backend(move |_| {
        let count = counter.fetch_add(1, Ordering::SeqCst);
        async move {
            if count == 0 {
                (500, "boom".to_string())
            } else {
                (200, r#"{"routes": [{"id": "R1"}]}"#.to_string())
            }
        }
    })
    .await;

    let loader = loader_for(addr);

    let err = loader.routes().await.unwrap_err();
    assert!(matches!(err, FetchError::Network { status: 500, .. }), "{err:?}");
    assert!(!loader.is_loaded(Category::Routes));

    let routes = loader.routes().await.unwrap();
    assert_eq!(routes.len(), 1);
    assert!(loader.is_loaded(Category::Routes));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let addr = common::start_programmable_backend(|_| async { (200, "{not json".to_string()) }).await;
    let loader = loader_for(addr);

    let err = loader.tips().await.unwrap_err();
    assert!(err.is_parse(), "{err:?}");
}

#[tokio::test]
async fn test_app_configured_for_http() {
    let addr = common::start_programmable_backend(|_| async {
        (200, r#"{"locations": [{"id": "L9", "name": {"en": "Harbour View"}}]}"#.to_string())
    })
    .await;

    let mut config = AppConfig::default();
    config.data.source = SourceKind::Http;
    config.data.base_url = format!("http://{addr}/");

    let app = App::builder().config(config).build().unwrap();
    app.navigate("locations").await;

    assert!(app.container().html().contains("Harbour View"));
}
