//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use roadbook::data::{Category, MemorySource};

/// Start a programmable mock backend on an ephemeral port.
///
/// `f` receives the request path and returns the status and body to send.
#[allow(dead_code)]
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 4096];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let request = String::from_utf8_lossy(&buf[..n]);
                        let path = request
                            .lines()
                            .next()
                            .and_then(|line| line.split_whitespace().nth(1))
                            .unwrap_or("/")
                            .to_string();

                        let (status, body) = f(path).await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// A small dataset covering every category the views read.
#[allow(dead_code)]
pub fn sample_source() -> MemorySource {
    MemorySource::new()
        .with(
            Category::Locations,
            json!({"locations": [
                {"id": "L1", "name": {"en": "Alpine Spot", "he": "חניון אלפיני"}, "type": "parking",
                 "coordinates": {"lat": 46.5, "lng": 11.35}, "cost": {"type": "free"}},
                {"id": "L2", "name": "Lake Garda Camper Stop", "type": "campsite",
                 "description": {"en": "Quiet stop by the lake"},
                 "coordinates": {"latitude": 45.6, "longitude": 10.6}, "cost": {"amount": 18}}
            ]}),
        )
        .with(
            Category::Guides,
            json!({"guides": [
                {"id": "guide-010-005", "category": "gas_systems", "difficulty": "intermediate",
                 "title": {"en": "LPG refilling in Europe", "he": "מילוי גז באירופה"},
                 "summary": {"en": "Adapters and stations"},
                 "content": [{"step": 1, "title": {"en": "Pick the adapter"}, "description": "ACME, Dish or Bayonet"}],
                 "tips": [{"type": "warning", "text": {"en": "Never overfill"}}]},
                {"id": "guide-020-001", "category": "customs", "title": "Crossing borders with a lake boat"}
            ]}),
        )
        .with(
            Category::Routes,
            json!({"routes": [
                {"id": "R1", "name": {"en": "Lake loop"}, "duration": "3 days", "distance": 240}
            ]}),
        )
        .with(Category::Tips, json!({"tips": [{"id": "T1"}]}))
}
