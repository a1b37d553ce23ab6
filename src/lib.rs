//! Roadbook: a motorhome travel knowledge library.
//!
//! # Architecture Overview
//!
//! ```text
//!   fragment change ──▶ routing ──▶ app::Controller ──▶ views ──▶ Container
//!   (HashLocation)      (Router)    (sequence guard)      │
//!                                                         ▼
//!                                                   data::DataLoader
//!                                               (one load per category)
//!                                                         │
//!                                                         ▼
//!                                          DataSource: http | file | unified
//!
//!   serve mode:  axum ──▶ views / DataLoader (stateless per request)
//! ```
//!
//! Cross-cutting: `config` (TOML + validation), `observability` (tracing,
//! metrics facade), `lifecycle` (shutdown), `error`.

// Core subsystems
pub mod app;
pub mod data;
pub mod routing;
pub mod views;

// Surfaces
pub mod http;

// Cross-cutting concerns
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod observability;

pub use app::{App, Container};
pub use config::AppConfig;
pub use data::DataLoader;
pub use error::{Error, Result};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{HashLocation, Router};
