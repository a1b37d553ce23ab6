//! HTTP surface for `serve` mode.
//!
//! # Data Flow
//! ```text
//! GET /view/<fragment>
//!     → split into route + params (same rules as the fragment router)
//!     → ViewRegistry builds a fresh view → render → text/html
//!
//! GET /api/search | /api/stats | /api/metadata
//!     → shared DataLoader (cached categories) → JSON
//! ```

pub mod server;

pub use server::{AppState, HttpServer};
