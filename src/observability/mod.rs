//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters and histograms via the `metrics` facade)
//!
//! Consumers:
//!     → stderr (pretty or JSON lines)
//!     → whichever metrics recorder the embedding binary installs
//! ```
//!
//! # Design Decisions
//! - Structured fields (category, route, sequence) rather than formatted text
//! - `RUST_LOG` overrides the configured level
//! - No recorder is installed by default; metric calls are then no-ops

pub mod logging;
pub mod metrics;
