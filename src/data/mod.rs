//! Data subsystem.
//!
//! # Data Flow
//! ```text
//! DataLoader::locations() / guides() / ...
//!     → loader.rs (per-category OnceCell; cache hit returns immediately)
//!     → source.rs (DataSource::fetch on first access only)
//!     → loader.rs (unwrap bare array or { <category>: [...] } → Vec<Item>)
//!     → cached Arc<Vec<Item>> shared with every caller
//!
//! DataLoader::search(query)
//!     → search.rs (locations, then cached guides, then cached routes; cap)
//! ```
//!
//! # Design Decisions
//! - A category is fetched at most once per loader; concurrent first
//!   accesses share one in-flight load
//! - Failed loads are not cached, so the next access retries
//! - Items stay schemaless JSON objects; views pick the fields they need

pub mod category;
pub mod filter;
pub mod item;
pub mod loader;
pub mod localized;
pub mod search;
pub mod source;

pub use category::Category;
pub use filter::LocationFilter;
pub use item::{Coordinates, Item};
pub use loader::{DataLoader, Stats};
pub use localized::{localized_text, Language, LocalizedText};
pub use search::{ResultKind, SearchResult};
pub use source::{DataSource, DatasetInfo, FileSource, HttpSource, MemorySource, UnifiedSource};
