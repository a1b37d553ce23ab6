//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → handed to the data source, router and search surfaces
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so an empty file is a valid config
//! - Validation separates syntactic (serde) from semantic checks
//! - CLI flags override file values after loading, before validation

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::AppConfig;
pub use schema::DataConfig;
pub use schema::Metadata;
pub use schema::ObservabilityConfig;
pub use schema::RouterConfig;
pub use schema::SearchConfig;
pub use schema::ServerConfig;
pub use schema::SourceKind;
