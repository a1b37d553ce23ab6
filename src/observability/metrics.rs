//! Metrics collection.
//!
//! # Metrics
//! - `roadbook_category_fetches_total` (counter): loads by category, outcome
//! - `roadbook_renders_total` (counter): view renders by route, outcome
//! - `roadbook_search_results` (histogram): result count per search
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; exporting is left to the host
//! - Route labels are registered route names, or `unknown`, to keep
//!   cardinality bounded

use metrics::{counter, histogram};

use crate::data::Category;

/// Record a category load attempt.
pub fn record_category_fetch(category: Category, outcome: &'static str) {
    counter!(
        "roadbook_category_fetches_total",
        "category" => category.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a view render. `route` is the main route name.
pub fn record_render(route: &str, outcome: &'static str) {
    counter!(
        "roadbook_renders_total",
        "route" => route.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record the number of results a search produced.
pub fn record_search(results: usize) {
    histogram!("roadbook_search_results").record(results as f64);
}
