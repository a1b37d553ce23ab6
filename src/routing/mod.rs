//! Fragment routing subsystem.
//!
//! # Data Flow
//! ```text
//! Fragment change (user or navigate_to)
//!     → location.rs (HashLocation publishes the new fragment)
//!     → router.rs (split into route name + params, look up handler)
//!     → handler(params) awaited to completion
//!     → Return: Handled, Redirected to default, or Ignored
//! ```
//!
//! # Design Decisions
//! - Exact route-name lookup; parameters are never interpreted here
//! - Unknown routes redirect to the default route instead of erroring
//! - Setting the fragment to its current value publishes nothing, so a
//!   redirect to an unregistered default cannot loop

pub mod location;
pub mod router;

pub use location::HashLocation;
pub use router::{query_param, split_route, Dispatch, Params, Router, RouterState};
