//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     trigger() → every waiter resolves → listeners stop, server drains
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → resolve the shutdown future passed to serve/run loops
//! ```
//!
//! # Design Decisions
//! - A trigger that fires before anyone waits is not lost
//! - Signal handling is optional; embedders pass their own futures

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::terminate_signal;
