//! Reversal-vector generation: split timestamped bar streams at reversal edges,
//! compute per-window features and score them into tradeability tiers.
//!
//! The core is pure and synchronous:
//! [`loader`] → [`segment`] → [`sanity`] (diagnostics only) → [`features`] → [`scoring`].
//! [`pipeline`], [`io`] and [`consistency`] are the file-level plumbing around it.

pub mod config;
pub mod consistency;
pub mod errors;
pub mod features;
pub mod io;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod sanity;
pub mod scoring;
pub mod segment;

pub use errors::{Error, Result};
