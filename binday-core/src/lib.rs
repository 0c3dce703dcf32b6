//! Core types and resolution engine for the binday collection schedule app.

/// Service-label classification and display-date formatting.
pub mod classify;
/// State machine driving postcode input, lookups, and schedule fetches.
pub mod controller;
/// Domain models and identifiers.
pub mod model;
/// Traits describing the backend and persistence interfaces.
pub mod ports;
/// UK postcode normalization and validation.
pub mod postcode;
/// Persistence of the chosen address between runs.
pub mod store;

pub use classify::*;
pub use controller::*;
pub use model::*;
pub use ports::*;
pub use store::*;
