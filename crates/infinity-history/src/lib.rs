//! Local history for the Infinity gateway
//!
//! Keeps the most recent calculations (50) and analyses (20) plus user
//! preferences in a JSON file. The store is a plain owned value: whoever
//! needs it opens it and passes it along.

pub mod bounded;
pub mod entry;
pub mod error;
pub mod store;

pub use bounded::BoundedHistory;
pub use entry::{HistoryEntry, Preferences};
pub use error::{HistoryError, Result};
pub use store::{ANALYSIS_CAPACITY, CALCULATION_CAPACITY, HistoryStore};
