//! In-flight request deduplication
//!
//! Collapses duplicate concurrent reads into a single network call: the
//! first caller for a key starts the operation, later callers joining
//! before it settles share the same eventual outcome.

mod key;
mod registry;

pub use key::build_key;
pub use registry::{PendingResult, RequestCache, DEFAULT_INFLIGHT_TTL};
