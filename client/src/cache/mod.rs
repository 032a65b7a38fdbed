//! Query cache and its write helpers

pub mod key;
pub mod query;
pub mod sync;

pub use key::QueryKey;
pub use query::{CacheEntry, QueryCache};
pub use sync::Patch;
