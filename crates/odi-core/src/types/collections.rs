//! Fast hash collections used on hot paths.

pub use rustc_hash::{FxHashMap, FxHashSet};
