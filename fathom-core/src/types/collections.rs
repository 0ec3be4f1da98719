//! Hash collections. FxHash throughout for speed on integer keys.

pub use rustc_hash::{FxHashMap, FxHashSet};
