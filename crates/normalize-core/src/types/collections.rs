//! Hash collections used across the workspace.
//!
//! FxHash is fast for the small integer and string keys we use (node ids,
//! paths). Iteration order is unspecified, so anything that ends up in IR
//! output must be sorted or use an ordered map instead.

pub use rustc_hash::{FxHashMap, FxHashSet};
