//! Hash collections used across the engine.

/// Fast non-cryptographic hash map (FxHash).
pub type FxHashMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// Fast non-cryptographic hash set (FxHash).
pub type FxHashSet<T> = rustc_hash::FxHashSet<T>;
