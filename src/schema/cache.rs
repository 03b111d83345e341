//! # Query Cache
//!
//! Memoized name/tag lookups over the schema tables.
//!
//! The type arena and protocol table are plain vectors in parse order, so a
//! cold lookup is a linear scan. The cache stores the resolved arena index
//! under the queried key on first use; population is idempotent and the
//! cache lives exactly as long as the owning schema, with no eviction.
//!
//! `RwLock`-guarded maps keep first-lookup insertion safe when a schema is
//! shared across threads (the schema itself is never mutated after load).
//! A poisoned lock simply degrades that lookup to an uncached scan; the
//! cache is an optimization, never a correctness dependency.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;

/// Lookup memoization for a loaded schema.
#[derive(Debug, Default)]
pub(crate) struct QueryCache {
    /// type name -> arena index
    types: RwLock<HashMap<String, usize>>,
    /// protocol name -> protocol table index
    protocol_names: RwLock<HashMap<String, usize>>,
    /// protocol tag -> protocol table index
    protocol_tags: RwLock<HashMap<u32, usize>>,
}

/// First-lookup-computes memoization over one guarded map.
fn memoize<K, Q>(
    map: &RwLock<HashMap<K, usize>>,
    key: &Q,
    compute: impl FnOnce() -> Option<usize>,
) -> Option<usize>
where
    K: Eq + Hash,
    Q: Eq + Hash + ToOwned<Owned = K> + ?Sized,
    K: std::borrow::Borrow<Q>,
{
    if let Ok(cached) = map.read() {
        if let Some(&index) = cached.get(key) {
            return Some(index);
        }
    }
    let index = compute()?;
    if let Ok(mut cached) = map.write() {
        cached.entry(key.to_owned()).or_insert(index);
    }
    Some(index)
}

impl QueryCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn type_index(
        &self,
        name: &str,
        compute: impl FnOnce() -> Option<usize>,
    ) -> Option<usize> {
        memoize(&self.types, name, compute)
    }

    pub(crate) fn protocol_by_name(
        &self,
        name: &str,
        compute: impl FnOnce() -> Option<usize>,
    ) -> Option<usize> {
        memoize(&self.protocol_names, name, compute)
    }

    pub(crate) fn protocol_by_tag(
        &self,
        tag: u32,
        compute: impl FnOnce() -> Option<usize>,
    ) -> Option<usize> {
        memoize(&self.protocol_tags, &tag, compute)
    }
}
