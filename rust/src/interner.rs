//! Activity id interning.
//!
//! Maps caller-supplied activity ids to dense `u32` indices so the graph and
//! both passes work on flat vectors. Indices follow first-insertion order.
//! Holds at most [`crate::graph::MAX_ACTIVITIES`] ids; `ScheduleGraph::build`
//! rejects larger scopes before interning.

use rustc_hash::FxHashMap;

/// Dense index of an activity within one scheduling scope.
pub type ActivityIdx = u32;

/// Bidirectional activity id <-> index map.
#[derive(Debug, Clone, Default)]
pub struct ActivityIndex {
    to_idx: FxHashMap<String, ActivityIdx>,
    from_idx: Vec<String>,
}

impl ActivityIndex {
    /// Create an empty index with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_idx: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            from_idx: Vec::with_capacity(capacity),
        }
    }

    /// Register a new id. Returns `None` if the id is already registered.
    pub fn insert(&mut self, id: &str) -> Option<ActivityIdx> {
        if self.to_idx.contains_key(id) {
            return None;
        }
        debug_assert!(self.from_idx.len() < crate::graph::MAX_ACTIVITIES);
        let idx = self.from_idx.len() as ActivityIdx;
        self.from_idx.push(id.to_string());
        self.to_idx.insert(id.to_string(), idx);
        Some(idx)
    }

    /// Index of an id, if registered.
    #[inline]
    pub fn get(&self, id: &str) -> Option<ActivityIdx> {
        self.to_idx.get(id).copied()
    }

    /// Id for an index. Indices come from this interner, so a miss is a bug.
    #[inline]
    pub fn resolve(&self, idx: ActivityIdx) -> &str {
        &self.from_idx[idx as usize]
    }

    /// Number of registered ids.
    pub fn len(&self) -> usize {
        self.from_idx.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.from_idx.is_empty()
    }
}
