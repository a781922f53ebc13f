//! Explicit-stack tree construction shared by the text and binary readers.
//!
//! Readers see a flat stream of "open mapping at key", "close mapping" and
//! "scalar at key" events. `TreeBuilder` turns that stream into a tree while
//! applying the duplicate-key merge policy, so both formats agree on what a
//! repeated key means.

use crate::mapper::Mapper;
use crate::types::Value;

/// A mapping that has been opened but not yet closed.
struct Frame<M> {
    key: String,
    map: M,
    /// The mapping was taken out of an existing entry in the parent and must
    /// be written back into that slot on close.
    merged: bool,
}

pub(crate) struct TreeBuilder<M: Mapper> {
    root: M,
    open: Vec<Frame<M>>,
    merge_duplicate_keys: bool,
}

impl<M: Mapper> TreeBuilder<M> {
    pub(crate) fn new(merge_duplicate_keys: bool) -> Self {
        Self {
            root: M::default(),
            open: Vec::new(),
            merge_duplicate_keys,
        }
    }

    /// Nesting depth, counting the root as 1.
    pub(crate) fn depth(&self) -> usize {
        self.open.len() + 1
    }

    fn current(&mut self) -> &mut M {
        match self.open.last_mut() {
            Some(frame) => &mut frame.map,
            None => &mut self.root,
        }
    }

    /// Start a nested mapping under `key`.
    ///
    /// With merging on, an existing mapping at `key` is reopened so new
    /// entries are added to it. Otherwise a fresh mapping replaces whatever
    /// the key held once it is closed.
    pub(crate) fn open(&mut self, key: String) {
        let reopened = if self.merge_duplicate_keys {
            match self.current().get_mut(&key) {
                Some(Value::Mapping(existing)) => Some(std::mem::take(existing)),
                _ => None,
            }
        } else {
            None
        };

        tracing::trace!(key = %key, depth = self.depth() + 1, merged = reopened.is_some(), "open mapping");

        let frame = match reopened {
            Some(map) => Frame {
                key,
                map,
                merged: true,
            },
            None => Frame {
                key,
                map: M::default(),
                merged: false,
            },
        };
        self.open.push(frame);
    }

    /// Close the innermost mapping and attach it to its parent.
    /// Returns `false` if only the root is open.
    pub(crate) fn close(&mut self) -> bool {
        let Some(frame) = self.open.pop() else {
            return false;
        };
        tracing::trace!(key = %frame.key, entries = frame.map.len(), "close mapping");

        let parent = self.current();
        if frame.merged {
            if let Some(slot) = parent.get_mut(&frame.key) {
                *slot = Value::Mapping(frame.map);
                return true;
            }
        }
        parent.insert(frame.key, Value::Mapping(frame.map));
        true
    }

    /// Store a scalar in the innermost open mapping.
    pub(crate) fn insert(&mut self, key: String, value: Value<M>) {
        self.current().insert(key, value);
    }

    /// The finished root. Callers check `depth() == 1` first; any mappings
    /// still open are discarded.
    pub(crate) fn finish(self) -> M {
        self.root
    }
}
