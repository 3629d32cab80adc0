//! Per-object state held by the store.

use crate::stats::CounterSet;
use sai_meta::{AttributeSet, ObjectType};

/// One live object: its attributes plus counter and histogram state.
#[derive(Debug, Clone)]
pub(crate) struct ObjectInstance {
    pub(crate) object_type: ObjectType,
    pub(crate) attrs: AttributeSet,
    pub(crate) counters: CounterSet,
    /// One value per histogram bin; empty for types without a histogram.
    pub(crate) histogram: Vec<u64>,
}

impl ObjectInstance {
    pub(crate) fn new(object_type: ObjectType, attrs: AttributeSet, bins: usize) -> Self {
        Self {
            object_type,
            attrs,
            counters: CounterSet::new(),
            histogram: vec![0; bins],
        }
    }
}
