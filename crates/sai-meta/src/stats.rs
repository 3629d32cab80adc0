//! Counter and histogram schemas.

use crate::attr::AttrId;
use crate::condition::Condition;
use crate::types::ObjectType;
use crate::value::StatsMode;
use serde::{Deserialize, Serialize};

/// Counter id within an object type (`sai_stat_id_t`).
pub type StatId = u32;

/// First id of the vendor custom counter range.
pub const STAT_CUSTOM_RANGE_BASE: StatId = 0x1000_0000;

/// One counter exposed by an object type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatMeta {
    pub id: StatId,
    pub name: String,
    /// Counter only exists while this holds for the object (e.g. egress-only).
    #[serde(default)]
    pub condition: Option<Condition>,
}

/// Histogram layout: bins are defined by a boundary list attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramSchema {
    /// `u32` list of ascending lower bin boundaries.
    pub boundary_attr: AttrId,
    /// Boolean attribute; when true the bins clear after each read.
    #[serde(default)]
    pub clear_on_read_attr: Option<AttrId>,
}

/// Attribute of another object type that pins the read mode of these counters.
///
/// When a live object of `object_type` has `attr` set, reads in any other mode
/// are rejected. With `match_on = (theirs, ours)` only objects whose `theirs`
/// equals our `ours` apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsModeSource {
    pub object_type: ObjectType,
    pub attr: AttrId,
    #[serde(default)]
    pub match_on: Option<(AttrId, AttrId)>,
}

/// Counters, read modes and histogram support of an object type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSchema {
    #[serde(default)]
    pub counters: Vec<StatMeta>,
    #[serde(default = "all_modes")]
    pub modes: Vec<StatsMode>,
    #[serde(default)]
    pub custom_range: bool,
    #[serde(default)]
    pub histogram: Option<HistogramSchema>,
    #[serde(default)]
    pub mode_source: Option<StatsModeSource>,
}

fn all_modes() -> Vec<StatsMode> {
    StatsMode::ALL.to_vec()
}

impl Default for StatsSchema {
    fn default() -> Self {
        Self {
            counters: Vec::new(),
            modes: all_modes(),
            custom_range: false,
            histogram: None,
            mode_source: None,
        }
    }
}

impl StatsSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counter(mut self, id: impl Into<StatId>, name: &str) -> Self {
        self.counters.push(StatMeta {
            id: id.into(),
            name: name.to_string(),
            condition: None,
        });
        self
    }

    pub fn conditional_counter(
        mut self,
        id: impl Into<StatId>,
        name: &str,
        condition: Condition,
    ) -> Self {
        self.counters.push(StatMeta {
            id: id.into(),
            name: name.to_string(),
            condition: Some(condition),
        });
        self
    }

    pub fn modes(mut self, modes: &[StatsMode]) -> Self {
        self.modes = modes.to_vec();
        self
    }

    pub fn with_custom_range(mut self) -> Self {
        self.custom_range = true;
        self
    }

    pub fn with_histogram(mut self, histogram: HistogramSchema) -> Self {
        self.histogram = Some(histogram);
        self
    }

    pub fn with_mode_source(mut self, source: StatsModeSource) -> Self {
        self.mode_source = Some(source);
        self
    }

    pub fn stat(&self, id: StatId) -> Option<&StatMeta> {
        self.counters.iter().find(|stat| stat.id == id)
    }

    /// Returns true if `id` is a declared counter or falls in an open custom range.
    pub fn is_known(&self, id: StatId) -> bool {
        self.stat(id).is_some() || (self.custom_range && id >= STAT_CUSTOM_RANGE_BASE)
    }

    pub fn has_counters(&self) -> bool {
        !self.counters.is_empty() || self.custom_range
    }

    pub fn supports_mode(&self, mode: StatsMode) -> bool {
        self.modes.contains(&mode)
    }

    /// Display name of a counter.
    pub fn stat_name(&self, id: StatId) -> String {
        match self.stat(id) {
            Some(stat) => stat.name.clone(),
            None => format!("custom stat 0x{:x}", id),
        }
    }
}
