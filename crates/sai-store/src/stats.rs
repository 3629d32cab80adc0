//! Counter storage and the driver-side counter updates.

use sai_meta::schemas::tam::TamMicroburstStat;
use sai_meta::StatId;
use std::collections::BTreeMap;

/// Counter values of one object. Counters never written read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterSet(BTreeMap<StatId, u64>);

impl CounterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: StatId) -> u64 {
        self.0.get(&id).copied().unwrap_or(0)
    }

    pub fn set(&mut self, id: StatId, value: u64) {
        self.0.insert(id, value);
    }

    /// Adds `delta`, saturating at `u64::MAX`. Returns the new value.
    pub fn add(&mut self, id: StatId, delta: u64) -> u64 {
        let value = self.0.entry(id).or_insert(0);
        *value = value.saturating_add(delta);
        *value
    }

    pub fn clear(&mut self, id: StatId) {
        self.0.remove(&id);
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatId, u64)> + '_ {
        self.0.iter().map(|(id, value)| (*id, *value))
    }
}

/// Bin holding `value`: the last boundary not greater than it.
///
/// Values below the first boundary fall in no bin.
pub(crate) fn bin_index(boundaries: &[u32], value: u32) -> Option<usize> {
    boundaries
        .partition_point(|boundary| *boundary <= value)
        .checked_sub(1)
}

/// Folds one microburst of `duration` into the microburst counters.
pub(crate) fn record_microburst(counters: &mut CounterSet, duration: u64) {
    use TamMicroburstStat as S;

    let number = counters.get(S::Number.into());
    let shortest = counters.get(S::ShortestDuration.into());
    let average = counters.get(S::AverageDuration.into());

    counters.set(S::LastDuration.into(), duration);
    if duration > counters.get(S::LongestDuration.into()) {
        counters.set(S::LongestDuration.into(), duration);
    }
    if number == 0 || shortest == 0 || duration < shortest {
        counters.set(S::ShortestDuration.into(), duration);
    }

    let total = u128::from(average) * u128::from(number) + u128::from(duration);
    let count = u128::from(number) + 1;
    let average = u64::try_from(total / count).unwrap_or(u64::MAX);
    counters.set(S::AverageDuration.into(), average);
    counters.set(S::Number.into(), number.saturating_add(1));
}
