//! TAM API: microburst monitors and histograms.
//!
//! Both objects are fed by the driver side. A microburst monitor folds burst
//! durations into its counters through [`TamApi::record_microburst`]; a
//! histogram counts samples into bins laid out by
//! `SAI_TAM_HISTOGRAM_ATTR_BIN_BOUNDARY`.

use super::{check_switch, checked, create_typed, get_typed, remove_typed};
use crate::stats::record_microburst;
use crate::store::ObjectStore;
use sai_meta::{
    AttrId, Attribute, AttributeList, SaiResult, StatId, StatsMode, SwitchOid, TamHistogramOid,
    TamMicroburstOid,
};
use std::sync::Arc;

/// TAM method table (`sai_tam_api_t`), microburst and histogram parts.
pub trait TamApi: Send + Sync {
    /// `TAM_ID` and `STATISTIC` are mandatory and fixed at creation.
    fn create_tam_microburst(&self, attrs: &[Attribute]) -> SaiResult<TamMicroburstOid>;

    fn remove_tam_microburst(&self, id: TamMicroburstOid) -> SaiResult<()>;

    /// Applies every attribute or none of them.
    fn set_tam_microburst_attribute(
        &self,
        id: TamMicroburstOid,
        attrs: &[Attribute],
    ) -> SaiResult<()>;

    fn get_tam_microburst_attribute(
        &self,
        id: TamMicroburstOid,
        ids: &[AttrId],
    ) -> SaiResult<AttributeList>;

    fn get_tam_microburst_stats(
        &self,
        id: TamMicroburstOid,
        stat_ids: &[StatId],
        mode: StatsMode,
    ) -> SaiResult<Vec<u64>>;

    fn clear_tam_microburst_stats(&self, id: TamMicroburstOid, stat_ids: &[StatId])
        -> SaiResult<()>;

    /// Reports one microburst of `duration` to the monitor.
    fn record_microburst(&self, id: TamMicroburstOid, duration: u64) -> SaiResult<()>;

    fn create_tam_histogram(
        &self,
        switch_id: SwitchOid,
        attrs: &[Attribute],
    ) -> SaiResult<TamHistogramOid>;

    /// Changing `BIN_BOUNDARY` resets the bins.
    fn set_tam_histogram_attribute(&self, id: TamHistogramOid, attr: Attribute) -> SaiResult<()>;

    fn remove_tam_histogram(&self, id: TamHistogramOid) -> SaiResult<()>;

    fn get_tam_histogram_attribute(
        &self,
        id: TamHistogramOid,
        ids: &[AttrId],
    ) -> SaiResult<AttributeList>;

    /// Returns one value per bin. `capacity` is the caller's buffer size;
    /// too small a buffer fails with `BufferOverflow` carrying the bin count.
    fn get_tam_histogram_stats(&self, id: TamHistogramOid, capacity: usize)
        -> SaiResult<Vec<u64>>;

    /// Counts one sample. Returns its bin, or `None` below the first
    /// boundary.
    fn record_histogram_sample(&self, id: TamHistogramOid, value: u32)
        -> SaiResult<Option<usize>>;
}

/// [`TamApi`] over the object store.
pub struct StoreTamApi {
    store: Arc<ObjectStore>,
}

impl StoreTamApi {
    pub fn new(store: Arc<ObjectStore>) -> Self {
        Self { store }
    }
}

impl TamApi for StoreTamApi {
    fn create_tam_microburst(&self, attrs: &[Attribute]) -> SaiResult<TamMicroburstOid> {
        create_typed(&self.store, attrs)
    }

    fn remove_tam_microburst(&self, id: TamMicroburstOid) -> SaiResult<()> {
        remove_typed(&self.store, id)
    }

    fn set_tam_microburst_attribute(
        &self,
        id: TamMicroburstOid,
        attrs: &[Attribute],
    ) -> SaiResult<()> {
        self.store.set_attributes(checked(id)?, attrs)
    }

    fn get_tam_microburst_attribute(
        &self,
        id: TamMicroburstOid,
        ids: &[AttrId],
    ) -> SaiResult<AttributeList> {
        get_typed(&self.store, id, ids)
    }

    store_stats_methods!(
        TamMicroburstOid,
        get_tam_microburst_stats,
        clear_tam_microburst_stats
    );

    fn record_microburst(&self, id: TamMicroburstOid, duration: u64) -> SaiResult<()> {
        self.store
            .update_counters(checked(id)?, |counters| record_microburst(counters, duration))
    }

    fn create_tam_histogram(
        &self,
        switch_id: SwitchOid,
        attrs: &[Attribute],
    ) -> SaiResult<TamHistogramOid> {
        check_switch(&self.store, switch_id)?;
        create_typed(&self.store, attrs)
    }

    store_object_methods!(
        TamHistogramOid,
        remove_tam_histogram,
        set_tam_histogram_attribute,
        get_tam_histogram_attribute
    );

    fn get_tam_histogram_stats(
        &self,
        id: TamHistogramOid,
        capacity: usize,
    ) -> SaiResult<Vec<u64>> {
        self.store.histogram_bins(checked(id)?, capacity)
    }

    fn record_histogram_sample(
        &self,
        id: TamHistogramOid,
        value: u32,
    ) -> SaiResult<Option<usize>> {
        self.store.record_histogram_sample(checked(id)?, value)
    }
}
