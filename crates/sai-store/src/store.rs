//! The object store: lifecycle, attribute access and counters for every
//! object type in a [`SchemaRegistry`].
//!
//! # Locking
//!
//! Instances live in a [`DashMap`], so operations on distinct ids run in
//! parallel. Anything that changes who-references-whom (create, remove, sets
//! touching id-valued or uniqueness-scoped attributes) and reads of derived
//! attributes hold the topology mutex. Lock order is always topology first,
//! then at most one instance guard at a time.

use crate::config::{RemovePolicy, StoreConfig};
use crate::instance::ObjectInstance;
use crate::refs::DependencyIndex;
use crate::stats::{bin_index, CounterSet};
use dashmap::DashMap;
use log::{debug, info, warn};
use parking_lot::Mutex;
use sai_meta::{
    AttrId, Attribute, AttributeList, AttributeMeta, AttributeSet, AttributeSlot, AttributeValue,
    DerivedValue, HistogramSchema, ObjectIdParts, ObjectSchema, ObjectType, RawSaiObjectId,
    ReferenceKind, SaiError, SaiResult, SaiStatus, SchemaRegistry, StatId, StatsMode,
    StatsModeSource, StatsSchema, MAX_OBJECT_SERIAL,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Who is writing an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Writer {
    /// The NOS, through the API tables: only settable attributes.
    Caller,
    /// The backend publishing a read-only value.
    Driver,
}

/// A reference from an attribute to a live store object.
type ManagedRef = (RawSaiObjectId, AttrId);

pub struct ObjectStore {
    schemas: SchemaRegistry,
    config: StoreConfig,
    instances: DashMap<RawSaiObjectId, ObjectInstance>,
    topology: Mutex<DependencyIndex>,
    serials: HashMap<ObjectType, AtomicU64>,
}

impl ObjectStore {
    pub fn new(schemas: SchemaRegistry, config: StoreConfig) -> Self {
        let serials = schemas
            .object_types()
            .map(|object_type| (object_type, AtomicU64::new(0)))
            .collect();
        Self {
            schemas,
            config,
            instances: DashMap::new(),
            topology: Mutex::new(DependencyIndex::new()),
            serials,
        }
    }

    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Creates an object and returns its id.
    ///
    /// Everything is validated before an id is allocated, so a failed create
    /// consumes no serial.
    pub fn create(&self, object_type: ObjectType, attrs: &[Attribute]) -> SaiResult<RawSaiObjectId> {
        let schema = self.schemas.schema(object_type)?;

        let mut set = AttributeSet::new();
        for attr in attrs {
            let meta = known_attribute(schema, attr.id)?;
            if set.insert(attr.id, attr.value.clone()).is_some() {
                return Err(SaiError::invalid_parameter(format!(
                    "{} supplied more than once",
                    meta.name
                )));
            }
        }

        for meta in schema.mandatory_attributes() {
            let required = meta
                .condition
                .as_ref()
                .map_or(true, |condition| condition.evaluate(&set));
            if required && !set.contains(meta.id) {
                return Err(SaiError::invalid_parameter(format!(
                    "mandatory attribute {} missing on create of {}",
                    meta.name, object_type
                )));
            }
        }

        for (id, value) in set.iter() {
            let meta = known_attribute(schema, id)?;
            if meta.flags.is_read_only() {
                return Err(SaiError::AttributeReadOnly {
                    attr: meta.name.clone(),
                });
            }
            meta.check_value(value)?;
        }

        let supplied: Vec<AttrId> = set.iter().map(|(id, _)| id).collect();
        for meta in schema.attributes() {
            if set.contains(meta.id) {
                continue;
            }
            if let Some(default) = &meta.default {
                let applies = meta
                    .condition
                    .as_ref()
                    .map_or(true, |condition| condition.evaluate(&set));
                if applies {
                    set.insert(meta.id, default.clone());
                }
            }
        }
        check_conditions(schema, &set, &supplied)?;

        let refs = self.managed_refs(schema, &set, &supplied)?;
        let bins = histogram_len(schema, &set);

        let mut topology = self.topology.lock();
        check_live(schema, &refs, &topology)?;
        self.check_unique(schema, &set, None, &topology)?;
        if let Some(max) = self.config.max_objects_per_type {
            if topology.live_count(object_type) as u64 >= max {
                return Err(SaiError::table_full(format!(
                    "{} ({} objects)",
                    object_type, max
                )));
            }
        }

        let id = self.allocate_id(object_type)?;
        topology.track(id, object_type)?;
        for (target, attr) in refs {
            topology.add_ref(target, id, attr)?;
        }
        self.instances
            .insert(id, ObjectInstance::new(object_type, set, bins));
        drop(topology);

        debug!("Created {} 0x{:016x}", object_type, id);
        Ok(id)
    }

    /// Removes an object, applying the configured remove policy when other
    /// live objects still reference it.
    pub fn remove(&self, id: RawSaiObjectId) -> SaiResult<()> {
        let mut topology = self.topology.lock();
        if !topology.is_tracked(id) {
            return Err(SaiError::invalid_object_id(id));
        }

        let referrers = topology.referrers(id);
        if referrers.is_empty() {
            return self.detach(&mut topology, id);
        }

        match self.config.remove_policy {
            RemovePolicy::Reject => {
                warn!(
                    "Refusing to remove 0x{:016x}: referenced by {} object(s), first 0x{:016x}",
                    id,
                    referrers.len(),
                    referrers[0]
                );
                Err(SaiError::object_in_use(format!(
                    "0x{:016x} referenced by {} object(s)",
                    id,
                    referrers.len()
                )))
            }
            RemovePolicy::Cascade => {
                let order = topology.removal_order(id);
                info!(
                    "Cascade remove of 0x{:016x} takes {} dependent object(s)",
                    id,
                    order.len() - 1
                );
                for victim in order {
                    self.detach(&mut topology, victim)?;
                }
                Ok(())
            }
        }
    }

    /// Drops `id` from the instance table and the topology.
    fn detach(&self, topology: &mut DependencyIndex, id: RawSaiObjectId) -> SaiResult<()> {
        let (_, instance) = self
            .instances
            .remove(&id)
            .ok_or(SaiError::invalid_object_id(id))?;

        for (attr, value) in instance.attrs.iter() {
            for target in value.referenced_ids() {
                // Targets removed earlier in a cascade are already gone.
                if target != id && topology.is_tracked(target) {
                    topology.remove_ref(target, id, attr)?;
                }
            }
        }
        topology.untrack(id)?;

        debug!("Removed {} 0x{:016x}", instance.object_type, id);
        Ok(())
    }

    pub fn set_attribute(&self, id: RawSaiObjectId, attr: Attribute) -> SaiResult<()> {
        self.apply(id, std::slice::from_ref(&attr), Writer::Caller)
    }

    /// Sets several attributes at once. Either all are applied or none.
    pub fn set_attributes(&self, id: RawSaiObjectId, attrs: &[Attribute]) -> SaiResult<()> {
        self.apply(id, attrs, Writer::Caller)
    }

    /// Stores a read-only, non-derived attribute as reported by the backend
    /// (capabilities, hardware limits).
    pub fn publish_read_only(&self, id: RawSaiObjectId, attr: Attribute) -> SaiResult<()> {
        self.apply(id, std::slice::from_ref(&attr), Writer::Driver)
    }

    fn apply(&self, id: RawSaiObjectId, attrs: &[Attribute], writer: Writer) -> SaiResult<()> {
        let object_type = self.object_type_of(id)?;
        let schema = self.schemas.schema(object_type)?;
        let updates = AttributeSet::from_attributes(attrs)?;

        for (attr_id, value) in updates.iter() {
            let meta = known_attribute(schema, attr_id)?;
            match writer {
                Writer::Caller if meta.flags.is_read_only() => {
                    return Err(SaiError::AttributeReadOnly {
                        attr: meta.name.clone(),
                    });
                }
                Writer::Caller if meta.flags.is_create_only() => {
                    return Err(SaiError::CreateOnly {
                        attr: meta.name.clone(),
                    });
                }
                Writer::Driver if !meta.flags.is_read_only() || meta.is_derived() => {
                    return Err(SaiError::invalid_parameter(format!(
                        "{} is not a published read-only attribute",
                        meta.name
                    )));
                }
                _ => {}
            }
            meta.check_value(value)?;
        }

        let updated: Vec<AttrId> = updates.iter().map(|(attr_id, _)| attr_id).collect();
        let new_refs = self.managed_refs(schema, &updates, &updated)?;
        let touches_refs = updated.iter().any(|attr_id| {
            schema
                .attribute(*attr_id)
                .is_some_and(|meta| meta.value_type.is_reference())
        });
        let touches_unique = schema.attributes().any(|meta| {
            meta.unique_within
                .is_some_and(|scope| updates.contains(meta.id) || updates.contains(scope))
        });

        let mut topology = (touches_refs || touches_unique).then(|| self.topology.lock());
        if let Some(topology) = topology.as_deref() {
            check_live(schema, &new_refs, topology)?;
            if touches_unique {
                let mut candidate = self
                    .instances
                    .get(&id)
                    .ok_or(SaiError::invalid_object_id(id))?
                    .attrs
                    .clone();
                merge(&mut candidate, &updates);
                self.check_unique(schema, &candidate, Some(id), topology)?;
            }
        }

        let mut entry = self
            .instances
            .get_mut(&id)
            .ok_or(SaiError::invalid_object_id(id))?;
        let instance = entry.value_mut();

        let mut candidate = instance.attrs.clone();
        merge(&mut candidate, &updates);
        check_conditions(schema, &candidate, &updated)?;

        if let Some(topology) = topology.as_deref_mut() {
            for attr_id in updated.iter().copied() {
                let Some(old) = instance.attrs.get(attr_id) else {
                    continue;
                };
                for target in old.referenced_ids() {
                    if target != id && topology.is_tracked(target) {
                        topology.remove_ref(target, id, attr_id)?;
                    }
                }
            }
            for (target, attr_id) in new_refs.into_iter().filter(|(target, _)| *target != id) {
                topology.add_ref(target, id, attr_id)?;
            }
        }

        if let Some(histogram) = histogram_schema(schema) {
            if updates.contains(histogram.boundary_attr) {
                instance.histogram = vec![0; histogram_len(schema, &candidate)];
            }
        }
        instance.attrs = candidate;

        debug!(
            "Set {} attribute(s) on {} 0x{:016x}",
            updated.len(),
            object_type,
            id
        );
        Ok(())
    }

    /// Reads attributes. Every requested id gets its own slot, in request
    /// order; ids the schema does not define get `InvalidAttribute`.
    pub fn get_attributes(&self, id: RawSaiObjectId, ids: &[AttrId]) -> SaiResult<AttributeList> {
        let object_type = self.object_type_of(id)?;
        let schema = self.schemas.schema(object_type)?;

        let needs_topology = ids.iter().any(|attr_id| {
            schema
                .attribute(*attr_id)
                .is_some_and(AttributeMeta::is_derived)
        });
        let topology = needs_topology.then(|| self.topology.lock());
        let attrs = self
            .instances
            .get(&id)
            .ok_or(SaiError::invalid_object_id(id))?
            .attrs
            .clone();

        let slots = ids
            .iter()
            .map(|attr_id| AttributeSlot {
                id: *attr_id,
                result: self.read_slot(schema, id, &attrs, *attr_id, topology.as_deref()),
            })
            .collect();
        Ok(AttributeList::new(slots))
    }

    /// Reads one attribute, failing on its slot status.
    pub fn get_attribute(&self, id: RawSaiObjectId, attr: AttrId) -> SaiResult<AttributeValue> {
        self.get_attributes(id, &[attr])?
            .into_iter()
            .next()
            .ok_or_else(|| SaiError::internal("empty attribute list"))?
            .result
    }

    fn read_slot(
        &self,
        schema: &ObjectSchema,
        id: RawSaiObjectId,
        attrs: &AttributeSet,
        attr_id: AttrId,
        topology: Option<&DependencyIndex>,
    ) -> SaiResult<AttributeValue> {
        let Some(meta) = schema.attribute(attr_id) else {
            return Err(SaiError::Status {
                status: SaiStatus::InvalidAttribute,
            });
        };
        if let Some(condition) = &meta.condition {
            if !condition.evaluate(attrs) {
                return Err(SaiError::ConditionNotMet {
                    attr: meta.name.clone(),
                    condition: schema.describe_condition(condition),
                });
            }
        }
        if let Some(derived) = &meta.derived {
            return self.derive(id, derived, topology);
        }
        if let Some(value) = attrs.get(attr_id) {
            return Ok(value.clone());
        }
        if meta.flags.is_read_only() {
            // A capability nobody published.
            return Err(SaiError::Status {
                status: SaiStatus::AttributeNotImplemented,
            });
        }
        Err(SaiError::not_found(format!("{} of 0x{:016x}", meta.name, id)))
    }

    fn derive(
        &self,
        id: RawSaiObjectId,
        derived: &DerivedValue,
        topology: Option<&DependencyIndex>,
    ) -> SaiResult<AttributeValue> {
        match derived {
            DerivedValue::Referrers {
                object_type,
                via,
                project,
            } => {
                let topology =
                    topology.ok_or_else(|| SaiError::internal("derived read without topology"))?;
                let referrers = topology.referrers_via(id, *object_type, *via);
                let ids = match project {
                    None => referrers,
                    Some(project) => referrers
                        .into_iter()
                        .filter_map(|referrer| {
                            let instance = self.instances.get(&referrer)?;
                            instance.attrs.get(*project).and_then(AttributeValue::as_oid)
                        })
                        .collect(),
                };
                Ok(AttributeValue::ObjectList(ids))
            }
            DerivedValue::StatsModeSupported { object_type, mode } => Ok(AttributeValue::Bool(
                self.effective_stats_modes(*object_type).contains(mode),
            )),
        }
    }

    /// Stats modes accepted for `object_type`: the type's own modes that the
    /// configuration also allows. Empty for types without counters.
    pub fn effective_stats_modes(&self, object_type: ObjectType) -> Vec<StatsMode> {
        let Some(stats) = self
            .schemas
            .get(object_type)
            .and_then(ObjectSchema::stats)
            .filter(|stats| stats.has_counters())
        else {
            return Vec::new();
        };
        StatsMode::ALL
            .iter()
            .copied()
            .filter(|mode| stats.supports_mode(*mode) && self.config.stats_modes.contains(mode))
            .collect()
    }

    /// Reads counters. `ReadAndClear` zeroes them under the same guard.
    ///
    /// `mode` must be one of [`effective_stats_modes`](Self::effective_stats_modes)
    /// and agree with the mode pinned by the type's mode source, if any.
    pub fn get_stats(
        &self,
        id: RawSaiObjectId,
        stat_ids: &[StatId],
        mode: StatsMode,
    ) -> SaiResult<Vec<u64>> {
        let object_type = self.object_type_of(id)?;
        let schema = self.schemas.schema(object_type)?;
        let stats = counter_schema(schema)?;
        if !self.effective_stats_modes(object_type).contains(&mode) {
            return Err(SaiError::invalid_parameter(format!(
                "{} is not supported for {}",
                mode, object_type
            )));
        }
        if let Some(source) = &stats.mode_source {
            self.check_pinned_mode(id, source, mode)?;
        }

        let mut entry = self
            .instances
            .get_mut(&id)
            .ok_or(SaiError::invalid_object_id(id))?;
        let instance = entry.value_mut();
        check_stats(schema, stats, &instance.attrs, stat_ids)?;

        let values = stat_ids
            .iter()
            .map(|stat| instance.counters.get(*stat))
            .collect();
        if mode == StatsMode::ReadAndClear {
            for stat in stat_ids {
                instance.counters.clear(*stat);
            }
        }
        Ok(values)
    }

    pub fn clear_stats(&self, id: RawSaiObjectId, stat_ids: &[StatId]) -> SaiResult<()> {
        let object_type = self.object_type_of(id)?;
        let schema = self.schemas.schema(object_type)?;
        let stats = counter_schema(schema)?;

        let mut entry = self
            .instances
            .get_mut(&id)
            .ok_or(SaiError::invalid_object_id(id))?;
        let instance = entry.value_mut();
        check_stats(schema, stats, &instance.attrs, stat_ids)?;
        for stat in stat_ids {
            instance.counters.clear(*stat);
        }
        Ok(())
    }

    /// Adds `delta` to one counter and returns its new value.
    pub fn add_to_counter(&self, id: RawSaiObjectId, stat: StatId, delta: u64) -> SaiResult<u64> {
        let object_type = self.object_type_of(id)?;
        let schema = self.schemas.schema(object_type)?;
        let stats = counter_schema(schema)?;

        let mut entry = self
            .instances
            .get_mut(&id)
            .ok_or(SaiError::invalid_object_id(id))?;
        let instance = entry.value_mut();
        check_stats(schema, stats, &instance.attrs, &[stat])?;
        Ok(instance.counters.add(stat, delta))
    }

    /// Runs `update` on the object's counters under its write guard.
    pub fn update_counters<F>(&self, id: RawSaiObjectId, update: F) -> SaiResult<()>
    where
        F: FnOnce(&mut CounterSet),
    {
        let object_type = self.object_type_of(id)?;
        counter_schema(self.schemas.schema(object_type)?)?;

        let mut entry = self
            .instances
            .get_mut(&id)
            .ok_or(SaiError::invalid_object_id(id))?;
        update(&mut entry.counters);
        Ok(())
    }

    /// Returns the histogram bins, failing with `BufferOverflow` when
    /// `capacity` cannot hold them. Bins clear after the read when the
    /// object's clear-mode attribute is true.
    pub fn histogram_bins(&self, id: RawSaiObjectId, capacity: usize) -> SaiResult<Vec<u64>> {
        let object_type = self.object_type_of(id)?;
        let schema = self.schemas.schema(object_type)?;
        let histogram = histogram_schema(schema)
            .ok_or_else(|| SaiError::not_supported(format!("histogram on {}", object_type)))?;

        let mut entry = self
            .instances
            .get_mut(&id)
            .ok_or(SaiError::invalid_object_id(id))?;
        let instance = entry.value_mut();

        let required = instance.histogram.len();
        if capacity < required {
            return Err(SaiError::BufferOverflow { required });
        }
        let bins = instance.histogram.clone();

        let clear = histogram
            .clear_on_read_attr
            .and_then(|attr| instance.attrs.get(attr))
            .and_then(AttributeValue::as_bool)
            .unwrap_or(false);
        if clear {
            instance.histogram.iter_mut().for_each(|bin| *bin = 0);
        }
        Ok(bins)
    }

    /// Counts one sample into its histogram bin. Returns the bin, or `None`
    /// when the value is below the first boundary.
    pub fn record_histogram_sample(&self, id: RawSaiObjectId, value: u32) -> SaiResult<Option<usize>> {
        let object_type = self.object_type_of(id)?;
        let schema = self.schemas.schema(object_type)?;
        let histogram = histogram_schema(schema)
            .ok_or_else(|| SaiError::not_supported(format!("histogram on {}", object_type)))?;

        let mut entry = self
            .instances
            .get_mut(&id)
            .ok_or(SaiError::invalid_object_id(id))?;
        let instance = entry.value_mut();

        let bin = instance
            .attrs
            .get(histogram.boundary_attr)
            .and_then(AttributeValue::as_u32_list)
            .and_then(|boundaries| bin_index(boundaries, value));
        if let Some(slot) = bin.and_then(|bin| instance.histogram.get_mut(bin)) {
            *slot = slot.saturating_add(1);
        }
        Ok(bin)
    }

    pub fn contains(&self, id: RawSaiObjectId) -> bool {
        self.instances.contains_key(&id)
    }

    /// Type of a live object.
    pub fn object_type_of(&self, id: RawSaiObjectId) -> SaiResult<ObjectType> {
        self.instances
            .get(&id)
            .map(|instance| instance.object_type)
            .ok_or(SaiError::invalid_object_id(id))
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Live objects of one type, in creation order.
    pub fn objects_of_type(&self, object_type: ObjectType) -> Vec<RawSaiObjectId> {
        self.topology.lock().objects_of_type(object_type)
    }

    fn allocate_id(&self, object_type: ObjectType) -> SaiResult<RawSaiObjectId> {
        let counter = self
            .serials
            .get(&object_type)
            .ok_or_else(|| SaiError::internal(format!("no serial counter for {}", object_type)))?;
        let serial = counter.fetch_add(1, Ordering::Relaxed) + 1;
        if serial > MAX_OBJECT_SERIAL {
            return Err(SaiError::table_full(format!("{} id space", object_type)));
        }
        Ok(ObjectIdParts {
            switch_index: self.config.switch_index,
            object_type,
            serial,
        }
        .encode())
    }

    /// References held by the `attrs` listed in `ids` that name store objects.
    fn managed_refs(
        &self,
        schema: &ObjectSchema,
        attrs: &AttributeSet,
        ids: &[AttrId],
    ) -> SaiResult<Vec<ManagedRef>> {
        let mut refs = Vec::new();
        for attr_id in ids.iter().copied() {
            let (Some(meta), Some(value)) = (schema.attribute(attr_id), attrs.get(attr_id)) else {
                continue;
            };
            if !meta.value_type.is_reference() {
                continue;
            }
            for target in value.referenced_ids() {
                if let ReferenceKind::Managed(_) = self.schemas.resolve_reference(meta, target)? {
                    refs.push((target, attr_id));
                }
            }
        }
        Ok(refs)
    }

    /// Fails with `InvalidParameter` when a live `source` object pins a mode
    /// other than `mode` for `id`.
    fn check_pinned_mode(
        &self,
        id: RawSaiObjectId,
        source: &StatsModeSource,
        mode: StatsMode,
    ) -> SaiResult<()> {
        let key = match source.match_on {
            Some((_, ours)) => {
                let instance = self
                    .instances
                    .get(&id)
                    .ok_or(SaiError::invalid_object_id(id))?;
                instance.attrs.get(ours).cloned()
            }
            None => None,
        };

        for pinning in self.objects_of_type(source.object_type) {
            let Some(instance) = self.instances.get(&pinning) else {
                continue;
            };
            if let Some((theirs, _)) = source.match_on {
                if instance.attrs.get(theirs) != key.as_ref() {
                    continue;
                }
            }
            let pinned = instance
                .attrs
                .get(source.attr)
                .and_then(AttributeValue::as_i32)
                .and_then(StatsMode::from_i32);
            if let Some(pinned) = pinned.filter(|pinned| *pinned != mode) {
                return Err(SaiError::invalid_parameter(format!(
                    "{} does not match stats mode {} of 0x{:016x}",
                    mode, pinned, pinning
                )));
            }
        }
        Ok(())
    }

    /// Fails with `AlreadyExists` when another live object of the same type
    /// holds the same value within the same scope.
    fn check_unique(
        &self,
        schema: &ObjectSchema,
        attrs: &AttributeSet,
        exclude: Option<RawSaiObjectId>,
        topology: &DependencyIndex,
    ) -> SaiResult<()> {
        for meta in schema.attributes() {
            let Some(scope) = meta.unique_within else {
                continue;
            };
            let (Some(value), Some(scope_value)) = (attrs.get(meta.id), attrs.get(scope)) else {
                continue;
            };
            for other in topology.objects_of_type(schema.object_type()) {
                if Some(other) == exclude {
                    continue;
                }
                let clash = self.instances.get(&other).is_some_and(|instance| {
                    instance.attrs.get(meta.id) == Some(value)
                        && instance.attrs.get(scope) == Some(scope_value)
                });
                if clash {
                    return Err(SaiError::already_exists(format!(
                        "{} {} within {} {} (0x{:016x})",
                        meta.name,
                        value,
                        schema.attr_name(scope),
                        scope_value,
                        other
                    )));
                }
            }
        }
        Ok(())
    }
}

fn known_attribute(schema: &ObjectSchema, id: AttrId) -> SaiResult<&AttributeMeta> {
    schema.attribute(id).ok_or_else(|| SaiError::UnknownAttribute {
        object_type: schema.object_type().to_string(),
        attr: schema.attr_name(id),
    })
}

fn merge(target: &mut AttributeSet, updates: &AttributeSet) {
    for (id, value) in updates.iter() {
        target.insert(id, value.clone());
    }
}

/// Checks the condition of every attribute in `ids` against `attrs`.
fn check_conditions(schema: &ObjectSchema, attrs: &AttributeSet, ids: &[AttrId]) -> SaiResult<()> {
    for id in ids {
        let Some(meta) = schema.attribute(*id) else {
            continue;
        };
        if let Some(condition) = &meta.condition {
            if !condition.evaluate(attrs) {
                return Err(SaiError::ConditionNotMet {
                    attr: meta.name.clone(),
                    condition: schema.describe_condition(condition),
                });
            }
        }
    }
    Ok(())
}

fn check_live(
    schema: &ObjectSchema,
    refs: &[ManagedRef],
    topology: &DependencyIndex,
) -> SaiResult<()> {
    match refs.iter().find(|(target, _)| !topology.is_tracked(*target)) {
        Some((target, attr)) => Err(SaiError::invalid_value(
            schema.attr_name(*attr),
            format!("0x{:016x} is not a live object", target),
        )),
        None => Ok(()),
    }
}

fn counter_schema(schema: &ObjectSchema) -> SaiResult<&StatsSchema> {
    schema
        .stats()
        .filter(|stats| stats.has_counters())
        .ok_or_else(|| SaiError::not_supported(format!("counters on {}", schema.object_type())))
}

fn check_stats(
    schema: &ObjectSchema,
    stats: &StatsSchema,
    attrs: &AttributeSet,
    stat_ids: &[StatId],
) -> SaiResult<()> {
    for stat in stat_ids {
        if !stats.is_known(*stat) {
            return Err(SaiError::invalid_parameter(format!(
                "stat {} is not a counter of {}",
                stat,
                schema.object_type()
            )));
        }
        if let Some(condition) = stats.stat(*stat).and_then(|meta| meta.condition.as_ref()) {
            if !condition.evaluate(attrs) {
                return Err(SaiError::ConditionNotMet {
                    attr: stats.stat_name(*stat),
                    condition: schema.describe_condition(condition),
                });
            }
        }
    }
    Ok(())
}

fn histogram_schema(schema: &ObjectSchema) -> Option<&HistogramSchema> {
    schema.stats().and_then(|stats| stats.histogram.as_ref())
}

fn histogram_len(schema: &ObjectSchema, attrs: &AttributeSet) -> usize {
    histogram_schema(schema)
        .and_then(|histogram| attrs.get(histogram.boundary_attr))
        .and_then(AttributeValue::as_u32_list)
        .map_or(0, <[u32]>::len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sai_meta::{AttrFlags, AttrValueType, Condition, ValueConstraint};

    /// A small two-type schema: GROUP and MEMBER (member references group).
    fn registry() -> SchemaRegistry {
        let group = ObjectSchema::new(ObjectType::Lag)
            .with(
                AttributeMeta::new(0u32, "GROUP_MEMBERS", AttrValueType::ObjectList, AttrFlags::READ_ONLY)
                    .derived_from(DerivedValue::Referrers {
                        object_type: ObjectType::LagMember,
                        via: 0,
                        project: None,
                    }),
            )
            .and_then(|s| {
                s.with(AttributeMeta::new(1u32, "GROUP_MTU", AttrValueType::U32, AttrFlags::READ_ONLY))
            })
            .unwrap();
        let member = ObjectSchema::new(ObjectType::LagMember)
            .with(
                AttributeMeta::new(0u32, "MEMBER_GROUP", AttrValueType::Oid, AttrFlags::MANDATORY_CREATE_ONLY)
                    .objects(&[ObjectType::Lag]),
            )
            .and_then(|s| {
                s.with(
                    AttributeMeta::new(1u32, "MEMBER_SLOT", AttrValueType::U8, AttrFlags::CREATE_AND_SET)
                        .with_constraint(ValueConstraint::Range { min: 0, max: 3 })
                        .unique_within(0u32),
                )
            })
            .and_then(|s| {
                s.with(
                    AttributeMeta::new(2u32, "MEMBER_ENABLED", AttrValueType::Bool, AttrFlags::CREATE_AND_SET)
                        .with_default(true),
                )
            })
            .and_then(|s| {
                s.with(
                    AttributeMeta::new(3u32, "MEMBER_WEIGHT", AttrValueType::U32, AttrFlags::CREATE_AND_SET)
                        .with_condition(Condition::equals(2u32, true)),
                )
            })
            .unwrap();

        let mut registry = SchemaRegistry::new();
        registry.register(group).unwrap();
        registry.register(member).unwrap();
        registry
    }

    fn store(policy: RemovePolicy) -> ObjectStore {
        ObjectStore::new(
            registry(),
            StoreConfig {
                remove_policy: policy,
                ..StoreConfig::default()
            },
        )
    }

    #[test]
    fn test_create_applies_defaults() {
        let store = store(RemovePolicy::Reject);
        let group = store.create(ObjectType::Lag, &[]).unwrap();
        let member = store
            .create(ObjectType::LagMember, &[Attribute::new(0u32, AttributeValue::Oid(group))])
            .unwrap();

        assert_eq!(store.get_attribute(member, 2).unwrap(), AttributeValue::Bool(true));
        assert_eq!(store.object_type_of(member).unwrap(), ObjectType::LagMember);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_failed_create_consumes_no_serial() {
        let store = store(RemovePolicy::Reject);
        let err = store.create(ObjectType::LagMember, &[]).unwrap_err();
        assert_eq!(err.status(), SaiStatus::InvalidParameter);

        let group = store.create(ObjectType::Lag, &[]).unwrap();
        let member = store
            .create(ObjectType::LagMember, &[Attribute::new(0u32, AttributeValue::Oid(group))])
            .unwrap();
        assert_eq!(ObjectIdParts::decode(member).unwrap().serial, 1);
    }

    #[test]
    fn test_create_rejects_dead_reference() {
        let store = store(RemovePolicy::Reject);
        let ghost = ObjectIdParts {
            switch_index: 0,
            object_type: ObjectType::Lag,
            serial: 42,
        }
        .encode();
        let err = store
            .create(ObjectType::LagMember, &[Attribute::new(0u32, AttributeValue::Oid(ghost))])
            .unwrap_err();
        assert_eq!(err.status(), SaiStatus::InvalidAttributeValue);
        assert!(store.is_empty());
    }

    #[test]
    fn test_uniqueness_within_scope() {
        let store = store(RemovePolicy::Reject);
        let g1 = store.create(ObjectType::Lag, &[]).unwrap();
        let g2 = store.create(ObjectType::Lag, &[]).unwrap();
        let slot = |group, slot: u8| {
            vec![
                Attribute::new(0u32, AttributeValue::Oid(group)),
                Attribute::new(1u32, slot),
            ]
        };

        let m1 = store.create(ObjectType::LagMember, &slot(g1, 1)).unwrap();
        let err = store.create(ObjectType::LagMember, &slot(g1, 1)).unwrap_err();
        assert_eq!(err.status(), SaiStatus::ItemAlreadyExists);
        store.create(ObjectType::LagMember, &slot(g2, 1)).unwrap();

        // Re-setting the same slot on the holder is fine; taking a used one is not.
        let m2 = store.create(ObjectType::LagMember, &slot(g1, 2)).unwrap();
        store.set_attribute(m1, Attribute::new(1u32, 1u8)).unwrap();
        let err = store.set_attribute(m2, Attribute::new(1u32, 1u8)).unwrap_err();
        assert_eq!(err.status(), SaiStatus::ItemAlreadyExists);
        assert_eq!(store.get_attribute(m2, 1).unwrap(), AttributeValue::U8(2));
    }

    #[test]
    fn test_set_is_all_or_nothing() {
        let store = store(RemovePolicy::Reject);
        let group = store.create(ObjectType::Lag, &[]).unwrap();
        let member = store
            .create(ObjectType::LagMember, &[Attribute::new(0u32, AttributeValue::Oid(group))])
            .unwrap();

        let err = store
            .set_attributes(
                member,
                &[Attribute::new(3u32, 10u32), Attribute::new(1u32, 9u8)],
            )
            .unwrap_err();
        assert_eq!(err.status(), SaiStatus::InvalidAttributeValue);
        assert_eq!(store.get_attribute(member, 3).unwrap_err().status(), SaiStatus::ItemNotFound);

        // Weight only exists while enabled.
        store
            .set_attributes(
                member,
                &[Attribute::new(2u32, false), Attribute::new(3u32, 10u32)],
            )
            .unwrap_err();
        assert_eq!(store.get_attribute(member, 2).unwrap(), AttributeValue::Bool(true));
        store.set_attribute(member, Attribute::new(3u32, 10u32)).unwrap();
    }

    #[test]
    fn test_set_flag_violations() {
        let store = store(RemovePolicy::Reject);
        let group = store.create(ObjectType::Lag, &[]).unwrap();
        let member = store
            .create(ObjectType::LagMember, &[Attribute::new(0u32, AttributeValue::Oid(group))])
            .unwrap();

        let err = store
            .set_attribute(member, Attribute::new(0u32, AttributeValue::Oid(group)))
            .unwrap_err();
        assert_eq!(err.status(), SaiStatus::CreateOnlyViolation);
        let err = store.set_attribute(group, Attribute::new(1u32, 9000u32)).unwrap_err();
        assert_eq!(err.status(), SaiStatus::AttributeReadOnly);
        let err = store.set_attribute(group, Attribute::new(7u32, 1u32)).unwrap_err();
        assert_eq!(err.status(), SaiStatus::UnknownAttribute);
    }

    #[test]
    fn test_publish_read_only() {
        let store = store(RemovePolicy::Reject);
        let group = store.create(ObjectType::Lag, &[]).unwrap();

        let list = store.get_attributes(group, &[1]).unwrap();
        assert_eq!(list.status(), SaiStatus::AttributeNotImplemented);
        assert!(list.slots()[0].result.as_ref().unwrap_err().is_soft());

        store.publish_read_only(group, Attribute::new(1u32, 9100u32)).unwrap();
        assert_eq!(store.get_attribute(group, 1).unwrap(), AttributeValue::U32(9100));

        // Derived values are never published.
        let err = store
            .publish_read_only(group, Attribute::new(0u32, AttributeValue::ObjectList(vec![])))
            .unwrap_err();
        assert_eq!(err.status(), SaiStatus::InvalidParameter);
    }

    #[test]
    fn test_get_reports_per_slot_status() {
        let store = store(RemovePolicy::Reject);
        let group = store.create(ObjectType::Lag, &[]).unwrap();
        let member = store
            .create(
                ObjectType::LagMember,
                &[
                    Attribute::new(0u32, AttributeValue::Oid(group)),
                    Attribute::new(2u32, false),
                ],
            )
            .unwrap();

        let list = store.get_attributes(member, &[0, 9, 3, 1]).unwrap();
        let statuses: Vec<SaiStatus> = list.slots().iter().map(AttributeSlot::status).collect();
        assert_eq!(
            statuses,
            vec![
                SaiStatus::Success,
                SaiStatus::InvalidAttribute,
                SaiStatus::ConditionNotMet,
                SaiStatus::ItemNotFound,
            ]
        );
        assert_eq!(list.value(0u32), Some(&AttributeValue::Oid(group)));
        assert_eq!(list.raw_status(), -0x0001_0001);
    }

    #[test]
    fn test_remove_reject_and_cascade() {
        let store = store(RemovePolicy::Reject);
        let group = store.create(ObjectType::Lag, &[]).unwrap();
        let member = store
            .create(ObjectType::LagMember, &[Attribute::new(0u32, AttributeValue::Oid(group))])
            .unwrap();

        assert_eq!(store.remove(group).unwrap_err().status(), SaiStatus::ObjectInUse);
        assert!(store.contains(group));
        store.remove(member).unwrap();
        store.remove(group).unwrap();
        assert_eq!(store.remove(group).unwrap_err().status(), SaiStatus::InvalidObjectId);

        let store = self::store(RemovePolicy::Cascade);
        let group = store.create(ObjectType::Lag, &[]).unwrap();
        for _ in 0..3 {
            store
                .create(ObjectType::LagMember, &[Attribute::new(0u32, AttributeValue::Oid(group))])
                .unwrap();
        }
        store.remove(group).unwrap();
        assert!(store.is_empty());
        assert!(store.objects_of_type(ObjectType::LagMember).is_empty());
    }

    #[test]
    fn test_derived_referrers() {
        let store = store(RemovePolicy::Reject);
        let group = store.create(ObjectType::Lag, &[]).unwrap();
        let m1 = store
            .create(ObjectType::LagMember, &[Attribute::new(0u32, AttributeValue::Oid(group))])
            .unwrap();
        let m2 = store
            .create(ObjectType::LagMember, &[Attribute::new(0u32, AttributeValue::Oid(group))])
            .unwrap();

        assert_eq!(
            store.get_attribute(group, 0).unwrap(),
            AttributeValue::ObjectList(vec![m1, m2])
        );
        store.remove(m1).unwrap();
        assert_eq!(
            store.get_attribute(group, 0).unwrap(),
            AttributeValue::ObjectList(vec![m2])
        );
    }

    #[test]
    fn test_capacity_limit() {
        let store = ObjectStore::new(
            registry(),
            StoreConfig {
                max_objects_per_type: Some(1),
                ..StoreConfig::default()
            },
        );
        let first = store.create(ObjectType::Lag, &[]).unwrap();
        assert_eq!(
            store.create(ObjectType::Lag, &[]).unwrap_err().status(),
            SaiStatus::TableFull
        );
        store.remove(first).unwrap();
        store.create(ObjectType::Lag, &[]).unwrap();
    }

    #[test]
    fn test_stats_on_type_without_counters() {
        let store = store(RemovePolicy::Reject);
        let group = store.create(ObjectType::Lag, &[]).unwrap();
        assert_eq!(
            store.get_stats(group, &[0], StatsMode::Read).unwrap_err().status(),
            SaiStatus::NotSupported
        );
        assert_eq!(
            store.histogram_bins(group, 8).unwrap_err().status(),
            SaiStatus::NotSupported
        );
        assert!(store.effective_stats_modes(ObjectType::Lag).is_empty());
    }

    #[test]
    fn test_unknown_type() {
        let store = store(RemovePolicy::Reject);
        assert_eq!(
            store.create(ObjectType::Tam, &[]).unwrap_err().status(),
            SaiStatus::InvalidObjectType
        );
    }
}
