//! Dependency index: which live objects reference which.
//!
//! The index is the store's topology. It knows every live object id and its
//! type, and for every live object the `(referrer, attribute)` pairs that
//! point at it. Like the rest of the store it never creates entries
//! implicitly:
//! - `add_ref()` fails with [`RefIndexError::NotTracked`] for an unknown target
//! - `remove_ref()` fails with [`RefIndexError::RefCountUnderflow`] instead of
//!   wrapping
//!
//! The index lives behind the store's topology mutex; it has no locking of
//! its own.

use sai_meta::{object_type_of, AttrId, ObjectType, RawSaiObjectId, SaiError};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use thiserror::Error;

/// Error type for dependency index operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefIndexError {
    #[error("Object 0x{0:016x} is not tracked")]
    NotTracked(RawSaiObjectId),

    #[error("Object 0x{0:016x} is already tracked")]
    AlreadyTracked(RawSaiObjectId),

    #[error("Reference count underflow for 0x{target:016x} from 0x{referrer:016x}")]
    RefCountUnderflow {
        target: RawSaiObjectId,
        referrer: RawSaiObjectId,
    },
}

impl From<RefIndexError> for SaiError {
    fn from(err: RefIndexError) -> Self {
        SaiError::internal(err.to_string())
    }
}

/// Referrers of one live object.
///
/// A referrer holding the same id twice in an object list counts twice.
#[derive(Debug, Clone, Default)]
struct RefEntry {
    referrers: BTreeMap<(RawSaiObjectId, AttrId), u32>,
}

impl RefEntry {
    fn ref_count(&self) -> u32 {
        self.referrers.values().sum()
    }
}

#[derive(Debug, Default)]
pub(crate) struct DependencyIndex {
    entries: HashMap<RawSaiObjectId, RefEntry>,
    by_type: BTreeMap<ObjectType, BTreeSet<RawSaiObjectId>>,
}

impl DependencyIndex {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Starts tracking a newly created object.
    pub(crate) fn track(
        &mut self,
        id: RawSaiObjectId,
        object_type: ObjectType,
    ) -> Result<(), RefIndexError> {
        if self.entries.contains_key(&id) {
            return Err(RefIndexError::AlreadyTracked(id));
        }
        self.entries.insert(id, RefEntry::default());
        self.by_type.entry(object_type).or_default().insert(id);
        Ok(())
    }

    /// Stops tracking a removed object.
    ///
    /// Remaining referrers are dropped with it; the caller decides whether
    /// removing a referenced object is allowed.
    pub(crate) fn untrack(&mut self, id: RawSaiObjectId) -> Result<(), RefIndexError> {
        self.entries
            .remove(&id)
            .ok_or(RefIndexError::NotTracked(id))?;
        if let Some(ids) = self.by_type.get_mut(&object_type_of(id)) {
            ids.remove(&id);
        }
        Ok(())
    }

    pub(crate) fn is_tracked(&self, id: RawSaiObjectId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Records that `referrer.attr` holds `target`. Returns the new count
    /// for that pair.
    pub(crate) fn add_ref(
        &mut self,
        target: RawSaiObjectId,
        referrer: RawSaiObjectId,
        attr: AttrId,
    ) -> Result<u32, RefIndexError> {
        let entry = self
            .entries
            .get_mut(&target)
            .ok_or(RefIndexError::NotTracked(target))?;
        let count = entry.referrers.entry((referrer, attr)).or_insert(0);
        *count += 1;
        Ok(*count)
    }

    /// Drops one `referrer.attr` → `target` reference. Returns the remaining
    /// count for that pair.
    pub(crate) fn remove_ref(
        &mut self,
        target: RawSaiObjectId,
        referrer: RawSaiObjectId,
        attr: AttrId,
    ) -> Result<u32, RefIndexError> {
        let entry = self
            .entries
            .get_mut(&target)
            .ok_or(RefIndexError::NotTracked(target))?;
        let key = (referrer, attr);
        let count = entry
            .referrers
            .get_mut(&key)
            .filter(|count| **count > 0)
            .ok_or(RefIndexError::RefCountUnderflow { target, referrer })?;
        *count -= 1;
        let remaining = *count;
        if remaining == 0 {
            entry.referrers.remove(&key);
        }
        Ok(remaining)
    }

    /// Total number of references held on `target`.
    pub(crate) fn ref_count(&self, target: RawSaiObjectId) -> Option<u32> {
        self.entries.get(&target).map(RefEntry::ref_count)
    }

    /// Distinct objects referencing `target`, other than `target` itself,
    /// ordered by id.
    pub(crate) fn referrers(&self, target: RawSaiObjectId) -> Vec<RawSaiObjectId> {
        let Some(entry) = self.entries.get(&target) else {
            return Vec::new();
        };
        let ids: BTreeSet<RawSaiObjectId> = entry
            .referrers
            .keys()
            .map(|(referrer, _)| *referrer)
            .filter(|referrer| *referrer != target)
            .collect();
        ids.into_iter().collect()
    }

    /// Objects of `object_type` whose `via` attribute references `target`,
    /// ordered by id (creation order within a type).
    pub(crate) fn referrers_via(
        &self,
        target: RawSaiObjectId,
        object_type: ObjectType,
        via: AttrId,
    ) -> Vec<RawSaiObjectId> {
        let Some(entry) = self.entries.get(&target) else {
            return Vec::new();
        };
        entry
            .referrers
            .keys()
            .filter(|(referrer, attr)| *attr == via && object_type_of(*referrer) == object_type)
            .map(|(referrer, _)| *referrer)
            .collect()
    }

    pub(crate) fn objects_of_type(&self, object_type: ObjectType) -> Vec<RawSaiObjectId> {
        self.by_type
            .get(&object_type)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    pub(crate) fn live_count(&self, object_type: ObjectType) -> usize {
        self.by_type.get(&object_type).map_or(0, BTreeSet::len)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// `root` followed by everything that transitively references it, ordered
    /// so that every object comes after the objects referencing it.
    ///
    /// Cycles (an SC whose active SA references the SC back) are visited once.
    pub(crate) fn removal_order(&self, root: RawSaiObjectId) -> Vec<RawSaiObjectId> {
        let mut visited = BTreeSet::new();
        let mut order = Vec::new();
        self.visit(root, &mut visited, &mut order);
        order
    }

    fn visit(
        &self,
        id: RawSaiObjectId,
        visited: &mut BTreeSet<RawSaiObjectId>,
        order: &mut Vec<RawSaiObjectId>,
    ) {
        if !visited.insert(id) {
            return;
        }
        for referrer in self.referrers(id) {
            self.visit(referrer, visited, order);
        }
        order.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sai_meta::ObjectIdParts;

    fn oid(object_type: ObjectType, serial: u64) -> RawSaiObjectId {
        ObjectIdParts {
            switch_index: 0,
            object_type,
            serial,
        }
        .encode()
    }

    #[test]
    fn test_add_ref_requires_tracked_target() {
        let mut index = DependencyIndex::new();
        let lag = oid(ObjectType::Lag, 1);
        let member = oid(ObjectType::LagMember, 1);

        assert_eq!(
            index.add_ref(lag, member, 0),
            Err(RefIndexError::NotTracked(lag))
        );

        index.track(lag, ObjectType::Lag).unwrap();
        assert_eq!(index.add_ref(lag, member, 0).unwrap(), 1);
        assert_eq!(index.ref_count(lag), Some(1));
        assert_eq!(index.referrers(lag), vec![member]);
    }

    #[test]
    fn test_remove_ref_underflow_protection() {
        let mut index = DependencyIndex::new();
        let lag = oid(ObjectType::Lag, 1);
        let member = oid(ObjectType::LagMember, 1);
        index.track(lag, ObjectType::Lag).unwrap();

        assert!(matches!(
            index.remove_ref(lag, member, 0),
            Err(RefIndexError::RefCountUnderflow { .. })
        ));

        index.add_ref(lag, member, 0).unwrap();
        assert_eq!(index.remove_ref(lag, member, 0).unwrap(), 0);
        assert!(index.remove_ref(lag, member, 0).is_err());
        assert_eq!(index.ref_count(lag), Some(0));
    }

    #[test]
    fn test_track_twice_fails() {
        let mut index = DependencyIndex::new();
        let lag = oid(ObjectType::Lag, 1);
        index.track(lag, ObjectType::Lag).unwrap();
        assert_eq!(
            index.track(lag, ObjectType::Lag),
            Err(RefIndexError::AlreadyTracked(lag))
        );
        index.untrack(lag).unwrap();
        assert!(index.untrack(lag).is_err());
        assert_eq!(index.live_count(ObjectType::Lag), 0);
    }

    #[test]
    fn test_referrers_via_filters_type_and_attribute() {
        let mut index = DependencyIndex::new();
        let sc = oid(ObjectType::MacsecSc, 1);
        let sa1 = oid(ObjectType::MacsecSa, 1);
        let sa2 = oid(ObjectType::MacsecSa, 2);
        index.track(sc, ObjectType::MacsecSc).unwrap();
        index.add_ref(sc, sa2, 1).unwrap();
        index.add_ref(sc, sa1, 1).unwrap();
        index.add_ref(sc, sa1, 7).unwrap();

        assert_eq!(index.referrers_via(sc, ObjectType::MacsecSa, 1), vec![sa1, sa2]);
        assert_eq!(index.referrers_via(sc, ObjectType::MacsecSa, 7), vec![sa1]);
        assert!(index.referrers_via(sc, ObjectType::LagMember, 1).is_empty());
        assert_eq!(index.referrers(sc), vec![sa1, sa2]);
    }

    #[test]
    fn test_removal_order_handles_cycles() {
        let mut index = DependencyIndex::new();
        let flow = oid(ObjectType::MacsecFlow, 1);
        let sc = oid(ObjectType::MacsecSc, 1);
        let sa = oid(ObjectType::MacsecSa, 1);
        index.track(flow, ObjectType::MacsecFlow).unwrap();
        index.track(sc, ObjectType::MacsecSc).unwrap();
        index.track(sa, ObjectType::MacsecSa).unwrap();
        index.add_ref(flow, sc, 1).unwrap();
        index.add_ref(sc, sa, 1).unwrap();
        index.add_ref(sa, sc, 7).unwrap();

        let order = index.removal_order(flow);
        assert_eq!(order.len(), 3);
        assert_eq!(order.last(), Some(&flow));
        assert!(order.contains(&sc));
        assert!(order.contains(&sa));
    }

    #[test]
    fn test_objects_of_type() {
        let mut index = DependencyIndex::new();
        let l2 = oid(ObjectType::Lag, 2);
        let l1 = oid(ObjectType::Lag, 1);
        index.track(l2, ObjectType::Lag).unwrap();
        index.track(l1, ObjectType::Lag).unwrap();
        index.track(oid(ObjectType::LagMember, 1), ObjectType::LagMember).unwrap();

        assert_eq!(index.objects_of_type(ObjectType::Lag), vec![l1, l2]);
        assert_eq!(index.live_count(ObjectType::LagMember), 1);
        assert_eq!(index.len(), 3);
    }
}
