//! API tables: one trait per SAI API domain.
//!
//! Each domain ([`LagApi`], [`MacsecApi`], [`TamApi`]) is a trait taking
//! type-safe object ids, with a store-backed implementation in its module.
//! A vendor backend can provide its own implementation and register it in the
//! [`ApiRegistry`] in place of the store-backed one.
//!
//! # Available API Modules
//!
//! - [`lag`]: LAG and LAG member management
//! - [`macsec`]: MACsec engine, port, flow, SC and SA management
//! - [`tam`]: TAM microburst monitors and histograms

/// Remove/set/get methods of a store-backed table for one object kind.
macro_rules! store_object_methods {
    ($oid:ty, $remove:ident, $set:ident, $get:ident) => {
        fn $remove(&self, id: $oid) -> SaiResult<()> {
            $crate::api::remove_typed(&self.store, id)
        }

        fn $set(&self, id: $oid, attr: Attribute) -> SaiResult<()> {
            self.store.set_attribute($crate::api::checked(id)?, attr)
        }

        fn $get(&self, id: $oid, ids: &[AttrId]) -> SaiResult<AttributeList> {
            $crate::api::get_typed(&self.store, id, ids)
        }
    };
}

/// Counter get/clear methods of a store-backed table for one object kind.
macro_rules! store_stats_methods {
    ($oid:ty, $get:ident, $clear:ident) => {
        fn $get(&self, id: $oid, stat_ids: &[StatId], mode: StatsMode) -> SaiResult<Vec<u64>> {
            self.store
                .get_stats($crate::api::checked(id)?, stat_ids, mode)
        }

        fn $clear(&self, id: $oid, stat_ids: &[StatId]) -> SaiResult<()> {
            self.store.clear_stats($crate::api::checked(id)?, stat_ids)
        }
    };
}

pub mod lag;
pub mod macsec;
pub mod tam;

pub use lag::{LagApi, StoreLagApi};
pub use macsec::{MacsecApi, StoreMacsecApi};
pub use tam::{StoreTamApi, TamApi};

use crate::store::ObjectStore;
use log::info;
use parking_lot::RwLock;
use sai_meta::{
    AttrId, Attribute, AttributeList, ObjectType, RawSaiObjectId, SaiError, SaiObjectId,
    SaiObjectKind, SaiResult, SwitchOid,
};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// SAI API domains (`sai_api_t`) this crate knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ApiKind {
    Lag,
    Macsec,
    Tam,
}

impl ApiKind {
    pub const ALL: [ApiKind; 3] = [ApiKind::Lag, ApiKind::Macsec, ApiKind::Tam];

    pub const fn name(&self) -> &'static str {
        match self {
            ApiKind::Lag => "SAI_API_LAG",
            ApiKind::Macsec => "SAI_API_MACSEC",
            ApiKind::Tam => "SAI_API_TAM",
        }
    }
}

impl fmt::Display for ApiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A registered method table.
#[derive(Clone)]
pub enum ApiTable {
    Lag(Arc<dyn LagApi>),
    Macsec(Arc<dyn MacsecApi>),
    Tam(Arc<dyn TamApi>),
}

impl ApiTable {
    pub fn kind(&self) -> ApiKind {
        match self {
            ApiTable::Lag(_) => ApiKind::Lag,
            ApiTable::Macsec(_) => ApiKind::Macsec,
            ApiTable::Tam(_) => ApiKind::Tam,
        }
    }
}

impl fmt::Debug for ApiTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiTable({})", self.kind())
    }
}

/// Method tables keyed by [`ApiKind`].
#[derive(Debug, Default)]
pub struct ApiRegistry {
    tables: RwLock<BTreeMap<ApiKind, ApiTable>>,
}

impl ApiRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a table, returning the one it replaces.
    pub fn register(&self, table: ApiTable) -> Option<ApiTable> {
        let kind = table.kind();
        let previous = self.tables.write().insert(kind, table);
        if previous.is_some() {
            info!("Replaced {} method table", kind);
        }
        previous
    }

    /// Looks up a table. Unregistered kinds are `NotImplemented`.
    pub fn query(&self, kind: ApiKind) -> SaiResult<ApiTable> {
        self.tables
            .read()
            .get(&kind)
            .cloned()
            .ok_or_else(|| SaiError::not_implemented(format!("{} method table", kind)))
    }

    pub fn is_registered(&self, kind: ApiKind) -> bool {
        self.tables.read().contains_key(&kind)
    }

    pub fn kinds(&self) -> Vec<ApiKind> {
        self.tables.read().keys().copied().collect()
    }
}

/// Raw id of a typed object id, rejecting null ids and ids of another type.
pub(crate) fn checked<T: SaiObjectKind>(id: SaiObjectId<T>) -> SaiResult<RawSaiObjectId> {
    if id.is_null() || !id.has_kind_type() {
        return Err(SaiError::invalid_object_id(id.as_raw()));
    }
    Ok(id.as_raw())
}

/// The switch must be a live switch object.
pub(crate) fn check_switch(store: &ObjectStore, switch_id: SwitchOid) -> SaiResult<()> {
    let raw = checked(switch_id)?;
    if store.object_type_of(raw)? != ObjectType::Switch {
        return Err(SaiError::invalid_object_id(raw));
    }
    Ok(())
}

pub(crate) fn create_typed<T: SaiObjectKind>(
    store: &ObjectStore,
    attrs: &[Attribute],
) -> SaiResult<SaiObjectId<T>> {
    store
        .create(T::OBJECT_TYPE, attrs)
        .map(SaiObjectId::from_raw_unchecked)
}

pub(crate) fn remove_typed<T: SaiObjectKind>(
    store: &ObjectStore,
    id: SaiObjectId<T>,
) -> SaiResult<()> {
    store.remove(checked(id)?)
}

pub(crate) fn get_typed<T: SaiObjectKind>(
    store: &ObjectStore,
    id: SaiObjectId<T>,
    ids: &[AttrId],
) -> SaiResult<AttributeList> {
    store.get_attributes(checked(id)?, ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use pretty_assertions::assert_eq;
    use sai_meta::{LagOid, SaiStatus, SchemaRegistry};

    fn store() -> Arc<ObjectStore> {
        Arc::new(ObjectStore::new(
            SchemaRegistry::built_in().unwrap(),
            StoreConfig::default(),
        ))
    }

    #[test]
    fn test_query_unregistered_is_not_implemented() {
        let registry = ApiRegistry::new();
        let err = registry.query(ApiKind::Macsec).unwrap_err();
        assert_eq!(err.status(), SaiStatus::NotImplemented);
        assert!(err.is_soft());
    }

    #[test]
    fn test_register_replaces() {
        let registry = ApiRegistry::new();
        let store = store();
        assert!(registry
            .register(ApiTable::Lag(Arc::new(StoreLagApi::new(store.clone()))))
            .is_none());
        let previous = registry.register(ApiTable::Lag(Arc::new(StoreLagApi::new(store))));
        assert_eq!(previous.map(|table| table.kind()), Some(ApiKind::Lag));
        assert_eq!(registry.kinds(), vec![ApiKind::Lag]);
        assert!(registry.is_registered(ApiKind::Lag));
    }

    #[test]
    fn test_checked_rejects_null_and_foreign_ids() {
        assert_eq!(
            checked(LagOid::NULL).unwrap_err().status(),
            SaiStatus::InvalidObjectId
        );
        let member_id = sai_meta::ObjectIdParts {
            switch_index: 0,
            object_type: ObjectType::LagMember,
            serial: 1,
        }
        .encode();
        assert!(checked(LagOid::from_raw_unchecked(member_id)).is_err());
    }

    #[test]
    fn test_check_switch() {
        let store = store();
        let switch = store.create(ObjectType::Switch, &[]).unwrap();
        assert!(check_switch(&store, SwitchOid::from_raw_unchecked(switch)).is_ok());
        assert!(check_switch(&store, SwitchOid::NULL).is_err());
    }
}
