//! Runtime context: configuration, store, switch object and API tables.

use crate::api::{
    ApiKind, ApiRegistry, ApiTable, LagApi, MacsecApi, StoreLagApi, StoreMacsecApi, StoreTamApi,
    TamApi,
};
use crate::config::StoreConfig;
use crate::profile::{ProfileId, ProfileService};
use crate::store::ObjectStore;
use log::info;
use sai_meta::schemas::switch::SwitchAttrExtension;
use sai_meta::{Attribute, ObjectType, SaiError, SaiResult, SchemaRegistry, SwitchOid};
use std::sync::Arc;

/// An initialized SAI runtime.
///
/// Holds the object store built from the profile's configuration, the switch
/// object every switch-scoped create must name, and the registry of method
/// tables returned by [`SaiContext::api_query`].
pub struct SaiContext {
    profile_id: ProfileId,
    profile: Arc<dyn ProfileService>,
    store: Arc<ObjectStore>,
    switch_id: SwitchOid,
    apis: ApiRegistry,
}

impl SaiContext {
    /// Builds a context from the profile `profile_id`.
    ///
    /// Fails with `InvalidParameter` when a profile key is malformed.
    pub fn initialize(profile_id: ProfileId, profile: Arc<dyn ProfileService>) -> SaiResult<Self> {
        let config = StoreConfig::from_profile(profile.as_ref(), profile_id)?;
        Self::with_config(profile_id, profile, config)
    }

    /// Builds a context from an already resolved configuration.
    pub fn with_config(
        profile_id: ProfileId,
        profile: Arc<dyn ProfileService>,
        config: StoreConfig,
    ) -> SaiResult<Self> {
        let dash_meter_buckets = config.dash_max_meter_bucket_count_per_eni;
        let store = Arc::new(ObjectStore::new(SchemaRegistry::built_in()?, config));

        let switch_id = SwitchOid::from_raw_unchecked(store.create(ObjectType::Switch, &[])?);
        if let Some(buckets) = dash_meter_buckets {
            store.publish_read_only(
                switch_id.as_raw(),
                Attribute::new(SwitchAttrExtension::DashCapsMaxMeterBucketCountPerEni, buckets),
            )?;
        }

        let apis = ApiRegistry::new();
        apis.register(ApiTable::Lag(Arc::new(StoreLagApi::new(store.clone()))));
        apis.register(ApiTable::Macsec(Arc::new(StoreMacsecApi::new(store.clone()))));
        apis.register(ApiTable::Tam(Arc::new(StoreTamApi::new(store.clone()))));

        info!(
            "Initialized SAI context for profile {}: switch {}, {} object types",
            profile_id,
            switch_id,
            store.schemas().len()
        );

        Ok(Self {
            profile_id,
            profile,
            store,
            switch_id,
            apis,
        })
    }

    pub fn profile_id(&self) -> ProfileId {
        self.profile_id
    }

    pub fn profile(&self) -> &dyn ProfileService {
        self.profile.as_ref()
    }

    pub fn store(&self) -> &Arc<ObjectStore> {
        &self.store
    }

    pub fn switch_id(&self) -> SwitchOid {
        self.switch_id
    }

    pub fn api_query(&self, kind: ApiKind) -> SaiResult<ApiTable> {
        self.apis.query(kind)
    }

    /// Installs `table`, replacing the one registered for its kind.
    pub fn register_api(&self, table: ApiTable) -> Option<ApiTable> {
        self.apis.register(table)
    }

    pub fn lag_api(&self) -> SaiResult<Arc<dyn LagApi>> {
        match self.api_query(ApiKind::Lag)? {
            ApiTable::Lag(api) => Ok(api),
            other => Err(mismatched(ApiKind::Lag, &other)),
        }
    }

    pub fn macsec_api(&self) -> SaiResult<Arc<dyn MacsecApi>> {
        match self.api_query(ApiKind::Macsec)? {
            ApiTable::Macsec(api) => Ok(api),
            other => Err(mismatched(ApiKind::Macsec, &other)),
        }
    }

    pub fn tam_api(&self) -> SaiResult<Arc<dyn TamApi>> {
        match self.api_query(ApiKind::Tam)? {
            ApiTable::Tam(api) => Ok(api),
            other => Err(mismatched(ApiKind::Tam, &other)),
        }
    }
}

fn mismatched(kind: ApiKind, table: &ApiTable) -> SaiError {
    SaiError::internal(format!("{} registered as {:?}", kind, table))
}
