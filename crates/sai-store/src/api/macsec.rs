//! MACsec API.
//!
//! The MACsec engine object carries capabilities and global settings. Below
//! it, a MACsec port binds a switch port, flows group secure channels (SC),
//! and each SC holds up to four secure associations (SA), one per
//! association number. Key material is stored opaquely.

use super::{check_switch, create_typed};
use crate::store::ObjectStore;
use sai_meta::{
    AttrId, Attribute, AttributeList, MacsecFlowOid, MacsecOid, MacsecPortOid, MacsecSaOid,
    MacsecScOid, SaiResult, StatId, StatsMode, SwitchOid,
};
use std::sync::Arc;

/// MACsec method table (`sai_macsec_api_t`).
///
/// `mode` on the stats calls must be one of the modes the engine advertises
/// through `SAI_MACSEC_ATTR_STATS_MODE_READ_SUPPORTED` and
/// `SAI_MACSEC_ATTR_STATS_MODE_READ_CLEAR_SUPPORTED`.
pub trait MacsecApi: Send + Sync {
    fn create_macsec(&self, switch_id: SwitchOid, attrs: &[Attribute]) -> SaiResult<MacsecOid>;
    fn remove_macsec(&self, id: MacsecOid) -> SaiResult<()>;
    fn set_macsec_attribute(&self, id: MacsecOid, attr: Attribute) -> SaiResult<()>;
    fn get_macsec_attribute(&self, id: MacsecOid, ids: &[AttrId]) -> SaiResult<AttributeList>;

    fn create_macsec_port(
        &self,
        switch_id: SwitchOid,
        attrs: &[Attribute],
    ) -> SaiResult<MacsecPortOid>;
    fn remove_macsec_port(&self, id: MacsecPortOid) -> SaiResult<()>;
    fn set_macsec_port_attribute(&self, id: MacsecPortOid, attr: Attribute) -> SaiResult<()>;
    fn get_macsec_port_attribute(
        &self,
        id: MacsecPortOid,
        ids: &[AttrId],
    ) -> SaiResult<AttributeList>;
    fn get_macsec_port_stats_ext(
        &self,
        id: MacsecPortOid,
        stat_ids: &[StatId],
        mode: StatsMode,
    ) -> SaiResult<Vec<u64>>;
    fn clear_macsec_port_stats(&self, id: MacsecPortOid, stat_ids: &[StatId]) -> SaiResult<()>;

    fn create_macsec_flow(
        &self,
        switch_id: SwitchOid,
        attrs: &[Attribute],
    ) -> SaiResult<MacsecFlowOid>;
    fn remove_macsec_flow(&self, id: MacsecFlowOid) -> SaiResult<()>;
    fn set_macsec_flow_attribute(&self, id: MacsecFlowOid, attr: Attribute) -> SaiResult<()>;
    fn get_macsec_flow_attribute(
        &self,
        id: MacsecFlowOid,
        ids: &[AttrId],
    ) -> SaiResult<AttributeList>;

    fn create_macsec_sc(&self, switch_id: SwitchOid, attrs: &[Attribute])
        -> SaiResult<MacsecScOid>;
    fn remove_macsec_sc(&self, id: MacsecScOid) -> SaiResult<()>;
    fn set_macsec_sc_attribute(&self, id: MacsecScOid, attr: Attribute) -> SaiResult<()>;
    fn get_macsec_sc_attribute(&self, id: MacsecScOid, ids: &[AttrId])
        -> SaiResult<AttributeList>;
    fn get_macsec_sc_stats_ext(
        &self,
        id: MacsecScOid,
        stat_ids: &[StatId],
        mode: StatsMode,
    ) -> SaiResult<Vec<u64>>;
    fn clear_macsec_sc_stats(&self, id: MacsecScOid, stat_ids: &[StatId]) -> SaiResult<()>;

    fn create_macsec_sa(&self, switch_id: SwitchOid, attrs: &[Attribute])
        -> SaiResult<MacsecSaOid>;
    fn remove_macsec_sa(&self, id: MacsecSaOid) -> SaiResult<()>;
    fn set_macsec_sa_attribute(&self, id: MacsecSaOid, attr: Attribute) -> SaiResult<()>;
    fn get_macsec_sa_attribute(&self, id: MacsecSaOid, ids: &[AttrId])
        -> SaiResult<AttributeList>;
    fn get_macsec_sa_stats_ext(
        &self,
        id: MacsecSaOid,
        stat_ids: &[StatId],
        mode: StatsMode,
    ) -> SaiResult<Vec<u64>>;
    fn clear_macsec_sa_stats(&self, id: MacsecSaOid, stat_ids: &[StatId]) -> SaiResult<()>;
}

/// [`MacsecApi`] over the object store.
pub struct StoreMacsecApi {
    store: Arc<ObjectStore>,
}

impl StoreMacsecApi {
    pub fn new(store: Arc<ObjectStore>) -> Self {
        Self { store }
    }
}

impl MacsecApi for StoreMacsecApi {
    fn create_macsec(&self, switch_id: SwitchOid, attrs: &[Attribute]) -> SaiResult<MacsecOid> {
        check_switch(&self.store, switch_id)?;
        create_typed(&self.store, attrs)
    }

    store_object_methods!(MacsecOid, remove_macsec, set_macsec_attribute, get_macsec_attribute);

    fn create_macsec_port(
        &self,
        switch_id: SwitchOid,
        attrs: &[Attribute],
    ) -> SaiResult<MacsecPortOid> {
        check_switch(&self.store, switch_id)?;
        create_typed(&self.store, attrs)
    }

    store_object_methods!(
        MacsecPortOid,
        remove_macsec_port,
        set_macsec_port_attribute,
        get_macsec_port_attribute
    );
    store_stats_methods!(
        MacsecPortOid,
        get_macsec_port_stats_ext,
        clear_macsec_port_stats
    );

    fn create_macsec_flow(
        &self,
        switch_id: SwitchOid,
        attrs: &[Attribute],
    ) -> SaiResult<MacsecFlowOid> {
        check_switch(&self.store, switch_id)?;
        create_typed(&self.store, attrs)
    }

    store_object_methods!(
        MacsecFlowOid,
        remove_macsec_flow,
        set_macsec_flow_attribute,
        get_macsec_flow_attribute
    );

    fn create_macsec_sc(
        &self,
        switch_id: SwitchOid,
        attrs: &[Attribute],
    ) -> SaiResult<MacsecScOid> {
        check_switch(&self.store, switch_id)?;
        create_typed(&self.store, attrs)
    }

    store_object_methods!(
        MacsecScOid,
        remove_macsec_sc,
        set_macsec_sc_attribute,
        get_macsec_sc_attribute
    );
    store_stats_methods!(MacsecScOid, get_macsec_sc_stats_ext, clear_macsec_sc_stats);

    fn create_macsec_sa(
        &self,
        switch_id: SwitchOid,
        attrs: &[Attribute],
    ) -> SaiResult<MacsecSaOid> {
        check_switch(&self.store, switch_id)?;
        create_typed(&self.store, attrs)
    }

    store_object_methods!(
        MacsecSaOid,
        remove_macsec_sa,
        set_macsec_sa_attribute,
        get_macsec_sa_attribute
    );
    store_stats_methods!(MacsecSaOid, get_macsec_sa_stats_ext, clear_macsec_sa_stats);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use pretty_assertions::assert_eq;
    use sai_meta::schemas::macsec::{MacsecAttr, MacsecPortAttr, MacsecPortStat};
    use sai_meta::{
        AttributeValue, MacsecDirection, ObjectType, PortOid, SaiStatus, SchemaRegistry,
        SwitchingMode,
    };

    fn api() -> (StoreMacsecApi, SwitchOid) {
        let store = Arc::new(ObjectStore::new(
            SchemaRegistry::built_in().unwrap(),
            StoreConfig::default(),
        ));
        let switch = store.create(ObjectType::Switch, &[]).unwrap();
        (StoreMacsecApi::new(store), SwitchOid::from_raw_unchecked(switch))
    }

    #[test]
    fn test_create_requires_live_switch() {
        let (api, _) = api();
        let err = api
            .create_macsec(
                SwitchOid::NULL,
                &[Attribute::new(MacsecAttr::Direction, MacsecDirection::Egress)],
            )
            .unwrap_err();
        assert_eq!(err.status(), SaiStatus::InvalidObjectId);
    }

    #[test]
    fn test_macsec_engine_defaults() {
        let (api, switch) = api();
        let macsec = api
            .create_macsec(
                switch,
                &[Attribute::new(MacsecAttr::Direction, MacsecDirection::Ingress)],
            )
            .unwrap();

        let list = api
            .get_macsec_attribute(
                macsec,
                &[
                    MacsecAttr::CtagTpid.into(),
                    MacsecAttr::StagTpid.into(),
                    MacsecAttr::PhysicalBypassEnable.into(),
                ],
            )
            .unwrap();
        assert_eq!(
            list.into_result()
                .unwrap()
                .into_iter()
                .map(|attr| attr.value)
                .collect::<Vec<_>>(),
            vec![
                AttributeValue::U16(0x8100),
                AttributeValue::U16(0x88A8),
                AttributeValue::Bool(false),
            ]
        );
    }

    #[test]
    fn test_port_stats_read_and_clear() {
        let (api, switch) = api();
        let port = api
            .create_macsec_port(
                switch,
                &[
                    Attribute::new(MacsecPortAttr::MacsecDirection, MacsecDirection::Egress),
                    Attribute::new(MacsecPortAttr::PortId, PortOid::from_raw_unchecked(3)),
                ],
            )
            .unwrap();
        assert_eq!(
            api.get_macsec_port_attribute(port, &[MacsecPortAttr::SwitchSwitchingMode.into()])
                .unwrap()
                .value(MacsecPortAttr::SwitchSwitchingMode),
            Some(&AttributeValue::from(SwitchingMode::CutThrough))
        );

        api.store
            .add_to_counter(port.as_raw(), MacsecPortStat::DataPackets.into(), 12)
            .unwrap();
        let ids = [MacsecPortStat::DataPackets.into()];
        assert_eq!(
            api.get_macsec_port_stats_ext(port, &ids, StatsMode::ReadAndClear)
                .unwrap(),
            vec![12]
        );
        assert_eq!(
            api.get_macsec_port_stats_ext(port, &ids, StatsMode::Read).unwrap(),
            vec![0]
        );
    }
}
