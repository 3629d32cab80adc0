//! LAG API.
//!
//! A LAG is created empty; ports join it through LAG members, each naming
//! the LAG and the port. `SAI_LAG_ATTR_PORT_LIST` is derived from the live
//! members.

use super::create_typed;
use crate::store::ObjectStore;
use sai_meta::schemas::lag::LagAttr;
use sai_meta::{
    AttrId, Attribute, AttributeList, AttributeValue, LagMemberOid, LagOid, RawSaiObjectId,
    SaiError, SaiResult,
};
use std::sync::Arc;

/// LAG method table (`sai_lag_api_t`).
pub trait LagApi: Send + Sync {
    fn create_lag(&self, attrs: &[Attribute]) -> SaiResult<LagOid>;

    fn remove_lag(&self, lag: LagOid) -> SaiResult<()>;

    fn set_lag_attribute(&self, lag: LagOid, attr: Attribute) -> SaiResult<()>;

    fn get_lag_attribute(&self, lag: LagOid, ids: &[AttrId]) -> SaiResult<AttributeList>;

    /// Creates a member. `LAG_ID` and `PORT_ID` are mandatory.
    fn create_lag_member(&self, attrs: &[Attribute]) -> SaiResult<LagMemberOid>;

    fn remove_lag_member(&self, member: LagMemberOid) -> SaiResult<()>;

    fn set_lag_member_attribute(&self, member: LagMemberOid, attr: Attribute) -> SaiResult<()>;

    fn get_lag_member_attribute(
        &self,
        member: LagMemberOid,
        ids: &[AttrId],
    ) -> SaiResult<AttributeList>;

    /// Ports of the LAG's members, in member creation order.
    fn lag_ports(&self, lag: LagOid) -> SaiResult<Vec<RawSaiObjectId>> {
        let list = self.get_lag_attribute(lag, &[LagAttr::PortList.into()])?;
        match list.into_result()?.pop().map(|attr| attr.value) {
            Some(AttributeValue::ObjectList(ports)) => Ok(ports),
            other => Err(SaiError::internal(format!(
                "SAI_LAG_ATTR_PORT_LIST returned {:?}",
                other
            ))),
        }
    }
}

/// [`LagApi`] over the object store.
pub struct StoreLagApi {
    store: Arc<ObjectStore>,
}

impl StoreLagApi {
    pub fn new(store: Arc<ObjectStore>) -> Self {
        Self { store }
    }
}

impl LagApi for StoreLagApi {
    fn create_lag(&self, attrs: &[Attribute]) -> SaiResult<LagOid> {
        create_typed(&self.store, attrs)
    }

    store_object_methods!(LagOid, remove_lag, set_lag_attribute, get_lag_attribute);

    fn create_lag_member(&self, attrs: &[Attribute]) -> SaiResult<LagMemberOid> {
        create_typed(&self.store, attrs)
    }

    store_object_methods!(
        LagMemberOid,
        remove_lag_member,
        set_lag_member_attribute,
        get_lag_member_attribute
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use pretty_assertions::assert_eq;
    use sai_meta::schemas::lag::LagMemberAttr;
    use sai_meta::{PortOid, SaiStatus, SchemaRegistry};

    fn api() -> StoreLagApi {
        StoreLagApi::new(Arc::new(ObjectStore::new(
            SchemaRegistry::built_in().unwrap(),
            StoreConfig::default(),
        )))
    }

    fn member_attrs(lag: LagOid, port: u64) -> Vec<Attribute> {
        vec![
            Attribute::new(LagMemberAttr::LagId, lag),
            Attribute::new(LagMemberAttr::PortId, PortOid::from_raw_unchecked(port)),
        ]
    }

    #[test]
    fn test_lag_ports() {
        let api = api();
        let lag = api.create_lag(&[]).unwrap();
        assert!(api.lag_ports(lag).unwrap().is_empty());

        api.create_lag_member(&member_attrs(lag, 1)).unwrap();
        api.create_lag_member(&member_attrs(lag, 2)).unwrap();
        assert_eq!(api.lag_ports(lag).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_port_list_is_read_only() {
        let api = api();
        let lag = api.create_lag(&[]).unwrap();
        let err = api
            .set_lag_attribute(
                lag,
                Attribute::new(LagAttr::PortList, AttributeValue::ObjectList(vec![1])),
            )
            .unwrap_err();
        assert_eq!(err.status(), SaiStatus::AttributeReadOnly);
    }

    #[test]
    fn test_member_attributes() {
        let api = api();
        let lag = api.create_lag(&[]).unwrap();
        let member = api.create_lag_member(&member_attrs(lag, 7)).unwrap();

        let list = api
            .get_lag_member_attribute(
                member,
                &[LagMemberAttr::LagId.into(), LagMemberAttr::PortId.into()],
            )
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!(list, member_attrs(lag, 7));

        let err = api
            .set_lag_member_attribute(
                LagMemberOid::from_raw_unchecked(lag.as_raw()),
                Attribute::new(LagMemberAttr::PortId, PortOid::from_raw_unchecked(8)),
            )
            .unwrap_err();
        assert_eq!(err.status(), SaiStatus::InvalidObjectId);
    }

    #[test]
    fn test_member_of_wrong_kind_rejected() {
        let api = api();
        let lag = api.create_lag(&[]).unwrap();
        let member = api.create_lag_member(&member_attrs(lag, 1)).unwrap();

        // A member id passed where a LAG is expected.
        let err = api
            .remove_lag(LagOid::from_raw_unchecked(member.as_raw()))
            .unwrap_err();
        assert_eq!(err.status(), SaiStatus::InvalidObjectId);
    }
}
