//! LAG scenarios driven through `SaiContext` and the LAG method table.

use pretty_assertions::assert_eq;
use sai_meta::schemas::lag::{LagAttr, LagMemberAttr};
use sai_meta::{
    Attribute, AttributeValue, LagMemberOid, LagOid, ObjectIdParts, PortOid, SaiStatus,
};
use sai_store::{ApiKind, ApiTable, LagApi, ProfileId, ProfileService, SaiContext};
use std::sync::Arc;

/// A profile service with no settings at all.
struct EmptyProfile;

impl ProfileService for EmptyProfile {
    fn get_value(&self, _profile_id: ProfileId, _key: &str) -> Option<String> {
        None
    }

    fn get_next_value(
        &self,
        _profile_id: ProfileId,
        _previous: Option<&str>,
    ) -> Option<(String, String)> {
        None
    }
}

fn lag_api() -> Arc<dyn LagApi> {
    let context = SaiContext::initialize(0, Arc::new(EmptyProfile)).unwrap();
    match context.api_query(ApiKind::Lag).unwrap() {
        ApiTable::Lag(api) => api,
        other => panic!("unexpected table {:?}", other),
    }
}

fn add_member(api: &dyn LagApi, lag: LagOid, port: u64) -> LagMemberOid {
    api.create_lag_member(&[
        Attribute::new(LagMemberAttr::LagId, lag),
        Attribute::new(LagMemberAttr::PortId, PortOid::from_raw_unchecked(port)),
    ])
    .unwrap()
}

fn port_list(api: &dyn LagApi, lag: LagOid) -> AttributeValue {
    api.get_lag_attribute(lag, &[LagAttr::PortList.into()])
        .unwrap()
        .value(LagAttr::PortList)
        .cloned()
        .unwrap()
}

fn serial(raw: u64) -> u64 {
    ObjectIdParts::decode(raw).unwrap().serial
}

#[test]
fn test_two_lags_keep_their_own_ports() {
    let api = lag_api();
    let lag1 = api.create_lag(&[]).unwrap();
    let m1 = add_member(api.as_ref(), lag1, 1);
    let m2 = add_member(api.as_ref(), lag1, 2);
    let lag2 = api.create_lag(&[]).unwrap();
    let m3 = add_member(api.as_ref(), lag2, 3);
    let m4 = add_member(api.as_ref(), lag2, 4);

    assert_eq!(port_list(api.as_ref(), lag1), AttributeValue::ObjectList(vec![1, 2]));
    assert_eq!(port_list(api.as_ref(), lag2), AttributeValue::ObjectList(vec![3, 4]));

    let lag_id = api
        .get_lag_member_attribute(m1, &[LagMemberAttr::LagId.into()])
        .unwrap();
    assert_eq!(lag_id.value(LagMemberAttr::LagId), Some(&AttributeValue::Oid(lag1.as_raw())));
    let port_id = api
        .get_lag_member_attribute(m3, &[LagMemberAttr::PortId.into()])
        .unwrap();
    assert_eq!(port_id.value(LagMemberAttr::PortId), Some(&AttributeValue::Oid(3)));

    api.remove_lag_member(m2).unwrap();
    api.remove_lag_member(m3).unwrap();
    assert_eq!(port_list(api.as_ref(), lag1), AttributeValue::ObjectList(vec![1]));
    assert_eq!(port_list(api.as_ref(), lag2), AttributeValue::ObjectList(vec![4]));

    api.remove_lag_member(m1).unwrap();
    api.remove_lag_member(m4).unwrap();
    api.remove_lag(lag2).unwrap();
    api.remove_lag(lag1).unwrap();
}

#[test]
fn test_removed_member_is_gone() {
    let api = lag_api();
    let lag = api.create_lag(&[]).unwrap();
    let member = add_member(api.as_ref(), lag, 1);
    api.remove_lag_member(member).unwrap();

    let err = api
        .get_lag_member_attribute(member, &[LagMemberAttr::LagId.into()])
        .unwrap_err();
    assert_eq!(err.status(), SaiStatus::InvalidObjectId);
    let err = api.remove_lag_member(member).unwrap_err();
    assert_eq!(err.status(), SaiStatus::InvalidObjectId);
}

#[test]
fn test_member_without_port_consumes_no_id() {
    let api = lag_api();
    let lag = api.create_lag(&[]).unwrap();
    let first = add_member(api.as_ref(), lag, 1);

    let err = api
        .create_lag_member(&[Attribute::new(LagMemberAttr::LagId, lag)])
        .unwrap_err();
    assert_eq!(err.status(), SaiStatus::InvalidParameter);

    let next = add_member(api.as_ref(), lag, 2);
    assert_eq!(serial(next.as_raw()), serial(first.as_raw()) + 1);
}

#[test]
fn test_lag_with_members_cannot_be_removed() {
    let api = lag_api();
    let lag = api.create_lag(&[]).unwrap();
    let member = add_member(api.as_ref(), lag, 7);

    assert_eq!(api.remove_lag(lag).unwrap_err().status(), SaiStatus::ObjectInUse);
    assert_eq!(api.lag_ports(lag).unwrap(), vec![7]);

    api.remove_lag_member(member).unwrap();
    api.remove_lag(lag).unwrap();
}

#[test]
fn test_member_of_removed_lag_rejected() {
    let api = lag_api();
    let lag = api.create_lag(&[]).unwrap();
    api.remove_lag(lag).unwrap();

    let err = api
        .create_lag_member(&[
            Attribute::new(LagMemberAttr::LagId, lag),
            Attribute::new(LagMemberAttr::PortId, PortOid::from_raw_unchecked(1)),
        ])
        .unwrap_err();
    assert_eq!(err.status(), SaiStatus::InvalidAttributeValue);
}

#[test]
fn test_member_attributes_are_create_only() {
    let api = lag_api();
    let lag = api.create_lag(&[]).unwrap();
    let other = api.create_lag(&[]).unwrap();
    let member = add_member(api.as_ref(), lag, 1);

    let err = api
        .set_lag_member_attribute(member, Attribute::new(LagMemberAttr::LagId, other))
        .unwrap_err();
    assert_eq!(err.status(), SaiStatus::CreateOnlyViolation);
    assert_eq!(api.lag_ports(lag).unwrap(), vec![1]);
    assert!(api.lag_ports(other).unwrap().is_empty());
}
