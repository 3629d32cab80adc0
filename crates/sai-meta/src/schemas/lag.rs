//! LAG and LAG member.

use super::sai_ids;
use crate::attr::AttrFlags;
use crate::error::SaiResult;
use crate::schema::{AttributeMeta, DerivedValue, ObjectSchema};
use crate::types::ObjectType;
use crate::value::AttrValueType;

sai_ids! {
    /// `sai_lag_attr_t`
    LagAttr {
        PortList = 0,
    }
}

sai_ids! {
    /// `sai_lag_member_attr_t`
    LagMemberAttr {
        LagId = 0,
        PortId = 1,
    }
}

pub fn lag_schema() -> SaiResult<ObjectSchema> {
    ObjectSchema::new(ObjectType::Lag).with(
        AttributeMeta::new(
            LagAttr::PortList,
            "SAI_LAG_ATTR_PORT_LIST",
            AttrValueType::ObjectList,
            AttrFlags::READ_ONLY,
        )
        .objects(&[ObjectType::Port])
        .derived_from(DerivedValue::Referrers {
            object_type: ObjectType::LagMember,
            via: LagMemberAttr::LagId.into(),
            project: Some(LagMemberAttr::PortId.into()),
        }),
    )
}

pub fn lag_member_schema() -> SaiResult<ObjectSchema> {
    ObjectSchema::new(ObjectType::LagMember)
        .with(
            AttributeMeta::new(
                LagMemberAttr::LagId,
                "SAI_LAG_MEMBER_ATTR_LAG_ID",
                AttrValueType::Oid,
                AttrFlags::MANDATORY_CREATE_ONLY,
            )
            .objects(&[ObjectType::Lag]),
        )?
        .with(
            AttributeMeta::new(
                LagMemberAttr::PortId,
                "SAI_LAG_MEMBER_ATTR_PORT_ID",
                AttrValueType::Oid,
                AttrFlags::MANDATORY_CREATE_ONLY,
            )
            .objects(&[ObjectType::Port]),
        )
}
