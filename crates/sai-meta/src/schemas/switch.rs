//! Switch object. Only the extension range is modelled here.

use super::sai_ids;
use crate::attr::AttrFlags;
use crate::error::SaiResult;
use crate::schema::{AttributeMeta, ObjectSchema};
use crate::types::ObjectType;
use crate::value::AttrValueType;

sai_ids! {
    /// `sai_switch_attr_extensions_t`, starting at the core `_END`.
    SwitchAttrExtension {
        DashCapsMaxMeterBucketCountPerEni = 0,
    }
}

pub fn switch_schema() -> SaiResult<ObjectSchema> {
    ObjectSchema::new(ObjectType::Switch).with_extensions().with(AttributeMeta::new(
        SwitchAttrExtension::DashCapsMaxMeterBucketCountPerEni,
        "SAI_SWITCH_ATTR_DASH_CAPS_MAX_METER_BUCKET_COUNT_PER_ENI",
        AttrValueType::U32,
        AttrFlags::READ_ONLY,
    ))
}
