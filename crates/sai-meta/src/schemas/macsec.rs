//! MACsec: global object, port, flow, secure channel and secure association.
//!
//! Key material (SAK, salt, auth key) is carried as opaque fixed-length byte
//! arrays; nothing here interprets it.

use super::sai_ids;
use crate::attr::AttrFlags;
use crate::condition::Condition;
use crate::error::SaiResult;
use crate::schema::{AttributeMeta, DerivedValue, ObjectSchema, ValueConstraint};
use crate::stats::{StatsModeSource, StatsSchema};
use crate::types::ObjectType;
use crate::value::{AttrValueType, MacsecDirection, StatsMode, SwitchingMode};

/// SAK length in bytes (256-bit keys; 128-bit keys use the first half).
pub const MACSEC_SAK_LEN: usize = 32;
pub const MACSEC_SALT_LEN: usize = 12;
pub const MACSEC_AUTH_KEY_LEN: usize = 16;

/// Highest association number.
pub const MACSEC_MAX_AN: u8 = 3;

sai_ids! {
    /// `sai_macsec_attr_t`
    MacsecAttr {
        Direction = 0,
        SwitchingModeCutThroughSupported = 1,
        SwitchingModeStoreAndForwardSupported = 2,
        StatsModeReadSupported = 3,
        StatsModeReadClearSupported = 4,
        SciInIngressMacsecAcl = 5,
        Pn32bitSupported = 6,
        Xpn64bitSupported = 7,
        GcmAes128Supported = 8,
        GcmAes256Supported = 9,
        SectagOffsetsSupported = 10,
        SystemSideMtu = 11,
        WarmBootSupported = 12,
        WarmBootEnable = 13,
        CtagTpid = 14,
        StagTpid = 15,
        StatsMode = 16,
        PhysicalBypassEnable = 17,
        SupportedPortList = 18,
    }
}

sai_ids! {
    /// `sai_macsec_port_attr_t`
    MacsecPortAttr {
        MacsecDirection = 0,
        PortId = 1,
        CtagEnable = 2,
        StagEnable = 3,
        SwitchSwitchingMode = 4,
    }
}

sai_ids! {
    /// `sai_macsec_port_stat_t`
    MacsecPortStat {
        PreMacsecDropPackets = 0,
        ControlPackets = 1,
        DataPackets = 2,
        OctetsUncontrolled = 3,
        OctetsControlled = 4,
        UcastPacketsUncontrolled = 5,
        UcastPacketsControlled = 6,
        MulticastPacketsUncontrolled = 7,
        MulticastPacketsControlled = 8,
        BroadcastPacketsUncontrolled = 9,
        BroadcastPacketsControlled = 10,
    }
}

sai_ids! {
    /// `sai_macsec_flow_attr_t`
    MacsecFlowAttr {
        MacsecDirection = 0,
        AclEntryList = 1,
        ScList = 2,
    }
}

sai_ids! {
    /// `sai_macsec_sc_attr_t`
    MacsecScAttr {
        MacsecDirection = 0,
        FlowId = 1,
        MacsecSci = 2,
        MacsecSsci = 3,
        MacsecXpnEnable = 4,
        MacsecExplicitSciEnable = 5,
        MacsecSectagOffset = 6,
        ActiveSa = 7,
        MacsecReplayProtectionEnable = 8,
        MacsecReplayProtectionWindow = 9,
        SaList = 10,
    }
}

sai_ids! {
    /// `sai_macsec_sc_stat_t`
    MacsecScStat {
        ControlPackets = 0,
        PacketsUntagged = 1,
        SaNotInUse = 2,
        TaggedControlPackets = 3,
        OutPacketsTooLong = 4,
        InPacketsNoTag = 5,
        InPacketsBadTag = 6,
        InPacketsNoSci = 7,
        InPacketsUnknownSci = 8,
        InPacketsOverrun = 9,
    }
}

sai_ids! {
    /// `sai_macsec_sa_attr_t`
    MacsecSaAttr {
        MacsecDirection = 0,
        ScId = 1,
        An = 2,
        EncryptionEnable = 3,
        Sak256Bits = 4,
        Sak = 5,
        Salt = 6,
        AuthKey = 7,
        Xpn = 8,
        MinimumXpn = 9,
    }
}

sai_ids! {
    /// `sai_macsec_sa_stat_t`
    MacsecSaStat {
        OctetsEncrypted = 0,
        OctetsProtected = 1,
        OutPacketsEncrypted = 2,
        OutPacketsProtected = 3,
        InPacketsUnchecked = 4,
        InPacketsDelayed = 5,
        InPacketsLate = 6,
        InPacketsInvalid = 7,
        InPacketsNotValid = 8,
        InPacketsNotUsingSa = 9,
        InPacketsUnusedSa = 10,
        InPacketsOk = 11,
    }
}

fn direction_attr(id: u32, name: &str) -> AttributeMeta {
    AttributeMeta::new(
        id,
        name,
        AttrValueType::I32,
        AttrFlags::MANDATORY_CREATE_ONLY,
    )
    .with_constraint(ValueConstraint::OneOf(vec![
        MacsecDirection::Egress.as_i32(),
        MacsecDirection::Ingress.as_i32(),
    ]))
}

/// Counter reads follow `STATS_MODE` of the engine whose direction equals the
/// object's `direction` attribute.
fn engine_stats_mode(direction: u32) -> StatsModeSource {
    StatsModeSource {
        object_type: ObjectType::Macsec,
        attr: MacsecAttr::StatsMode.into(),
        match_on: Some((MacsecAttr::Direction.into(), direction)),
    }
}

fn capability(id: MacsecAttr, name: &str, value_type: AttrValueType) -> AttributeMeta {
    AttributeMeta::new(id, name, value_type, AttrFlags::READ_ONLY)
}

pub fn macsec_schema() -> SaiResult<ObjectSchema> {
    use MacsecAttr as A;

    let ingress = Condition::equals(A::Direction, MacsecDirection::Ingress);
    let stats_mode = |id: MacsecAttr, name: &str, mode: StatsMode| {
        capability(id, name, AttrValueType::Bool).derived_from(DerivedValue::StatsModeSupported {
            object_type: ObjectType::MacsecSa,
            mode,
        })
    };

    ObjectSchema::new(ObjectType::Macsec)
        .with(direction_attr(A::Direction.into(), "SAI_MACSEC_ATTR_DIRECTION"))?
        .with(capability(
            A::SwitchingModeCutThroughSupported,
            "SAI_MACSEC_ATTR_SWITCHING_MODE_CUT_THROUGH_SUPPORTED",
            AttrValueType::Bool,
        ))?
        .with(capability(
            A::SwitchingModeStoreAndForwardSupported,
            "SAI_MACSEC_ATTR_SWITCHING_MODE_STORE_AND_FORWARD_SUPPORTED",
            AttrValueType::Bool,
        ))?
        .with(stats_mode(
            A::StatsModeReadSupported,
            "SAI_MACSEC_ATTR_STATS_MODE_READ_SUPPORTED",
            StatsMode::Read,
        ))?
        .with(stats_mode(
            A::StatsModeReadClearSupported,
            "SAI_MACSEC_ATTR_STATS_MODE_READ_CLEAR_SUPPORTED",
            StatsMode::ReadAndClear,
        ))?
        .with(
            capability(
                A::SciInIngressMacsecAcl,
                "SAI_MACSEC_ATTR_SCI_IN_INGRESS_MACSEC_ACL",
                AttrValueType::Bool,
            )
            .with_condition(ingress),
        )?
        .with(capability(
            A::Pn32bitSupported,
            "SAI_MACSEC_ATTR_PN_32BIT_SUPPORTED",
            AttrValueType::Bool,
        ))?
        .with(capability(
            A::Xpn64bitSupported,
            "SAI_MACSEC_ATTR_XPN_64BIT_SUPPORTED",
            AttrValueType::Bool,
        ))?
        .with(capability(
            A::GcmAes128Supported,
            "SAI_MACSEC_ATTR_GCM_AES128_SUPPORTED",
            AttrValueType::Bool,
        ))?
        .with(capability(
            A::GcmAes256Supported,
            "SAI_MACSEC_ATTR_GCM_AES256_SUPPORTED",
            AttrValueType::Bool,
        ))?
        .with(capability(
            A::SectagOffsetsSupported,
            "SAI_MACSEC_ATTR_SECTAG_OFFSETS_SUPPORTED",
            AttrValueType::U8List,
        ))?
        .with(capability(
            A::SystemSideMtu,
            "SAI_MACSEC_ATTR_SYSTEM_SIDE_MTU",
            AttrValueType::U16,
        ))?
        .with(capability(
            A::WarmBootSupported,
            "SAI_MACSEC_ATTR_WARM_BOOT_SUPPORTED",
            AttrValueType::Bool,
        ))?
        .with(AttributeMeta::new(
            A::WarmBootEnable,
            "SAI_MACSEC_ATTR_WARM_BOOT_ENABLE",
            AttrValueType::Bool,
            AttrFlags::CREATE_AND_SET,
        ))?
        .with(
            AttributeMeta::new(
                A::CtagTpid,
                "SAI_MACSEC_ATTR_CTAG_TPID",
                AttrValueType::U16,
                AttrFlags::CREATE_AND_SET,
            )
            .with_default(0x8100u16),
        )?
        .with(
            AttributeMeta::new(
                A::StagTpid,
                "SAI_MACSEC_ATTR_STAG_TPID",
                AttrValueType::U16,
                AttrFlags::CREATE_AND_SET,
            )
            .with_default(0x88A8u16),
        )?
        .with(
            AttributeMeta::new(
                A::StatsMode,
                "SAI_MACSEC_ATTR_STATS_MODE",
                AttrValueType::I32,
                AttrFlags::CREATE_AND_SET,
            )
            .with_constraint(ValueConstraint::OneOf(vec![
                StatsMode::Read.as_i32(),
                StatsMode::ReadAndClear.as_i32(),
            ])),
        )?
        .with(
            AttributeMeta::new(
                A::PhysicalBypassEnable,
                "SAI_MACSEC_ATTR_PHYSICAL_BYPASS_ENABLE",
                AttrValueType::Bool,
                AttrFlags::CREATE_AND_SET,
            )
            .with_default(false),
        )?
        .with(
            capability(
                A::SupportedPortList,
                "SAI_MACSEC_ATTR_SUPPORTED_PORT_LIST",
                AttrValueType::ObjectList,
            )
            .objects(&[ObjectType::Port]),
        )
}

pub fn macsec_port_schema() -> SaiResult<ObjectSchema> {
    use MacsecPortAttr as A;
    use MacsecPortStat as S;

    let mut stats = StatsSchema::new();
    for (stat, name) in [
        (S::PreMacsecDropPackets, "SAI_MACSEC_PORT_STAT_PRE_MACSEC_DROP_PACKETS"),
        (S::ControlPackets, "SAI_MACSEC_PORT_STAT_CONTROL_PACKETS"),
        (S::DataPackets, "SAI_MACSEC_PORT_STAT_DATA_PACKETS"),
        (S::OctetsUncontrolled, "SAI_MACSEC_PORT_STAT_OCTETS_UNCONTROLLED"),
        (S::OctetsControlled, "SAI_MACSEC_PORT_STAT_OCTETS_CONTROLLED"),
        (S::UcastPacketsUncontrolled, "SAI_MACSEC_PORT_STAT_UCAST_PACKETS_UNCONTROLLED"),
        (S::UcastPacketsControlled, "SAI_MACSEC_PORT_STAT_UCAST_PACKETS_CONTROLLED"),
        (S::MulticastPacketsUncontrolled, "SAI_MACSEC_PORT_STAT_MULTICAST_PACKETS_UNCONTROLLED"),
        (S::MulticastPacketsControlled, "SAI_MACSEC_PORT_STAT_MULTICAST_PACKETS_CONTROLLED"),
        (S::BroadcastPacketsUncontrolled, "SAI_MACSEC_PORT_STAT_BROADCAST_PACKETS_UNCONTROLLED"),
        (S::BroadcastPacketsControlled, "SAI_MACSEC_PORT_STAT_BROADCAST_PACKETS_CONTROLLED"),
    ] {
        stats = stats.counter(stat, name);
    }

    ObjectSchema::new(ObjectType::MacsecPort)
        .with_stats(stats.with_mode_source(engine_stats_mode(
            A::MacsecDirection.into(),
        )))
        .with(direction_attr(
            A::MacsecDirection.into(),
            "SAI_MACSEC_PORT_ATTR_MACSEC_DIRECTION",
        ))?
        .with(
            AttributeMeta::new(
                A::PortId,
                "SAI_MACSEC_PORT_ATTR_PORT_ID",
                AttrValueType::Oid,
                AttrFlags::CREATE_AND_SET,
            )
            .objects(&[ObjectType::Port]),
        )?
        .with(
            AttributeMeta::new(
                A::CtagEnable,
                "SAI_MACSEC_PORT_ATTR_CTAG_ENABLE",
                AttrValueType::Bool,
                AttrFlags::CREATE_AND_SET,
            )
            .with_default(false),
        )?
        .with(
            AttributeMeta::new(
                A::StagEnable,
                "SAI_MACSEC_PORT_ATTR_STAG_ENABLE",
                AttrValueType::Bool,
                AttrFlags::CREATE_AND_SET,
            )
            .with_default(false),
        )?
        .with(
            AttributeMeta::new(
                A::SwitchSwitchingMode,
                "SAI_MACSEC_PORT_ATTR_SWITCH_SWITCHING_MODE",
                AttrValueType::I32,
                AttrFlags::CREATE_AND_SET,
            )
            .with_constraint(ValueConstraint::OneOf(vec![
                SwitchingMode::CutThrough.as_i32(),
                SwitchingMode::StoreAndForward.as_i32(),
            ]))
            .with_default(SwitchingMode::CutThrough),
        )
}

pub fn macsec_flow_schema() -> SaiResult<ObjectSchema> {
    use MacsecFlowAttr as A;

    ObjectSchema::new(ObjectType::MacsecFlow)
        .with(direction_attr(
            A::MacsecDirection.into(),
            "SAI_MACSEC_FLOW_ATTR_MACSEC_DIRECTION",
        ))?
        .with(
            AttributeMeta::new(
                A::AclEntryList,
                "SAI_MACSEC_FLOW_ATTR_ACL_ENTRY_LIST",
                AttrValueType::ObjectList,
                AttrFlags::READ_ONLY,
            )
            .objects(&[ObjectType::AclEntry]),
        )?
        .with(
            AttributeMeta::new(
                A::ScList,
                "SAI_MACSEC_FLOW_ATTR_SC_LIST",
                AttrValueType::ObjectList,
                AttrFlags::READ_ONLY,
            )
            .objects(&[ObjectType::MacsecSc])
            .derived_from(DerivedValue::Referrers {
                object_type: ObjectType::MacsecSc,
                via: MacsecScAttr::FlowId.into(),
                project: None,
            }),
        )
}

pub fn macsec_sc_schema() -> SaiResult<ObjectSchema> {
    use MacsecScAttr as A;
    use MacsecScStat as S;

    let egress = Condition::equals(A::MacsecDirection, MacsecDirection::Egress);
    let ingress = Condition::equals(A::MacsecDirection, MacsecDirection::Ingress);

    let stats = StatsSchema::new()
        .counter(S::ControlPackets, "SAI_MACSEC_SC_STAT_CONTROL_PACKETS")
        .counter(S::PacketsUntagged, "SAI_MACSEC_SC_STAT_PACKETS_UNTAGGED")
        .counter(S::SaNotInUse, "SAI_MACSEC_SC_STAT_SA_NOT_IN_USE")
        .counter(S::TaggedControlPackets, "SAI_MACSEC_SC_STAT_TAGGED_CONTROL_PACKETS")
        .conditional_counter(
            S::OutPacketsTooLong,
            "SAI_MACSEC_SC_STAT_OUT_PACKETS_TOO_LONG",
            egress.clone(),
        )
        .conditional_counter(
            S::InPacketsNoTag,
            "SAI_MACSEC_SC_STAT_IN_PACKETS_NO_TAG",
            ingress.clone(),
        )
        .conditional_counter(
            S::InPacketsBadTag,
            "SAI_MACSEC_SC_STAT_IN_PACKETS_BAD_TAG",
            ingress.clone(),
        )
        .conditional_counter(
            S::InPacketsNoSci,
            "SAI_MACSEC_SC_STAT_IN_PACKETS_NO_SCI",
            ingress.clone(),
        )
        .conditional_counter(
            S::InPacketsUnknownSci,
            "SAI_MACSEC_SC_STAT_IN_PACKETS_UNKNOWN_SCI",
            ingress.clone(),
        )
        .conditional_counter(
            S::InPacketsOverrun,
            "SAI_MACSEC_SC_STAT_IN_PACKETS_OVERRUN",
            ingress.clone(),
        );

    ObjectSchema::new(ObjectType::MacsecSc)
        .with_stats(stats.with_mode_source(engine_stats_mode(
            A::MacsecDirection.into(),
        )))
        .with(direction_attr(
            A::MacsecDirection.into(),
            "SAI_MACSEC_SC_ATTR_MACSEC_DIRECTION",
        ))?
        .with(
            AttributeMeta::new(
                A::FlowId,
                "SAI_MACSEC_SC_ATTR_FLOW_ID",
                AttrValueType::Oid,
                AttrFlags::MANDATORY_CREATE_ONLY,
            )
            .objects(&[ObjectType::MacsecFlow]),
        )?
        .with(AttributeMeta::new(
            A::MacsecSci,
            "SAI_MACSEC_SC_ATTR_MACSEC_SCI",
            AttrValueType::U64,
            AttrFlags::CREATE_AND_SET,
        ))?
        .with(AttributeMeta::new(
            A::MacsecSsci,
            "SAI_MACSEC_SC_ATTR_MACSEC_SSCI",
            AttrValueType::U32,
            AttrFlags::CREATE_AND_SET,
        ))?
        .with(AttributeMeta::new(
            A::MacsecXpnEnable,
            "SAI_MACSEC_SC_ATTR_MACSEC_XPN_ENABLE",
            AttrValueType::Bool,
            AttrFlags::CREATE_AND_SET,
        ))?
        .with(
            AttributeMeta::new(
                A::MacsecExplicitSciEnable,
                "SAI_MACSEC_SC_ATTR_MACSEC_EXPLICIT_SCI_ENABLE",
                AttrValueType::Bool,
                AttrFlags::CREATE_AND_SET,
            )
            .with_condition(egress.clone()),
        )?
        .with(
            AttributeMeta::new(
                A::MacsecSectagOffset,
                "SAI_MACSEC_SC_ATTR_MACSEC_SECTAG_OFFSET",
                AttrValueType::U8,
                AttrFlags::CREATE_AND_SET,
            )
            .with_condition(egress.clone()),
        )?
        // Nullable so an egress SC and its active SA can be torn down under
        // the reject remove policy.
        .with(
            AttributeMeta::new(
                A::ActiveSa,
                "SAI_MACSEC_SC_ATTR_ACTIVE_SA",
                AttrValueType::Oid,
                AttrFlags::CREATE_AND_SET,
            )
            .objects(&[ObjectType::MacsecSa])
            .allow_null()
            .with_condition(egress),
        )?
        .with(
            AttributeMeta::new(
                A::MacsecReplayProtectionEnable,
                "SAI_MACSEC_SC_ATTR_MACSEC_REPLAY_PROTECTION_ENABLE",
                AttrValueType::Bool,
                AttrFlags::CREATE_AND_SET,
            )
            .with_condition(ingress.clone()),
        )?
        .with(
            AttributeMeta::new(
                A::MacsecReplayProtectionWindow,
                "SAI_MACSEC_SC_ATTR_MACSEC_REPLAY_PROTECTION_WINDOW",
                AttrValueType::U32,
                AttrFlags::CREATE_AND_SET,
            )
            .with_condition(ingress),
        )?
        .with(
            AttributeMeta::new(
                A::SaList,
                "SAI_MACSEC_SC_ATTR_SA_LIST",
                AttrValueType::ObjectList,
                AttrFlags::READ_ONLY,
            )
            .objects(&[ObjectType::MacsecSa])
            .derived_from(DerivedValue::Referrers {
                object_type: ObjectType::MacsecSa,
                via: MacsecSaAttr::ScId.into(),
                project: None,
            }),
        )
}

pub fn macsec_sa_schema() -> SaiResult<ObjectSchema> {
    use MacsecSaAttr as A;
    use MacsecSaStat as S;

    let egress = Condition::equals(A::MacsecDirection, MacsecDirection::Egress);
    let ingress = Condition::equals(A::MacsecDirection, MacsecDirection::Ingress);

    let mut stats = StatsSchema::new()
        .counter(S::OctetsEncrypted, "SAI_MACSEC_SA_STAT_OCTETS_ENCRYPTED")
        .counter(S::OctetsProtected, "SAI_MACSEC_SA_STAT_OCTETS_PROTECTED")
        .conditional_counter(
            S::OutPacketsEncrypted,
            "SAI_MACSEC_SA_STAT_OUT_PACKETS_ENCRYPTED",
            egress.clone(),
        )
        .conditional_counter(
            S::OutPacketsProtected,
            "SAI_MACSEC_SA_STAT_OUT_PACKETS_PROTECTED",
            egress.clone(),
        );
    for (stat, name) in [
        (S::InPacketsUnchecked, "SAI_MACSEC_SA_STAT_IN_PACKETS_UNCHECKED"),
        (S::InPacketsDelayed, "SAI_MACSEC_SA_STAT_IN_PACKETS_DELAYED"),
        (S::InPacketsLate, "SAI_MACSEC_SA_STAT_IN_PACKETS_LATE"),
        (S::InPacketsInvalid, "SAI_MACSEC_SA_STAT_IN_PACKETS_INVALID"),
        (S::InPacketsNotValid, "SAI_MACSEC_SA_STAT_IN_PACKETS_NOT_VALID"),
        (S::InPacketsNotUsingSa, "SAI_MACSEC_SA_STAT_IN_PACKETS_NOT_USING_SA"),
        (S::InPacketsUnusedSa, "SAI_MACSEC_SA_STAT_IN_PACKETS_UNUSED_SA"),
        (S::InPacketsOk, "SAI_MACSEC_SA_STAT_IN_PACKETS_OK"),
    ] {
        stats = stats.conditional_counter(stat, name, ingress.clone());
    }

    let key = |id: MacsecSaAttr, name: &str, len: usize| {
        AttributeMeta::new(
            id,
            name,
            AttrValueType::Bytes { len },
            AttrFlags::MANDATORY_CREATE_ONLY,
        )
    };

    ObjectSchema::new(ObjectType::MacsecSa)
        .with_stats(stats.with_mode_source(engine_stats_mode(
            A::MacsecDirection.into(),
        )))
        .with(direction_attr(
            A::MacsecDirection.into(),
            "SAI_MACSEC_SA_ATTR_MACSEC_DIRECTION",
        ))?
        .with(
            AttributeMeta::new(
                A::ScId,
                "SAI_MACSEC_SA_ATTR_SC_ID",
                AttrValueType::Oid,
                AttrFlags::MANDATORY_CREATE_ONLY,
            )
            .objects(&[ObjectType::MacsecSc]),
        )?
        .with(
            AttributeMeta::new(
                A::An,
                "SAI_MACSEC_SA_ATTR_AN",
                AttrValueType::U8,
                AttrFlags::MANDATORY_CREATE_ONLY,
            )
            .with_constraint(ValueConstraint::Range {
                min: 0,
                max: u64::from(MACSEC_MAX_AN),
            })
            .unique_within(A::ScId),
        )?
        .with(AttributeMeta::new(
            A::EncryptionEnable,
            "SAI_MACSEC_SA_ATTR_ENCRYPTION_ENABLE",
            AttrValueType::Bool,
            AttrFlags::MANDATORY_CREATE_ONLY,
        ))?
        .with(AttributeMeta::new(
            A::Sak256Bits,
            "SAI_MACSEC_SA_ATTR_SAK_256_BITS",
            AttrValueType::Bool,
            AttrFlags::MANDATORY_CREATE_ONLY,
        ))?
        .with(key(A::Sak, "SAI_MACSEC_SA_ATTR_SAK", MACSEC_SAK_LEN))?
        .with(key(A::Salt, "SAI_MACSEC_SA_ATTR_SALT", MACSEC_SALT_LEN))?
        .with(key(A::AuthKey, "SAI_MACSEC_SA_ATTR_AUTH_KEY", MACSEC_AUTH_KEY_LEN))?
        .with(
            AttributeMeta::new(
                A::Xpn,
                "SAI_MACSEC_SA_ATTR_XPN",
                AttrValueType::U64,
                AttrFlags::CREATE_AND_SET,
            )
            .with_condition(egress),
        )?
        .with(
            AttributeMeta::new(
                A::MinimumXpn,
                "SAI_MACSEC_SA_ATTR_MINIMUM_XPN",
                AttrValueType::U64,
                AttrFlags::CREATE_AND_SET,
            )
            .with_condition(ingress),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::AttributeSet;
    use crate::value::AttributeValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_macsec_defaults() {
        let schema = macsec_schema().unwrap();
        let ctag = schema.attribute(MacsecAttr::CtagTpid.into()).unwrap();
        let stag = schema.attribute(MacsecAttr::StagTpid.into()).unwrap();
        assert_eq!(ctag.default, Some(AttributeValue::U16(0x8100)));
        assert_eq!(stag.default, Some(AttributeValue::U16(0x88A8)));
        assert_eq!(schema.ranges().core_end, MacsecAttr::ALL.len() as u32);
    }

    #[test]
    fn test_sc_conditions_follow_direction() {
        let schema = macsec_sc_schema().unwrap();
        let active_sa = schema.attribute(MacsecScAttr::ActiveSa.into()).unwrap();
        let condition = active_sa.condition.as_ref().unwrap();

        let egress: AttributeSet = [(0, AttributeValue::from(MacsecDirection::Egress))]
            .into_iter()
            .collect();
        let ingress: AttributeSet = [(0, AttributeValue::from(MacsecDirection::Ingress))]
            .into_iter()
            .collect();
        assert!(condition.evaluate(&egress));
        assert!(!condition.evaluate(&ingress));
    }

    #[test]
    fn test_sa_stats_layout() {
        let schema = macsec_sa_schema().unwrap();
        let stats = schema.stats().unwrap();
        assert_eq!(stats.counters.len(), MacsecSaStat::ALL.len());
        assert!(stats.stat(MacsecSaStat::OctetsEncrypted.into()).unwrap().condition.is_none());
        assert!(stats.stat(MacsecSaStat::InPacketsOk.into()).unwrap().condition.is_some());
        assert!(!stats.custom_range);
        assert_eq!(
            stats.mode_source,
            Some(StatsModeSource {
                object_type: ObjectType::Macsec,
                attr: MacsecAttr::StatsMode.into(),
                match_on: Some((
                    MacsecAttr::Direction.into(),
                    MacsecSaAttr::MacsecDirection.into()
                )),
            })
        );
    }

    #[test]
    fn test_sa_key_lengths() {
        let schema = macsec_sa_schema().unwrap();
        let salt = schema.attribute(MacsecSaAttr::Salt.into()).unwrap();
        assert!(salt.check_value(&AttributeValue::Bytes(vec![0; 12])).is_ok());
        assert!(salt.check_value(&AttributeValue::Bytes(vec![0; 32])).is_err());
        assert_eq!(schema.mandatory_attributes().count(), 8);
    }

    #[test]
    fn test_port_stats_count() {
        let schema = macsec_port_schema().unwrap();
        assert_eq!(
            schema.stats().unwrap().counters.len(),
            MacsecPortStat::ALL.len()
        );
    }
}
