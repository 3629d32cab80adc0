//! Attribute values, value types and the SAI enums carried in attributes.

use crate::types::{RawSaiObjectId, SaiObjectId, SaiObjectKind, NULL_OBJECT_ID};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single attribute value (the Rust side of `sai_attribute_value_t`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeValue {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    /// SAI enum values travel as `i32`.
    I32(i32),
    Oid(RawSaiObjectId),
    ObjectList(Vec<RawSaiObjectId>),
    U8List(Vec<u8>),
    U32List(Vec<u32>),
    /// Fixed-length byte arrays (MACsec SAK, salt, auth key).
    Bytes(Vec<u8>),
}

impl AttributeValue {
    /// Short name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            AttributeValue::Bool(_) => "bool",
            AttributeValue::U8(_) => "u8",
            AttributeValue::U16(_) => "u16",
            AttributeValue::U32(_) => "u32",
            AttributeValue::U64(_) => "u64",
            AttributeValue::I32(_) => "i32",
            AttributeValue::Oid(_) => "oid",
            AttributeValue::ObjectList(_) => "object_list",
            AttributeValue::U8List(_) => "u8_list",
            AttributeValue::U32List(_) => "u32_list",
            AttributeValue::Bytes(_) => "bytes",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            AttributeValue::U32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            AttributeValue::U64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            AttributeValue::I32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_oid(&self) -> Option<RawSaiObjectId> {
        match self {
            AttributeValue::Oid(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_object_list(&self) -> Option<&[RawSaiObjectId]> {
        match self {
            AttributeValue::ObjectList(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_u32_list(&self) -> Option<&[u32]> {
        match self {
            AttributeValue::U32List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            AttributeValue::Bytes(v) | AttributeValue::U8List(v) => Some(v),
            _ => None,
        }
    }

    /// Numeric view used by range constraints.
    ///
    /// Negative enum values have no unsigned view.
    pub fn as_unsigned(&self) -> Option<u64> {
        match self {
            AttributeValue::U8(v) => Some(u64::from(*v)),
            AttributeValue::U16(v) => Some(u64::from(*v)),
            AttributeValue::U32(v) => Some(u64::from(*v)),
            AttributeValue::U64(v) => Some(*v),
            AttributeValue::I32(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Non-null object ids carried by this value.
    pub fn referenced_ids(&self) -> Vec<RawSaiObjectId> {
        match self {
            AttributeValue::Oid(oid) if *oid != NULL_OBJECT_ID => vec![*oid],
            AttributeValue::ObjectList(list) => list
                .iter()
                .copied()
                .filter(|oid| *oid != NULL_OBJECT_ID)
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Bool(v) => write!(f, "{}", v),
            AttributeValue::U8(v) => write!(f, "{}", v),
            AttributeValue::U16(v) => write!(f, "{}", v),
            AttributeValue::U32(v) => write!(f, "{}", v),
            AttributeValue::U64(v) => write!(f, "{}", v),
            AttributeValue::I32(v) => write!(f, "{}", v),
            AttributeValue::Oid(v) => write!(f, "0x{:016x}", v),
            AttributeValue::ObjectList(list) => {
                let ids: Vec<String> = list.iter().map(|v| format!("0x{:016x}", v)).collect();
                write!(f, "[{}]", ids.join(","))
            }
            AttributeValue::U8List(list) => write!(f, "{:?}", list),
            AttributeValue::U32List(list) => write!(f, "{:?}", list),
            AttributeValue::Bytes(bytes) => write!(f, "<{} bytes>", bytes.len()),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        AttributeValue::Bool(v)
    }
}

impl From<u8> for AttributeValue {
    fn from(v: u8) -> Self {
        AttributeValue::U8(v)
    }
}

impl From<u16> for AttributeValue {
    fn from(v: u16) -> Self {
        AttributeValue::U16(v)
    }
}

impl From<u32> for AttributeValue {
    fn from(v: u32) -> Self {
        AttributeValue::U32(v)
    }
}

impl From<u64> for AttributeValue {
    fn from(v: u64) -> Self {
        AttributeValue::U64(v)
    }
}

impl From<i32> for AttributeValue {
    fn from(v: i32) -> Self {
        AttributeValue::I32(v)
    }
}

impl From<Vec<u32>> for AttributeValue {
    fn from(v: Vec<u32>) -> Self {
        AttributeValue::U32List(v)
    }
}

impl<T: SaiObjectKind> From<SaiObjectId<T>> for AttributeValue {
    fn from(oid: SaiObjectId<T>) -> Self {
        AttributeValue::Oid(oid.as_raw())
    }
}

impl<T: SaiObjectKind> From<Vec<SaiObjectId<T>>> for AttributeValue {
    fn from(oids: Vec<SaiObjectId<T>>) -> Self {
        AttributeValue::ObjectList(oids.iter().map(SaiObjectId::as_raw).collect())
    }
}

/// Declared type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrValueType {
    Bool,
    U8,
    U16,
    U32,
    U64,
    I32,
    Oid,
    ObjectList,
    U8List,
    U32List,
    Bytes { len: usize },
}

impl AttrValueType {
    /// Returns true if `value` has this type (including byte length).
    pub fn matches(&self, value: &AttributeValue) -> bool {
        match (self, value) {
            (AttrValueType::Bool, AttributeValue::Bool(_))
            | (AttrValueType::U8, AttributeValue::U8(_))
            | (AttrValueType::U16, AttributeValue::U16(_))
            | (AttrValueType::U32, AttributeValue::U32(_))
            | (AttrValueType::U64, AttributeValue::U64(_))
            | (AttrValueType::I32, AttributeValue::I32(_))
            | (AttrValueType::Oid, AttributeValue::Oid(_))
            | (AttrValueType::ObjectList, AttributeValue::ObjectList(_))
            | (AttrValueType::U8List, AttributeValue::U8List(_))
            | (AttrValueType::U32List, AttributeValue::U32List(_)) => true,
            (AttrValueType::Bytes { len }, AttributeValue::Bytes(bytes)) => bytes.len() == *len,
            _ => false,
        }
    }

    /// Returns true for id-valued types.
    pub fn is_reference(&self) -> bool {
        matches!(self, AttrValueType::Oid | AttrValueType::ObjectList)
    }
}

impl fmt::Display for AttrValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValueType::Bytes { len } => write!(f, "bytes[{}]", len),
            other => {
                let name = match other {
                    AttrValueType::Bool => "bool",
                    AttrValueType::U8 => "u8",
                    AttrValueType::U16 => "u16",
                    AttrValueType::U32 => "u32",
                    AttrValueType::U64 => "u64",
                    AttrValueType::I32 => "i32",
                    AttrValueType::Oid => "oid",
                    AttrValueType::ObjectList => "object_list",
                    AttrValueType::U8List => "u8_list",
                    AttrValueType::U32List => "u32_list",
                    AttrValueType::Bytes { .. } => "bytes",
                };
                f.write_str(name)
            }
        }
    }
}

macro_rules! sai_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident = $value:expr => $sai_name:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[repr(i32)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant = $value),+
        }

        impl $name {
            /// Every value of the enum.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn from_i32(value: i32) -> Option<Self> {
                match value {
                    $(v if v == $value => Some($name::$variant),)+
                    _ => None,
                }
            }

            pub const fn as_i32(self) -> i32 {
                self as i32
            }

            /// Returns the SAI name of the value.
            pub const fn name(&self) -> &'static str {
                match self {
                    $($name::$variant => $sai_name),+
                }
            }
        }

        impl From<$name> for AttributeValue {
            fn from(v: $name) -> Self {
                AttributeValue::I32(v as i32)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

sai_enum! {
    /// Direction of a MACsec object (`sai_macsec_direction_t`).
    MacsecDirection {
        Egress = 0 => "SAI_MACSEC_DIRECTION_EGRESS",
        Ingress = 1 => "SAI_MACSEC_DIRECTION_INGRESS",
    }
}

sai_enum! {
    /// Counter read mode (`sai_stats_mode_t`).
    StatsMode {
        Read = 0 => "SAI_STATS_MODE_READ",
        ReadAndClear = 1 => "SAI_STATS_MODE_READ_AND_CLEAR",
    }
}

sai_enum! {
    /// Switch forwarding mode (`sai_switch_switching_mode_t`).
    SwitchingMode {
        CutThrough = 0 => "SAI_SWITCH_SWITCHING_MODE_CUT_THROUGH",
        StoreAndForward = 1 => "SAI_SWITCH_SWITCHING_MODE_STORE_AND_FORWARD",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LagOid;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_type_matches() {
        assert!(AttrValueType::U16.matches(&AttributeValue::U16(0x8100)));
        assert!(!AttrValueType::U16.matches(&AttributeValue::U32(0x8100)));
        assert!(AttrValueType::Bytes { len: 12 }.matches(&AttributeValue::Bytes(vec![0; 12])));
        assert!(!AttrValueType::Bytes { len: 32 }.matches(&AttributeValue::Bytes(vec![0; 16])));
        assert!(!AttrValueType::Bytes { len: 3 }.matches(&AttributeValue::U8List(vec![0; 3])));
    }

    #[test]
    fn test_referenced_ids_skip_null() {
        assert_eq!(AttributeValue::Oid(0).referenced_ids(), Vec::<u64>::new());
        assert_eq!(AttributeValue::Oid(7).referenced_ids(), vec![7]);
        assert_eq!(
            AttributeValue::ObjectList(vec![1, 0, 3]).referenced_ids(),
            vec![1, 3]
        );
        assert!(AttributeValue::U32(7).referenced_ids().is_empty());
    }

    #[test]
    fn test_unsigned_view() {
        assert_eq!(AttributeValue::U8(3).as_unsigned(), Some(3));
        assert_eq!(AttributeValue::I32(-1).as_unsigned(), None);
        assert_eq!(AttributeValue::Bool(true).as_unsigned(), None);
    }

    #[test]
    fn test_from_typed_oid() {
        let lag = LagOid::from_raw(0x2000000000001).unwrap();
        assert_eq!(AttributeValue::from(lag), AttributeValue::Oid(0x2000000000001));
        assert_eq!(
            AttributeValue::from(vec![lag]),
            AttributeValue::ObjectList(vec![0x2000000000001])
        );
    }

    #[test]
    fn test_sai_enums() {
        assert_eq!(MacsecDirection::from_i32(1), Some(MacsecDirection::Ingress));
        assert_eq!(MacsecDirection::from_i32(2), None);
        assert_eq!(AttributeValue::from(StatsMode::ReadAndClear), AttributeValue::I32(1));
        assert_eq!(SwitchingMode::CutThrough.to_string(), "SAI_SWITCH_SWITCHING_MODE_CUT_THROUGH");
        assert_eq!(StatsMode::ALL.len(), 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(AttributeValue::Oid(1).to_string(), "0x0000000000000001");
        assert_eq!(AttributeValue::Bytes(vec![0; 32]).to_string(), "<32 bytes>");
        assert_eq!(AttrValueType::Bytes { len: 16 }.to_string(), "bytes[16]");
    }
}
