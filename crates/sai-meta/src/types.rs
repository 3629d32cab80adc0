//! Object types and type-safe SAI object ID wrappers.
//!
//! An object id is an opaque 64-bit value, but this implementation encodes
//! the switch index, the object type and a per-type serial into it so that
//! the type of any id can be recovered without a table lookup:
//!
//! ```text
//!  63        56 55        48 47                                  0
//! +------------+------------+-------------------------------------+
//! | switch idx | objecttype |               serial                |
//! +------------+------------+-------------------------------------+
//! ```
//!
//! Typed wrappers ([`LagOid`], [`MacsecSaOid`], ...) prevent accidental mixing
//! of object kinds (e.g., passing a LAG member OID where a LAG OID is
//! expected).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

/// Raw SAI object ID type (matches sai_object_id_t in C).
pub type RawSaiObjectId = u64;

/// The null object ID (SAI_NULL_OBJECT_ID).
pub const NULL_OBJECT_ID: RawSaiObjectId = 0;

const SERIAL_BITS: u32 = 48;
const TYPE_SHIFT: u32 = SERIAL_BITS;
const SWITCH_SHIFT: u32 = 56;

/// Largest serial that fits in an object id.
pub const MAX_OBJECT_SERIAL: u64 = (1 << SERIAL_BITS) - 1;

/// SAI object types known to this object model.
#[repr(u8)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectType {
    Null = 0,
    Port = 1,
    Lag = 2,
    LagMember = 3,
    Switch = 4,
    AclEntry = 5,
    Macsec = 6,
    MacsecPort = 7,
    MacsecFlow = 8,
    MacsecSc = 9,
    MacsecSa = 10,
    Tam = 11,
    TamStat = 12,
    TamTransporter = 13,
    TamHistogram = 14,
    TamMicroburst = 15,
}

impl ObjectType {
    /// Every object type, in numeric order.
    pub const ALL: [ObjectType; 16] = [
        ObjectType::Null,
        ObjectType::Port,
        ObjectType::Lag,
        ObjectType::LagMember,
        ObjectType::Switch,
        ObjectType::AclEntry,
        ObjectType::Macsec,
        ObjectType::MacsecPort,
        ObjectType::MacsecFlow,
        ObjectType::MacsecSc,
        ObjectType::MacsecSa,
        ObjectType::Tam,
        ObjectType::TamStat,
        ObjectType::TamTransporter,
        ObjectType::TamHistogram,
        ObjectType::TamMicroburst,
    ];

    /// Converts a raw type tag.
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(usize::from(value)).copied()
    }

    /// Returns the raw type tag.
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Returns the SAI name (`SAI_OBJECT_TYPE_*`).
    pub const fn name(&self) -> &'static str {
        match self {
            ObjectType::Null => "SAI_OBJECT_TYPE_NULL",
            ObjectType::Port => "SAI_OBJECT_TYPE_PORT",
            ObjectType::Lag => "SAI_OBJECT_TYPE_LAG",
            ObjectType::LagMember => "SAI_OBJECT_TYPE_LAG_MEMBER",
            ObjectType::Switch => "SAI_OBJECT_TYPE_SWITCH",
            ObjectType::AclEntry => "SAI_OBJECT_TYPE_ACL_ENTRY",
            ObjectType::Macsec => "SAI_OBJECT_TYPE_MACSEC",
            ObjectType::MacsecPort => "SAI_OBJECT_TYPE_MACSEC_PORT",
            ObjectType::MacsecFlow => "SAI_OBJECT_TYPE_MACSEC_FLOW",
            ObjectType::MacsecSc => "SAI_OBJECT_TYPE_MACSEC_SC",
            ObjectType::MacsecSa => "SAI_OBJECT_TYPE_MACSEC_SA",
            ObjectType::Tam => "SAI_OBJECT_TYPE_TAM",
            ObjectType::TamStat => "SAI_OBJECT_TYPE_TAM_STAT",
            ObjectType::TamTransporter => "SAI_OBJECT_TYPE_TAM_TRANSPORTER",
            ObjectType::TamHistogram => "SAI_OBJECT_TYPE_TAM_HISTOGRAM",
            ObjectType::TamMicroburst => "SAI_OBJECT_TYPE_TAM_MICROBURST",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The fields packed into an object id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectIdParts {
    pub switch_index: u8,
    pub object_type: ObjectType,
    pub serial: u64,
}

impl ObjectIdParts {
    /// Packs the fields into a raw object id.
    ///
    /// Serial bits above [`MAX_OBJECT_SERIAL`] are discarded; the store never
    /// hands out such serials.
    pub const fn encode(&self) -> RawSaiObjectId {
        ((self.switch_index as u64) << SWITCH_SHIFT)
            | ((self.object_type as u64) << TYPE_SHIFT)
            | (self.serial & MAX_OBJECT_SERIAL)
    }

    /// Unpacks a raw object id.
    ///
    /// Returns `None` for the null id and for ids whose type tag is not a
    /// known [`ObjectType`].
    pub fn decode(raw: RawSaiObjectId) -> Option<Self> {
        if raw == NULL_OBJECT_ID {
            return None;
        }
        let object_type = ObjectType::from_u8(((raw >> TYPE_SHIFT) & 0xff) as u8)?;
        Some(Self {
            switch_index: (raw >> SWITCH_SHIFT) as u8,
            object_type,
            serial: raw & MAX_OBJECT_SERIAL,
        })
    }
}

/// Returns the object type encoded in a raw id, `Null` if there is none.
pub fn object_type_of(raw: RawSaiObjectId) -> ObjectType {
    ObjectIdParts::decode(raw)
        .map(|parts| parts.object_type)
        .unwrap_or(ObjectType::Null)
}

/// Marker trait for SAI object kinds.
///
/// Each SAI object type implements this trait to enable compile-time
/// type checking of object IDs.
pub trait SaiObjectKind: Send + Sync + 'static {
    /// The object type ids of this kind carry.
    const OBJECT_TYPE: ObjectType;

    /// Returns the SAI object type name for debugging.
    fn type_name() -> &'static str;
}

/// A type-safe SAI object ID.
///
/// This wrapper ensures that object IDs of different types cannot be
/// accidentally mixed. The phantom type parameter `T` indicates what
/// kind of SAI object this ID refers to.
///
/// # Examples
///
/// ```
/// use sai_meta::{LagOid, LagMemberOid};
///
/// let lag: LagOid = LagOid::from_raw(0x2000000000001).unwrap();
/// let member: LagMemberOid = LagMemberOid::from_raw(0x3000000000001).unwrap();
///
/// // This would fail to compile:
/// // fn takes_lag(l: LagOid) {}
/// // takes_lag(member);  // Error: expected LagOid, found LagMemberOid
/// # let _ = (lag, member);
/// ```
#[derive(Clone, Copy)]
pub struct SaiObjectId<T: SaiObjectKind> {
    raw: RawSaiObjectId,
    _marker: PhantomData<T>,
}

impl<T: SaiObjectKind> SaiObjectId<T> {
    /// The null object ID (SAI_NULL_OBJECT_ID).
    pub const NULL: Self = Self {
        raw: NULL_OBJECT_ID,
        _marker: PhantomData,
    };

    /// Creates a new object ID from a raw value.
    ///
    /// Returns `None` if the raw value is 0 (null object ID).
    /// Use `NULL` constant for explicitly null IDs.
    pub fn from_raw(raw: RawSaiObjectId) -> Option<Self> {
        if raw == NULL_OBJECT_ID {
            None
        } else {
            Some(Self {
                raw,
                _marker: PhantomData,
            })
        }
    }

    /// Creates a new object ID from a raw value, including null.
    ///
    /// Unlike `from_raw`, this allows creating null object IDs.
    pub const fn from_raw_unchecked(raw: RawSaiObjectId) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    /// Returns the raw object ID value.
    pub const fn as_raw(&self) -> RawSaiObjectId {
        self.raw
    }

    /// Returns true if this is a null object ID.
    pub const fn is_null(&self) -> bool {
        self.raw == NULL_OBJECT_ID
    }

    /// Returns true if this is a valid (non-null) object ID.
    pub const fn is_valid(&self) -> bool {
        self.raw != NULL_OBJECT_ID
    }

    /// Returns true if the encoded type tag matches the kind.
    pub fn has_kind_type(&self) -> bool {
        object_type_of(self.raw) == T::OBJECT_TYPE
    }
}

impl<T: SaiObjectKind> fmt::Debug for SaiObjectId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:016x})", T::type_name(), self.raw)
    }
}

impl<T: SaiObjectKind> fmt::Display for SaiObjectId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.raw)
    }
}

impl<T: SaiObjectKind> PartialEq for SaiObjectId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T: SaiObjectKind> Eq for SaiObjectId<T> {}

impl<T: SaiObjectKind> Hash for SaiObjectId<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T: SaiObjectKind> Default for SaiObjectId<T> {
    fn default() -> Self {
        Self::NULL
    }
}

// ============================================================================
// Object Kind Markers
// ============================================================================

macro_rules! define_object_kind {
    ($name:ident, $object_type:ident, $type_name:literal, $oid_alias:ident) => {
        #[doc = concat!("Marker type for SAI ", $type_name, " objects.")]
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl SaiObjectKind for $name {
            const OBJECT_TYPE: ObjectType = ObjectType::$object_type;

            fn type_name() -> &'static str {
                $type_name
            }
        }

        #[doc = concat!("Type alias for ", $type_name, " object IDs.")]
        pub type $oid_alias = SaiObjectId<$name>;
    };
}

define_object_kind!(SwitchKind, Switch, "Switch", SwitchOid);
define_object_kind!(PortKind, Port, "Port", PortOid);
define_object_kind!(LagKind, Lag, "Lag", LagOid);
define_object_kind!(LagMemberKind, LagMember, "LagMember", LagMemberOid);
define_object_kind!(AclEntryKind, AclEntry, "AclEntry", AclEntryOid);
define_object_kind!(MacsecKind, Macsec, "Macsec", MacsecOid);
define_object_kind!(MacsecPortKind, MacsecPort, "MacsecPort", MacsecPortOid);
define_object_kind!(MacsecFlowKind, MacsecFlow, "MacsecFlow", MacsecFlowOid);
define_object_kind!(MacsecScKind, MacsecSc, "MacsecSc", MacsecScOid);
define_object_kind!(MacsecSaKind, MacsecSa, "MacsecSa", MacsecSaOid);
define_object_kind!(TamKind, Tam, "Tam", TamOid);
define_object_kind!(TamStatKind, TamStat, "TamStat", TamStatOid);
define_object_kind!(TamTransporterKind, TamTransporter, "TamTransporter", TamTransporterOid);
define_object_kind!(TamHistogramKind, TamHistogram, "TamHistogram", TamHistogramOid);
define_object_kind!(TamMicroburstKind, TamMicroburst, "TamMicroburst", TamMicroburstOid);
