//! SAI (Switch Abstraction Interface) object model metadata.
//!
//! This crate carries the published contract of the SAI object/attribute
//! model, independent of any runtime:
//!
//! - [`error`]: status codes ([`SaiStatus`]) and the [`SaiError`] type
//! - [`types`]: object types, object id encoding and type-safe object ids
//! - [`value`]: attribute values and the SAI enums they carry
//! - [`attr`]: attribute ids, flags, sets and per-slot get results
//! - [`condition`]: conditional-attribute predicates
//! - [`schema`]: per object type attribute tables and the schema registry
//! - [`stats`]: counter and histogram layouts
//! - [`schemas`]: the built-in LAG, switch, MACsec and TAM tables
//!
//! # Example
//!
//! ```
//! use sai_meta::schemas::lag::LagMemberAttr;
//! use sai_meta::{ObjectType, SchemaRegistry};
//!
//! let registry = SchemaRegistry::built_in()?;
//! let member = registry.schema(ObjectType::LagMember)?;
//! let lag_id = member.attribute(LagMemberAttr::LagId.into()).unwrap();
//! assert!(lag_id.flags.mandatory_on_create);
//! # Ok::<(), sai_meta::SaiError>(())
//! ```

pub mod attr;
pub mod condition;
pub mod error;
pub mod schema;
pub mod schemas;
pub mod stats;
pub mod types;
pub mod value;

// Re-export commonly used types
pub use attr::{
    AttrAccess, AttrFlags, AttrId, Attribute, AttributeList, AttributeSet, AttributeSlot,
    CUSTOM_RANGE_START,
};
pub use condition::Condition;
pub use error::{SaiError, SaiResult, SaiStatus, SaiStatusExt};
pub use schema::{
    AttrRanges, AttributeMeta, DerivedValue, ObjectSchema, ReferenceKind, SchemaRegistry,
    ValueConstraint,
};
pub use stats::{
    HistogramSchema, StatId, StatMeta, StatsModeSource, StatsSchema, STAT_CUSTOM_RANGE_BASE,
};
pub use types::{
    object_type_of, AclEntryKind, AclEntryOid, LagKind, LagMemberKind, LagMemberOid, LagOid,
    MacsecFlowKind, MacsecFlowOid, MacsecKind, MacsecOid, MacsecPortKind, MacsecPortOid,
    MacsecSaKind, MacsecSaOid, MacsecScKind, MacsecScOid, ObjectIdParts, ObjectType, PortKind,
    PortOid, RawSaiObjectId, SaiObjectId, SaiObjectKind, SwitchKind, SwitchOid, TamHistogramKind,
    TamHistogramOid, TamKind, TamMicroburstKind, TamMicroburstOid, TamOid, TamStatKind,
    TamStatOid, TamTransporterKind, TamTransporterOid, MAX_OBJECT_SERIAL, NULL_OBJECT_ID,
};
pub use value::{AttrValueType, AttributeValue, MacsecDirection, StatsMode, SwitchingMode};
