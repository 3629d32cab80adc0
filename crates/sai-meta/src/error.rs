//! SAI error types and status handling.
//!
//! Every operation in the object model reports one [`SaiStatus`]. Rust callers
//! see a [`SaiResult`], and every [`SaiError`] maps back to exactly one status
//! via [`SaiError::status`], so code that branches on the numeric status (as a
//! C caller would) keeps working.

use crate::types::RawSaiObjectId;
use std::fmt;
use thiserror::Error;

/// Base of the attribute-indexed status families.
///
/// SAI reports per-attribute failures as `BASE - index`, where `index` is the
/// position of the offending attribute in the caller's list.
const ATTR_STATUS_SPAN: i32 = 0x0001_0000;

/// SAI status codes matching `sai_status_t`.
///
/// The attribute-indexed families (`InvalidAttribute` .. `AttributeNotSupported`)
/// carry the value for index 0; see [`SaiStatus::to_raw_indexed`].
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaiStatus {
    Success = 0,
    Failure = -1,
    NotSupported = -2,
    NoMemory = -3,
    InsufficientResources = -4,
    InvalidParameter = -5,
    ItemAlreadyExists = -6,
    ItemNotFound = -7,
    BufferOverflow = -8,
    InvalidPortNumber = -9,
    InvalidPortMember = -10,
    InvalidVlanId = -11,
    Uninitialized = -12,
    TableFull = -13,
    MandatoryAttributeMissing = -14,
    NotImplemented = -15,
    AddrNotFound = -16,
    ObjectInUse = -17,
    InvalidObjectType = -18,
    InvalidObjectId = -19,
    InvalidNifId = -20,
    NifTableFull = -21,
    HwTableFull = -22,
    NotExecuted = -23,
    /// Set on an attribute whose access mode is `READ_ONLY`.
    AttributeReadOnly = -24,
    /// Set on an attribute whose access mode is `CREATE_ONLY`.
    CreateOnlyViolation = -25,
    /// A conditional attribute was used while its condition is false.
    ConditionNotMet = -26,
    InvalidAttribute = -0x0001_0000,
    InvalidAttributeValue = -0x0002_0000,
    AttributeNotImplemented = -0x0003_0000,
    UnknownAttribute = -0x0004_0000,
    AttributeNotSupported = -0x0005_0000,
}

impl SaiStatus {
    /// Creates a SaiStatus from a raw i32 value.
    ///
    /// Attribute-indexed codes map to their family regardless of the index.
    pub fn from_raw(status: i32) -> Self {
        match status {
            0 => SaiStatus::Success,
            -1 => SaiStatus::Failure,
            -2 => SaiStatus::NotSupported,
            -3 => SaiStatus::NoMemory,
            -4 => SaiStatus::InsufficientResources,
            -5 => SaiStatus::InvalidParameter,
            -6 => SaiStatus::ItemAlreadyExists,
            -7 => SaiStatus::ItemNotFound,
            -8 => SaiStatus::BufferOverflow,
            -9 => SaiStatus::InvalidPortNumber,
            -10 => SaiStatus::InvalidPortMember,
            -11 => SaiStatus::InvalidVlanId,
            -12 => SaiStatus::Uninitialized,
            -13 => SaiStatus::TableFull,
            -14 => SaiStatus::MandatoryAttributeMissing,
            -15 => SaiStatus::NotImplemented,
            -16 => SaiStatus::AddrNotFound,
            -17 => SaiStatus::ObjectInUse,
            -18 => SaiStatus::InvalidObjectType,
            -19 => SaiStatus::InvalidObjectId,
            -20 => SaiStatus::InvalidNifId,
            -21 => SaiStatus::NifTableFull,
            -22 => SaiStatus::HwTableFull,
            -23 => SaiStatus::NotExecuted,
            -24 => SaiStatus::AttributeReadOnly,
            -25 => SaiStatus::CreateOnlyViolation,
            -26 => SaiStatus::ConditionNotMet,
            s if s <= -ATTR_STATUS_SPAN && s > -6 * ATTR_STATUS_SPAN => {
                match (-s) / ATTR_STATUS_SPAN {
                    1 => SaiStatus::InvalidAttribute,
                    2 => SaiStatus::InvalidAttributeValue,
                    3 => SaiStatus::AttributeNotImplemented,
                    4 => SaiStatus::UnknownAttribute,
                    _ => SaiStatus::AttributeNotSupported,
                }
            }
            _ => SaiStatus::Failure,
        }
    }

    /// Returns the raw status value.
    pub const fn to_raw(self) -> i32 {
        self as i32
    }

    /// Returns the raw status value with an attribute index folded in.
    ///
    /// Only the attribute-indexed families carry an index; other statuses
    /// return their plain value.
    pub fn to_raw_indexed(self, index: usize) -> i32 {
        if !self.is_attribute_indexed() {
            return self.to_raw();
        }
        let index = i32::try_from(index).unwrap_or(ATTR_STATUS_SPAN - 1);
        self.to_raw() - index.min(ATTR_STATUS_SPAN - 1)
    }

    /// Returns true for the families that encode an attribute index.
    pub const fn is_attribute_indexed(&self) -> bool {
        matches!(
            self,
            SaiStatus::InvalidAttribute
                | SaiStatus::InvalidAttributeValue
                | SaiStatus::AttributeNotImplemented
                | SaiStatus::UnknownAttribute
                | SaiStatus::AttributeNotSupported
        )
    }

    /// Returns true if the status indicates success.
    pub fn is_success(&self) -> bool {
        *self == SaiStatus::Success
    }

    /// Returns true if the status indicates an error.
    pub fn is_error(&self) -> bool {
        *self != SaiStatus::Success
    }

    /// Returns true for "not implemented" outcomes, which callers may accept.
    pub const fn is_soft(&self) -> bool {
        matches!(
            self,
            SaiStatus::NotImplemented | SaiStatus::AttributeNotImplemented
        )
    }

    /// Converts to a Result, returning Ok(()) for success.
    pub fn into_result(self) -> SaiResult<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(SaiError::from_status(self))
        }
    }
}

impl fmt::Display for SaiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SaiStatus::Success => "SAI_STATUS_SUCCESS",
            SaiStatus::Failure => "SAI_STATUS_FAILURE",
            SaiStatus::NotSupported => "SAI_STATUS_NOT_SUPPORTED",
            SaiStatus::NoMemory => "SAI_STATUS_NO_MEMORY",
            SaiStatus::InsufficientResources => "SAI_STATUS_INSUFFICIENT_RESOURCES",
            SaiStatus::InvalidParameter => "SAI_STATUS_INVALID_PARAMETER",
            SaiStatus::ItemAlreadyExists => "SAI_STATUS_ITEM_ALREADY_EXISTS",
            SaiStatus::ItemNotFound => "SAI_STATUS_ITEM_NOT_FOUND",
            SaiStatus::BufferOverflow => "SAI_STATUS_BUFFER_OVERFLOW",
            SaiStatus::InvalidPortNumber => "SAI_STATUS_INVALID_PORT_NUMBER",
            SaiStatus::InvalidPortMember => "SAI_STATUS_INVALID_PORT_MEMBER",
            SaiStatus::InvalidVlanId => "SAI_STATUS_INVALID_VLAN_ID",
            SaiStatus::Uninitialized => "SAI_STATUS_UNINITIALIZED",
            SaiStatus::TableFull => "SAI_STATUS_TABLE_FULL",
            SaiStatus::MandatoryAttributeMissing => "SAI_STATUS_MANDATORY_ATTRIBUTE_MISSING",
            SaiStatus::NotImplemented => "SAI_STATUS_NOT_IMPLEMENTED",
            SaiStatus::AddrNotFound => "SAI_STATUS_ADDR_NOT_FOUND",
            SaiStatus::ObjectInUse => "SAI_STATUS_OBJECT_IN_USE",
            SaiStatus::InvalidObjectType => "SAI_STATUS_INVALID_OBJECT_TYPE",
            SaiStatus::InvalidObjectId => "SAI_STATUS_INVALID_OBJECT_ID",
            SaiStatus::InvalidNifId => "SAI_STATUS_INVALID_NIF_ID",
            SaiStatus::NifTableFull => "SAI_STATUS_NIF_TABLE_FULL",
            SaiStatus::HwTableFull => "SAI_STATUS_HW_TABLE_FULL",
            SaiStatus::NotExecuted => "SAI_STATUS_NOT_EXECUTED",
            SaiStatus::AttributeReadOnly => "SAI_STATUS_ATTR_READ_ONLY",
            SaiStatus::CreateOnlyViolation => "SAI_STATUS_ATTR_CREATE_ONLY",
            SaiStatus::ConditionNotMet => "SAI_STATUS_ATTR_CONDITION_NOT_MET",
            SaiStatus::InvalidAttribute => "SAI_STATUS_INVALID_ATTRIBUTE",
            SaiStatus::InvalidAttributeValue => "SAI_STATUS_INVALID_ATTR_VALUE",
            SaiStatus::AttributeNotImplemented => "SAI_STATUS_ATTR_NOT_IMPLEMENTED",
            SaiStatus::UnknownAttribute => "SAI_STATUS_UNKNOWN_ATTRIBUTE",
            SaiStatus::AttributeNotSupported => "SAI_STATUS_ATTR_NOT_SUPPORTED",
        };
        write!(f, "{}", s)
    }
}

/// Error type for SAI operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaiError {
    /// SAI API returned an error status.
    #[error("SAI operation failed: {status}")]
    Status { status: SaiStatus },

    /// The object id does not name a live object.
    #[error("Invalid object id: 0x{oid:016x}")]
    InvalidObjectId { oid: RawSaiObjectId },

    /// No schema is registered for the object type.
    #[error("Invalid object type: {object_type}")]
    InvalidObjectType { object_type: String },

    /// Invalid parameter passed to SAI API.
    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// The attribute value does not fit its declared type or range.
    #[error("Invalid value for {attr}: {message}")]
    InvalidAttributeValue { attr: String, message: String },

    /// The attribute id is not part of the object type's schema.
    #[error("Unknown attribute {attr} for {object_type}")]
    UnknownAttribute { object_type: String, attr: String },

    /// The attribute cannot be written by the caller.
    #[error("Attribute {attr} is read-only")]
    AttributeReadOnly { attr: String },

    /// The attribute can only be supplied at create time.
    #[error("Attribute {attr} is create-only")]
    CreateOnly { attr: String },

    /// A conditional attribute or counter was used while its condition is false.
    #[error("Condition for {attr} not met: {condition}")]
    ConditionNotMet { attr: String, condition: String },

    /// The backend has not implemented the feature.
    #[error("Not implemented: {feature}")]
    NotImplemented { feature: String },

    /// The requested feature is not supported by the SAI implementation.
    #[error("Feature not supported: {feature}")]
    NotSupported { feature: String },

    /// The requested item was not found.
    #[error("Item not found: {item}")]
    NotFound { item: String },

    /// The item already exists.
    #[error("Item already exists: {item}")]
    AlreadyExists { item: String },

    /// Table is full.
    #[error("Table full: {table}")]
    TableFull { table: String },

    /// Object is in use and cannot be removed.
    #[error("Object in use: {object}")]
    ObjectInUse { object: String },

    /// The caller's buffer cannot hold the result.
    #[error("Buffer overflow: {required} entries required")]
    BufferOverflow { required: usize },

    /// SAI context is not initialized.
    #[error("SAI not initialized")]
    Uninitialized,

    /// Internal error.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl SaiError {
    /// Creates an error from a SAI status code.
    pub fn from_status(status: SaiStatus) -> Self {
        match status {
            SaiStatus::Success => {
                // This shouldn't happen, but handle it gracefully
                SaiError::Internal {
                    message: "from_status called with success status".to_string(),
                }
            }
            SaiStatus::NotImplemented | SaiStatus::AttributeNotImplemented => {
                SaiError::NotImplemented {
                    feature: "unknown".to_string(),
                }
            }
            SaiStatus::NotSupported => SaiError::NotSupported {
                feature: "unknown".to_string(),
            },
            SaiStatus::InvalidParameter => SaiError::InvalidParameter {
                message: format!("SAI returned {}", status),
            },
            SaiStatus::InvalidObjectId => SaiError::InvalidObjectId { oid: 0 },
            SaiStatus::ItemNotFound | SaiStatus::AddrNotFound => SaiError::NotFound {
                item: "unknown".to_string(),
            },
            SaiStatus::ItemAlreadyExists => SaiError::AlreadyExists {
                item: "unknown".to_string(),
            },
            SaiStatus::TableFull | SaiStatus::NifTableFull | SaiStatus::HwTableFull => {
                SaiError::TableFull {
                    table: "unknown".to_string(),
                }
            }
            SaiStatus::ObjectInUse => SaiError::ObjectInUse {
                object: "unknown".to_string(),
            },
            SaiStatus::Uninitialized => SaiError::Uninitialized,
            _ => SaiError::Status { status },
        }
    }

    /// Creates a not supported error with a feature description.
    pub fn not_supported(feature: impl Into<String>) -> Self {
        SaiError::NotSupported {
            feature: feature.into(),
        }
    }

    /// Creates a not implemented error with a feature description.
    pub fn not_implemented(feature: impl Into<String>) -> Self {
        SaiError::NotImplemented {
            feature: feature.into(),
        }
    }

    /// Creates an invalid parameter error with a message.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        SaiError::InvalidParameter {
            message: message.into(),
        }
    }

    /// Creates an invalid object id error.
    pub fn invalid_object_id(oid: RawSaiObjectId) -> Self {
        SaiError::InvalidObjectId { oid }
    }

    /// Creates an invalid attribute value error.
    pub fn invalid_value(attr: impl Into<String>, message: impl Into<String>) -> Self {
        SaiError::InvalidAttributeValue {
            attr: attr.into(),
            message: message.into(),
        }
    }

    /// Creates a not found error with an item description.
    pub fn not_found(item: impl Into<String>) -> Self {
        SaiError::NotFound { item: item.into() }
    }

    /// Creates an already exists error.
    pub fn already_exists(item: impl Into<String>) -> Self {
        SaiError::AlreadyExists { item: item.into() }
    }

    /// Creates a table full error.
    pub fn table_full(table: impl Into<String>) -> Self {
        SaiError::TableFull {
            table: table.into(),
        }
    }

    /// Creates an object in use error.
    pub fn object_in_use(object: impl Into<String>) -> Self {
        SaiError::ObjectInUse {
            object: object.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        SaiError::Internal {
            message: message.into(),
        }
    }

    /// Returns the SAI status this error reports to callers.
    pub fn status(&self) -> SaiStatus {
        match self {
            SaiError::Status { status } => *status,
            SaiError::InvalidObjectId { .. } => SaiStatus::InvalidObjectId,
            SaiError::InvalidObjectType { .. } => SaiStatus::InvalidObjectType,
            SaiError::InvalidParameter { .. } => SaiStatus::InvalidParameter,
            SaiError::InvalidAttributeValue { .. } => SaiStatus::InvalidAttributeValue,
            SaiError::UnknownAttribute { .. } => SaiStatus::UnknownAttribute,
            SaiError::AttributeReadOnly { .. } => SaiStatus::AttributeReadOnly,
            SaiError::CreateOnly { .. } => SaiStatus::CreateOnlyViolation,
            SaiError::ConditionNotMet { .. } => SaiStatus::ConditionNotMet,
            SaiError::NotImplemented { .. } => SaiStatus::NotImplemented,
            SaiError::NotSupported { .. } => SaiStatus::NotSupported,
            SaiError::NotFound { .. } => SaiStatus::ItemNotFound,
            SaiError::AlreadyExists { .. } => SaiStatus::ItemAlreadyExists,
            SaiError::TableFull { .. } => SaiStatus::TableFull,
            SaiError::ObjectInUse { .. } => SaiStatus::ObjectInUse,
            SaiError::BufferOverflow { .. } => SaiStatus::BufferOverflow,
            SaiError::Uninitialized => SaiStatus::Uninitialized,
            SaiError::Internal { .. } => SaiStatus::Failure,
        }
    }

    /// Returns true if callers may treat this error as acceptable.
    ///
    /// Backends answer `NOT_IMPLEMENTED` for features they have not wired up
    /// yet; that is distinct from a rejected request.
    pub fn is_soft(&self) -> bool {
        self.status().is_soft()
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.status(),
            SaiStatus::InsufficientResources | SaiStatus::NoMemory | SaiStatus::NotExecuted
        )
    }
}

/// Result type for SAI operations.
pub type SaiResult<T> = Result<T, SaiError>;

/// Extension trait for converting raw SAI status codes.
pub trait SaiStatusExt {
    /// Converts a raw status code to a Result.
    fn to_result(self) -> SaiResult<()>;
}

impl SaiStatusExt for i32 {
    fn to_result(self) -> SaiResult<()> {
        SaiStatus::from_raw(self).into_result()
    }
}
