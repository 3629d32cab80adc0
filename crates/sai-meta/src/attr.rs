//! Attribute ids, flags, attribute sets and per-slot get results.

use crate::error::{SaiError, SaiResult, SaiStatus};
use crate::value::AttributeValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Attribute id within an object type (`sai_attr_id_t`).
pub type AttrId = u32;

/// First id of the vendor custom attribute range.
pub const CUSTOM_RANGE_START: AttrId = 0x1000_0000;

/// How an attribute may be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrAccess {
    /// Supplied at create time only.
    CreateOnly,
    /// Supplied at create time or changed later.
    CreateAndSet,
    /// Reported by the implementation, never written by the caller.
    ReadOnly,
}

/// Attribute flags: the mandatory bit plus exactly one access mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttrFlags {
    #[serde(default)]
    pub mandatory_on_create: bool,
    pub access: AttrAccess,
}

impl AttrFlags {
    pub const MANDATORY_CREATE_ONLY: Self = Self {
        mandatory_on_create: true,
        access: AttrAccess::CreateOnly,
    };
    pub const MANDATORY_CREATE_AND_SET: Self = Self {
        mandatory_on_create: true,
        access: AttrAccess::CreateAndSet,
    };
    pub const CREATE_ONLY: Self = Self {
        mandatory_on_create: false,
        access: AttrAccess::CreateOnly,
    };
    pub const CREATE_AND_SET: Self = Self {
        mandatory_on_create: false,
        access: AttrAccess::CreateAndSet,
    };
    pub const READ_ONLY: Self = Self {
        mandatory_on_create: false,
        access: AttrAccess::ReadOnly,
    };

    pub const fn is_read_only(&self) -> bool {
        matches!(self.access, AttrAccess::ReadOnly)
    }

    pub const fn is_create_only(&self) -> bool {
        matches!(self.access, AttrAccess::CreateOnly)
    }
}

impl fmt::Display for AttrFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mandatory_on_create {
            f.write_str("MANDATORY_ON_CREATE | ")?;
        }
        f.write_str(match self.access {
            AttrAccess::CreateOnly => "CREATE_ONLY",
            AttrAccess::CreateAndSet => "CREATE_AND_SET",
            AttrAccess::ReadOnly => "READ_ONLY",
        })
    }
}

/// An attribute id/value pair (`sai_attribute_t`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub id: AttrId,
    pub value: AttributeValue,
}

impl Attribute {
    pub fn new(id: impl Into<AttrId>, value: impl Into<AttributeValue>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }
}

/// The attributes held by one object, keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSet(BTreeMap<AttrId, AttributeValue>);

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: AttrId) -> Option<&AttributeValue> {
        self.0.get(&id)
    }

    pub fn contains(&self, id: AttrId) -> bool {
        self.0.contains_key(&id)
    }

    /// Inserts a value, returning the previous one.
    pub fn insert(&mut self, id: AttrId, value: AttributeValue) -> Option<AttributeValue> {
        self.0.insert(id, value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AttrId, &AttributeValue)> {
        self.0.iter().map(|(id, value)| (*id, value))
    }

    /// Builds a set from a caller list.
    ///
    /// Fails with `InvalidParameter` when an id appears twice.
    pub fn from_attributes(attrs: &[Attribute]) -> SaiResult<Self> {
        let mut set = Self::new();
        for attr in attrs {
            if set.insert(attr.id, attr.value.clone()).is_some() {
                return Err(SaiError::invalid_parameter(format!(
                    "attribute {} supplied more than once",
                    attr.id
                )));
            }
        }
        Ok(set)
    }
}

impl FromIterator<(AttrId, AttributeValue)> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = (AttrId, AttributeValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One slot of a get result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSlot {
    pub id: AttrId,
    pub result: SaiResult<AttributeValue>,
}

impl AttributeSlot {
    pub fn status(&self) -> SaiStatus {
        match &self.result {
            Ok(_) => SaiStatus::Success,
            Err(err) => err.status(),
        }
    }
}

/// Result of a batched get: one slot per requested id, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeList {
    slots: Vec<AttributeSlot>,
}

impl AttributeList {
    pub fn new(slots: Vec<AttributeSlot>) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> &[AttributeSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Value of the first slot for `id`, if it succeeded.
    pub fn value(&self, id: impl Into<AttrId>) -> Option<&AttributeValue> {
        let id = id.into();
        self.slots
            .iter()
            .find(|slot| slot.id == id)
            .and_then(|slot| slot.result.as_ref().ok())
    }

    /// Index and error of the first failing slot.
    pub fn first_error(&self) -> Option<(usize, &SaiError)> {
        self.slots
            .iter()
            .enumerate()
            .find_map(|(index, slot)| slot.result.as_ref().err().map(|err| (index, err)))
    }

    /// Aggregate status: the status of the first failing slot, else success.
    pub fn status(&self) -> SaiStatus {
        self.first_error()
            .map(|(_, err)| err.status())
            .unwrap_or(SaiStatus::Success)
    }

    /// Aggregate status as a raw code, with the failing slot's index folded
    /// into attribute-indexed families.
    pub fn raw_status(&self) -> i32 {
        match self.first_error() {
            Some((index, err)) => err.status().to_raw_indexed(index),
            None => SaiStatus::Success.to_raw(),
        }
    }

    /// Converts to plain attributes, failing on the first failing slot.
    pub fn into_result(self) -> SaiResult<Vec<Attribute>> {
        self.slots
            .into_iter()
            .map(|slot| slot.result.map(|value| Attribute { id: slot.id, value }))
            .collect()
    }
}

impl IntoIterator for AttributeList {
    type Item = AttributeSlot;
    type IntoIter = std::vec::IntoIter<AttributeSlot>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.into_iter()
    }
}
