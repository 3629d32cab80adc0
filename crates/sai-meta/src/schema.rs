//! Attribute schemas: per object type, the table that drives validation.
//!
//! Schemas are plain data. The built-in tables live in [`crate::schemas`];
//! callers can add object types programmatically or from YAML.

use crate::attr::{AttrFlags, AttrId, CUSTOM_RANGE_START};
use crate::condition::Condition;
use crate::error::{SaiError, SaiResult};
use crate::stats::{StatsSchema, STAT_CUSTOM_RANGE_BASE};
use crate::types::{object_type_of, ObjectType, RawSaiObjectId, NULL_OBJECT_ID};
use crate::value::{AttrValueType, AttributeValue, StatsMode};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;

/// Extra check applied to a well-typed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueConstraint {
    /// Inclusive numeric range.
    Range { min: u64, max: u64 },
    /// Allowed enum values.
    OneOf(Vec<i32>),
    /// List values strictly ascending.
    Ascending,
    /// Upper bound on list or byte length.
    MaxLen(usize),
}

impl ValueConstraint {
    pub fn check(&self, value: &AttributeValue) -> Result<(), String> {
        match self {
            ValueConstraint::Range { min, max } => match value.as_unsigned() {
                Some(v) if (*min..=*max).contains(&v) => Ok(()),
                Some(v) => Err(format!("{} outside {}..={}", v, min, max)),
                None => Err(format!("{} value has no numeric range", value.kind_name())),
            },
            ValueConstraint::OneOf(allowed) => match value.as_i32() {
                Some(v) if allowed.contains(&v) => Ok(()),
                Some(v) => Err(format!("{} is not one of {:?}", v, allowed)),
                None => Err(format!("{} value is not an enum", value.kind_name())),
            },
            ValueConstraint::Ascending => {
                let ascending = match value {
                    AttributeValue::U32List(list) => list.windows(2).all(|w| w[0] < w[1]),
                    AttributeValue::U8List(list) => list.windows(2).all(|w| w[0] < w[1]),
                    AttributeValue::ObjectList(list) => list.windows(2).all(|w| w[0] < w[1]),
                    other => {
                        return Err(format!("{} value is not a list", other.kind_name()));
                    }
                };
                if ascending {
                    Ok(())
                } else {
                    Err("list must be strictly ascending".to_string())
                }
            }
            ValueConstraint::MaxLen(max) => {
                let len = match value {
                    AttributeValue::U32List(list) => list.len(),
                    AttributeValue::ObjectList(list) => list.len(),
                    AttributeValue::U8List(bytes) | AttributeValue::Bytes(bytes) => bytes.len(),
                    other => {
                        return Err(format!("{} value has no length", other.kind_name()));
                    }
                };
                if len <= *max {
                    Ok(())
                } else {
                    Err(format!("{} entries exceed limit of {}", len, max))
                }
            }
        }
    }
}

/// How a read-only attribute is computed instead of stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedValue {
    /// Ids of live `object_type` objects whose `via` attribute references this
    /// object, or the value of their `project` attribute when set.
    Referrers {
        object_type: ObjectType,
        via: AttrId,
        #[serde(default)]
        project: Option<AttrId>,
    },
    /// Whether `mode` is in the effective stats capability of `object_type`.
    StatsModeSupported {
        object_type: ObjectType,
        mode: StatsMode,
    },
}

/// Metadata for one attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeMeta {
    pub id: AttrId,
    pub name: String,
    pub value_type: AttrValueType,
    pub flags: AttrFlags,
    #[serde(default)]
    pub condition: Option<Condition>,
    #[serde(default)]
    pub default: Option<AttributeValue>,
    /// Object types an id-valued attribute may reference. Empty means any.
    #[serde(default, rename = "objects")]
    pub allowed_objects: Vec<ObjectType>,
    #[serde(default)]
    pub allow_null: bool,
    #[serde(default)]
    pub constraint: Option<ValueConstraint>,
    /// Value must be unique among live objects sharing this attribute's value.
    #[serde(default)]
    pub unique_within: Option<AttrId>,
    #[serde(default)]
    pub derived: Option<DerivedValue>,
}

impl AttributeMeta {
    pub fn new(
        id: impl Into<AttrId>,
        name: &str,
        value_type: AttrValueType,
        flags: AttrFlags,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
            value_type,
            flags,
            condition: None,
            default: None,
            allowed_objects: Vec::new(),
            allow_null: false,
            constraint: None,
            unique_within: None,
            derived: None,
        }
    }

    pub fn objects(mut self, types: &[ObjectType]) -> Self {
        self.allowed_objects = types.to_vec();
        self
    }

    pub fn allow_null(mut self) -> Self {
        self.allow_null = true;
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn with_default(mut self, value: impl Into<AttributeValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_constraint(mut self, constraint: ValueConstraint) -> Self {
        self.constraint = Some(constraint);
        self
    }

    pub fn unique_within(mut self, scope: impl Into<AttrId>) -> Self {
        self.unique_within = Some(scope.into());
        self
    }

    pub fn derived_from(mut self, derived: DerivedValue) -> Self {
        self.derived = Some(derived);
        self
    }

    pub fn is_derived(&self) -> bool {
        self.derived.is_some()
    }

    /// Checks type, byte length, null-ness and the value constraint.
    ///
    /// Liveness of referenced objects is the store's concern.
    pub fn check_value(&self, value: &AttributeValue) -> SaiResult<()> {
        if !self.value_type.matches(value) {
            return Err(SaiError::invalid_value(
                &self.name,
                format!("expected {}, got {}", self.value_type, value.kind_name()),
            ));
        }
        match value {
            AttributeValue::Oid(NULL_OBJECT_ID) if !self.allow_null => {
                return Err(SaiError::invalid_value(&self.name, "null object id"));
            }
            AttributeValue::ObjectList(list) if list.contains(&NULL_OBJECT_ID) => {
                return Err(SaiError::invalid_value(&self.name, "null object id in list"));
            }
            _ => {}
        }
        if let Some(constraint) = &self.constraint {
            constraint
                .check(value)
                .map_err(|message| SaiError::invalid_value(&self.name, message))?;
        }
        Ok(())
    }
}

/// Attribute id intervals of an object type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrRanges {
    /// Core ids are `0..core_end`.
    pub core_end: AttrId,
    /// Extension range, opened at the core end.
    pub extensions: Option<Range<AttrId>>,
    /// Vendor custom range starting at [`CUSTOM_RANGE_START`].
    pub custom: Option<Range<AttrId>>,
}

impl AttrRanges {
    pub fn contains(&self, id: AttrId) -> bool {
        id < self.core_end
            || self.extensions.as_ref().is_some_and(|r| r.contains(&id))
            || self.custom.as_ref().is_some_and(|r| r.contains(&id))
    }
}

/// Attribute table and counter layout of one object type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSchema {
    object_type: ObjectType,
    attributes: BTreeMap<AttrId, AttributeMeta>,
    ranges: AttrRanges,
    stats: Option<StatsSchema>,
}

impl ObjectSchema {
    pub fn new(object_type: ObjectType) -> Self {
        Self {
            object_type,
            attributes: BTreeMap::new(),
            ranges: AttrRanges {
                core_end: 0,
                extensions: None,
                custom: None,
            },
            stats: None,
        }
    }

    /// Opens the extension range at the current core end.
    ///
    /// Core attributes can no longer be appended afterwards.
    pub fn open_extensions(&mut self) {
        if self.ranges.extensions.is_none() {
            let start = self.ranges.core_end;
            self.ranges.extensions = Some(start..start);
        }
    }

    /// Opens the vendor custom range.
    pub fn open_custom_range(&mut self) {
        if self.ranges.custom.is_none() {
            self.ranges.custom = Some(CUSTOM_RANGE_START..CUSTOM_RANGE_START);
        }
    }

    pub fn with_extensions(mut self) -> Self {
        self.open_extensions();
        self
    }

    pub fn with_custom_range(mut self) -> Self {
        self.open_custom_range();
        self
    }

    pub fn with_stats(mut self, stats: StatsSchema) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Builder form of [`ObjectSchema::push`].
    pub fn with(mut self, meta: AttributeMeta) -> SaiResult<Self> {
        self.push(meta)?;
        Ok(self)
    }

    /// Appends an attribute.
    ///
    /// Ranges are append-only: the id must be the next free id of the core
    /// range (while no extension range is open), of the extension range, or of
    /// the custom range. The metadata must also be self-consistent.
    pub fn push(&mut self, meta: AttributeMeta) -> SaiResult<()> {
        self.check_meta(&meta)?;

        let id = meta.id;
        if self.ranges.extensions.is_none() && id == self.ranges.core_end {
            self.ranges.core_end += 1;
        } else if let Some(range) = self.ranges.extensions.as_mut().filter(|r| r.end == id) {
            range.end += 1;
        } else if let Some(range) = self.ranges.custom.as_mut().filter(|r| r.end == id) {
            range.end += 1;
        } else {
            return Err(SaiError::invalid_parameter(format!(
                "{} id {} is not the next id of any open range of {}",
                meta.name, id, self.object_type
            )));
        }

        self.attributes.insert(id, meta);
        Ok(())
    }

    fn check_meta(&self, meta: &AttributeMeta) -> SaiResult<()> {
        let fail = |reason: &str| -> SaiResult<()> {
            Err(SaiError::invalid_parameter(format!(
                "{} of {}: {}",
                meta.name, self.object_type, reason
            )))
        };

        if meta.flags.mandatory_on_create && meta.flags.is_read_only() {
            return fail("read-only attribute cannot be mandatory on create");
        }
        if meta.is_derived() && !meta.flags.is_read_only() {
            return fail("derived attribute must be read-only");
        }
        if !meta.allowed_objects.is_empty() && !meta.value_type.is_reference() {
            return fail("object types given for a non-id attribute");
        }
        if let Some(condition) = &meta.condition {
            if let Some(unknown) = condition
                .referenced_attrs()
                .into_iter()
                .find(|id| !self.attributes.contains_key(id))
            {
                return fail(&format!("condition reads unknown attribute {}", unknown));
            }
        }
        if let Some(scope) = meta.unique_within {
            if !self.attributes.contains_key(&scope) {
                return fail(&format!("uniqueness scope {} is unknown", scope));
            }
        }
        if let Some(default) = &meta.default {
            meta.check_value(default)?;
        }
        Ok(())
    }

    /// Installs a counter layout after checking it against the attributes
    /// already pushed.
    pub fn set_stats(&mut self, stats: StatsSchema) -> SaiResult<()> {
        self.check_stats(&stats)?;
        self.stats = Some(stats);
        Ok(())
    }

    fn check_stats(&self, stats: &StatsSchema) -> SaiResult<()> {
        let fail = |reason: String| -> SaiResult<()> {
            Err(SaiError::invalid_parameter(format!(
                "stats of {}: {}",
                self.object_type, reason
            )))
        };
        let typed = |id: AttrId, value_type: AttrValueType| {
            self.attributes
                .get(&id)
                .is_some_and(|meta| meta.value_type == value_type)
        };

        let mut seen = Vec::with_capacity(stats.counters.len());
        for stat in &stats.counters {
            if seen.contains(&stat.id) {
                return fail(format!("counter id {} declared twice", stat.id));
            }
            seen.push(stat.id);
            if stat.id >= STAT_CUSTOM_RANGE_BASE && !stats.custom_range {
                return fail(format!("{} is in the custom range, which is closed", stat.name));
            }
            if let Some(condition) = &stat.condition {
                if let Some(unknown) = condition
                    .referenced_attrs()
                    .into_iter()
                    .find(|id| !self.attributes.contains_key(id))
                {
                    return fail(format!("{} reads unknown attribute {}", stat.name, unknown));
                }
            }
        }
        if let Some(histogram) = &stats.histogram {
            if !typed(histogram.boundary_attr, AttrValueType::U32List) {
                return fail(format!(
                    "bin boundary attribute {} is not a u32 list",
                    histogram.boundary_attr
                ));
            }
            if let Some(clear) = histogram.clear_on_read_attr {
                if !typed(clear, AttrValueType::Bool) {
                    return fail(format!("clear-on-read attribute {} is not a bool", clear));
                }
            }
        }
        if let Some((_, ours)) = stats.mode_source.as_ref().and_then(|source| source.match_on) {
            if !self.attributes.contains_key(&ours) {
                return fail(format!("mode source matches unknown attribute {}", ours));
            }
        }
        Ok(())
    }

    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }

    pub fn attribute(&self, id: AttrId) -> Option<&AttributeMeta> {
        self.attributes.get(&id)
    }

    pub fn attributes(&self) -> impl Iterator<Item = &AttributeMeta> {
        self.attributes.values()
    }

    pub fn mandatory_attributes(&self) -> impl Iterator<Item = &AttributeMeta> {
        self.attributes
            .values()
            .filter(|meta| meta.flags.mandatory_on_create)
    }

    pub fn ranges(&self) -> &AttrRanges {
        &self.ranges
    }

    pub fn stats(&self) -> Option<&StatsSchema> {
        self.stats.as_ref()
    }

    /// Name of an attribute, or a placeholder for unknown ids.
    pub fn attr_name(&self, id: AttrId) -> String {
        match self.attributes.get(&id) {
            Some(meta) => meta.name.clone(),
            None => format!("{}#{}", self.object_type, id),
        }
    }

    /// Renders a condition with this schema's attribute names.
    pub fn describe_condition(&self, condition: &Condition) -> String {
        condition.render(&|id| self.attr_name(id))
    }
}

/// How an id-valued attribute resolved against the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// An object the store owns; it must be live.
    Managed(ObjectType),
    /// A driver-owned handle, accepted as an opaque value.
    External,
}

/// All registered object schemas.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<ObjectType, ObjectSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in LAG, switch, MACsec and TAM schemas.
    pub fn built_in() -> SaiResult<Self> {
        let mut registry = Self::new();
        for schema in crate::schemas::built_in_schemas()? {
            registry.register(schema)?;
        }
        Ok(registry)
    }

    /// Adds a schema. Each object type can be registered once.
    pub fn register(&mut self, schema: ObjectSchema) -> SaiResult<()> {
        let object_type = schema.object_type();
        if object_type == ObjectType::Null {
            return Err(SaiError::InvalidObjectType {
                object_type: object_type.to_string(),
            });
        }
        if self.schemas.contains_key(&object_type) {
            return Err(SaiError::already_exists(format!("schema for {}", object_type)));
        }
        debug!(
            "Registered schema for {} ({} attributes)",
            object_type,
            schema.attributes.len()
        );
        self.schemas.insert(object_type, schema);
        Ok(())
    }

    pub fn get(&self, object_type: ObjectType) -> Option<&ObjectSchema> {
        self.schemas.get(&object_type)
    }

    /// Like [`SchemaRegistry::get`], failing with `InvalidObjectType`.
    pub fn schema(&self, object_type: ObjectType) -> SaiResult<&ObjectSchema> {
        self.get(object_type).ok_or_else(|| SaiError::InvalidObjectType {
            object_type: object_type.to_string(),
        })
    }

    pub fn is_managed(&self, object_type: ObjectType) -> bool {
        self.schemas.contains_key(&object_type)
    }

    pub fn object_types(&self) -> impl Iterator<Item = ObjectType> + '_ {
        self.schemas.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectSchema> {
        self.schemas.values()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Classifies one id held by an id-valued attribute.
    ///
    /// Ids whose type tag names a managed type must name one of the allowed
    /// types. Ids without a managed tag are driver handles and are accepted
    /// only where an allowed type is external.
    pub fn resolve_reference(
        &self,
        meta: &AttributeMeta,
        oid: RawSaiObjectId,
    ) -> SaiResult<ReferenceKind> {
        let object_type = object_type_of(oid);
        let allowed = |ty: ObjectType| meta.allowed_objects.is_empty() || meta.allowed_objects.contains(&ty);

        if self.is_managed(object_type) {
            if allowed(object_type) {
                return Ok(ReferenceKind::Managed(object_type));
            }
        } else if object_type == ObjectType::Null || allowed(object_type) {
            let external_allowed = meta.allowed_objects.is_empty()
                || meta.allowed_objects.iter().any(|ty| !self.is_managed(*ty));
            if external_allowed {
                return Ok(ReferenceKind::External);
            }
        }

        Err(SaiError::invalid_value(
            &meta.name,
            format!(
                "0x{:016x} ({}) is not one of {:?}",
                oid, object_type, meta.allowed_objects
            ),
        ))
    }

    /// Builds a registry from a YAML document.
    pub fn from_yaml_str(yaml: &str) -> SaiResult<Self> {
        let mut registry = Self::new();
        registry.extend_from_yaml_str(yaml)?;
        Ok(registry)
    }

    /// Adds the schemas of a YAML document.
    ///
    /// ```yaml
    /// schemas:
    ///   - object_type: LAG_MEMBER
    ///     attributes:
    ///       - id: 0
    ///         name: SAI_LAG_MEMBER_ATTR_LAG_ID
    ///         value_type: oid
    ///         flags: { mandatory_on_create: true, access: create_only }
    ///         objects: [LAG]
    /// ```
    ///
    /// Every attribute goes through [`ObjectSchema::push`] and the counter
    /// layout through [`ObjectSchema::set_stats`], so range and consistency
    /// rules apply. Nothing is registered if any schema fails.
    pub fn extend_from_yaml_str(&mut self, yaml: &str) -> SaiResult<()> {
        let document: SchemaDocument = serde_yaml::from_str(yaml)
            .map_err(|e| SaiError::invalid_parameter(format!("schema document: {}", e)))?;

        let mut staged = self.clone();
        for entry in document.schemas {
            staged.register(entry.into_schema()?)?;
        }
        *self = staged;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct SchemaDocument {
    schemas: Vec<SchemaEntry>,
}

#[derive(Debug, Deserialize)]
struct SchemaEntry {
    object_type: ObjectType,
    #[serde(default)]
    attributes: Vec<AttributeMeta>,
    #[serde(default)]
    extensions: Vec<AttributeMeta>,
    #[serde(default)]
    custom_range: bool,
    #[serde(default)]
    custom_attributes: Vec<AttributeMeta>,
    #[serde(default)]
    stats: Option<StatsSchema>,
}

impl SchemaEntry {
    fn into_schema(self) -> SaiResult<ObjectSchema> {
        let mut schema = ObjectSchema::new(self.object_type);
        for meta in self.attributes {
            schema.push(meta)?;
        }
        if !self.extensions.is_empty() {
            schema.open_extensions();
            for meta in self.extensions {
                schema.push(meta)?;
            }
        }
        if self.custom_range || !self.custom_attributes.is_empty() {
            schema.open_custom_range();
            for meta in self.custom_attributes {
                schema.push(meta)?;
            }
        }
        if let Some(stats) = self.stats {
            schema.set_stats(stats)?;
        }
        Ok(schema)
    }
}
