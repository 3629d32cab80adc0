//! Store configuration, read from the profile service at start-up.

use crate::profile::{ProfileId, ProfileService};
use log::{info, warn};
use sai_meta::{SaiError, SaiResult, StatsMode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const KEY_SWITCH_INDEX: &str = "SAI_SWITCH_INDEX";
pub const KEY_REMOVE_POLICY: &str = "SAI_OBJECT_REMOVE_POLICY";
pub const KEY_MAX_OBJECTS_PER_TYPE: &str = "SAI_MAX_OBJECTS_PER_TYPE";
pub const KEY_STATS_MODES: &str = "SAI_STATS_MODES";
pub const KEY_DASH_MAX_METER_BUCKET_COUNT_PER_ENI: &str =
    "SAI_DASH_MAX_METER_BUCKET_COUNT_PER_ENI";

/// What `remove` does with an object other live objects still reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovePolicy {
    /// Fail with `ObjectInUse`.
    #[default]
    Reject,
    /// Remove the referencing objects first.
    Cascade,
}

impl RemovePolicy {
    pub fn config_value(&self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::Cascade => "cascade",
        }
    }
}

impl FromStr for RemovePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "cascade" => Ok(Self::Cascade),
            _ => Err(format!("Unknown remove policy: {}", s)),
        }
    }
}

impl fmt::Display for RemovePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.config_value())
    }
}

fn parse_stats_mode(s: &str) -> Result<StatsMode, String> {
    match s.trim().to_lowercase().as_str() {
        "read" => Ok(StatsMode::Read),
        "read_and_clear" | "read_clear" => Ok(StatsMode::ReadAndClear),
        _ => Err(format!("Unknown stats mode: {}", s)),
    }
}

fn all_stats_modes() -> Vec<StatsMode> {
    StatsMode::ALL.to_vec()
}

/// Settings of one object store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Switch index folded into every object id.
    pub switch_index: u8,
    pub remove_policy: RemovePolicy,
    /// Live objects allowed per type; unlimited when `None`.
    pub max_objects_per_type: Option<u64>,
    /// Stats modes the platform allows, intersected with each type's own.
    #[serde(default = "all_stats_modes")]
    pub stats_modes: Vec<StatsMode>,
    /// Published as the switch's `DASH_CAPS_MAX_METER_BUCKET_COUNT_PER_ENI`.
    pub dash_max_meter_bucket_count_per_eni: Option<u32>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            switch_index: 0,
            remove_policy: RemovePolicy::default(),
            max_objects_per_type: None,
            stats_modes: all_stats_modes(),
            dash_max_meter_bucket_count_per_eni: None,
        }
    }
}

impl StoreConfig {
    /// Reads the store settings of `profile_id`. Absent keys keep their
    /// defaults; malformed values fail with `InvalidParameter`.
    pub fn from_profile(profile: &dyn ProfileService, profile_id: ProfileId) -> SaiResult<Self> {
        let mut config = Self::default();

        if let Some(value) = profile.get_value(profile_id, KEY_SWITCH_INDEX) {
            config.switch_index = parse_key(KEY_SWITCH_INDEX, &value)?;
        }
        if let Some(value) = profile.get_value(profile_id, KEY_REMOVE_POLICY) {
            config.remove_policy = parse_key(KEY_REMOVE_POLICY, &value)?;
        }
        if let Some(value) = profile.get_value(profile_id, KEY_MAX_OBJECTS_PER_TYPE) {
            let max: u64 = parse_key(KEY_MAX_OBJECTS_PER_TYPE, &value)?;
            if max == 0 {
                return Err(invalid(KEY_MAX_OBJECTS_PER_TYPE, &value, "must be positive"));
            }
            config.max_objects_per_type = Some(max);
        }
        if let Some(value) = profile.get_value(profile_id, KEY_STATS_MODES) {
            let mut modes = Vec::new();
            for item in value.split(',').filter(|item| !item.trim().is_empty()) {
                let mode = parse_stats_mode(item)
                    .map_err(|reason| invalid(KEY_STATS_MODES, &value, &reason))?;
                if !modes.contains(&mode) {
                    modes.push(mode);
                }
            }
            if modes.is_empty() {
                warn!("{} is empty, no stats mode will be accepted", KEY_STATS_MODES);
            }
            config.stats_modes = modes;
        }
        if let Some(value) = profile.get_value(profile_id, KEY_DASH_MAX_METER_BUCKET_COUNT_PER_ENI)
        {
            config.dash_max_meter_bucket_count_per_eni =
                Some(parse_key(KEY_DASH_MAX_METER_BUCKET_COUNT_PER_ENI, &value)?);
        }

        info!(
            "Store config: switch index {}, remove policy {}, stats modes {:?}",
            config.switch_index, config.remove_policy, config.stats_modes
        );
        Ok(config)
    }
}

fn parse_key<T>(key: &str, value: &str) -> SaiResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| invalid(key, value, &e.to_string()))
}

fn invalid(key: &str, value: &str, reason: &str) -> SaiError {
    SaiError::invalid_parameter(format!("profile key {}='{}': {}", key, value, reason))
}
