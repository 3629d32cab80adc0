//! Profile service: named string settings read at start-up.
//!
//! A profile is what SONiC calls `sai.profile`, a flat `KEY=value` file. The
//! [`ProfileService`] trait is the lookup/iteration boundary;
//! [`MapProfile`] is an in-memory implementation loaded from text, YAML or a
//! file.

use log::debug;
use sai_meta::{SaiError, SaiResult};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Profile identifier handed to the service.
pub type ProfileId = u32;

/// Source of start-up settings.
pub trait ProfileService: Send + Sync {
    /// Value of `key` in the profile, if set.
    fn get_value(&self, profile_id: ProfileId, key: &str) -> Option<String>;

    /// Key/value following `previous` in iteration order, or the first entry
    /// when `previous` is `None`. Returns `None` at the end.
    fn get_next_value(
        &self,
        profile_id: ProfileId,
        previous: Option<&str>,
    ) -> Option<(String, String)>;
}

/// Profile held in a sorted map. The same settings serve every profile id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapProfile {
    values: BTreeMap<String, String>,
}

impl MapProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `KEY=value` lines. Blank lines and `#` comments are skipped.
    pub fn parse(text: &str) -> SaiResult<Self> {
        let mut profile = Self::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) = line
                .split_once('=')
                .filter(|(key, _)| !key.trim().is_empty())
                .ok_or_else(|| {
                    SaiError::invalid_parameter(format!(
                        "profile line {}: expected KEY=value, got '{}'",
                        index + 1,
                        line
                    ))
                })?;
            profile.set(key.trim(), value.trim());
        }
        Ok(profile)
    }

    /// Parses a YAML mapping of scalar values.
    pub fn from_yaml_str(yaml: &str) -> SaiResult<Self> {
        let values: BTreeMap<String, serde_yaml::Value> = serde_yaml::from_str(yaml)
            .map_err(|e| SaiError::invalid_parameter(format!("profile YAML: {}", e)))?;

        let mut profile = Self::new();
        for (key, value) in values {
            let value = match value {
                serde_yaml::Value::String(s) => s,
                serde_yaml::Value::Number(n) => n.to_string(),
                serde_yaml::Value::Bool(b) => b.to_string(),
                other => {
                    return Err(SaiError::invalid_parameter(format!(
                        "profile key {}: expected a scalar, got {:?}",
                        key, other
                    )));
                }
            };
            profile.values.insert(key, value);
        }
        Ok(profile)
    }

    /// Loads a profile file. `.yaml`/`.yml` files are read as YAML, anything
    /// else as `KEY=value` lines.
    pub fn load(path: impl AsRef<Path>) -> SaiResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            SaiError::invalid_parameter(format!("reading profile {}: {}", path.display(), e))
        })?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
        let profile = if is_yaml {
            Self::from_yaml_str(&text)?
        } else {
            Self::parse(&text)?
        };
        debug!("Loaded {} profile keys from {}", profile.len(), path.display());
        Ok(profile)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ProfileService for MapProfile {
    fn get_value(&self, _profile_id: ProfileId, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn get_next_value(
        &self,
        _profile_id: ProfileId,
        previous: Option<&str>,
    ) -> Option<(String, String)> {
        let mut iter = match previous {
            None => self.values.range::<str, _>(..),
            Some(key) => self
                .values
                .range::<str, _>((std::ops::Bound::Excluded(key), std::ops::Bound::Unbounded)),
        };
        iter.next().map(|(k, v)| (k.clone(), v.clone()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapProfile {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut profile = Self::new();
        for (key, value) in iter {
            profile.set(key, value);
        }
        profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sai_meta::SaiStatus;

    #[test]
    fn test_parse_profile() {
        let profile = MapProfile::parse(
            "# switch profile\n\nSAI_SWITCH_INDEX=1\n  SAI_OBJECT_REMOVE_POLICY = cascade \n",
        )
        .unwrap();

        assert_eq!(profile.len(), 2);
        assert_eq!(profile.get_value(0, "SAI_SWITCH_INDEX"), Some("1".to_string()));
        assert_eq!(
            profile.get_value(7, "SAI_OBJECT_REMOVE_POLICY"),
            Some("cascade".to_string())
        );
        assert_eq!(profile.get_value(0, "MISSING"), None);
    }

    #[test]
    fn test_parse_rejects_malformed_line() {
        let err = MapProfile::parse("A=1\nnot a setting\n").unwrap_err();
        assert_eq!(err.status(), SaiStatus::InvalidParameter);
        assert!(err.to_string().contains("line 2"));

        assert!(MapProfile::parse("=value").is_err());
    }

    #[test]
    fn test_get_next_value_iterates_in_key_order() {
        let profile: MapProfile = [("B", "2"), ("A", "1"), ("C", "3")].into_iter().collect();

        let mut seen = Vec::new();
        let mut previous: Option<String> = None;
        while let Some((key, value)) = profile.get_next_value(0, previous.as_deref()) {
            seen.push(format!("{}={}", key, value));
            previous = Some(key);
        }
        assert_eq!(seen, vec!["A=1", "B=2", "C=3"]);
    }

    #[test]
    fn test_from_yaml() {
        let profile = MapProfile::from_yaml_str(
            "SAI_SWITCH_INDEX: 2\nSAI_STATS_MODES: read\nFLAG: true\n",
        )
        .unwrap();
        assert_eq!(profile.get_value(0, "SAI_SWITCH_INDEX"), Some("2".to_string()));
        assert_eq!(profile.get_value(0, "FLAG"), Some("true".to_string()));

        assert!(MapProfile::from_yaml_str("NESTED: [1, 2]").is_err());
    }
}
