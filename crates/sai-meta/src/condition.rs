//! Conditional-attribute predicates.
//!
//! A condition is evaluated against the attributes of one object (or the
//! in-progress set of a create). An attribute that is absent never equals
//! anything, so `Equals` on it is false and `NotEquals` is true.

use crate::attr::{AttrId, AttributeSet};
use crate::value::AttributeValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Predicate over attribute values that gates a conditional attribute or
/// counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Equals { attr: AttrId, value: AttributeValue },
    NotEquals { attr: AttrId, value: AttributeValue },
    All(Vec<Condition>),
    Any(Vec<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    pub fn equals(attr: impl Into<AttrId>, value: impl Into<AttributeValue>) -> Self {
        Condition::Equals {
            attr: attr.into(),
            value: value.into(),
        }
    }

    pub fn not_equals(attr: impl Into<AttrId>, value: impl Into<AttributeValue>) -> Self {
        Condition::NotEquals {
            attr: attr.into(),
            value: value.into(),
        }
    }

    pub fn evaluate(&self, attrs: &AttributeSet) -> bool {
        match self {
            Condition::Equals { attr, value } => attrs.get(*attr) == Some(value),
            Condition::NotEquals { attr, value } => attrs.get(*attr) != Some(value),
            Condition::All(all) => all.iter().all(|c| c.evaluate(attrs)),
            Condition::Any(any) => any.iter().any(|c| c.evaluate(attrs)),
            Condition::Not(inner) => !inner.evaluate(attrs),
        }
    }

    /// Attribute ids the condition reads.
    pub fn referenced_attrs(&self) -> Vec<AttrId> {
        let mut ids = Vec::new();
        self.collect_attrs(&mut ids);
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    fn collect_attrs(&self, ids: &mut Vec<AttrId>) {
        match self {
            Condition::Equals { attr, .. } | Condition::NotEquals { attr, .. } => ids.push(*attr),
            Condition::All(list) | Condition::Any(list) => {
                list.iter().for_each(|c| c.collect_attrs(ids))
            }
            Condition::Not(inner) => inner.collect_attrs(ids),
        }
    }

    /// Renders the condition with attribute names supplied by `name_of`.
    pub fn render(&self, name_of: &dyn Fn(AttrId) -> String) -> String {
        match self {
            Condition::Equals { attr, value } => format!("{} == {}", name_of(*attr), value),
            Condition::NotEquals { attr, value } => format!("{} != {}", name_of(*attr), value),
            Condition::All(list) => join(list, " && ", name_of),
            Condition::Any(list) => join(list, " || ", name_of),
            Condition::Not(inner) => format!("!({})", inner.render(name_of)),
        }
    }
}

fn join(list: &[Condition], sep: &str, name_of: &dyn Fn(AttrId) -> String) -> String {
    let parts: Vec<String> = list
        .iter()
        .map(|c| format!("({})", c.render(name_of)))
        .collect();
    parts.join(sep)
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&|id| format!("attr#{}", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::MacsecDirection;
    use pretty_assertions::assert_eq;

    fn egress_set() -> AttributeSet {
        [(0, AttributeValue::from(MacsecDirection::Egress))]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_equals() {
        let egress = Condition::equals(0u32, MacsecDirection::Egress);
        let ingress = Condition::equals(0u32, MacsecDirection::Ingress);
        assert!(egress.evaluate(&egress_set()));
        assert!(!ingress.evaluate(&egress_set()));
    }

    #[test]
    fn test_absent_attribute_equals_nothing() {
        let empty = AttributeSet::new();
        assert!(!Condition::equals(0u32, 0i32).evaluate(&empty));
        assert!(Condition::not_equals(0u32, 0i32).evaluate(&empty));
    }

    #[test]
    fn test_combinators() {
        let set = egress_set();
        let egress = Condition::equals(0u32, MacsecDirection::Egress);
        let ingress = Condition::equals(0u32, MacsecDirection::Ingress);

        assert!(Condition::Any(vec![ingress.clone(), egress.clone()]).evaluate(&set));
        assert!(!Condition::All(vec![ingress.clone(), egress.clone()]).evaluate(&set));
        assert!(Condition::Not(Box::new(ingress)).evaluate(&set));
        assert!(Condition::All(vec![]).evaluate(&set));
    }

    #[test]
    fn test_referenced_attrs() {
        let cond = Condition::All(vec![
            Condition::equals(3u32, true),
            Condition::Not(Box::new(Condition::equals(1u32, 2u32))),
            Condition::equals(3u32, false),
        ]);
        assert_eq!(cond.referenced_attrs(), vec![1, 3]);
    }

    #[test]
    fn test_display() {
        let cond = Condition::equals(0u32, MacsecDirection::Ingress);
        assert_eq!(cond.to_string(), "attr#0 == 1");
        let named = cond.render(&|_| "SAI_MACSEC_SC_ATTR_MACSEC_DIRECTION".to_string());
        assert_eq!(named, "SAI_MACSEC_SC_ATTR_MACSEC_DIRECTION == 1");
    }
}
