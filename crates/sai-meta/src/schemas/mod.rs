//! Built-in schemas and their attribute/counter id enums.

pub mod lag;
pub mod macsec;
pub mod switch;
pub mod tam;

use crate::error::SaiResult;
use crate::schema::ObjectSchema;

/// Declares a `#[repr(u32)]` id enum convertible into `AttrId`/`StatId`.
macro_rules! sai_ids {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident = $value:expr),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[repr(u32)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant = $value),+
        }

        impl $name {
            /// Every id, in numeric order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> u32 {
                id as u32
            }
        }
    };
}

pub(crate) use sai_ids;

/// Every built-in schema.
pub fn built_in_schemas() -> SaiResult<Vec<ObjectSchema>> {
    Ok(vec![
        switch::switch_schema()?,
        lag::lag_schema()?,
        lag::lag_member_schema()?,
        macsec::macsec_schema()?,
        macsec::macsec_port_schema()?,
        macsec::macsec_flow_schema()?,
        macsec::macsec_sc_schema()?,
        macsec::macsec_sa_schema()?,
        tam::tam_microburst_schema()?,
        tam::tam_histogram_schema()?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ObjectType;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_built_in_schemas_build() {
        let types: Vec<ObjectType> = built_in_schemas()
            .unwrap()
            .iter()
            .map(ObjectSchema::object_type)
            .collect();
        assert_eq!(
            types,
            vec![
                ObjectType::Switch,
                ObjectType::Lag,
                ObjectType::LagMember,
                ObjectType::Macsec,
                ObjectType::MacsecPort,
                ObjectType::MacsecFlow,
                ObjectType::MacsecSc,
                ObjectType::MacsecSa,
                ObjectType::TamMicroburst,
                ObjectType::TamHistogram,
            ]
        );
    }
}
