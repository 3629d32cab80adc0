//! Attribute-table driven SAI object store.
//!
//! Objects are created, modified, read and removed through per-domain API
//! tables whose behaviour comes entirely from the `sai-meta` schemas:
//! mandatory and create-only attributes, conditions, defaults, references
//! between objects, counters and histograms.
//!
//! - [`store`]: the [`ObjectStore`] every table delegates to
//! - [`api`]: the [`LagApi`], [`MacsecApi`] and [`TamApi`] tables
//! - [`context`]: [`SaiContext`], built from a [`ProfileService`]
//! - [`config`]: [`StoreConfig`] and the profile keys it reads
//! - [`profile`]: profile services, including the in-memory [`MapProfile`]
//! - [`stats`]: counter storage
//!
//! # Example
//!
//! ```
//! use sai_meta::schemas::lag::{LagAttr, LagMemberAttr};
//! use sai_meta::{Attribute, AttributeValue, PortOid};
//! use sai_store::{MapProfile, SaiContext};
//! use std::sync::Arc;
//!
//! let profile = MapProfile::parse("SAI_OBJECT_REMOVE_POLICY=reject\n")?;
//! let context = SaiContext::initialize(0, Arc::new(profile))?;
//! let lag_api = context.lag_api()?;
//!
//! let lag = lag_api.create_lag(&[])?;
//! lag_api.create_lag_member(&[
//!     Attribute::new(LagMemberAttr::LagId, lag),
//!     Attribute::new(LagMemberAttr::PortId, PortOid::from_raw_unchecked(1)),
//! ])?;
//!
//! let ports = lag_api.get_lag_attribute(lag, &[LagAttr::PortList.into()])?;
//! assert_eq!(
//!     ports.value(LagAttr::PortList),
//!     Some(&AttributeValue::ObjectList(vec![1]))
//! );
//! # Ok::<(), sai_meta::SaiError>(())
//! ```

pub mod api;
pub mod config;
pub mod context;
mod instance;
pub mod profile;
mod refs;
pub mod stats;
pub mod store;

// Re-export commonly used types
pub use api::{
    ApiKind, ApiRegistry, ApiTable, LagApi, MacsecApi, StoreLagApi, StoreMacsecApi, StoreTamApi,
    TamApi,
};
pub use config::{RemovePolicy, StoreConfig};
pub use context::SaiContext;
pub use profile::{MapProfile, ProfileId, ProfileService};
pub use refs::RefIndexError;
pub use stats::CounterSet;
pub use store::ObjectStore;
