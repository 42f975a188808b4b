//! Model layer
//!
//! - `knative_kind.rs` - the resource kinds the engine traverses
//! - `reference.rs` - resource references
//! - `summary.rs` - adapter from raw objects to engine fields

pub mod knative_kind;
pub mod reference;
pub mod summary;

pub use knative_kind::{
    CONFIGURATION_LABEL, KnativeKind, REVISION_LABEL, SERVICE_LABEL, SERVING_GROUP,
};
pub use reference::{NO_GROUP, ResourceReference, naive_plural};
pub use summary::{ObjectError, OwnerRef, ResourceSummary};
