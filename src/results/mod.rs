//! Result types and normalization
//!
//! Raw provider documents carry heterogeneous fields. They are modelled as
//! tagged [`FieldValue`]s and flattened into [`NormalizedResult`]s that
//! serialize to plain JSON objects.

mod normalize;
mod types;

pub use normalize::{normalize, normalize_all};
pub use types::*;
