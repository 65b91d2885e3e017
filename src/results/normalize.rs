//! Flattening of raw provider documents into normalized results

use super::types::{FieldValue, NormalizedResult, NormalizedValue, RawDocument};

/// Normalize one raw document.
///
/// Text and integer fields are copied as they are. A repeated field is
/// replaced by the field mapping of its first element only; an empty one
/// becomes an empty mapping. Unsupported fields are left out.
pub fn normalize(doc: &RawDocument) -> NormalizedResult {
    let mut result = NormalizedResult::new();

    for (key, value) in &doc.fields {
        let normalized = match value {
            FieldValue::Text(s) => NormalizedValue::Text(s.clone()),
            FieldValue::Integer(n) => NormalizedValue::Integer(*n),
            FieldValue::Composite(items) => {
                NormalizedValue::Nested(items.first().cloned().unwrap_or_default())
            }
            FieldValue::Unsupported => continue,
        };
        result.insert(key.clone(), normalized);
    }

    result
}

/// Normalize a result list, keeping provider order
pub fn normalize_all(docs: &[RawDocument]) -> Vec<NormalizedResult> {
    docs.iter().map(normalize).collect()
}
