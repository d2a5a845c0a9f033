//! Host parameter payloads.
//!
//! The host hands over a loosely-typed key/value structure; we validate it
//! field by field against the model's descriptor set. A malformed field
//! never prevents the well-formed ones from being applied.

use serde_json::Value;

use crate::params::ParameterTable;
use crate::waveform::SourceModel;

/// A finite number extracted from a payload field, or `None` if the field
/// is not a usable number.
#[inline]
pub fn as_finite_f32(value: &Value) -> Option<f32> {
    let v = value.as_f64()? as f32;
    v.is_finite().then_some(v)
}

/// Apply a generic payload to `table` for `model`.
///
/// Unknown keys are ignored, wrong-typed fields skipped, accepted values
/// clamped by the table. Returns the `(index, clamped value)` assignments
/// actually made (one per accepted field, in map iteration order) so
/// callers can forward them to a live renderer. Non-object payloads apply
/// nothing.
pub fn apply_payload(
    model: SourceModel,
    table: &mut ParameterTable,
    payload: &Value,
) -> Vec<(usize, f32)> {
    let Some(fields) = payload.as_object() else {
        return Vec::new();
    };

    let mut applied = Vec::with_capacity(model.descriptors().len());
    for (key, value) in fields {
        let Some(index) = table.index_of(key) else {
            continue;
        };
        let Some(raw) = as_finite_f32(value) else {
            continue;
        };

        table.set_index(index, raw);
        // read back the clamped value
        let clamped = model.descriptors()[index].clamp(raw);
        applied.push((index, clamped));
    }
    applied
}
