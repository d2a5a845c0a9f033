//! Waveform plot snapshots for visualization.
//!
//! Renders one full cycle of the model through the same per-sample function
//! the audio path uses, but over a purely local phase ramp: nothing here
//! reads or mutates render state, so it is safe to run from a control
//! context while audio is being produced.

use crate::params::ParameterTable;
use crate::waveform::SourceModel;
use crate::MAX_MODEL_PARAMS;

/// Plot length used by hosts that have no preference of their own.
pub const DEFAULT_PLOT_POINTS: usize = 512;

/// Fill `out` with one cycle of `model` at the table's current values,
/// normalized to peak amplitude 1. A zero-length buffer is a no-op; an
/// all-zero cycle is left as silence rather than divided by zero.
pub fn render_plot(model: SourceModel, table: &ParameterTable, out: &mut [f32]) {
    if out.is_empty() {
        return;
    }

    let mut params = [0.0; MAX_MODEL_PARAMS];
    table.values_into(&mut params);

    let n = out.len();
    let mut peak = 0.0f32;
    for (k, slot) in out.iter_mut().enumerate() {
        let t = k as f32 / n as f32;
        let y = model.sample(t, &params);
        peak = peak.max(y.abs());
        *slot = y;
    }

    if peak > 0.0 {
        for slot in out.iter_mut() {
            *slot /= peak;
        }
    }
}
