//! Control-context surface of a source.
//!
//! The handle owns a shadow copy of the parameter table and frequency that
//! always reflects the latest control writes. Mutations update the shadow
//! and enqueue a message for the renderer, which drains the queue at block
//! start. Reads (`parameters`, plotting) hit only the shadow, so they are
//! consistent and never touch render state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam::queue::ArrayQueue;
use serde_json::Value;
use spin::Mutex;

use glottal_core::params::{ParamSnapshot, ParameterTable};
use glottal_core::waveform::SourceModel;
use glottal_core::{payload, plot};

use super::stats::RenderStats;

/// Queue depth. At control rate this is far more than one block's worth of
/// updates; overflow displaces the oldest message, which is counted and
/// recovered through a shadow resync at the next block.
pub(crate) const CONTROL_QUEUE_CAPACITY: usize = 64;

/// Messages from the control context to the renderer.
pub(crate) enum ControlMsg {
    SetFrequency(f32),
    SetParam { index: usize, value: f32 },
    ResetParams,
}

/// Control-side mirror of the renderer's mutable state.
pub(crate) struct Shadow {
    pub table: ParameterTable,
    pub frequency: f32,
}

/// Control-context handle paired with a `SourceRenderer`.
pub struct SourceHandle {
    model: SourceModel,
    queue: Arc<ArrayQueue<ControlMsg>>,
    shadow: Arc<Mutex<Shadow>>,
    resync: Arc<AtomicBool>,
    stats: Arc<RenderStats>,
}

impl SourceHandle {
    pub(crate) fn new(
        model: SourceModel,
        queue: Arc<ArrayQueue<ControlMsg>>,
        shadow: Arc<Mutex<Shadow>>,
        resync: Arc<AtomicBool>,
        stats: Arc<RenderStats>,
    ) -> Self {
        Self {
            model,
            queue,
            shadow,
            resync,
            stats,
        }
    }

    /// Target fundamental frequency for the next rendered block.
    /// Non-positive or non-finite requests are ignored outright.
    pub fn set_frequency(&self, frequency: f32) {
        if !(frequency.is_finite() && frequency > 0.0) {
            return;
        }
        self.shadow.lock().frequency = frequency;
        self.push(ControlMsg::SetFrequency(frequency));
    }

    /// Apply a generic host payload, field by field. Unknown keys are
    /// ignored and accepted values clamped; see `glottal_core::payload`.
    pub fn set_parameters(&self, payload: &Value) {
        let applied = {
            let mut shadow = self.shadow.lock();
            payload::apply_payload(self.model, &mut shadow.table, payload)
        };
        for (index, value) in applied {
            self.push(ControlMsg::SetParam { index, value });
        }
    }

    /// Restore every parameter to its default. Frequency and phase state
    /// are untouched.
    pub fn reset_parameters(&self) {
        self.shadow.lock().table.reset();
        self.push(ControlMsg::ResetParams);
    }

    /// Full ordered snapshot of the parameter table.
    pub fn parameters(&self) -> Vec<ParamSnapshot> {
        self.shadow.lock().table.snapshot()
    }

    /// Most recently accepted target frequency.
    pub fn frequency(&self) -> f32 {
        self.shadow.lock().frequency
    }

    pub fn model(&self) -> SourceModel {
        self.model
    }

    /// Fill `out` with a normalized one-cycle plot of the current
    /// parameter values. Safe to call while audio is rendering.
    pub fn render_plot_into(&self, out: &mut [f32]) {
        let shadow = self.shadow.lock();
        plot::render_plot(self.model, &shadow.table, out);
    }

    /// Render-side counters for this source.
    pub fn stats(&self) -> Arc<RenderStats> {
        Arc::clone(&self.stats)
    }

    fn push(&self, msg: ControlMsg) {
        if self.queue.force_push(msg).is_some() {
            // The displaced message will never be drained and nothing later
            // is guaranteed to repeat it; have the renderer pull the full
            // shadow state at the next block instead.
            self.resync.store(true, Ordering::Release);
            self.stats.note_displaced();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rt_processing::source::build_source;
    use glottal_core::DEFAULT_FREQUENCY;
    use serde_json::json;

    #[test]
    fn test_invalid_frequency_retains_previous() {
        let (handle, _renderer) = build_source(SourceModel::RosenbergC);

        handle.set_frequency(-10.0);
        handle.set_frequency(0.0);
        handle.set_frequency(f32::NAN);
        assert_eq!(handle.frequency(), DEFAULT_FREQUENCY);

        handle.set_frequency(440.0);
        assert_eq!(handle.frequency(), 440.0);

        handle.set_frequency(-1.0);
        assert_eq!(handle.frequency(), 440.0);
    }

    #[test]
    fn test_payload_updates_snapshot_with_clamping() {
        let (handle, _renderer) = build_source(SourceModel::RosenbergC);

        handle.set_parameters(&json!({"Oq": 0.5, "am": 99.0, "bogus": 1.0}));

        let snap = handle.parameters();
        assert_eq!(snap.iter().find(|p| p.name == "Oq").unwrap().current, 0.5);
        assert_eq!(snap.iter().find(|p| p.name == "am").unwrap().current, 0.9);
    }

    #[test]
    fn test_reset_restores_defaults_only() {
        let (handle, _renderer) = build_source(SourceModel::LiljencrantsFant);

        handle.set_frequency(330.0);
        handle.set_parameters(&json!({"Oq": 0.3}));
        handle.reset_parameters();

        for p in handle.parameters() {
            assert_eq!(p.current, p.default);
        }
        // frequency survives a parameter reset
        assert_eq!(handle.frequency(), 330.0);
    }

    #[test]
    fn test_queue_overflow_counts_displaced() {
        let (handle, _renderer) = build_source(SourceModel::Klglott88);

        // nothing drains the queue, so pushes past capacity displace
        for _ in 0..(CONTROL_QUEUE_CAPACITY + 8) {
            handle.set_frequency(200.0);
        }
        assert!(handle.stats().snapshot().displaced_messages >= 8);
    }
}
