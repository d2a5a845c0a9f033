//! The block renderer: the real-time half of a source.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam::queue::ArrayQueue;
use spin::Mutex;

use glottal_core::params::ParameterTable;
use glottal_core::waveform::SourceModel;
use glottal_core::{DEFAULT_FREQUENCY, MAX_MODEL_PARAMS, RENDER_QUANTUM_FRAMES, SAMPLE_RATE};

use super::control::{CONTROL_QUEUE_CAPACITY, ControlMsg, Shadow, SourceHandle};
use super::stats::RenderStats;

/// Build a connected control/render pair for `model`, with defaults loaded
/// and the fundamental at [`DEFAULT_FREQUENCY`].
pub fn build_source(model: SourceModel) -> (SourceHandle, SourceRenderer) {
    let queue = Arc::new(ArrayQueue::new(CONTROL_QUEUE_CAPACITY));
    let shadow = Arc::new(Mutex::new(Shadow {
        table: model.default_table(),
        frequency: DEFAULT_FREQUENCY,
    }));
    let resync = Arc::new(AtomicBool::new(false));
    let stats = Arc::new(RenderStats::new());

    let handle = SourceHandle::new(
        model,
        Arc::clone(&queue),
        Arc::clone(&shadow),
        Arc::clone(&resync),
        Arc::clone(&stats),
    );
    let renderer = SourceRenderer {
        model,
        table: model.default_table(),
        frequency: DEFAULT_FREQUENCY,
        last_f0: DEFAULT_FREQUENCY,
        phase: 0.0,
        frames_rendered: 0,
        queue,
        shadow,
        resync,
        stats,
    };
    (handle, renderer)
}

/// Renders one 128-frame quantum per `process` call.
///
/// Owned by the audio context; the only communication with the control
/// context is the bounded message queue drained at block start (plus a
/// non-blocking shadow read after queue overflow). `process` performs no
/// allocation and never waits on a lock.
pub struct SourceRenderer {
    model: SourceModel,
    table: ParameterTable,

    /// Target frequency from the most recent accepted request.
    frequency: f32,
    /// Frequency in effect during the previous block; ramp start point.
    last_f0: f32,
    /// Normalized cycle position in [0, 1). Wrapping here instead of
    /// letting a sample counter grow keeps the phase exact forever.
    phase: f32,
    frames_rendered: u64,

    queue: Arc<ArrayQueue<ControlMsg>>,
    shadow: Arc<Mutex<Shadow>>,
    resync: Arc<AtomicBool>,
    stats: Arc<RenderStats>,
}

impl SourceRenderer {
    /// Render one quantum into `output`, interleaved, fanning the mono
    /// sample out to every channel.
    ///
    /// `output.len()` must equal `RENDER_QUANTUM_FRAMES * channels`;
    /// the length is asserted once here rather than re-derived per frame.
    pub fn process(&mut self, output: &mut [f32], channels: usize) {
        assert!(channels > 0, "channel count must be positive");
        assert_eq!(
            output.len(),
            RENDER_QUANTUM_FRAMES * channels,
            "output buffer must hold exactly one render quantum"
        );
        let stats = Arc::clone(&self.stats);
        let _timer = stats.block_timer();

        self.drain_control();

        let mut params = [0.0; MAX_MODEL_PARAMS];
        self.table.values_into(&mut params);

        // Linear per-frame ramp from the previous block's frequency to the
        // current target: a frequency step is spread over one block instead
        // of landing as a click.
        let f_start = self.last_f0;
        let f_step = (self.frequency - self.last_f0) / RENDER_QUANTUM_FRAMES as f32;

        for frame in 0..RENDER_QUANTUM_FRAMES {
            let sample = self.model.sample(self.phase, &params);

            let start = frame * channels;
            for out in &mut output[start..start + channels] {
                *out = sample;
            }

            let f_inst = f_start + f_step * frame as f32;
            self.phase += f_inst / SAMPLE_RATE;
            if self.phase >= 1.0 {
                self.phase -= 1.0;
            }
        }

        self.last_f0 = self.frequency;
        self.frames_rendered = self
            .frames_rendered
            .wrapping_add(RENDER_QUANTUM_FRAMES as u64);
        self.stats.add_block(RENDER_QUANTUM_FRAMES as u64);
    }

    /// Apply pending control messages. Bounded by the queue capacity so a
    /// busy control context cannot stall the block.
    fn drain_control(&mut self) {
        for _ in 0..CONTROL_QUEUE_CAPACITY {
            match self.queue.pop() {
                Some(ControlMsg::SetFrequency(f)) => self.frequency = f,
                Some(ControlMsg::SetParam { index, value }) => {
                    self.table.set_index(index, value);
                }
                Some(ControlMsg::ResetParams) => self.table.reset(),
                None => break,
            }
        }
        self.resync_if_needed();
    }

    /// Recover from queue overflow. A displaced message is gone for good,
    /// so pull the authoritative control state from the shadow instead.
    /// Non-blocking: if the control context holds the lock right now the
    /// flag stays set and the next block retries.
    fn resync_if_needed(&mut self) {
        if !self.resync.load(Ordering::Acquire) {
            return;
        }
        if let Some(shadow) = self.shadow.try_lock() {
            // Clear while holding the lock: a control write after this
            // point either lands in the queue or raises the flag again.
            self.resync.store(false, Ordering::Relaxed);

            self.frequency = shadow.frequency;
            let mut vals = [0.0; MAX_MODEL_PARAMS];
            shadow.table.values_into(&mut vals);
            for index in 0..self.table.len() {
                self.table.set_index(index, vals[index]);
            }
        }
    }

    /// Current cycle position in [0, 1).
    pub fn current_phase(&self) -> f32 {
        self.phase
    }

    /// Frames written since construction (wrapping).
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn model(&self) -> SourceModel {
        self.model
    }
}
