//! Non-real-time building blocks for the glottal source generator:
//! parameter descriptors and tables, the concrete waveform models, host
//! payload parsing, and plot-snapshot rendering.
//!
//! Everything in this crate is allocation-tolerant control-context code.
//! The hot rendering loop lives in `glottal-backend` and only calls the
//! pure `SourceModel::sample` function from here.

pub mod params;
pub mod payload;
pub mod plot;
pub mod waveform;

/// Frames rendered per `process` call (one render quantum).
pub const RENDER_QUANTUM_FRAMES: usize = 128;

/// Fixed output sample rate in Hz.
pub const SAMPLE_RATE: f32 = 44_100.0;

/// Bytes per channel per render quantum (32-bit float samples).
pub const BYTES_PER_CHANNEL: usize = RENDER_QUANTUM_FRAMES * size_of::<f32>();

/// Fundamental frequency used until the host sets one.
pub const DEFAULT_FREQUENCY: f32 = 220.0;

/// Upper bound on per-model parameter count, so the render path can capture
/// current values into a fixed-size array.
pub const MAX_MODEL_PARAMS: usize = 4;

pub use params::{ParamDescriptor, ParamError, ParamSnapshot, ParameterTable};
pub use waveform::SourceModel;
