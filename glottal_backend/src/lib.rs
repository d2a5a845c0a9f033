//! Real-time rendering side of the glottal source generator.
//!
//! The audio context owns a [`SourceRenderer`] and calls
//! [`SourceRenderer::process`] once per render quantum; everything else
//! (frequency, parameters, plotting, introspection) goes through the
//! paired [`SourceHandle`] from a control context. The two halves share a
//! bounded lock-free queue drained at block start, so the render path never
//! blocks or allocates.

pub mod rt_processing;

pub use rt_processing::control::SourceHandle;
pub use rt_processing::source::{SourceRenderer, build_source};
pub use rt_processing::stats::{RenderStats, StatsSnapshot};
