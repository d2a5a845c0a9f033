pub mod control;
pub mod source;
pub mod stats;
