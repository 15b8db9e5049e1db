//! # Video Module
//!
//! Clip metadata and the probing capability used to read it.

pub mod probe;
pub mod types;

pub use probe::{validate_videos, ClipProbe, FfprobeProbe};
pub use types::{Clip, ProbeReport, StreamInfo};
