//! # Clip Assembler
//!
//! Assemble an ordered list of video clips into one video by planning a
//! single FFmpeg invocation.
//!
//! The library never touches pixel data. It probes clips, reconciles the
//! requested timing with their real lengths, lays out grids, and builds the
//! filter graph handed to the external engine.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use clip_assembler::{
//!     composition::{CompositionPlanner, FfmpegExecutor, TransitionKind},
//!     config::{AssemblyConfig, Config},
//!     video::FfprobeProbe,
//!     CompositionMethod,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = Config::default();
//! let request = AssemblyConfig::new(
//!     CompositionMethod::Transition(TransitionKind::Fade),
//!     vec!["static.mp4".into(), "rotation.mp4".into()],
//!     &config.timing,
//! )
//! .with_output("assembled.mp4");
//!
//! let planner = CompositionPlanner::new(
//!     config.clone(),
//!     FfprobeProbe::new(config.engine.ffprobe.clone()),
//!     FfmpegExecutor::new(),
//! );
//! planner.run(&request).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`video`] - Clip metadata and probing
//! - [`composition`] - Timing, layout, filter graph and the orchestrating planner
//! - [`config`] - Settings file and per-run request
//! - [`error`] - Error types

pub mod composition;
pub mod config;
pub mod error;
pub mod video;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types for convenience
pub use crate::{
    composition::{CompositionMethod, CompositionPlanner},
    config::{AssemblyConfig, Config},
    error::{AssemblerError, Result},
};
