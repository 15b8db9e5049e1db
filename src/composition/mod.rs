//! # Composition Planner
//!
//! Turns an ordered clip list into one engine command: resolves transition
//! timing, lays out grids, builds the filter graph and runs or previews it.

pub mod builder;
pub mod command;
pub mod engine;
pub mod executor;
pub mod graph;
pub mod layout;
pub mod method;
pub mod timing;

// Re-exports for convenience
pub use builder::{FilterGraphBuilder, Plan, PlanSummary};
pub use command::{Command, ConcatList};
pub use engine::{CompositionPlanner, PlannerState, RunOutcome, RunReport};
pub use executor::{ExecutionOutcome, Executor, FfmpegExecutor};
pub use graph::{FilterGraph, FilterNode, FilterOp, Pad};
pub use layout::{GridLayout, StackedLayout};
pub use method::{CompositionMethod, TransitionKind};
pub use timing::{resolve_timing, Adjustment, Timing};
