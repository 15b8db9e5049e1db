use tracing::debug;

use crate::{
    composition::{
        command::{Command, ConcatList},
        graph::{FilterGraph, FilterNode, FilterOp, Pad},
        layout::{GridLayout, StackedLayout},
        timing::Timing,
        CompositionMethod, TransitionKind,
    },
    config::{AssemblyConfig, Config},
    error::Result,
};

/// Label of the stream mapped to the output for multi-row and folded graphs
pub const FINAL_LABEL: &str = "v";

/// What a plan does, for the caller's summary output
#[derive(Debug, Clone, PartialEq)]
pub enum PlanSummary {
    Concat { clips: usize },
    Transition { kind: TransitionKind, timing: Timing },
    Grid { layout: GridLayout, filler_cells: usize },
    Stacked { layout: StackedLayout, clips: usize },
}

/// A built command plus its summary
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub command: Command,
    pub summary: PlanSummary,
}

/// Builds the engine command for each composition method
pub struct FilterGraphBuilder<'a> {
    config: &'a Config,
}

impl<'a> FilterGraphBuilder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Build the plan for `request`
    ///
    /// `timing` is the resolved timing for transition methods; when absent the
    /// requested durations are used as-is. Other methods ignore it.
    pub fn build(&self, request: &AssemblyConfig, timing: Option<Timing>) -> Result<Plan> {
        request.validate()?;

        match request.method {
            CompositionMethod::Simple => self.build_concat(request),
            CompositionMethod::Transition(kind) => {
                let timing = timing.unwrap_or_else(|| {
                    Timing::requested(request.clip_duration, request.transition_duration)
                });
                self.build_transition(request, kind, timing)
            }
            CompositionMethod::SideBySide => self.build_grid(request),
            CompositionMethod::Stacked => self.build_stacked(request),
        }
    }

    fn encoding(&self) -> Vec<(String, String)> {
        vec![
            ("-c:v".to_string(), self.config.encoding.video_codec.clone()),
            ("-preset".to_string(), self.config.encoding.preset.clone()),
        ]
    }

    fn build_concat(&self, request: &AssemblyConfig) -> Result<Plan> {
        let list = ConcatList::for_clips(&self.config.engine.concat_list, &request.clips)?;
        let command = Command::concat(&self.config.engine.ffmpeg, &request.clips, list, &request.output);

        Ok(Plan {
            command,
            summary: PlanSummary::Concat { clips: request.clips.len() },
        })
    }

    /// Trim every clip, then fold them left to right with one cross-fade per pair
    fn build_transition(
        &self,
        request: &AssemblyConfig,
        kind: TransitionKind,
        timing: Timing,
    ) -> Result<Plan> {
        let n = request.clips.len();
        let mut graph = FilterGraph::new();

        let trimmed: Vec<Pad> = (0..n)
            .map(|i| {
                graph.push(FilterNode::new(
                    FilterOp::Trim { start: 0.0, end: timing.clip_duration },
                    vec![Pad::Input(i)],
                    format!("v{}", i),
                ))
            })
            .collect();

        let offset = timing.offset();
        let mut current = trimmed[0].clone();
        for (i, next) in trimmed.iter().enumerate().skip(1) {
            let label = if i == n - 1 {
                FINAL_LABEL.to_string()
            } else {
                format!("xf{}", i)
            };

            current = graph.push(FilterNode::new(
                FilterOp::Xfade {
                    transition: kind,
                    duration: timing.transition_duration,
                    offset,
                },
                vec![current, next.clone()],
                label,
            ));
        }

        debug!("Transition graph: {} trims, {} cross-fades", n, n - 1);

        let command = Command::filtered(
            &self.config.engine.ffmpeg,
            &request.clips,
            graph,
            FINAL_LABEL,
            &request.output,
            self.encoding(),
        )?;

        Ok(Plan {
            command,
            summary: PlanSummary::Transition { kind, timing },
        })
    }

    /// Scale clips into grid cells, pad the last row with filler, stack rows
    fn build_grid(&self, request: &AssemblyConfig) -> Result<Plan> {
        let n = request.clips.len();
        let layout_config = &self.config.layout;
        let layout = GridLayout::for_clips(n, layout_config.grid_width, layout_config.grid_height);
        let mut graph = FilterGraph::new();

        let scaled: Vec<Pad> = (0..n)
            .map(|i| {
                graph.push(FilterNode::new(
                    FilterOp::Scale { width: layout.cell_width, height: layout.cell_height },
                    vec![Pad::Input(i)],
                    format!("v{}", i),
                ))
            })
            .collect();

        let mut rows = Vec::with_capacity(layout.rows);
        for row in 0..layout.rows {
            let mut cells = Vec::with_capacity(layout.cols);
            for col in 0..layout.cols {
                let index = layout.cell_index(row, col);
                let pad = match scaled.get(index) {
                    Some(pad) => pad.clone(),
                    None => graph.push(FilterNode::new(
                        FilterOp::ColorFill {
                            color: layout_config.filler_color.clone(),
                            width: layout.cell_width,
                            height: layout.cell_height,
                        },
                        vec![],
                        format!("fill{}_{}", row, col),
                    )),
                };
                cells.push(pad);
            }

            rows.push(graph.push(FilterNode::new(
                FilterOp::HStack { inputs: layout.cols },
                cells,
                format!("row{}", row),
            )));
        }

        // A single row is already the whole picture.
        let final_label = if layout.rows == 1 {
            "row0".to_string()
        } else {
            graph.push(FilterNode::new(FilterOp::VStack { inputs: layout.rows }, rows, FINAL_LABEL));
            FINAL_LABEL.to_string()
        };

        debug!("Grid graph: {}x{} cells of {}x{}", layout.cols, layout.rows,
               layout.cell_width, layout.cell_height);

        let command = Command::filtered(
            &self.config.engine.ffmpeg,
            &request.clips,
            graph,
            &final_label,
            &request.output,
            self.encoding(),
        )?;

        Ok(Plan {
            command,
            summary: PlanSummary::Grid {
                layout,
                filler_cells: layout.filler_cells(n),
            },
        })
    }

    fn build_stacked(&self, request: &AssemblyConfig) -> Result<Plan> {
        let n = request.clips.len();
        let layout = StackedLayout::for_clips(
            n,
            self.config.layout.stacked_width,
            self.config.layout.stacked_height,
        );
        let mut graph = FilterGraph::new();

        let scaled: Vec<Pad> = (0..n)
            .map(|i| {
                graph.push(FilterNode::new(
                    FilterOp::Scale { width: layout.cell_width, height: layout.cell_height },
                    vec![Pad::Input(i)],
                    format!("v{}", i),
                ))
            })
            .collect();
        graph.push(FilterNode::new(FilterOp::VStack { inputs: n }, scaled, FINAL_LABEL));

        let command = Command::filtered(
            &self.config.engine.ffmpeg,
            &request.clips,
            graph,
            FINAL_LABEL,
            &request.output,
            self.encoding(),
        )?;

        Ok(Plan {
            command,
            summary: PlanSummary::Stacked { layout, clips: n },
        })
    }
}
