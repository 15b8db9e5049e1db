use tracing::{debug, info, warn};

use crate::{
    composition::{
        builder::{FilterGraphBuilder, Plan, PlanSummary},
        executor::Executor,
        timing::{resolve_timing, Timing},
        CompositionMethod,
    },
    config::{AssemblyConfig, Config},
    error::{ExecutionError, Result},
    video::{validate_videos, Clip, ClipProbe},
};

/// Stages the planner moves through; `Done` and `Failed` are terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerState {
    Validating,
    Probing,
    Planning,
    Previewing,
    Executing,
    Done,
    Failed,
}

/// What happened to the built command
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Command was printed, not run
    Previewed { command_line: String },
    /// Command ran to completion successfully
    Executed,
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub plan: Plan,
    pub outcome: RunOutcome,
    /// Every state visited, in order
    pub states: Vec<PlannerState>,
}

#[derive(Debug, Default)]
struct StateTracker {
    history: Vec<PlannerState>,
}

impl StateTracker {
    fn advance(&mut self, next: PlannerState) {
        match self.history.last() {
            Some(current) => debug!("Planner state: {:?} -> {:?}", current, next),
            None => debug!("Planner state: {:?}", next),
        }
        self.history.push(next);
    }
}

/// Orchestrates one assembly run
///
/// The pipeline is strictly sequential:
/// 1. Validation - check the request before touching any clip
/// 2. Probing - read every clip, failing with all missing paths at once
/// 3. Planning - resolve transition timing and build the command
/// 4. Preview or execution - print the command, or run it and clean up
pub struct CompositionPlanner<P, E> {
    config: Config,
    probe: P,
    executor: E,
}

impl<P: ClipProbe, E: Executor> CompositionPlanner<P, E> {
    pub fn new(config: Config, probe: P, executor: E) -> Self {
        Self { config, probe, executor }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Validate, probe and build the command without running it
    pub async fn plan(&self, request: &AssemblyConfig) -> Result<Plan> {
        let mut tracker = StateTracker::default();
        self.plan_stages(request, &mut tracker).await
    }

    /// Plan the request, then preview or execute the command
    pub async fn run(&self, request: &AssemblyConfig) -> Result<RunReport> {
        let mut tracker = StateTracker::default();

        match self.run_stages(request, &mut tracker).await {
            Ok((plan, outcome)) => {
                tracker.advance(PlannerState::Done);
                Ok(RunReport {
                    plan,
                    outcome,
                    states: tracker.history,
                })
            }
            Err(e) => {
                tracker.advance(PlannerState::Failed);
                debug!("Assembly failed: {}", e);
                Err(e)
            }
        }
    }

    async fn plan_stages(&self, request: &AssemblyConfig, tracker: &mut StateTracker) -> Result<Plan> {
        tracker.advance(PlannerState::Validating);
        request.validate()?;

        info!("🎬 {} ({})", request.method.label(), request.method);
        info!("   Input videos: {}", request.clips.len());
        for (i, clip) in request.clips.iter().enumerate() {
            info!("      {}. {}", i + 1, clip.display());
        }
        info!("   Output: {}", request.output.display());
        if request.method.is_fast() {
            info!("   ⚡ This method is fast (no re-encoding)");
        }

        tracker.advance(PlannerState::Probing);
        let clips = validate_videos(&self.probe, &request.clips).await?;

        tracker.advance(PlannerState::Planning);
        let timing = match request.method {
            CompositionMethod::Transition(_) => Some(self.resolve_timing(request, &clips)),
            CompositionMethod::Simple | CompositionMethod::SideBySide | CompositionMethod::Stacked => None,
        };

        let plan = FilterGraphBuilder::new(&self.config).build(request, timing)?;
        debug!("Planned command: {}", plan.command.render());
        Ok(plan)
    }

    fn resolve_timing(&self, request: &AssemblyConfig, clips: &[Clip]) -> Timing {
        let timing = resolve_timing(
            clips,
            request.clip_duration,
            request.transition_duration,
            request.user_set_duration,
        );

        if let Some(adjustment) = timing.adjustment {
            info!("📹 Auto-detected shortest video: ~{:.1}s", adjustment.shortest_clip);
            if let Some((from, to)) = adjustment.clip_duration {
                info!("⚙️  Adjusting clip duration from {}s to {}s", from, to);
            }
            if let Some((from, to)) = adjustment.transition_duration {
                info!("⚙️  Adjusting transition from {}s to {}s", from, to);
            }
        }

        timing
    }

    async fn run_stages(
        &self,
        request: &AssemblyConfig,
        tracker: &mut StateTracker,
    ) -> Result<(Plan, RunOutcome)> {
        let plan = self.plan_stages(request, tracker).await?;

        if let Some(list) = plan.command.concat_list() {
            list.write().await?;
            debug!("Wrote concat list {:?}", list.path());
        }

        if request.preview {
            tracker.advance(PlannerState::Previewing);
            let command_line = plan.command.render();
            return Ok((plan, RunOutcome::Previewed { command_line }));
        }

        tracker.advance(PlannerState::Executing);
        let program = plan.command.program();
        if !self.executor.is_available(program).await {
            return Err(ExecutionError::ToolNotFound { program: program.to_string() }.into());
        }

        info!("⏳ Processing...");
        let outcome = self.executor.execute(&plan.command).await;
        if !outcome.success {
            let message = outcome
                .error_message
                .unwrap_or_else(|| format!("{} failed", program));
            return Err(ExecutionError::ToolFailed { message }.into());
        }

        if let Some(list) = plan.command.concat_list() {
            if let Err(e) = list.remove().await {
                warn!("Failed to remove concat list {:?}: {}", list.path(), e);
            }
        }

        log_summary(&plan);
        Ok((plan, RunOutcome::Executed))
    }
}

/// Log what was produced once the engine has finished
fn log_summary(plan: &Plan) {
    info!("✅ Done! Output: {}", plan.command.output_path().display());

    match &plan.summary {
        PlanSummary::Concat { clips } => {
            info!("   Concatenated {} videos without re-encoding", clips);
        }
        PlanSummary::Transition { kind, timing } => {
            info!("   Transition: {} ({}s)", kind, timing.transition_duration);
            info!("   Clip duration: {}s", timing.clip_duration);
        }
        PlanSummary::Grid { layout, filler_cells } => {
            info!("   Layout: side-by-side grid ({}×{}, {} filler cells)",
                  layout.cols, layout.rows, filler_cells);
            info!("   Resolution: {}×{} per video", layout.cell_width, layout.cell_height);
        }
        PlanSummary::Stacked { layout, clips } => {
            info!("   Layout: stacked vertical ({} videos, {}×{} each)",
                  clips, layout.cell_width, layout.cell_height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::TransitionKind;
    use crate::config::TimingConfig;
    use crate::error::{AssemblerError, CompositionError};
    use crate::testing::{FakeProbe, RecordingExecutor};
    use std::path::PathBuf;
    use tempfile::tempdir;

    const FADE: CompositionMethod = CompositionMethod::Transition(TransitionKind::Fade);

    fn request(method: CompositionMethod, clips: &[&str]) -> AssemblyConfig {
        let clips = clips.iter().map(PathBuf::from).collect();
        AssemblyConfig::new(method, clips, &TimingConfig::default()).with_output("out.mp4")
    }

    fn planner(probe: FakeProbe, executor: RecordingExecutor) -> CompositionPlanner<FakeProbe, RecordingExecutor> {
        let dir = std::env::temp_dir().join(format!("clip-assembler-test-{}", std::process::id()));
        let mut config = Config::default();
        config.engine.concat_list = dir.join("unused_concat_list.txt");
        CompositionPlanner::new(config, probe, executor)
    }

    #[tokio::test]
    async fn test_preview_never_executes() {
        let names = ["a.mp4", "b.mp4", "c.mp4"];
        let dir = tempdir().unwrap();

        for method in CompositionMethod::all() {
            let mut config = Config::default();
            config.engine.concat_list = dir.path().join("concat_list.txt");
            let planner = CompositionPlanner::new(
                config,
                FakeProbe::new().with_clips(&names, 10.0),
                RecordingExecutor::succeeding(),
            );

            let report = planner.run(&request(method, &names).with_preview(true)).await.unwrap();
            assert!(planner.executor().executed().is_empty(), "{} executed", method);
            assert!(matches!(report.outcome, RunOutcome::Previewed { .. }));
            assert_eq!(report.states.last(), Some(&PlannerState::Done));
            assert!(report.states.contains(&PlannerState::Previewing));
        }
    }

    #[tokio::test]
    async fn test_simple_writes_and_removes_concat_list() {
        let dir = tempdir().unwrap();
        let list_path = dir.path().join("concat_list.txt");
        let mut config = Config::default();
        config.engine.concat_list = list_path.clone();

        let planner = CompositionPlanner::new(
            config,
            FakeProbe::new().with_clips(&["a.mp4", "b.mp4"], 5.0),
            RecordingExecutor::succeeding(),
        );
        let simple = request(CompositionMethod::Simple, &["a.mp4", "b.mp4"]);

        let preview = planner.run(&simple.clone().with_preview(true)).await.unwrap();
        let a = std::path::absolute("a.mp4").unwrap();
        let b = std::path::absolute("b.mp4").unwrap();
        assert_eq!(
            std::fs::read_to_string(&list_path).unwrap(),
            format!("file '{}'\nfile '{}'", a.display(), b.display())
        );
        assert_eq!(
            preview.outcome,
            RunOutcome::Previewed { command_line: preview.plan.command.render() }
        );

        let report = planner.run(&simple).await.unwrap();
        assert_eq!(report.outcome, RunOutcome::Executed);
        assert!(!list_path.exists());
        assert_eq!(planner.executor().executed().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_execution_is_surfaced_verbatim() {
        let dir = tempdir().unwrap();
        let list_path = dir.path().join("concat_list.txt");
        let mut config = Config::default();
        config.engine.concat_list = list_path.clone();

        let planner = CompositionPlanner::new(
            config,
            FakeProbe::new().with_clips(&["a.mp4", "b.mp4"], 5.0),
            RecordingExecutor::failing("Invalid data found when processing input"),
        );

        let err = planner
            .run(&request(CompositionMethod::Simple, &["a.mp4", "b.mp4"]))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Invalid data found when processing input");
        assert!(list_path.exists());
    }

    #[tokio::test]
    async fn test_missing_engine_fails_before_execution() {
        let planner = planner(
            FakeProbe::new().with_clips(&["a.mp4", "b.mp4"], 5.0),
            RecordingExecutor::unavailable(),
        );

        let err = planner.run(&request(CompositionMethod::Stacked, &["a.mp4", "b.mp4"])).await.unwrap_err();
        assert!(matches!(err, AssemblerError::Execution(ExecutionError::ToolNotFound { .. })));
        assert!(planner.executor().executed().is_empty());
    }

    #[tokio::test]
    async fn test_missing_clips_abort_before_planning() {
        let planner = planner(FakeProbe::new().with_clip("a.mp4", 5.0), RecordingExecutor::succeeding());

        let err = planner
            .run(&request(FADE, &["a.mp4", "b.mp4", "c.mp4"]))
            .await
            .unwrap_err();
        match err {
            AssemblerError::Composition(CompositionError::MissingClips { paths }) => {
                assert_eq!(paths, vec![PathBuf::from("b.mp4"), PathBuf::from("c.mp4")]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(planner.executor().executed().is_empty());
    }

    #[tokio::test]
    async fn test_insufficient_clips_fail_before_probing() {
        let planner = planner(FakeProbe::new().with_clip("a.mp4", 5.0), RecordingExecutor::succeeding());

        for method in [FADE, CompositionMethod::SideBySide, CompositionMethod::Stacked] {
            let err = planner.run(&request(method, &["a.mp4"])).await.unwrap_err();
            assert!(matches!(err, AssemblerError::Composition(CompositionError::InsufficientClips { .. })));
        }
        assert!(planner.probe().calls().is_empty());
    }

    #[tokio::test]
    async fn test_short_clips_adjust_transition_timing() {
        let planner = planner(
            FakeProbe::new()
                .with_clip("a.mp4", 3.0)
                .with_clip("b.mp4", 4.0)
                .with_clip("c.mp4", 5.0),
            RecordingExecutor::succeeding(),
        );

        let report = planner.run(&request(FADE, &["a.mp4", "b.mp4", "c.mp4"])).await.unwrap();
        match report.plan.summary {
            PlanSummary::Transition { timing, .. } => {
                assert_eq!(timing.clip_duration, 2.0);
                assert_eq!(timing.transition_duration, 1.0);
            }
            other => panic!("unexpected summary {:?}", other),
        }

        let executed = planner.executor().executed();
        assert!(executed[0].contains("[0:v]trim=0:2[v0]"));
        assert!(executed[0].contains("offset=1"));
        assert_eq!(
            report.states,
            vec![
                PlannerState::Validating,
                PlannerState::Probing,
                PlannerState::Planning,
                PlannerState::Executing,
                PlannerState::Done,
            ]
        );
    }

    #[tokio::test]
    async fn test_explicit_duration_is_not_adjusted() {
        let planner = planner(
            FakeProbe::new().with_clips(&["a.mp4", "b.mp4"], 3.0),
            RecordingExecutor::succeeding(),
        );

        let plan = planner
            .plan(&request(FADE, &["a.mp4", "b.mp4"]).with_clip_duration(10.0))
            .await
            .unwrap();
        let text = plan.command.filter_graph().unwrap().to_string();
        assert!(text.contains("trim=0:10"));
        assert!(text.contains("offset=9"));
    }

    #[tokio::test]
    async fn test_planning_is_idempotent() {
        let names = ["a.mp4", "b.mp4", "c.mp4", "d.mp4", "e.mp4"];
        let planner = planner(FakeProbe::new().with_clips(&names, 7.5), RecordingExecutor::succeeding());

        for method in [FADE, CompositionMethod::SideBySide, CompositionMethod::Stacked] {
            let first = planner.plan(&request(method, &names)).await.unwrap();
            let second = planner.plan(&request(method, &names)).await.unwrap();
            assert_eq!(first.command.render(), second.command.render());
            assert_eq!(first, second);
        }
    }
}
