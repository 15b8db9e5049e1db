//! In-memory probe and executor used by the unit tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::composition::{Command, ExecutionOutcome, Executor};
use crate::video::{ClipProbe, ProbeReport, StreamInfo};

/// Probe answering from a fixed table; unknown paths are unavailable
#[derive(Default)]
pub struct FakeProbe {
    reports: HashMap<PathBuf, ProbeReport>,
    calls: Mutex<Vec<PathBuf>>,
}

impl FakeProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clip(mut self, path: &str, duration: f64) -> Self {
        self.reports.insert(PathBuf::from(path), ProbeReport::Available(StreamInfo {
            width: Some(640),
            height: Some(300),
            frame_rate: Some("30/1".to_string()),
            duration: Some(duration),
        }));
        self
    }

    pub fn with_clip_without_duration(mut self, path: &str) -> Self {
        self.reports.insert(PathBuf::from(path), ProbeReport::Available(StreamInfo {
            width: Some(640),
            height: Some(300),
            frame_rate: Some("30/1".to_string()),
            duration: None,
        }));
        self
    }

    pub fn with_clips(self, paths: &[&str], duration: f64) -> Self {
        paths.iter().fold(self, |probe, path| probe.with_clip(path, duration))
    }

    /// Every path probed so far, in call order
    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

impl ClipProbe for FakeProbe {
    async fn probe(&self, path: &Path) -> ProbeReport {
        self.calls.lock().unwrap().push(path.to_path_buf());
        self.reports.get(path).cloned().unwrap_or(ProbeReport::Unavailable {
            reason: "No such file or directory".to_string(),
        })
    }
}

/// Executor that records rendered commands instead of running them
pub struct RecordingExecutor {
    outcome: ExecutionOutcome,
    available: bool,
    executed: Mutex<Vec<String>>,
}

impl RecordingExecutor {
    pub fn succeeding() -> Self {
        Self {
            outcome: ExecutionOutcome::succeeded(),
            available: true,
            executed: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            outcome: ExecutionOutcome::failed(message),
            ..Self::succeeding()
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::succeeding()
        }
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }
}

impl Executor for RecordingExecutor {
    async fn execute(&self, command: &Command) -> ExecutionOutcome {
        self.executed.lock().unwrap().push(command.render());
        self.outcome.clone()
    }

    async fn is_available(&self, _program: &str) -> bool {
        self.available
    }
}
