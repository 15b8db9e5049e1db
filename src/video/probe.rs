use std::path::{Path, PathBuf};

use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{CompositionError, Result};
use crate::video::types::{Clip, ProbeReport, StreamInfo};

/// Capability for reading clip metadata from an external prober
///
/// Implementations must not fail hard for a missing or unreadable file;
/// they report [`ProbeReport::Unavailable`] instead.
#[allow(async_fn_in_trait)]
pub trait ClipProbe {
    async fn probe(&self, path: &Path) -> ProbeReport;
}

/// Probe backed by the `ffprobe` executable
#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    program: String,
}

impl FfprobeProbe {
    pub fn new<S: Into<String>>(program: S) -> Self {
        Self { program: program.into() }
    }
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

impl ClipProbe for FfprobeProbe {
    async fn probe(&self, path: &Path) -> ProbeReport {
        let output = Command::new(&self.program)
            .args([
                "-v", "error",
                "-select_streams", "v:0",
                "-show_entries", "stream=width,height,r_frame_rate:format=duration",
                "-of", "json",
            ])
            .arg(path)
            .output()
            .await;

        let output = match output {
            Ok(output) => output,
            Err(e) => {
                return ProbeReport::Unavailable {
                    reason: format!("failed to run {}: {}", self.program, e),
                }
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return ProbeReport::Unavailable {
                reason: stderr.trim().to_string(),
            };
        }

        parse_ffprobe_json(&output.stdout)
    }
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

/// Turn ffprobe's JSON output into a probe report
fn parse_ffprobe_json(bytes: &[u8]) -> ProbeReport {
    let parsed: FfprobeOutput = match serde_json::from_slice(bytes) {
        Ok(parsed) => parsed,
        Err(e) => {
            return ProbeReport::Unavailable {
                reason: format!("invalid ffprobe output: {}", e),
            }
        }
    };

    let Some(stream) = parsed.streams.into_iter().next() else {
        return ProbeReport::Unavailable {
            reason: "no video stream".to_string(),
        };
    };

    // A bad duration only degrades the clip; geometry is still usable.
    let duration = parsed
        .format
        .and_then(|f| f.duration)
        .and_then(|d| d.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d >= 0.0);

    ProbeReport::Available(StreamInfo {
        width: stream.width,
        height: stream.height,
        frame_rate: stream.r_frame_rate,
        duration,
    })
}

/// Probe every clip in order and fail with all missing paths at once
pub async fn validate_videos<P: ClipProbe>(probe: &P, paths: &[PathBuf]) -> Result<Vec<Clip>> {
    let mut clips = Vec::with_capacity(paths.len());
    let mut missing = Vec::new();

    for path in paths {
        let report = probe.probe(path).await;
        match &report {
            ProbeReport::Available(info) => {
                debug!("Probed {:?}: {:?}x{:?} @ {:?}, {:?}s",
                       path, info.width, info.height, info.frame_rate, info.duration);
                if info.duration.is_none() {
                    warn!("Could not read duration of {:?}", path);
                }
            }
            ProbeReport::Unavailable { reason } => {
                warn!("Video not readable: {:?} ({})", path, reason);
                missing.push(path.clone());
            }
        }
        clips.push(Clip::from_report(path.clone(), &report));
    }

    if !missing.is_empty() {
        return Err(CompositionError::MissingClips { paths: missing }.into());
    }

    Ok(clips)
}
