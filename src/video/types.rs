use std::path::{Path, PathBuf};

/// Stream details reported for a readable clip
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamInfo {
    /// Frame width in pixels
    pub width: Option<u32>,

    /// Frame height in pixels
    pub height: Option<u32>,

    /// Frame rate as the probe reports it (e.g. "30/1")
    pub frame_rate: Option<String>,

    /// Container duration in seconds
    pub duration: Option<f64>,
}

/// Result of probing a single path
///
/// Probing never fails hard: an unreadable or missing file is reported as
/// [`ProbeReport::Unavailable`] and callers branch on [`ProbeReport::exists`].
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeReport {
    Available(StreamInfo),
    Unavailable { reason: String },
}

impl ProbeReport {
    pub fn exists(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    pub fn stream(&self) -> Option<&StreamInfo> {
        match self {
            Self::Available(info) => Some(info),
            Self::Unavailable { .. } => None,
        }
    }
}

/// One input clip with whatever metadata probing produced
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    /// Path to the video file, as given
    pub path: PathBuf,

    /// Duration in seconds (if known)
    pub duration: Option<f64>,

    /// Frame width (if known)
    pub width: Option<u32>,

    /// Frame height (if known)
    pub height: Option<u32>,

    /// Frame rate (if known)
    pub frame_rate: Option<String>,
}

impl Clip {
    /// Create a clip with no probed metadata
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            duration: None,
            width: None,
            height: None,
            frame_rate: None,
        }
    }

    /// Create a clip from a probe report; unavailable reports leave every field empty
    pub fn from_report<P: Into<PathBuf>>(path: P, report: &ProbeReport) -> Self {
        let mut clip = Self::new(path);
        if let Some(info) = report.stream() {
            clip.duration = info.duration;
            clip.width = info.width;
            clip.height = info.height;
            clip.frame_rate = info.frame_rate.clone();
        }
        clip
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolution as (width, height) when both are known
    pub fn resolution(&self) -> Option<(u32, u32)> {
        Some((self.width?, self.height?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_from_available_report() {
        let report = ProbeReport::Available(StreamInfo {
            width: Some(640),
            height: Some(300),
            frame_rate: Some("30/1".to_string()),
            duration: Some(12.5),
        });

        let clip = Clip::from_report("static.mp4", &report);
        assert_eq!(clip.resolution(), Some((640, 300)));
        assert_eq!(clip.duration, Some(12.5));
        assert_eq!(clip.frame_rate.as_deref(), Some("30/1"));
    }

    #[test]
    fn test_clip_from_unavailable_report() {
        let report = ProbeReport::Unavailable { reason: "No such file".to_string() };
        assert!(!report.exists());

        let clip = Clip::from_report("gone.mp4", &report);
        assert_eq!(clip, Clip::new("gone.mp4"));
        assert_eq!(clip.resolution(), None);
    }
}
