use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    composition::CompositionMethod,
    error::{CompositionError, ConfigError, Result},
};

/// Tool settings, optionally loaded from a TOML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// External engine settings
    pub engine: EngineConfig,

    /// Output encoding settings for re-encoding methods
    pub encoding: EncodingConfig,

    /// Canvas sizes for grid and stacked compositions
    pub layout: LayoutConfig,

    /// Default clip and transition durations
    pub timing: TimingConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.engine.validate()?;
        self.encoding.validate()?;
        self.layout.validate()?;
        self.timing.validate()?;
        Ok(())
    }
}

/// External engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine executable used to assemble the output
    pub ffmpeg: String,

    /// Probe executable used to inspect clips
    pub ffprobe: String,

    /// Location of the concat list written by the simple method
    pub concat_list: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
            concat_list: PathBuf::from("concat_list.txt"),
        }
    }
}

impl EngineConfig {
    fn validate(&self) -> Result<()> {
        for (key, value) in [("engine.ffmpeg", &self.ffmpeg), ("engine.ffprobe", &self.ffprobe)] {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingKey { key: key.to_string() }.into());
            }
        }

        if self.concat_list.as_os_str().is_empty() {
            return Err(ConfigError::MissingKey {
                key: "engine.concat_list".to_string()
            }.into());
        }

        Ok(())
    }
}

/// Encoding configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingConfig {
    /// Video codec for re-encoded output
    pub video_codec: String,

    /// Encoder speed preset
    pub preset: String,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            preset: "fast".to_string(),
        }
    }
}

impl EncodingConfig {
    fn validate(&self) -> Result<()> {
        if self.video_codec.trim().is_empty() {
            return Err(ConfigError::MissingKey {
                key: "encoding.video_codec".to_string()
            }.into());
        }
        Ok(())
    }
}

/// Layout canvas configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Grid canvas width in pixels
    pub grid_width: u32,

    /// Grid canvas height in pixels
    pub grid_height: u32,

    /// Column width for stacked compositions
    pub stacked_width: u32,

    /// Total height for stacked compositions
    pub stacked_height: u32,

    /// Colour of grid filler cells
    pub filler_color: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            grid_width: 1920,
            grid_height: 1080,
            stacked_width: 640,
            stacked_height: 1080,
            filler_color: "black".to_string(),
        }
    }
}

impl LayoutConfig {
    fn validate(&self) -> Result<()> {
        let sizes = [
            ("layout.grid_width", self.grid_width),
            ("layout.grid_height", self.grid_height),
            ("layout.stacked_width", self.stacked_width),
            ("layout.stacked_height", self.stacked_height),
        ];

        for (key, value) in sizes {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string()
                }.into());
            }
        }

        Ok(())
    }
}

/// Default timing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Clip duration before the transition starts (seconds)
    pub clip_duration: f64,

    /// Transition duration (seconds)
    pub transition_duration: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            clip_duration: 10.0,
            transition_duration: 1.0,
        }
    }
}

impl TimingConfig {
    fn validate(&self) -> Result<()> {
        validate_positive("timing.clip_duration", self.clip_duration)?;
        validate_positive("timing.transition_duration", self.transition_duration)
    }
}

fn validate_positive(key: &str, value: f64) -> Result<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string()
        }.into());
    }
    Ok(())
}

/// One assembly request, built once from command-line input
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyConfig {
    /// Composition method
    pub method: CompositionMethod,

    /// Input clips in output order
    pub clips: Vec<PathBuf>,

    /// Output video path
    pub output: PathBuf,

    /// Requested clip duration (seconds)
    pub clip_duration: f64,

    /// Requested transition duration (seconds)
    pub transition_duration: f64,

    /// Print the command instead of running it
    pub preview: bool,

    /// The clip duration was given explicitly and must not be auto-adjusted
    pub user_set_duration: bool,
}

impl AssemblyConfig {
    /// Create a request with defaults taken from the timing settings
    pub fn new(method: CompositionMethod, clips: Vec<PathBuf>, timing: &TimingConfig) -> Self {
        Self {
            method,
            clips,
            output: PathBuf::from("assembled.mp4"),
            clip_duration: timing.clip_duration,
            transition_duration: timing.transition_duration,
            preview: false,
            user_set_duration: false,
        }
    }

    /// Set the output path
    pub fn with_output<P: Into<PathBuf>>(mut self, output: P) -> Self {
        self.output = output.into();
        self
    }

    /// Set an explicit clip duration, disabling auto-adjustment
    pub fn with_clip_duration(mut self, seconds: f64) -> Self {
        self.clip_duration = seconds;
        self.user_set_duration = true;
        self
    }

    /// Set the transition duration
    pub fn with_transition_duration(mut self, seconds: f64) -> Self {
        self.transition_duration = seconds;
        self
    }

    /// Enable or disable preview mode
    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }

    /// Validate the request before any clip is probed
    pub fn validate(&self) -> Result<()> {
        if self.clips.is_empty() {
            return Err(CompositionError::NoClips.into());
        }

        let required = self.method.min_clips();
        if self.clips.len() < required {
            return Err(CompositionError::InsufficientClips {
                method: self.method.to_string(),
                required,
                found: self.clips.len(),
            }.into());
        }

        if self.output.as_os_str().is_empty() {
            return Err(ConfigError::MissingKey { key: "output".to_string() }.into());
        }

        validate_positive("duration", self.clip_duration)?;
        validate_positive("transition", self.transition_duration)?;
        Ok(())
    }
}
