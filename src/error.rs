use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the clip assembler library
#[derive(Error, Debug)]
pub enum AssemblerError {
    #[error("Composition error: {0}")]
    Composition(#[from] CompositionError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while validating and planning a composition
#[derive(Error, Debug)]
pub enum CompositionError {
    #[error("Unknown method: {method} (available methods: {available})")]
    UnknownMethod { method: String, available: String },

    #[error("No video files specified")]
    NoClips,

    #[error("{method} requires at least {required} videos, got {found}")]
    InsufficientClips {
        method: String,
        required: usize,
        found: usize,
    },

    #[error("Missing video files: {}", join_paths(.paths))]
    MissingClips { paths: Vec<PathBuf> },

    #[error("Invalid filter graph: {reason}")]
    InvalidGraph { reason: String },
}

/// Errors raised while running the external engine
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("{program} not found. Please install FFmpeg.")]
    ToolNotFound { program: String },

    #[error("{message}")]
    ToolFailed { message: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required configuration: {key}")]
    MissingKey { key: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using AssemblerError
pub type Result<T> = std::result::Result<T, AssemblerError>;

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl AssemblerError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Composition(CompositionError::MissingClips { paths }) => {
                let mut message = String::from("Missing video files:");
                for path in paths {
                    message.push_str(&format!("\n   {}", path.display()));
                }
                message
            }
            Self::Composition(CompositionError::UnknownMethod { method, available }) => {
                format!("Unknown method: {}\nAvailable methods: {}", method, available)
            }
            Self::Composition(CompositionError::NoClips) => {
                "No video files specified. Run with --help for usage.".to_string()
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            Self::Execution(ExecutionError::ToolFailed { message }) => message.clone(),
            _ => self.to_string(),
        }
    }
}
