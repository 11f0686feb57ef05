//! Errors raised while loading and validating scenario configuration

use std::path::PathBuf;

use thiserror::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read scenario file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unsupported dimension {0}, expected 2 or 3")]
    Dimension(usize),

    #[error("invalid {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("particle {index}: expected {expected} components, found {found}")]
    ParticleShape {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("initial condition `{kind}` does not apply to {dimension}D scenarios")]
    InitialKind { kind: &'static str, dimension: usize },

    #[error("unknown preset `{0}`, expected one of: {1}")]
    UnknownPreset(String, &'static str),
}
