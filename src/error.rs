//! Error taxonomy
//!
//! Configuration problems are fatal and stop the process before any work.
//! Generation and per-component I/O failures are recoverable: the reconciler
//! records them and moves on to the next component.

use std::path::PathBuf;

/// Fatal configuration errors, raised before scanning starts
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} environment variable is required")]
    MissingCredential { var: String },

    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid glob pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Failures of the external generation service
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Generation request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Generation service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed generation response: {0}")]
    Malformed(String),

    #[error("Generation service returned no source text")]
    Empty,
}

/// Why a single component could not be produced this run
#[derive(Debug, thiserror::Error)]
pub enum ComponentError {
    #[error("Failed to read usage site '{path}': {source}")]
    ReadSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Failed to write artifact '{path}': {source}")]
    WriteArtifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to delete unused artifact '{path}': {source}")]
    DeleteArtifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_message() {
        let err = ConfigError::MissingCredential {
            var: "ANTHROPIC_API_KEY".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "ANTHROPIC_API_KEY environment variable is required"
        );
    }

    #[test]
    fn test_component_error_is_transparent_for_generation() {
        let err: ComponentError = GenerationError::Empty.into();
        assert_eq!(err.to_string(), "Generation service returned no source text");
    }
}
