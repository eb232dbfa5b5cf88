//! Error types for the arcgen-core library.
//!
//! This module provides comprehensive error handling using the `thiserror` crate,
//! with detailed error variants for different failure modes. Every error is fatal
//! to the generation run: the pipeline never retries and never produces a partial
//! corpus with a manifest.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for arcgen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error type for all arcgen operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A required external tool could not be resolved on PATH
    #[error("required tool '{tool}' not found on PATH")]
    ToolMissing {
        /// Name of the missing tool
        tool: String,
    },

    /// A required external tool could not be spawned for a reason other
    /// than being missing (permissions, resource limits, ...)
    #[error("failed to invoke tool '{tool}': {source}")]
    ToolSpawn {
        /// Name of the tool that failed to spawn
        tool: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// An external tool ran but exited with a non-zero status
    #[error("tool '{tool}' exited with {}: {stderr}", .code.map_or_else(|| "signal".to_string(), |c| format!("status {c}")))]
    ToolFailed {
        /// Name of the failing tool
        tool: String,
        /// Exit code, if the process exited normally
        code: Option<i32>,
        /// Captured stderr of the failing invocation, verbatim
        stderr: String,
    },

    /// The supplied output directory argument is unusable
    #[error("invalid output directory '{path}': {reason}")]
    InvalidOutputDir {
        /// The offending path
        path: PathBuf,
        /// Why the path was rejected
        reason: String,
    },

    /// Failed to create a directory
    #[error("failed to create directory '{path}': {source}")]
    DirectoryCreate {
        /// Path to the directory that failed to create
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to remove a staging directory during cleanup
    #[error("failed to remove directory '{path}': {source}")]
    DirectoryRemove {
        /// Path to the directory that failed to remove
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        /// Path to the file that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        /// Path to the file that failed to write
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A nesting spec referenced an artifact that has not been built yet
    #[error("artifact '{name}' is required as a nesting input but was not built")]
    MissingArtifact {
        /// Name of the missing input artifact
        name: String,
    },

    /// A spec combines a format family and source selector the builder
    /// has no construction rule for
    #[error("spec '{name}' combines a format family and source selector with no construction rule")]
    UnsupportedSpec {
        /// Name of the unbuildable spec
        name: String,
    },
}

impl Error {
    /// Creates a new missing-tool error
    pub fn tool_missing(tool: impl Into<String>) -> Self {
        Self::ToolMissing { tool: tool.into() }
    }

    /// Creates a new tool spawn error
    pub fn tool_spawn(tool: impl Into<String>, source: std::io::Error) -> Self {
        Self::ToolSpawn {
            tool: tool.into(),
            source,
        }
    }

    /// Creates a new tool failure error from a captured invocation
    pub fn tool_failed(tool: impl Into<String>, code: Option<i32>, stderr: impl Into<String>) -> Self {
        Self::ToolFailed {
            tool: tool.into(),
            code,
            stderr: stderr.into(),
        }
    }

    /// Creates a new invalid output directory error
    pub fn invalid_output_dir(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidOutputDir {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new directory creation error
    pub fn directory_create(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryCreate {
            path: path.into(),
            source,
        }
    }

    /// Creates a new directory removal error
    pub fn directory_remove(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryRemove {
            path: path.into(),
            source,
        }
    }

    /// Creates a new file read error
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a new file write error
    pub fn file_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Creates a new missing nesting input error
    pub fn missing_artifact(name: impl Into<String>) -> Self {
        Self::MissingArtifact { name: name.into() }
    }

    /// Creates a new unsupported spec error
    pub fn unsupported_spec(name: impl Into<String>) -> Self {
        Self::UnsupportedSpec { name: name.into() }
    }

    /// Returns the exit code of the underlying tool, if this error wraps
    /// a failed tool invocation that exited normally.
    ///
    /// The CLI propagates this code so callers see the failing tool's own
    /// failure signal.
    pub fn tool_exit_code(&self) -> Option<i32> {
        match self {
            Self::ToolFailed { code, .. } => *code,
            _ => None,
        }
    }

    /// Returns true if this error originates from an external tool
    /// (missing, unspawnable, or exiting non-zero).
    pub fn is_tool_error(&self) -> bool {
        matches!(
            self,
            Self::ToolMissing { .. } | Self::ToolSpawn { .. } | Self::ToolFailed { .. }
        )
    }
}
