//! External tool invocation.
//!
//! Every archive in the corpus is produced by the standard tool for its
//! format family rather than an in-process codec, so extraction fidelity is
//! measured against the same binaries users run. This module provides the
//! [`ToolRunner`] capability that the builders depend on, with a default
//! implementation that shells out.
//!
//! ## Extensibility
//!
//! The [`ToolRunner`] trait is the seam for swapping the invocation
//! mechanism, e.g. a sandboxed runner or a recording fake in tests:
//!
//! ```no_run
//! use arcgen_core::tool::ToolRunner;
//! use arcgen_core::Result;
//! use std::path::Path;
//! use std::process::Output;
//!
//! struct LoggingRunner;
//!
//! impl ToolRunner for LoggingRunner {
//!     fn run(&self, tool: &str, args: &[&str], cwd: &Path) -> Result<Output> {
//!         eprintln!("{tool} {args:?}");
//!         arcgen_core::tool::SystemToolRunner.run(tool, args, cwd)
//!     }
//! }
//! ```

use crate::error::{Error, Result};
use std::path::Path;
use std::process::{Command, Output};
use tracing::{debug, trace};

/// Capability for running an external archive/compression tool.
///
/// Implementations must run the tool to completion, blocking, with the
/// child's working directory set to `cwd` and stdout/stderr captured.
/// The ambient process working directory must never leak into a build.
pub trait ToolRunner: Send + Sync {
    /// Runs `tool` with `args` in `cwd` and returns the captured output.
    ///
    /// A spawn failure of kind `NotFound` maps to [`Error::ToolMissing`];
    /// other spawn failures map to [`Error::ToolSpawn`]. A non-zero exit
    /// status is *not* an error at this level; callers that require
    /// success go through [`run_checked`].
    fn run(&self, tool: &str, args: &[&str], cwd: &Path) -> Result<Output>;
}

/// Default runner that executes tools on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemToolRunner;

impl ToolRunner for SystemToolRunner {
    fn run(&self, tool: &str, args: &[&str], cwd: &Path) -> Result<Output> {
        trace!("running {} {:?} (cwd: {})", tool, args, cwd.display());
        Command::new(tool)
            .args(args)
            .current_dir(cwd)
            .output()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => Error::tool_missing(tool),
                _ => Error::tool_spawn(tool, e),
            })
    }
}

/// Runs a tool and treats any non-zero exit status as fatal.
///
/// The failing tool's stderr and exit code are surfaced verbatim in the
/// returned [`Error::ToolFailed`].
pub fn run_checked(
    runner: &dyn ToolRunner,
    tool: &str,
    args: &[&str],
    cwd: &Path,
) -> Result<Output> {
    let output = runner.run(tool, args, cwd)?;
    if !output.status.success() {
        return Err(Error::tool_failed(
            tool,
            output.status.code(),
            String::from_utf8_lossy(&output.stderr).into_owned(),
        ));
    }
    Ok(output)
}

/// Verifies that every required tool can be invoked, before any output
/// is written.
///
/// Each tool is probed once with a cheap informational flag. Only
/// resolvability matters here: the probe's exit status is ignored (some
/// tools exit non-zero from their version/usage output), so the check
/// fails exactly when a tool cannot be spawned at all.
pub fn preflight(runner: &dyn ToolRunner, tools: &[&str]) -> Result<()> {
    let probe_dir = std::env::temp_dir();
    for &tool in tools {
        debug!("probing for '{}'", tool);
        runner.run(tool, probe_args(tool), &probe_dir)?;
    }
    debug!("all {} required tools resolved", tools.len());
    Ok(())
}

/// Harmless per-tool probe arguments.
///
/// `zip` has no `--version`; `7z i` lists codecs without touching any file.
fn probe_args(tool: &str) -> &'static [&'static str] {
    match tool {
        "zip" => &["-v"],
        "7z" => &["i"],
        _ => &["--version"],
    }
}

#[cfg(test)]
pub(crate) mod scripted {
    //! A scripted [`ToolRunner`] for exercising builders and the pipeline
    //! without any external tools installed.

    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// One recorded tool invocation.
    #[derive(Debug, Clone)]
    pub(crate) struct RecordedCall {
        pub(crate) tool: String,
        pub(crate) args: Vec<String>,
        pub(crate) cwd: PathBuf,
    }

    /// Records every invocation and pretends each tool succeeded,
    /// creating empty files for any absolute output path it spots in the
    /// arguments (the way a real archiver would create its archive).
    #[derive(Default)]
    pub(crate) struct ScriptedRunner {
        pub(crate) calls: Mutex<Vec<RecordedCall>>,
        /// Tool name that should report a non-zero exit
        pub(crate) fail_tool: Option<&'static str>,
        /// Exit code for `fail_tool`
        pub(crate) fail_code: i32,
        /// Tool name that should be unresolvable
        pub(crate) missing_tool: Option<&'static str>,
        /// Canned stdout returned by every successful invocation
        pub(crate) stdout: Vec<u8>,
    }

    impl ScriptedRunner {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn failing(tool: &'static str, code: i32) -> Self {
            Self {
                fail_tool: Some(tool),
                fail_code: code,
                ..Self::default()
            }
        }

        pub(crate) fn missing(tool: &'static str) -> Self {
            Self {
                missing_tool: Some(tool),
                ..Self::default()
            }
        }

        pub(crate) fn calls_for(&self, tool: &str) -> Vec<RecordedCall> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.tool == tool)
                .cloned()
                .collect()
        }
    }

    impl ToolRunner for ScriptedRunner {
        fn run(&self, tool: &str, args: &[&str], cwd: &Path) -> Result<Output> {
            self.calls.lock().unwrap().push(RecordedCall {
                tool: tool.to_string(),
                args: args.iter().map(|a| (*a).to_string()).collect(),
                cwd: cwd.to_path_buf(),
            });

            if self.missing_tool == Some(tool) {
                return Err(Error::tool_missing(tool));
            }
            if self.fail_tool == Some(tool) {
                return Ok(fake_output(self.fail_code, Vec::new()));
            }

            // Stand in for the tool writing its archive.
            for arg in args {
                let path = Path::new(arg);
                if path.is_absolute()
                    && !path.exists()
                    && path.extension().is_some()
                    && path.parent().is_some_and(Path::exists)
                {
                    std::fs::write(path, b"").unwrap();
                }
            }

            Ok(fake_output(0, self.stdout.clone()))
        }
    }

    fn fake_output(code: i32, stdout: Vec<u8>) -> Output {
        use std::os::unix::process::ExitStatusExt;
        Output {
            status: std::process::ExitStatus::from_raw(code << 8),
            stdout,
            stderr: if code == 0 {
                Vec::new()
            } else {
                b"scripted failure".to_vec()
            },
        }
    }
}
