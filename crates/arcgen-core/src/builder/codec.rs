//! Single-file compression.
//!
//! These specs compress exactly one staged file, not the whole tree. The
//! codec runs in `-c` (stdout) mode and the captured bytes are written to
//! the destination, which keeps the staged source file untouched and
//! sidesteps the codecs' differing in-place/suffix behaviors.

use crate::corpus::Codec;
use crate::error::{Error, Result};
use crate::staging::StagedTree;
use crate::tool::{run_checked, ToolRunner};
use std::fs;
use std::path::Path;

/// Compresses one staged file (by path relative to the staged root) into
/// `dest`.
pub(crate) fn compress_file(
    runner: &dyn ToolRunner,
    codec: Codec,
    tree: &StagedTree,
    rel_path: &str,
    dest: &Path,
) -> Result<()> {
    let output = run_checked(runner, codec.tool(), &stdout_args(codec, rel_path), tree.root())?;
    fs::write(dest, &output.stdout).map_err(|e| Error::file_write(dest, e))
}

/// Arguments for compress-to-stdout mode.
///
/// zstd and lz4 print progress on stderr unless quieted.
fn stdout_args(codec: Codec, rel_path: &str) -> Vec<&str> {
    match codec {
        Codec::Gzip | Codec::Bzip2 | Codec::Xz => vec!["-c", rel_path],
        Codec::Zstd | Codec::Lz4 => vec!["-q", "-c", rel_path],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::fixtures::staged_out;
    use crate::tool::scripted::ScriptedRunner;
    use tempfile::TempDir;

    #[test]
    fn test_captured_stdout_becomes_the_artifact() {
        let temp = TempDir::new().unwrap();
        let (tree, out) = staged_out(&temp);
        let runner = ScriptedRunner {
            stdout: b"compressed bytes".to_vec(),
            ..ScriptedRunner::new()
        };

        let dest = out.join("hello.txt.gz");
        compress_file(&runner, Codec::Gzip, &tree, "hello.txt", &dest).unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"compressed bytes");
        let call = &runner.calls_for("gzip")[0];
        assert_eq!(call.args, vec!["-c", "hello.txt"]);
        assert_eq!(call.cwd, tree.root());
    }

    #[test]
    fn test_noisy_codecs_are_quieted() {
        let temp = TempDir::new().unwrap();
        let (tree, out) = staged_out(&temp);
        let runner = ScriptedRunner::new();

        compress_file(&runner, Codec::Zstd, &tree, "hello.txt", &out.join("hello.txt.zst"))
            .unwrap();
        compress_file(&runner, Codec::Lz4, &tree, "hello.txt", &out.join("hello.txt.lz4"))
            .unwrap();

        assert_eq!(runner.calls_for("zstd")[0].args, vec!["-q", "-c", "hello.txt"]);
        assert_eq!(runner.calls_for("lz4")[0].args, vec!["-q", "-c", "hello.txt"]);
    }

    #[test]
    fn test_codec_failure_is_fatal() {
        let temp = TempDir::new().unwrap();
        let (tree, out) = staged_out(&temp);
        let runner = ScriptedRunner::failing("bzip2", 2);

        let dest = out.join("hello.txt.bz2");
        let err = compress_file(&runner, Codec::Bzip2, &tree, "hello.txt", &dest).unwrap_err();
        assert_eq!(err.tool_exit_code(), Some(2));
        assert!(!dest.exists());
    }
}
