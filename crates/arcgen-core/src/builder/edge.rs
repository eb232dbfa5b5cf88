//! Adversarial and boundary artifacts.

use super::{path_arg, zip};
use crate::corpus::Compression;
use crate::error::{Error, Result};
use crate::tool::ToolRunner;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Placeholder member used to construct the empty archive
const PLACEHOLDER: &str = "placeholder.txt";

/// Uniform-byte input file for the bomb candidate
const BOMB_INPUT: &str = "zeros.bin";

/// Size of the bomb candidate's decompressed payload
const BOMB_INPUT_LEN: u64 = 50 * 1024 * 1024;

/// Builds a structurally valid archive with zero member entries.
///
/// The container is created around a placeholder entry which is then
/// deleted again. Creating an archive with zero adds instead would make
/// the tool refuse to write anything (or write a bare stub some strict
/// readers reject), so removal-after-add is the only construction that
/// guarantees a well-formed empty container.
pub(crate) fn empty_archive(runner: &dyn ToolRunner, scratch: &Path, dest: &Path) -> Result<()> {
    let placeholder = scratch.join(PLACEHOLDER);
    fs::write(&placeholder, b"about to be deleted\n")
        .map_err(|e| Error::file_write(&placeholder, e))?;

    let dest_arg = path_arg(dest);
    zip::pack_files(runner, scratch, &dest_arg, &[PLACEHOLDER], Compression::Default)?;
    zip::delete_entry(runner, scratch, &dest_arg, PLACEHOLDER)
}

/// Builds an archive whose members are exclusively empty directories.
pub(crate) fn empty_dirs(runner: &dyn ToolRunner, scratch: &Path, dest: &Path) -> Result<()> {
    for rel_path in ["logs", "cache/tmp", "data"] {
        let dir = scratch.join(rel_path);
        fs::create_dir_all(&dir).map_err(|e| Error::directory_create(&dir, e))?;
    }
    zip::pack_dir(runner, scratch, dest, Compression::Default, None)
}

/// Builds an archive whose member names contain whitespace and non-ASCII
/// characters, preserved byte-for-byte by the tool.
pub(crate) fn special_names(runner: &dyn ToolRunner, scratch: &Path, dest: &Path) -> Result<()> {
    let entries: &[(&str, &str)] = &[
        ("file with spaces.txt", "whitespace in the name\n"),
        ("ümlaut.txt", "non-ASCII latin name\n"),
        ("日本語.txt", "non-latin name\n"),
    ];
    for (name, content) in entries {
        let path = scratch.join(name);
        fs::write(&path, content).map_err(|e| Error::file_write(&path, e))?;
    }
    zip::pack_dir(runner, scratch, dest, Compression::Default, None)
}

/// Builds the bomb candidate: a uniform single-byte input compressed at
/// the spec's (maximum) level, yielding an extreme
/// compressed:decompressed ratio.
///
/// Only the artifact is produced here; enforcing extraction limits is the
/// consuming library's concern.
pub(crate) fn bomb(
    runner: &dyn ToolRunner,
    scratch: &Path,
    dest: &Path,
    compression: Compression,
) -> Result<()> {
    let input = scratch.join(BOMB_INPUT);
    write_uniform(&input, BOMB_INPUT_LEN)?;
    zip::pack_files(runner, scratch, &path_arg(dest), &[BOMB_INPUT], compression)
}

/// Writes `len` bytes of a single repeated value without holding the
/// payload in memory at once.
fn write_uniform(path: &Path, len: u64) -> Result<()> {
    let file = fs::File::create(path).map_err(|e| Error::file_write(path, e))?;
    let mut writer = std::io::BufWriter::new(file);
    let chunk = [0u8; 64 * 1024];
    let mut remaining = len;
    while remaining > 0 {
        let take = remaining.min(chunk.len() as u64) as usize;
        writer
            .write_all(&chunk[..take])
            .map_err(|e| Error::file_write(path, e))?;
        remaining -= take as u64;
    }
    writer.flush().map_err(|e| Error::file_write(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::fixtures::staged_out;
    use crate::builder::{BuildStrategy, ToolBuilder};
    use crate::corpus::corpus_specs;
    use crate::tool::scripted::ScriptedRunner;
    use tempfile::TempDir;

    fn build(name: &str, runner: &ScriptedRunner) -> (TempDir, std::path::PathBuf) {
        let temp = TempDir::new().unwrap();
        let (tree, out) = staged_out(&temp);
        let spec = corpus_specs().into_iter().find(|s| s.name == name).unwrap();
        let mut builder = ToolBuilder::new(runner, &tree, &out);
        builder.build(&spec).unwrap();
        let work = builder.work_root().to_path_buf();
        (temp, work)
    }

    #[test]
    fn test_empty_archive_adds_then_deletes_placeholder() {
        let runner = ScriptedRunner::new();
        let (_temp, work) = build("empty.zip", &runner);

        let calls = runner.calls_for("zip");
        assert_eq!(calls.len(), 2);
        assert!(calls[0].args.contains(&PLACEHOLDER.to_string()));
        assert!(calls[1].args.contains(&"-d".to_string()));
        assert!(calls[1].args.contains(&PLACEHOLDER.to_string()));
        assert!(work.join("empty-input").join(PLACEHOLDER).is_file());
    }

    #[test]
    fn test_empty_dirs_scratch_has_no_files() {
        let runner = ScriptedRunner::new();
        let (_temp, work) = build("empty-dirs.zip", &runner);

        let scratch = work.join("empty-dirs-input");
        for entry in walkdir::WalkDir::new(&scratch) {
            assert!(
                entry.unwrap().file_type().is_dir(),
                "scratch must contain only directories"
            );
        }
        assert!(scratch.join("cache/tmp").is_dir());
    }

    #[test]
    fn test_special_names_preserve_exact_bytes() {
        let runner = ScriptedRunner::new();
        let (_temp, work) = build("special-chars.zip", &runner);

        let scratch = work.join("special-chars-input");
        assert!(scratch.join("file with spaces.txt").is_file());
        assert!(scratch.join("ümlaut.txt").is_file());
        assert!(scratch.join("日本語.txt").is_file());
    }

    #[test]
    fn test_bomb_input_is_uniform_and_large() {
        let runner = ScriptedRunner::new();
        let (_temp, work) = build("potential-bomb.zip", &runner);

        let input = work.join("bomb-input").join(BOMB_INPUT);
        assert_eq!(fs::metadata(&input).unwrap().len(), BOMB_INPUT_LEN);

        let head = &fs::read(&input).unwrap()[..4096];
        assert!(head.iter().all(|b| *b == head[0]));

        let args = &runner.calls_for("zip")[0].args;
        assert!(args.contains(&"-9".to_string()));
    }
}
