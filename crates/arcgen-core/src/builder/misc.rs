//! AR and 7-Zip construction.

use super::{path_arg, run_tool};
use crate::error::{Error, Result};
use crate::staging::StagedTree;
use crate::tool::ToolRunner;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Packs the staged regular files into a Unix ar archive.
///
/// ar has no directory entries, so the staged tree is flattened to its
/// basenames in a scratch directory first and the archive is built from
/// there with member names free of path separators.
pub(crate) fn pack_ar(
    runner: &dyn ToolRunner,
    tree: &StagedTree,
    scratch: &Path,
    dest: &Path,
) -> Result<()> {
    let mut names = Vec::new();
    for entry in WalkDir::new(tree.root()).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::file_read(tree.root(), e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let staged_copy = scratch.join(&name);
        fs::copy(entry.path(), &staged_copy).map_err(|e| Error::file_write(&staged_copy, e))?;
        names.push(name);
    }

    let mut args = vec!["rcs".to_string(), path_arg(dest)];
    args.extend(names);
    run_tool(runner, "ar", &args, scratch)?;
    Ok(())
}

/// Packs the whole staged tree into a 7-Zip archive with default
/// settings.
pub(crate) fn pack_7z(runner: &dyn ToolRunner, src_dir: &Path, dest: &Path) -> Result<()> {
    let args = vec![
        "a".to_string(),
        "-bd".to_string(),
        "-y".to_string(),
        path_arg(dest),
        ".".to_string(),
    ];
    run_tool(runner, "7z", &args, src_dir)?;
    Ok(())
}
