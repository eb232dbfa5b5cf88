//! ZIP construction via the Info-ZIP `zip` tool.
//!
//! ZIP variants differ only by compression level and the presence of a
//! password. Encryption uses `-P`, i.e. the traditional ZipCrypto stream
//! cipher that every standard unzip accepts; the password itself is
//! recorded out-of-band in the manifest.

use super::{path_arg, run_tool};
use crate::corpus::Compression;
use crate::error::Result;
use crate::tool::ToolRunner;
use std::path::Path;

/// Packs the contents of `src_dir` (directory entries included) into
/// `dest`.
///
/// The tool runs from inside `src_dir` so member paths are relative to
/// the archive root.
pub(crate) fn pack_dir(
    runner: &dyn ToolRunner,
    src_dir: &Path,
    dest: &Path,
    compression: Compression,
    password: Option<&str>,
) -> Result<()> {
    let mut args = vec!["-q".to_string(), "-r".to_string()];
    push_level(&mut args, compression);
    if let Some(password) = password {
        args.push("-P".to_string());
        args.push(password.to_string());
    }
    args.push(path_arg(dest));
    args.push(".".to_string());

    run_tool(runner, "zip", &args, src_dir)?;
    Ok(())
}

/// Packs the named files (relative to `cwd`) into `dest` without
/// recursing.
pub(crate) fn pack_files(
    runner: &dyn ToolRunner,
    cwd: &Path,
    dest: &str,
    names: &[&str],
    compression: Compression,
) -> Result<()> {
    let mut args = vec!["-q".to_string()];
    push_level(&mut args, compression);
    args.push(dest.to_string());
    args.extend(names.iter().map(|n| (*n).to_string()));

    run_tool(runner, "zip", &args, cwd)?;
    Ok(())
}

/// Deletes a member entry from an existing archive.
pub(crate) fn delete_entry(
    runner: &dyn ToolRunner,
    cwd: &Path,
    dest: &str,
    name: &str,
) -> Result<()> {
    let args = vec![
        "-q".to_string(),
        "-d".to_string(),
        dest.to_string(),
        name.to_string(),
    ];
    run_tool(runner, "zip", &args, cwd)?;
    Ok(())
}

fn push_level(args: &mut Vec<String>, compression: Compression) {
    match compression {
        Compression::None => args.push("-0".to_string()),
        Compression::Default => {}
        Compression::Maximum => args.push("-9".to_string()),
    }
}
