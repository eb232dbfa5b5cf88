//! Nesting composition: archives whose members are themselves archives.

use super::{path_arg, tar, zip, ToolBuilder};
use crate::corpus::{Compression, FormatFamily};
use crate::error::{Error, Result};
use crate::tool::ToolRunner;
use std::fs;
use std::path::Path;

/// Builds a shallow composite: a scratch directory populated with copies
/// of already-built artifacts, packed as a single container.
///
/// The scratch directory is shared between the composite specs so the
/// ZIP and tarball composites pack identical member sets.
pub(crate) fn shallow(
    builder: &mut ToolBuilder<'_>,
    inputs: &[&str],
    family: FormatFamily,
    dest: &Path,
) -> Result<()> {
    let scratch = builder.scratch("nested-input")?;
    for &input in inputs {
        let src = builder.input_artifact(input)?;
        let copy = scratch.join(input);
        if !copy.exists() {
            fs::copy(&src, &copy).map_err(|e| Error::file_write(&copy, e))?;
        }
    }

    match family {
        FormatFamily::Zip => {
            zip::pack_dir(builder.runner, &scratch, dest, Compression::Default, None)
        }
        FormatFamily::Tar => tar::pack_dir(builder.runner, &scratch, dest, None),
        FormatFamily::TarCodec(codec) => tar::pack_dir(builder.runner, &scratch, dest, Some(codec)),
        _ => Err(Error::unsupported_spec(path_arg(dest))),
    }
}

/// Builds the three-level composition, strictly innermost-first.
///
/// Level 3 holds one plain file; levels 2 and 1 each hold one plain file
/// plus the next level's closed archive. The outermost archive is written
/// straight to `dest`.
pub(crate) fn deep(runner: &dyn ToolRunner, scratch: &Path, dest: &Path) -> Result<()> {
    write_marker(scratch, "level3.txt", "You reached the innermost level.\n")?;
    zip::pack_files(runner, scratch, "level3.zip", &["level3.txt"], Compression::Default)?;

    write_marker(scratch, "level2.txt", "One level to go.\n")?;
    zip::pack_files(
        runner,
        scratch,
        "level2.zip",
        &["level2.txt", "level3.zip"],
        Compression::Default,
    )?;

    write_marker(scratch, "level1.txt", "Two levels to go.\n")?;
    zip::pack_files(
        runner,
        scratch,
        &path_arg(dest),
        &["level1.txt", "level2.zip"],
        Compression::Default,
    )?;
    Ok(())
}

fn write_marker(scratch: &Path, name: &str, content: &str) -> Result<()> {
    let path = scratch.join(name);
    fs::write(&path, content).map_err(|e| Error::file_write(&path, e))
}
