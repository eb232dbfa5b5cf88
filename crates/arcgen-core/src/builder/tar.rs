//! TAR construction via GNU tar.
//!
//! Compressed variants layer exactly one codec after tarring, selected
//! with tar's native codec flags so tar drives the codec binary itself.
//! Alternate historical extensions are separate specs that reuse the same
//! invocation, producing independent artifacts with identical logical
//! content.

use super::{path_arg, run_tool};
use crate::corpus::Codec;
use crate::error::{Error, Result};
use crate::tool::ToolRunner;
use std::path::Path;

/// Packs the contents of `src_dir` into `dest`, optionally piping
/// through a codec.
///
/// `-C` pins the member paths to the staged root; the invocation does not
/// depend on any working directory.
pub(crate) fn pack_dir(
    runner: &dyn ToolRunner,
    src_dir: &Path,
    dest: &Path,
    codec: Option<Codec>,
) -> Result<()> {
    let mut args = vec!["-c".to_string()];
    if let Some(codec) = codec {
        let flag = codec
            .tar_flag()
            .ok_or_else(|| Error::unsupported_spec(path_arg(dest)))?;
        args.push(flag.to_string());
    }
    args.push("-f".to_string());
    args.push(path_arg(dest));
    args.push("-C".to_string());
    args.push(path_arg(src_dir));
    args.push(".".to_string());

    run_tool(runner, "tar", &args, src_dir)?;
    Ok(())
}
