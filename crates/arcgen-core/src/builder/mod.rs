//! Archive construction.
//!
//! Each format family is built by invoking its standard external tool with
//! documented flags; the construction rules live in the per-family
//! submodules. The [`BuildStrategy`] trait is the capability the pipeline
//! depends on; [`ToolBuilder`] is the shipped implementation, and an
//! alternative is free to use in-process codec libraries instead.
//!
//! Builders take explicit source and destination paths and set the child
//! process working directory per invocation; nothing here reads or
//! mutates the ambient working directory.

mod codec;
mod edge;
mod misc;
mod nested;
mod tar;
mod zip;

use crate::corpus::{ArchiveArtifact, ArchiveSpec, FormatFamily, SourceSelector};
use crate::error::{Error, Result};
use crate::staging::StagedTree;
use crate::tool::{run_checked, ToolRunner};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Output;
use tracing::debug;

/// Name of the scratch directory for intermediate inputs, created inside
/// the output directory and removed by the cleanup stage
pub const WORK_DIR: &str = ".work";

/// Capability for turning one [`ArchiveSpec`] into an on-disk artifact.
pub trait BuildStrategy {
    /// Builds the artifact for `spec`, returning its descriptor-level
    /// attributes. Any tool failure is fatal; no partial artifact is
    /// considered valid.
    fn build(&mut self, spec: &ArchiveSpec) -> Result<ArchiveArtifact>;
}

/// Builds artifacts by shelling out to the standard tool per format
/// family.
pub struct ToolBuilder<'a> {
    runner: &'a dyn ToolRunner,
    tree: &'a StagedTree,
    out_dir: &'a Path,
    work_root: PathBuf,
}

impl<'a> ToolBuilder<'a> {
    /// Creates a builder writing artifacts into `out_dir`.
    ///
    /// `out_dir` must be absolute so that destination paths stay valid
    /// regardless of each tool invocation's working directory.
    pub fn new(runner: &'a dyn ToolRunner, tree: &'a StagedTree, out_dir: &'a Path) -> Self {
        Self {
            runner,
            tree,
            out_dir,
            work_root: out_dir.join(WORK_DIR),
        }
    }

    /// Root of the scratch directories this builder created; the cleanup
    /// stage removes it
    pub fn work_root(&self) -> &Path {
        &self.work_root
    }

    /// Absolute destination path of an artifact by file name
    fn dest(&self, name: &str) -> PathBuf {
        self.out_dir.join(name)
    }

    /// Creates (or reuses) a named scratch directory under the work root
    fn scratch(&mut self, name: &str) -> Result<PathBuf> {
        let dir = self.work_root.join(name);
        fs::create_dir_all(&dir).map_err(|e| Error::directory_create(&dir, e))?;
        Ok(dir)
    }

    /// Resolves a previously built artifact used as a nesting input
    fn input_artifact(&self, name: &str) -> Result<PathBuf> {
        let path = self.dest(name);
        if !path.is_file() {
            return Err(Error::missing_artifact(name));
        }
        Ok(path)
    }

    /// Reads back size attributes of a freshly built artifact
    fn artifact(&self, name: &str) -> Result<ArchiveArtifact> {
        let path = self.dest(name);
        let metadata = fs::metadata(&path).map_err(|e| Error::file_read(&path, e))?;
        Ok(ArchiveArtifact {
            file_name: name.to_string(),
            bytes: metadata.len(),
        })
    }
}

impl BuildStrategy for ToolBuilder<'_> {
    fn build(&mut self, spec: &ArchiveSpec) -> Result<ArchiveArtifact> {
        debug!("building '{}' ({:?})", spec.name, spec.family);
        let dest = self.dest(spec.name);

        match (spec.selector, spec.family) {
            (SourceSelector::WholeTree, FormatFamily::Zip) => zip::pack_dir(
                self.runner,
                self.tree.root(),
                &dest,
                spec.compression,
                spec.password,
            )?,
            (SourceSelector::WholeTree, FormatFamily::Tar) => {
                tar::pack_dir(self.runner, self.tree.root(), &dest, None)?
            }
            (SourceSelector::WholeTree, FormatFamily::TarCodec(codec)) => {
                tar::pack_dir(self.runner, self.tree.root(), &dest, Some(codec))?
            }
            (SourceSelector::WholeTree, FormatFamily::SevenZ) => {
                misc::pack_7z(self.runner, self.tree.root(), &dest)?
            }
            (SourceSelector::SingleFile(rel_path), FormatFamily::SingleCodec(codec)) => {
                codec::compress_file(self.runner, codec, self.tree, rel_path, &dest)?
            }
            (SourceSelector::RegularFilesFlattened, FormatFamily::Ar) => {
                let scratch = self.scratch("ar-input")?;
                misc::pack_ar(self.runner, self.tree, &scratch, &dest)?
            }
            (SourceSelector::Artifacts(inputs), family) => {
                nested::shallow(self, inputs, family, &dest)?
            }
            (SourceSelector::DeepNesting, FormatFamily::Zip) => {
                let scratch = self.scratch("deep-nesting")?;
                nested::deep(self.runner, &scratch, &dest)?
            }
            (SourceSelector::Placeholder, FormatFamily::Zip) => {
                let scratch = self.scratch("empty-input")?;
                edge::empty_archive(self.runner, &scratch, &dest)?
            }
            (SourceSelector::EmptyDirectories, FormatFamily::Zip) => {
                let scratch = self.scratch("empty-dirs-input")?;
                edge::empty_dirs(self.runner, &scratch, &dest)?
            }
            (SourceSelector::SpecialNames, FormatFamily::Zip) => {
                let scratch = self.scratch("special-chars-input")?;
                edge::special_names(self.runner, &scratch, &dest)?
            }
            (SourceSelector::UniformBlob, FormatFamily::Zip) => {
                let scratch = self.scratch("bomb-input")?;
                edge::bomb(self.runner, &scratch, &dest, spec.compression)?
            }
            _ => return Err(Error::unsupported_spec(spec.name)),
        }

        self.artifact(spec.name)
    }
}

/// Runs a tool with owned arguments, failing on non-zero exit.
pub(crate) fn run_tool(
    runner: &dyn ToolRunner,
    tool: &str,
    args: &[String],
    cwd: &Path,
) -> Result<Output> {
    let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
    run_checked(runner, tool, &arg_refs, cwd)
}

/// Renders a path for use as a tool argument.
pub(crate) fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}


#[cfg(test)]
mod tests {
    use super::fixtures::staged_out;
    use super::*;
    use crate::corpus::{corpus_specs, Codec, Compression};
    use crate::tool::scripted::ScriptedRunner;
    use tempfile::TempDir;

    fn spec_named(name: &str) -> ArchiveSpec {
        corpus_specs()
            .into_iter()
            .find(|s| s.name == name)
            .unwrap_or_else(|| panic!("no spec named {name}"))
    }

    #[test]
    fn test_build_returns_artifact_attributes() {
        let temp = TempDir::new().unwrap();
        let (tree, out) = staged_out(&temp);
        let runner = ScriptedRunner::new();
        let mut builder = ToolBuilder::new(&runner, &tree, &out);

        let artifact = builder.build(&spec_named("basic.zip")).unwrap();
        assert_eq!(artifact.file_name, "basic.zip");
        assert!(out.join("basic.zip").is_file());
    }

    #[test]
    fn test_unsupported_combination_is_rejected() {
        let temp = TempDir::new().unwrap();
        let (tree, out) = staged_out(&temp);
        let runner = ScriptedRunner::new();
        let mut builder = ToolBuilder::new(&runner, &tree, &out);

        let bogus = ArchiveSpec::new(
            "bogus.ar",
            FormatFamily::Ar,
            SourceSelector::WholeTree,
            "ar cannot hold directories",
        );
        let err = builder.build(&bogus).unwrap_err();
        assert!(matches!(err, Error::UnsupportedSpec { ref name } if name == "bogus.ar"));
    }

    #[test]
    fn test_single_codec_requires_single_file_selector() {
        let temp = TempDir::new().unwrap();
        let (tree, out) = staged_out(&temp);
        let runner = ScriptedRunner::new();
        let mut builder = ToolBuilder::new(&runner, &tree, &out);

        let bogus = ArchiveSpec::new(
            "tree.gz",
            FormatFamily::SingleCodec(Codec::Gzip),
            SourceSelector::WholeTree,
            "gzip has no container format",
        );
        assert!(builder.build(&bogus).is_err());
    }

    #[test]
    fn test_whole_corpus_dispatches_without_unsupported_specs() {
        let temp = TempDir::new().unwrap();
        let (tree, out) = staged_out(&temp);
        let runner = ScriptedRunner::new();
        let mut builder = ToolBuilder::new(&runner, &tree, &out);

        for spec in corpus_specs() {
            let artifact = builder.build(&spec).unwrap();
            assert_eq!(artifact.file_name, spec.name);
        }
    }

    #[test]
    fn test_compression_levels_map_to_zip_flags() {
        let temp = TempDir::new().unwrap();
        let (tree, out) = staged_out(&temp);
        let runner = ScriptedRunner::new();
        let mut builder = ToolBuilder::new(&runner, &tree, &out);

        builder.build(&spec_named("no-compression.zip")).unwrap();
        builder.build(&spec_named("max-compression.zip")).unwrap();
        builder.build(&spec_named("basic.zip")).unwrap();

        let calls = runner.calls_for("zip");
        assert!(calls[0].args.contains(&"-0".to_string()));
        assert!(calls[1].args.contains(&"-9".to_string()));
        assert!(!calls[2].args.contains(&"-0".to_string()));
        assert!(!calls[2].args.contains(&"-9".to_string()));
        assert_eq!(
            spec_named("basic.zip").compression,
            Compression::Default
        );
    }
}
