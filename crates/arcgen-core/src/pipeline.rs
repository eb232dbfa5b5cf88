//! The corpus generation pipeline.
//!
//! Stages run strictly in sequence, each blocking and fail-fast:
//! argument validation → tool preflight → staging → per-spec builds →
//! manifest → cleanup. The first error aborts the run; later stages do
//! not execute, already-written files are deliberately left in place for
//! inspection, and no manifest exists for a failed run.

use crate::builder::{BuildStrategy, ToolBuilder};
use crate::corpus::manifest;
use crate::corpus::{corpus_specs, required_tools, ArchiveDescriptor};
use crate::error::{Error, Result};
use crate::staging::{self, StagedTree};
use crate::tool::{preflight, ToolRunner};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default output directory when the caller does not name one
pub const DEFAULT_OUTPUT_DIR: &str = "test-archives";

/// Summary of one successful corpus run
#[derive(Debug)]
pub struct CorpusReport {
    /// Canonicalized output directory
    pub out_dir: PathBuf,
    /// Descriptors of every artifact produced, in build order
    pub descriptors: Vec<ArchiveDescriptor>,
    /// Path of the written manifest
    pub manifest_path: PathBuf,
}

/// Runs the whole pipeline, generating the corpus into `out_dir`.
///
/// Nothing is written before the output-directory argument validates and
/// every required external tool resolves. On success the output
/// directory holds exactly the artifacts plus the manifest; all staging
/// directories are gone.
pub fn generate(out_dir: &Path, runner: &dyn ToolRunner) -> Result<CorpusReport> {
    validate_output_dir(out_dir)?;

    let specs = corpus_specs();
    let tools = required_tools(&specs);
    info!("checking {} required external tools", tools.len());
    preflight(runner, &tools)?;

    fs::create_dir_all(out_dir).map_err(|e| Error::directory_create(out_dir, e))?;
    // Absolute from here on: builders set per-invocation working
    // directories, so relative destinations would silently break.
    let out_dir = fs::canonicalize(out_dir).map_err(|e| Error::directory_create(out_dir, e))?;

    info!("staging source tree under {}", out_dir.display());
    let tree = staging::stage(&out_dir)?;

    let mut builder = ToolBuilder::new(runner, &tree, &out_dir);
    let mut descriptors = Vec::with_capacity(specs.len());
    for spec in &specs {
        info!("building {}", spec.name);
        let artifact = builder.build(spec)?;
        debug!("built {} ({} bytes)", artifact.file_name, artifact.bytes);
        descriptors.push(spec.descriptor());
    }

    let manifest_path = out_dir.join(manifest::MANIFEST_FILE);
    fs::write(&manifest_path, manifest::render(&descriptors, &tree))
        .map_err(|e| Error::file_write(&manifest_path, e))?;
    info!("wrote manifest {}", manifest_path.display());

    cleanup(&tree, builder.work_root())?;
    info!("generated {} artifacts", descriptors.len());

    Ok(CorpusReport {
        out_dir,
        descriptors,
        manifest_path,
    })
}

/// Rejects unusable output-directory arguments before anything runs.
fn validate_output_dir(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(Error::invalid_output_dir(path, "path is empty"));
    }
    if path.exists() && !path.is_dir() {
        return Err(Error::invalid_output_dir(path, "exists and is not a directory"));
    }
    Ok(())
}

/// Removes every staging directory, leaving only artifacts and the
/// manifest.
fn cleanup(tree: &StagedTree, work_root: &Path) -> Result<()> {
    for dir in [tree.root(), work_root] {
        if dir.exists() {
            fs::remove_dir_all(dir).map_err(|e| Error::directory_remove(dir, e))?;
            debug!("removed staging directory {}", dir.display());
        }
    }
    Ok(())
}
