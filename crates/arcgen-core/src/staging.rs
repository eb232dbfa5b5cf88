//! Staging of the deterministic source tree.
//!
//! Every archiver in the corpus packs the same staged input: a small
//! directory of text files, two pseudo-random binary blobs of different
//! magnitudes (for compression-timing diversity), a multi-level nested
//! directory with a file at each level, and one genuinely empty directory.
//!
//! The tree is built once per run and is immutable afterwards: builders
//! only ever read from it, and the cleanup stage deletes it after the
//! manifest has been written.

use crate::error::{Error, Result};
use rand::RngCore;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the staged source directory inside the output directory
pub const SOURCE_DIR: &str = "source";

/// Relative path of the staged file used by all single-file codec specs
pub const SINGLE_FILE_SOURCE: &str = "hello.txt";

/// Content of `hello.txt`; downstream content assertions depend on this
/// exact byte string.
pub const HELLO_CONTENT: &str = "Hello, World!\n";

/// Size of the small pseudo-random blob
const BINARY_BLOB_LEN: usize = 10 * 1024;

/// Size of the large pseudo-random blob
const LARGE_BLOB_LEN: usize = 1024 * 1024;

/// What a staged file contains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Fixed literal text, identical across runs
    LiteralText,
    /// Pseudo-random bytes; size is fixed, payload varies per run
    PseudoRandom,
}

/// One regular file in the staged tree
#[derive(Debug, Clone)]
pub struct StagedFile {
    rel_path: &'static str,
    kind: ContentKind,
    size: u64,
}

impl StagedFile {
    /// Path of this file relative to the staged root
    pub fn rel_path(&self) -> &'static str {
        self.rel_path
    }

    /// Content kind of this file
    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    /// Size in bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Final path component of this file
    pub fn file_name(&self) -> &'static str {
        self.rel_path
            .rsplit('/')
            .next()
            .unwrap_or(self.rel_path)
    }
}

/// The staged source tree, built once per run.
///
/// Immutable by construction: all fields are private and only read
/// accessors are exposed.
#[derive(Debug)]
pub struct StagedTree {
    root: PathBuf,
    files: Vec<StagedFile>,
    empty_dirs: Vec<&'static str>,
}

impl StagedTree {
    /// Absolute root of the staged tree
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All regular files, in creation order
    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    /// Relative paths of the explicitly empty directories
    pub fn empty_dirs(&self) -> &[&'static str] {
        &self.empty_dirs
    }

    /// Absolute path of a staged file by its relative path
    pub fn path_of(&self, rel_path: &str) -> PathBuf {
        self.root.join(rel_path)
    }
}

/// Materializes the staged source tree under `out_dir`.
///
/// Fails with an I/O error if the directory cannot be created or written;
/// this is fatal to the whole run.
pub fn stage(out_dir: &Path) -> Result<StagedTree> {
    let root = out_dir.join(SOURCE_DIR);
    fs::create_dir_all(&root).map_err(|e| Error::directory_create(&root, e))?;
    debug!("staging source tree in {}", root.display());

    let text_files: &[(&'static str, &'static str)] = &[
        (SINGLE_FILE_SOURCE, HELLO_CONTENT),
        (
            "test.txt",
            "This is a test file for archive extraction.\n\
             It contains a couple of lines of plain text.\n",
        ),
        ("nested/nested-file.txt", "nested level one\n"),
        ("nested/deep/deeper-file.txt", "nested level two\n"),
        (
            "nested/deep/path/deep-file.txt",
            "This file lives three directories down.\n",
        ),
    ];

    let mut files = Vec::new();
    for &(rel_path, content) in text_files {
        write_file(&root, rel_path, content.as_bytes())?;
        files.push(StagedFile {
            rel_path,
            kind: ContentKind::LiteralText,
            size: content.len() as u64,
        });
    }

    for (rel_path, len) in [("binary.bin", BINARY_BLOB_LEN), ("large-file.bin", LARGE_BLOB_LEN)] {
        let mut blob = vec![0u8; len];
        rand::thread_rng().fill_bytes(&mut blob);
        write_file(&root, rel_path, &blob)?;
        files.push(StagedFile {
            rel_path,
            kind: ContentKind::PseudoRandom,
            size: len as u64,
        });
    }

    let empty_dirs = vec!["empty-dir"];
    for rel_path in &empty_dirs {
        let dir = root.join(rel_path);
        fs::create_dir_all(&dir).map_err(|e| Error::directory_create(&dir, e))?;
    }

    debug!(
        "staged {} files and {} empty directories",
        files.len(),
        empty_dirs.len()
    );

    Ok(StagedTree {
        root,
        files,
        empty_dirs,
    })
}

fn write_file(root: &Path, rel_path: &str, content: &[u8]) -> Result<()> {
    let path = root.join(rel_path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::directory_create(parent, e))?;
    }
    fs::write(&path, content).map_err(|e| Error::file_write(&path, e))
}
