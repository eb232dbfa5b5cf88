//! # arcgen-core
//!
//! A library for generating a deterministic corpus of archive files used
//! to validate archive-extraction code.
//!
//! The corpus spans compression formats (ZIP, tar with several codecs,
//! single-file codecs, 7-Zip, ar) and structural edge cases (nested
//! archives, an empty archive, empty-directories-only, special-character
//! file names, a compression-bomb candidate). Every artifact is built by
//! the standard external tool for its format, so each one is guaranteed
//! to open with the matching standard extractor.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`corpus`]: The archive spec catalog, data model, and manifest renderer
//! - [`staging`]: The deterministic source tree all archivers consume
//! - [`builder`]: Per-format construction by invoking external tools
//! - [`tool`]: The external tool invocation capability
//! - [`pipeline`]: Sequential stage orchestration and cleanup
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```no_run
//! use arcgen_core::{generate, SystemToolRunner};
//! use std::path::Path;
//!
//! let report = generate(Path::new("test-archives"), &SystemToolRunner)?;
//! for descriptor in &report.descriptors {
//!     println!("{}", descriptor.file_name);
//! }
//! # Ok::<(), arcgen_core::Error>(())
//! ```
//!
//! ## Extensibility
//!
//! The library provides two traits for customization:
//!
//! - [`ToolRunner`]: Customize how external tools are invoked
//! - [`BuildStrategy`]: Replace tool invocation with in-process codecs
//!

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod builder;
pub mod corpus;
pub mod error;
pub mod pipeline;
pub mod staging;
pub mod tool;

// Re-export primary types for convenience
pub use builder::{BuildStrategy, ToolBuilder};
pub use corpus::manifest::MANIFEST_FILE;
pub use corpus::{
    corpus_specs, required_tools, ArchiveArtifact, ArchiveDescriptor, ArchiveSpec, Codec,
    Compression, FormatFamily, SourceSelector, ZIP_PASSWORD,
};
pub use error::{Error, Result};
pub use pipeline::{generate, CorpusReport, DEFAULT_OUTPUT_DIR};
pub use staging::{stage, StagedTree};
pub use tool::{SystemToolRunner, ToolRunner};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
