//! Corpus data model and the archive spec catalog.
//!
//! The ordered list returned by [`corpus_specs`] is the single source of
//! truth for the whole corpus: the preflight tool check, the build loop,
//! and the manifest are all derived from it. Nothing else enumerates
//! artifacts, so the manifest can never drift from what a run produces.
//!
//! Specs that nest other archives appear after the specs that produce
//! their inputs, which makes iterating the catalog in order sufficient to
//! satisfy the inner-before-outer build dependency.

pub mod manifest;

/// Compression codec used by tar layers and single-file specs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    /// gzip / DEFLATE
    Gzip,
    /// bzip2
    Bzip2,
    /// xz / LZMA2
    Xz,
    /// Zstandard
    Zstd,
    /// LZ4
    Lz4,
}

impl Codec {
    /// Name of the external tool implementing this codec
    pub fn tool(&self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
            Self::Zstd => "zstd",
            Self::Lz4 => "lz4",
        }
    }

    /// The `tar` flag selecting this codec, if tar supports it natively
    pub fn tar_flag(&self) -> Option<&'static str> {
        match self {
            Self::Gzip => Some("-z"),
            Self::Bzip2 => Some("-j"),
            Self::Xz => Some("-J"),
            Self::Zstd => Some("--zstd"),
            Self::Lz4 => None,
        }
    }
}

/// Class of archive/compression technique sharing one external tool and
/// flag set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatFamily {
    /// PKZIP container
    Zip,
    /// Plain POSIX tar
    Tar,
    /// tar piped through a compression codec
    TarCodec(Codec),
    /// A single compressed file, no container
    SingleCodec(Codec),
    /// 7-Zip container
    SevenZ,
    /// Unix ar(1) archive
    Ar,
}

impl FormatFamily {
    /// External tools this family invokes.
    ///
    /// Compressed tar needs both `tar` and the codec binary, since tar
    /// runs the codec as a child filter.
    pub fn tools(&self) -> Vec<&'static str> {
        match self {
            Self::Zip => vec!["zip"],
            Self::Tar => vec!["tar"],
            Self::TarCodec(codec) => vec!["tar", codec.tool()],
            Self::SingleCodec(codec) => vec![codec.tool()],
            Self::SevenZ => vec!["7z"],
            Self::Ar => vec!["ar"],
        }
    }

    /// Manifest group heading for this family
    pub fn group(&self) -> &'static str {
        match self {
            Self::Zip => "ZIP archives",
            Self::Tar | Self::TarCodec(_) => "TAR archives",
            Self::SingleCodec(_) => "Single-file compression",
            Self::SevenZ => "7-Zip archives",
            Self::Ar => "AR archives",
        }
    }
}

/// Compression level applied when the format supports one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// Store only, no compression
    None,
    /// The tool's default level
    #[default]
    Default,
    /// The tool's maximum level
    Maximum,
}

/// What a spec packs: staged paths, prior artifacts, or a synthesized
/// edge-case input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceSelector {
    /// The whole staged tree, directories included
    WholeTree,
    /// Exactly one staged file, by path relative to the staged root
    SingleFile(&'static str),
    /// Staged regular files flattened to their basenames (for formats
    /// without directory entries)
    RegularFilesFlattened,
    /// Copies of already-built artifacts, by artifact file name
    Artifacts(&'static [&'static str]),
    /// The three-level archive-in-archive composition
    DeepNesting,
    /// A placeholder entry that is added and then deleted again, leaving
    /// a structurally valid container with zero members
    Placeholder,
    /// A small tree of empty directories, no files
    EmptyDirectories,
    /// Files whose names contain whitespace and non-ASCII characters
    SpecialNames,
    /// A large single-byte-fill input at an extreme compression ratio
    UniformBlob,
}

/// Specification of one artifact in the corpus.
///
/// Identity is `name`, unique within the catalog.
#[derive(Debug, Clone)]
pub struct ArchiveSpec {
    /// Output file name, including the full extension
    pub name: &'static str,
    /// Format family, which fixes the tool and flag set
    pub family: FormatFamily,
    /// Compression level, where the format supports one
    pub compression: Compression,
    /// Password for encrypting containers; recorded out-of-band in the
    /// manifest, never inside the archive
    pub password: Option<&'static str>,
    /// What this spec packs
    pub selector: SourceSelector,
    /// Human description for the manifest
    pub description: &'static str,
}

impl ArchiveSpec {
    /// Creates a spec with default compression and no password
    pub fn new(
        name: &'static str,
        family: FormatFamily,
        selector: SourceSelector,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            family,
            compression: Compression::Default,
            password: None,
            selector,
            description,
        }
    }

    /// Sets the compression level
    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Sets the archive password
    pub fn password(mut self, password: &'static str) -> Self {
        self.password = Some(password);
        self
    }

    /// Derives the manifest descriptor for this spec
    pub fn descriptor(&self) -> ArchiveDescriptor {
        ArchiveDescriptor {
            file_name: self.name.to_string(),
            family: self.family,
            description: self.description.to_string(),
            password: self.password,
        }
    }
}

/// The on-disk result of building one spec
#[derive(Debug, Clone)]
pub struct ArchiveArtifact {
    /// Output file name
    pub file_name: String,
    /// Size in bytes
    pub bytes: u64,
}

/// Manifest entry describing one produced artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveDescriptor {
    /// Output file name
    pub file_name: String,
    /// Format family, used for manifest grouping
    pub family: FormatFamily,
    /// Human description
    pub description: String,
    /// Recorded password, if the artifact is encrypted
    pub password: Option<&'static str>,
}

/// Password for the encrypted ZIP spec, recorded in the manifest
pub const ZIP_PASSWORD: &str = "s3cr3t";

/// The ordered archive spec catalog for one corpus run.
pub fn corpus_specs() -> Vec<ArchiveSpec> {
    use Codec::*;
    use FormatFamily::*;
    use SourceSelector::*;

    vec![
        ArchiveSpec::new("basic.zip", Zip, WholeTree, "complete staged tree, default compression"),
        ArchiveSpec::new("no-compression.zip", Zip, WholeTree, "staged tree stored without compression")
            .compression(Compression::None),
        ArchiveSpec::new("max-compression.zip", Zip, WholeTree, "staged tree at maximum compression")
            .compression(Compression::Maximum),
        ArchiveSpec::new("encrypted.zip", Zip, WholeTree, "staged tree encrypted with ZipCrypto")
            .password(ZIP_PASSWORD),
        ArchiveSpec::new("archive.tar", Tar, WholeTree, "uncompressed tarball of the staged tree"),
        ArchiveSpec::new("archive.tar.gz", TarCodec(Gzip), WholeTree, "gzip-compressed tarball"),
        ArchiveSpec::new("archive.tgz", TarCodec(Gzip), WholeTree, "gzip-compressed tarball, historical extension"),
        ArchiveSpec::new("archive.tar.bz2", TarCodec(Bzip2), WholeTree, "bzip2-compressed tarball"),
        ArchiveSpec::new("archive.tbz2", TarCodec(Bzip2), WholeTree, "bzip2-compressed tarball, historical extension"),
        ArchiveSpec::new("archive.tar.xz", TarCodec(Xz), WholeTree, "xz-compressed tarball"),
        ArchiveSpec::new("archive.txz", TarCodec(Xz), WholeTree, "xz-compressed tarball, historical extension"),
        ArchiveSpec::new("archive.tar.zst", TarCodec(Zstd), WholeTree, "zstd-compressed tarball"),
        ArchiveSpec::new("hello.txt.gz", SingleCodec(Gzip), SingleFile("hello.txt"), "single file compressed with gzip"),
        ArchiveSpec::new("hello.txt.bz2", SingleCodec(Bzip2), SingleFile("hello.txt"), "single file compressed with bzip2"),
        ArchiveSpec::new("hello.txt.xz", SingleCodec(Xz), SingleFile("hello.txt"), "single file compressed with xz"),
        ArchiveSpec::new("hello.txt.zst", SingleCodec(Zstd), SingleFile("hello.txt"), "single file compressed with zstd"),
        ArchiveSpec::new("hello.txt.lz4", SingleCodec(Lz4), SingleFile("hello.txt"), "single file compressed with lz4"),
        ArchiveSpec::new("archive.ar", Ar, RegularFilesFlattened, "Unix ar archive of the staged regular files"),
        ArchiveSpec::new("archive.7z", SevenZ, WholeTree, "7-Zip archive of the staged tree, default settings"),
        ArchiveSpec::new(
            "nested.zip",
            Zip,
            Artifacts(&["basic.zip", "archive.tar.gz"]),
            "ZIP whose members are other archives",
        ),
        ArchiveSpec::new(
            "nested.tar.gz",
            TarCodec(Gzip),
            Artifacts(&["basic.zip", "archive.tar.gz"]),
            "gzip tarball whose members are other archives",
        ),
        ArchiveSpec::new(
            "deeply-nested.zip",
            Zip,
            DeepNesting,
            "three ZIP levels, one plain file per level",
        ),
        ArchiveSpec::new("empty.zip", Zip, Placeholder, "structurally valid archive with zero entries"),
        ArchiveSpec::new("empty-dirs.zip", Zip, EmptyDirectories, "archive containing only empty directories"),
        ArchiveSpec::new(
            "special-chars.zip",
            Zip,
            SpecialNames,
            "file names with spaces and non-ASCII characters",
        ),
        ArchiveSpec::new(
            "potential-bomb.zip",
            Zip,
            UniformBlob,
            "highly compressible uniform input at maximum compression",
        )
        .compression(Compression::Maximum),
    ]
}

/// All external tools the given specs require, deduplicated in first-use
/// order.
pub fn required_tools(specs: &[ArchiveSpec]) -> Vec<&'static str> {
    let mut tools = Vec::new();
    for spec in specs {
        for tool in spec.family.tools() {
            if !tools.contains(&tool) {
                tools.push(tool);
            }
        }
    }
    tools
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_spec_names_are_unique() {
        let specs = corpus_specs();
        let mut names: Vec<_> = specs.iter().map(|s| s.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), specs.len());
    }

    #[test]
    fn test_catalog_is_stable_across_calls() {
        let first: Vec<_> = corpus_specs().iter().map(|s| s.name).collect();
        let second: Vec<_> = corpus_specs().iter().map(|s| s.name).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_nesting_inputs_precede_nesting_specs() {
        let specs = corpus_specs();
        let index_of = |name: &str| specs.iter().position(|s| s.name == name).unwrap();

        for spec in &specs {
            if let SourceSelector::Artifacts(inputs) = spec.selector {
                for input in inputs {
                    assert!(
                        index_of(input) < index_of(spec.name),
                        "{} must be built before {}",
                        input,
                        spec.name
                    );
                }
            }
        }
    }

    #[test]
    fn test_required_tools_cover_all_families() {
        let specs = corpus_specs();
        let tools = required_tools(&specs);
        for expected in ["zip", "tar", "gzip", "bzip2", "xz", "zstd", "lz4", "7z", "ar"] {
            assert!(tools.contains(&expected), "missing required tool {expected}");
        }
        // Deduplicated
        let mut sorted = tools.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), tools.len());
    }

    #[test]
    fn test_alternate_extensions_are_separate_specs() {
        let specs = corpus_specs();
        for (canonical, alternate) in [
            ("archive.tar.gz", "archive.tgz"),
            ("archive.tar.bz2", "archive.tbz2"),
            ("archive.tar.xz", "archive.txz"),
        ] {
            let a = specs.iter().find(|s| s.name == canonical).unwrap();
            let b = specs.iter().find(|s| s.name == alternate).unwrap();
            assert_eq!(a.family, b.family);
            assert_eq!(a.selector, b.selector);
        }
    }

    #[test]
    fn test_encrypted_spec_records_password() {
        let specs = corpus_specs();
        let encrypted = specs.iter().find(|s| s.name == "encrypted.zip").unwrap();
        assert_eq!(encrypted.password, Some(ZIP_PASSWORD));
        assert_eq!(encrypted.descriptor().password, Some(ZIP_PASSWORD));
    }

    #[test]
    fn test_tar_codec_requires_codec_binary() {
        assert_eq!(
            FormatFamily::TarCodec(Codec::Zstd).tools(),
            vec!["tar", "zstd"]
        );
    }

    #[test]
    fn test_lz4_has_no_tar_flag() {
        assert_eq!(Codec::Lz4.tar_flag(), None);
        assert_eq!(Codec::Xz.tar_flag(), Some("-J"));
    }
}
