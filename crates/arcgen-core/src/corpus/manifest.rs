//! Manifest rendering.
//!
//! The manifest is derived purely from the descriptors of artifacts the
//! run actually produced plus the staged-tree layout, so its content can
//! be tested without invoking a single archiver. It deliberately contains
//! nothing run-specific (no timestamps, no absolute paths): two runs into
//! two clean directories render byte-identical manifests.

use super::ArchiveDescriptor;
use crate::staging::{ContentKind, StagedTree};
use std::fmt::Write;

/// File name of the manifest inside the output directory
pub const MANIFEST_FILE: &str = "README.md";

/// Renders the corpus manifest.
///
/// Artifacts are grouped by format family in first-appearance order.
/// Only descriptors passed in are mentioned; the renderer has no
/// built-in artifact list to drift out of sync.
pub fn render(descriptors: &[ArchiveDescriptor], tree: &StagedTree) -> String {
    let mut out = String::new();

    out.push_str("# Test archive corpus\n\n");
    out.push_str(
        "Archive fixtures for exercising archive extractors. Every artifact is \
         produced by the standard command-line tool for its format, so each one \
         opens with the matching standard extractor.\n\n",
    );

    out.push_str("## Regeneration\n\n");
    out.push_str("```\narcgen [OUTPUT_DIR]\n```\n\n");
    let _ = writeln!(
        out,
        "`OUTPUT_DIR` defaults to `{}/`. Re-running into a clean directory \
         yields the same artifact set and the same manifest; exact compressed \
         bytes may differ between runs because two staged files are \
         pseudo-random and tool versions are not pinned.\n",
        crate::pipeline::DEFAULT_OUTPUT_DIR,
    );

    out.push_str("## Staged source layout\n\n");
    out.push_str(
        "Archives pack this tree unless their description says otherwise. \
         The staged tree itself is deleted once generation finishes.\n\n",
    );
    for file in tree.files() {
        let kind = match file.kind() {
            ContentKind::LiteralText => "text",
            ContentKind::PseudoRandom => "pseudo-random",
        };
        let _ = writeln!(out, "- `{}` ({} bytes, {})", file.rel_path(), file.size(), kind);
    }
    for dir in tree.empty_dirs() {
        let _ = writeln!(out, "- `{dir}/` (empty directory)");
    }
    out.push('\n');

    out.push_str("## Artifacts\n");
    for group in groups(descriptors) {
        let _ = write!(out, "\n### {group}\n\n");
        for descriptor in descriptors.iter().filter(|d| d.family.group() == group) {
            let _ = writeln!(out, "- `{}`: {}", descriptor.file_name, descriptor.description);
        }
    }

    let encrypted: Vec<_> = descriptors.iter().filter(|d| d.password.is_some()).collect();
    if !encrypted.is_empty() {
        out.push_str("\n## Passwords\n\n");
        for descriptor in encrypted {
            if let Some(password) = descriptor.password {
                let _ = writeln!(out, "- `{}`: `{}`", descriptor.file_name, password);
            }
        }
    }

    out
}

/// Group headings in first-appearance order
fn groups(descriptors: &[ArchiveDescriptor]) -> Vec<&'static str> {
    let mut seen = Vec::new();
    for descriptor in descriptors {
        let group = descriptor.family.group();
        if !seen.contains(&group) {
            seen.push(group);
        }
    }
    seen
}
