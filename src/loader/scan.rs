//! Directory scanning and extension filtering.

use log::{debug, warn};
use std::ffi::OsString;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;
use walkdir::WalkDir;

/// Extensions every build can decode.
pub const BASE_EXTENSIONS: [&str; 4] = [".jpg", ".jpeg", ".png", ".webp"];

/// Extension enabled when JPEG XL decoding is available.
pub const JXL_EXTENSION: &str = ".jxl";

/// Why a load produced no images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EmptyReason {
    /// Path is missing or not a directory
    #[error("directory not found")]
    NotADirectory,
    #[error("no files in directory")]
    NoEntries,
    #[error("no supported image files in directory")]
    NoSupportedFiles,
    #[error("no image in directory could be decoded")]
    NothingDecoded,
}

/// Whether this process can decode JPEG XL.
///
/// Resolved on first use and fixed for the life of the process.
pub fn jxl_supported() -> bool {
    static PROBE: OnceLock<bool> = OnceLock::new();
    *PROBE.get_or_init(|| {
        let supported = cfg!(feature = "jxl");
        debug!(
            "JPEG XL decoding {}",
            if supported { "enabled" } else { "unavailable" }
        );
        supported
    })
}

/// Extensions accepted by [`is_supported_name`], lowercase with the dot.
pub fn supported_extensions() -> Vec<&'static str> {
    let mut extensions = BASE_EXTENSIONS.to_vec();
    if jxl_supported() {
        extensions.push(JXL_EXTENSION);
    }
    extensions
}

/// Check a file name against the supported extensions, ignoring case.
pub fn is_supported_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    supported_extensions()
        .iter()
        .any(|ext| lower.ends_with(ext))
}

/// List the entries directly inside `directory` that carry a supported
/// extension, in the order the filesystem returns them.
///
/// Directories are not filtered out here. Every early exit is logged as a
/// warning and returned as an [`EmptyReason`].
pub fn scan_directory(directory: &Path) -> Result<Vec<OsString>, EmptyReason> {
    if !directory.is_dir() {
        return Err(report(directory, EmptyReason::NotADirectory));
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(directory).min_depth(1).max_depth(1) {
        match entry {
            Ok(entry) => entries.push(entry.file_name().to_os_string()),
            Err(err) => warn!("Failed to read entry in '{}': {}", directory.display(), err),
        }
    }

    if entries.is_empty() {
        return Err(report(directory, EmptyReason::NoEntries));
    }

    let total = entries.len();
    entries.retain(|name| is_supported_name(&name.to_string_lossy()));
    debug!(
        "Scanned '{}': {} of {} entries have a supported extension",
        directory.display(),
        entries.len(),
        total
    );

    if entries.is_empty() {
        return Err(report(directory, EmptyReason::NoSupportedFiles));
    }

    Ok(entries)
}

/// Log an empty-batch condition and hand the reason back.
pub(crate) fn report(directory: &Path, reason: EmptyReason) -> EmptyReason {
    warn!(
        "{} ('{}'). Returning empty outputs.",
        reason,
        directory.display()
    );
    reason
}
