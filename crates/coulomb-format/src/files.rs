//! Saving to and loading from a directory.
//!
//! Save never overwrites: an empty name, or a name already taken in the
//! target directory, is replaced by a timestamped default. A taken
//! default gets a numeric suffix (`simulation-...-2.txt`).

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::{debug, warn};

use crate::error::FormatError;
use crate::reader::read_document;
use crate::types::Document;
use crate::writer::write_document;

/// strftime pattern of default file names.
const DEFAULT_NAME_FORMAT: &str = "simulation-%H-%M-%S-%d-%m-%Y.txt";

/// Default file name for a save made at `now`.
pub fn default_file_name(now: DateTime<Local>) -> String {
    now.format(DEFAULT_NAME_FORMAT).to_string()
}

/// Pick the path a save of `name` into `dir` will write to.
pub fn resolve_save_path(dir: &Path, name: &str) -> PathBuf {
    let name = name.trim();
    if name.is_empty() {
        return free_default_path(dir, Local::now());
    }
    let requested = dir.join(name);
    if requested.exists() {
        let fallback = free_default_path(dir, Local::now());
        warn!(
            "{} already exists, saving as {}",
            requested.display(),
            fallback.display()
        );
        return fallback;
    }
    requested
}

/// First path in `dir` not yet taken: the default name for `now`, then
/// the same name suffixed `-2`, `-3`, and so on.
fn free_default_path(dir: &Path, now: DateTime<Local>) -> PathBuf {
    let name = default_file_name(now);
    let first = dir.join(&name);
    if !first.exists() {
        return first;
    }
    let stem = name.strip_suffix(".txt").unwrap_or(&name);
    (2u32..)
        .map(|n| dir.join(format!("{stem}-{n}.txt")))
        .find(|path| !path.exists())
        .unwrap_or(first)
}

/// Locate `name` in `dir` for loading.
pub fn resolve_load_path(dir: &Path, name: &str) -> Result<PathBuf, FormatError> {
    let path = dir.join(name.trim());
    if name.trim().is_empty() || !path.is_file() {
        return Err(FormatError::FileNotFound { path });
    }
    Ok(path)
}

/// Save `doc` as `name` in `dir`, returning the path written.
pub fn save(dir: &Path, name: &str, doc: &Document) -> Result<PathBuf, FormatError> {
    let path = resolve_save_path(dir, name);
    let file = File::create(&path)?;
    write_document(BufWriter::new(file), doc)?;
    debug!(
        "saved {} particles to {}",
        doc.particles.len(),
        path.display()
    );
    Ok(path)
}

/// Load the document stored as `name` in `dir`.
pub fn load(dir: &Path, name: &str) -> Result<Document, FormatError> {
    let path = resolve_load_path(dir, name)?;
    let file = File::open(&path)?;
    let doc = read_document(BufReader::new(file))?;
    debug!(
        "loaded {} particles from {}",
        doc.particles.len(),
        path.display()
    );
    Ok(doc)
}
