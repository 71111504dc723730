use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use porter_logging::porter_info;
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::{Artifact, SavedArtifact};

const FALLBACK_FILE_NAME: &str = "artifact.zip";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// Saves downloaded artifacts into one directory, replacing files of the same name.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes to a temp file in the target directory, then renames it into place.
    ///
    /// The temp file is removed when dropped, so a failed write leaves nothing behind.
    pub fn save(&self, file_name: &str, artifact: &Artifact) -> Result<SavedArtifact, PersistError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(sanitize_file_name(file_name));
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&artifact.bytes)?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // persist renames over an existing file.
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;

        let saved = SavedArtifact {
            path: target,
            byte_len: artifact.bytes.len() as u64,
            sha256_prefix: short_digest(&artifact.bytes),
        };
        porter_info!(
            "Saved artifact {:?} ({} bytes, {}, sha256 {})",
            saved.path,
            saved.byte_len,
            artifact.content_type.as_deref().unwrap_or("no content type"),
            saved.sha256_prefix
        );
        Ok(saved)
    }
}

/// Makes `name` safe to use as a single path component on every platform.
pub fn sanitize_file_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let mut cleaned = replaced
        .trim_start_matches(&['.', ' '][..])
        .trim_end_matches(&['.', ' '][..])
        .to_string();
    if cleaned.is_empty() {
        return FALLBACK_FILE_NAME.to_string();
    }
    let stem_len = cleaned.find('.').unwrap_or(cleaned.len());
    if is_reserved_windows_name(&cleaned[..stem_len]) {
        cleaned.insert(stem_len, '_');
    }
    cleaned
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}

/// First four bytes of the SHA-256 digest, hex encoded.
pub fn short_digest(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut hex = String::with_capacity(8);
    for byte in digest.iter().take(4) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_ordinary_names() {
        assert_eq!(sanitize_file_name("16-widget.zip"), "16-widget.zip");
        assert_eq!(sanitize_file_name("Razor-Pages-Analysis.zip"), "Razor-Pages-Analysis.zip");
    }

    #[test]
    fn strips_path_tricks() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(sanitize_file_name("a\\b:c.zip"), "a_b_c.zip");
        assert_eq!(sanitize_file_name(" . "), "artifact.zip");
    }

    #[test]
    fn guards_reserved_device_names() {
        assert_eq!(sanitize_file_name("con.zip"), "con_.zip");
        assert_eq!(sanitize_file_name("NUL"), "NUL_");
    }

    #[test]
    fn short_digest_is_stable() {
        assert_eq!(short_digest(b""), "e3b0c442");
        assert_eq!(short_digest(b"abc"), "ba7816bf");
    }
}
