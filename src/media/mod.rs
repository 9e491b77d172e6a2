use crate::error::Error;
use anyhow::Result;
use rand::seq::SliceRandom;
use std::path::{Path, PathBuf};
use tracing::info;

/// Kinds of media the store places, each under its own subdirectory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn dir_name(&self) -> &'static str {
        match self {
            MediaKind::Image => "images",
            MediaKind::Video => "videos",
        }
    }
}

/// Media store: places uploaded binary payloads under a directory tree
/// keyed by media kind, and picks existing files at random for seed
/// ingestion.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write a payload under the kind's directory, creating it if absent.
    /// The caller-supplied filename is sanitized so it cannot escape the
    /// target directory. Returns the forward-slash normalized path.
    pub async fn place(&self, kind: MediaKind, filename: &str, bytes: &[u8]) -> Result<String> {
        let safe_name = sanitize_filename(filename);
        if safe_name.is_empty() {
            return Err(Error::Validation(format!("Invalid filename: {}", filename)).into());
        }

        let dir = self.root.join(kind.dir_name());
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| Error::Io(format!("Failed to create media directory: {}", e)))?;

        let path = dir.join(&safe_name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| Error::Io(format!("Failed to write media file: {}", e)))?;

        info!("Stored {} file: {}", kind.dir_name(), safe_name);

        Ok(normalize_path(&path))
    }

    /// Place a file directly under the store root (generic upload)
    pub async fn place_at_root(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        let safe_name = sanitize_filename(filename);
        if safe_name.is_empty() {
            return Err(Error::Validation(format!("Invalid filename: {}", filename)).into());
        }

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| Error::Io(format!("Failed to create upload directory: {}", e)))?;

        let path = self.root.join(&safe_name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| Error::Io(format!("Failed to write uploaded file: {}", e)))?;

        Ok(normalize_path(&path))
    }
}

/// Pick one file from a directory uniformly at random. Used by synthetic
/// ingestion against the preconfigured seed directories.
pub async fn pick_random(dir: &Path) -> Result<String> {
    let mut entries = Vec::new();

    let mut read_dir = tokio::fs::read_dir(dir)
        .await
        .map_err(|_| Error::NotFound(format!("Media directory not found: {}", dir.display())))?;

    while let Some(entry) = read_dir
        .next_entry()
        .await
        .map_err(|e| Error::Io(format!("Failed to read media directory: {}", e)))?
    {
        if entry.path().is_file() {
            entries.push(entry.path());
        }
    }

    let picked = entries
        .choose(&mut rand::thread_rng())
        .ok_or_else(|| Error::NotFound(format!("No media files in {}", dir.display())))?;

    Ok(normalize_path(picked))
}

/// Strip path-traversal characters from a caller-supplied filename. Only
/// the final path component survives, reduced to ASCII alphanumerics,
/// dots, dashes and underscores.
pub fn sanitize_filename(filename: &str) -> String {
    let last = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = last
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();

    // a name of nothing but dots would still walk the tree
    if cleaned.chars().all(|c| c == '.') {
        return String::new();
    }

    cleaned
}

fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
