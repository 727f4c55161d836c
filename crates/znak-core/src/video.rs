//! Resolution of video ids to playable files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A snapshot of the file names in the video directory.
#[derive(Debug, Clone, Default)]
pub struct VideoDirectory {
    dir: PathBuf,
    files: Vec<String>,
}

impl VideoDirectory {
    /// List `dir` once. Names are sorted so resolution does not depend on
    /// the platform's listing order.
    pub fn open(dir: &Path) -> io::Result<Self> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                files.push(name.to_string());
            }
        }
        files.sort();
        Ok(Self::from_files(dir, files))
    }

    pub fn from_files(dir: &Path, files: Vec<String>) -> Self {
        Self {
            dir: dir.to_path_buf(),
            files,
        }
    }

    /// A directory with no files; every id resolves to `None`.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// First file named `{video_id}.{ext}`, where `ext` is a single
    /// non-empty extension.
    pub fn resolve(&self, video_id: &str) -> Option<PathBuf> {
        self.files
            .iter()
            .find(|name| {
                name.strip_prefix(video_id)
                    .and_then(|rest| rest.strip_prefix('.'))
                    .is_some_and(|ext| !ext.is_empty() && !ext.contains('.'))
            })
            .map(|name| self.dir.join(name))
    }
}
