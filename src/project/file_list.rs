//! `verible.filelist` discovery and parsing.
//!
//! A file list is a plain text file: one source path per line, with
//! `+incdir+dir1+dir2` lines adding include directories. Blank lines and
//! lines starting with `#` or `//` are ignored.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::FileListError;
use super::fs::{FileSystem, normalize_path};

/// Default name of the project file list.
pub const FILE_LIST_NAME: &str = "verible.filelist";

/// Walk from `start_dir` up to the filesystem root looking for `name`.
///
/// `start_dir` itself is searched first. Returns the path of the first
/// match, or `None` once the root has been checked.
pub fn find_file_upwards(fs: &dyn FileSystem, start_dir: &Path, name: &str) -> Option<PathBuf> {
    start_dir.ancestors().find_map(|dir| {
        let candidate = dir.join(name);
        debug!("looking for {}", candidate.display());
        fs.is_file(&candidate).then_some(candidate)
    })
}

/// Parsed contents of a file list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileList {
    pub include_dirs: Vec<PathBuf>,
    pub files: Vec<PathBuf>,
}

impl FileList {
    /// Parse file list text. Paths are returned as written.
    pub fn parse(text: &str) -> Result<Self, FileListError> {
        let mut list = FileList::default();

        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
                continue;
            }
            if let Some(dirs) = line.strip_prefix("+incdir+") {
                list.include_dirs.extend(
                    dirs.split('+')
                        .filter(|dir| !dir.is_empty())
                        .map(PathBuf::from),
                );
            } else if line.starts_with('+') || line.starts_with('-') {
                return Err(FileListError::Malformed {
                    line: index + 1,
                    text: line.to_string(),
                });
            } else {
                list.files.push(PathBuf::from(line));
            }
        }
        Ok(list)
    }

    /// Read and parse the file list at `path`, resolving relative entries
    /// against the directory that contains it.
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self, FileListError> {
        let text = fs.read_to_string(path).map_err(|source| FileListError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let list = Self::parse(&text)?;
        let base = path.parent().unwrap_or(Path::new(""));
        Ok(list.resolved_against(base))
    }

    /// Anchor every relative entry at `base`.
    pub fn resolved_against(self, base: &Path) -> Self {
        let resolve = |path: PathBuf| normalize_path(&base.join(path));
        Self {
            include_dirs: self.include_dirs.into_iter().map(resolve).collect(),
            files: self.files.into_iter().map(resolve).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.include_dirs.is_empty() && self.files.is_empty()
    }
}
