use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, warn};

use super::error::ProjectError;
use super::fs::{FileSystem, normalize_path};
use super::source_file::{FileOrigin, SourceFile};
use crate::base::FileId;
use crate::syntax::TextStructure;

/// The set of files considered together for one analysis session.
///
/// Files are registered by path relative to `root` (absolute when outside
/// it) and addressed by [`FileId`]. Ids are only meaningful for the project
/// that issued them.
#[derive(Debug)]
pub struct VerilogProject {
    root: PathBuf,
    include_paths: Vec<PathBuf>,
    corpus: String,
    fs: Arc<dyn FileSystem>,
    files: Vec<SourceFile>,
    /// Relative path -> id, in registration order
    by_path: IndexMap<PathBuf, FileId>,
}

impl VerilogProject {
    pub fn new(
        root: impl Into<PathBuf>,
        include_paths: Vec<PathBuf>,
        corpus: impl Into<String>,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        let root = normalize_path(&root.into());
        let include_paths = include_paths
            .into_iter()
            .map(|path| normalize_path(&root.join(path)))
            .collect();
        Self {
            root,
            include_paths,
            corpus: corpus.into(),
            fs,
            files: Vec::new(),
            by_path: IndexMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn include_paths(&self) -> &[PathBuf] {
        &self.include_paths
    }

    pub fn corpus(&self) -> &str {
        &self.corpus
    }

    pub fn file_system(&self) -> &Arc<dyn FileSystem> {
        &self.fs
    }

    /// Add an include search path. Relative paths are taken from the root.
    /// Returns false if the path was already known.
    pub fn add_include_path(&mut self, path: impl AsRef<Path>) -> bool {
        let path = normalize_path(&self.root.join(path.as_ref()));
        if self.include_paths.contains(&path) {
            return false;
        }
        debug!("include path added: {}", path.display());
        self.include_paths.push(path);
        true
    }

    /// Project-relative form of `path`: stripped of the root prefix when it
    /// lies under the root, otherwise returned normalized as is.
    pub fn relative_path_to_source(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = normalize_path(path.as_ref());
        match path.strip_prefix(&self.root) {
            Ok(relative) if path.is_absolute() => relative.to_path_buf(),
            _ => path,
        }
    }

    fn resolve(&self, relative: &Path) -> PathBuf {
        normalize_path(&self.root.join(relative))
    }

    fn register(&mut self, relative: PathBuf, resolved: PathBuf, origin: FileOrigin) -> FileId {
        let id = FileId::new(self.files.len() as u32);
        debug!("registered {} as {} ({:?})", relative.display(), id, origin);
        self.files.push(SourceFile::new(relative.clone(), resolved, origin));
        self.by_path.insert(relative, id);
        id
    }

    /// Register a file to be built as its own translation unit.
    ///
    /// Opening an already registered path returns its existing id (an
    /// include-only file is promoted to a translation unit).
    pub fn open_translation_unit(&mut self, path: impl AsRef<Path>) -> Result<FileId, ProjectError> {
        let relative = self.relative_path_to_source(path.as_ref());
        if let Some(id) = self.lookup_registered_file(&relative) {
            self.files[id.index()].promote_to_translation_unit();
            return Ok(id);
        }
        let resolved = self.resolve(&relative);
        if !self.fs.is_file(&resolved) {
            return Err(ProjectError::NotFound(resolved));
        }
        Ok(self.register(relative, resolved, FileOrigin::TranslationUnit))
    }

    /// Find and register a file named by an `` `include `` directive.
    ///
    /// Search order: relative to the root, then each include path in order.
    pub fn open_included_file(&mut self, path: impl AsRef<Path>) -> Result<FileId, ProjectError> {
        let path = path.as_ref();
        let candidates = std::iter::once(self.root.join(path))
            .chain(self.include_paths.iter().map(|dir| dir.join(path)))
            .map(|candidate| normalize_path(&candidate));

        for candidate in candidates {
            let relative = self.relative_path_to_source(&candidate);
            if let Some(id) = self.lookup_registered_file(&relative) {
                return Ok(id);
            }
            if self.fs.is_file(&candidate) {
                return Ok(self.register(relative, candidate, FileOrigin::Include));
            }
        }
        Err(ProjectError::NotFound(path.to_path_buf()))
    }

    /// Register (or update) a translation unit with in-memory content.
    pub fn register_content(&mut self, path: impl AsRef<Path>, content: impl Into<Arc<str>>) -> FileId {
        let relative = self.relative_path_to_source(path.as_ref());
        let id = match self.lookup_registered_file(&relative) {
            Some(id) => id,
            None => {
                let resolved = self.resolve(&relative);
                self.register(relative, resolved, FileOrigin::TranslationUnit)
            }
        };
        self.files[id.index()].set_content(content);
        id
    }

    pub fn lookup_registered_file(&self, relative: &Path) -> Option<FileId> {
        self.by_path.get(relative).copied()
    }

    pub fn file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.index())
    }

    pub fn file_mut(&mut self, id: FileId) -> Option<&mut SourceFile> {
        self.files.get_mut(id.index())
    }

    /// All registered files in registration order.
    pub fn files(&self) -> impl Iterator<Item = (FileId, &SourceFile)> {
        self.files
            .iter()
            .enumerate()
            .map(|(index, file)| (FileId::new(index as u32), file))
    }

    /// Translation units in registration order.
    pub fn translation_units(&self) -> Vec<FileId> {
        self.files()
            .filter(|(_, file)| file.origin() == FileOrigin::TranslationUnit)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Load (if needed) and parse a file, returning its text structure.
    pub fn ensure_parsed(&mut self, id: FileId) -> Result<&TextStructure, ProjectError> {
        let fs = Arc::clone(&self.fs);
        let file = self
            .files
            .get_mut(id.index())
            .ok_or(ProjectError::UnknownFile(id))?;

        if file.content().is_none() {
            match fs.read_to_string(file.resolved_path()) {
                Ok(content) => file.set_content(content),
                Err(source) => {
                    warn!("cannot read {}: {}", file.resolved_path().display(), source);
                    file.mark_unreadable();
                    return Err(ProjectError::io(file.resolved_path(), source));
                }
            }
        }
        let path = file.resolved_path().to_path_buf();
        file.parse_content().ok_or(ProjectError::NotFound(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{FileStatus, MemoryFileSystem};

    fn project(fs: MemoryFileSystem) -> VerilogProject {
        VerilogProject::new("/work", vec![PathBuf::from("inc")], "", Arc::new(fs))
    }

    #[test]
    fn test_open_translation_unit_registers_once() {
        let fs = MemoryFileSystem::new().with_file("/work/rtl/a.sv", "module a; endmodule");
        let mut project = project(fs);
        let first = project.open_translation_unit("rtl/a.sv").unwrap();
        let again = project.open_translation_unit("/work/rtl/a.sv").unwrap();
        assert_eq!(first, again);
        assert_eq!(project.len(), 1);
        assert_eq!(project.file(first).unwrap().relative_path(), Path::new("rtl/a.sv"));
        assert_eq!(project.file(first).unwrap().resolved_path(), Path::new("/work/rtl/a.sv"));
    }

    #[test]
    fn test_open_missing_file() {
        let mut project = project(MemoryFileSystem::new());
        let err = project.open_translation_unit("nope.sv").unwrap_err();
        assert!(matches!(err, ProjectError::NotFound(_)));
        assert!(project.is_empty());
    }

    #[test]
    fn test_open_included_file_searches_include_paths() {
        let fs = MemoryFileSystem::new()
            .with_file("/work/inc/defs.svh", "parameter W = 4;")
            .with_file("/work/local.svh", "");
        let mut project = project(fs);
        let defs = project.open_included_file("defs.svh").unwrap();
        assert_eq!(project.file(defs).unwrap().relative_path(), Path::new("inc/defs.svh"));
        assert_eq!(project.file(defs).unwrap().origin(), FileOrigin::Include);

        let local = project.open_included_file("local.svh").unwrap();
        assert_eq!(project.file(local).unwrap().relative_path(), Path::new("local.svh"));
        assert!(project.translation_units().is_empty());
        assert!(project.open_included_file("missing.svh").is_err());
    }

    #[test]
    fn test_ensure_parsed_sets_status() {
        let fs = MemoryFileSystem::new()
            .with_file("/work/good.sv", "module good; endmodule")
            .with_file("/work/bad.sv", "module bad; wire ; endmodule");
        let mut project = project(fs);
        let good = project.open_translation_unit("good.sv").unwrap();
        let bad = project.open_translation_unit("bad.sv").unwrap();
        assert_eq!(project.file(good).unwrap().status(), FileStatus::Unparsed);

        project.ensure_parsed(good).unwrap();
        project.ensure_parsed(bad).unwrap();
        assert_eq!(project.file(good).unwrap().status(), FileStatus::Parsed);
        assert_eq!(project.file(bad).unwrap().status(), FileStatus::ParsedWithErrors);
    }

    #[test]
    fn test_ensure_parsed_unreadable_file() {
        let mut fs = MemoryFileSystem::new().with_file("/work/gone.sv", "");
        let mut project = VerilogProject::new("/work", Vec::new(), "", Arc::new(fs.clone()));
        let id = project.open_translation_unit("gone.sv").unwrap();
        fs.remove(Path::new("/work/gone.sv"));
        project.fs = Arc::new(fs);

        assert!(matches!(project.ensure_parsed(id), Err(ProjectError::Io { .. })));
        assert_eq!(project.file(id).unwrap().status(), FileStatus::Unreadable);
    }

    #[test]
    fn test_register_content_replaces_text() {
        let mut project = project(MemoryFileSystem::new());
        let id = project.register_content("/work/buf.sv", "module one; endmodule");
        project.ensure_parsed(id).unwrap();
        let again = project.register_content("buf.sv", "module two; endmodule");
        assert_eq!(id, again);
        let text = project.ensure_parsed(id).unwrap();
        assert!(text.text().contains("two"));
    }

    #[test]
    fn test_add_include_path_dedupes() {
        let mut project = project(MemoryFileSystem::new());
        assert!(!project.add_include_path("inc"));
        assert!(project.add_include_path("/opt/ip/include"));
        assert_eq!(
            project.include_paths(),
            &[PathBuf::from("/work/inc"), PathBuf::from("/opt/ip/include")]
        );
    }

    #[test]
    fn test_relative_path_outside_root_stays_absolute() {
        let project = project(MemoryFileSystem::new());
        assert_eq!(project.relative_path_to_source("/work/a/b.sv"), PathBuf::from("a/b.sv"));
        assert_eq!(project.relative_path_to_source("/other/c.sv"), PathBuf::from("/other/c.sv"));
    }
}
