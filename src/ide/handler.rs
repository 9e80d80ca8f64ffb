//! Symbol table lifecycle and the definition query entry point.
//!
//! The handler owns one project snapshot and the symbol table built from it.
//! Any configuration change marks the table dirty; the next definition query
//! pays for one full Build+Resolve before answering.
//!
//! ```text
//!  Unconfigured ──set_project──▶ Dirty ──build_project_symbol_table──▶ Clean
//!                                  ▲                                    │
//!                                  └───── set_project / file list ──────┘
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};

use super::buffers::BufferTrackerContainer;
use super::goto::{self, QueryError};
use super::lsp::{DefinitionParams, Location};
use crate::base::FileId;
use crate::project::{
    FILE_LIST_NAME, FileList, FileSystem, RealFileSystem, VerilogProject, find_file_upwards,
};
use crate::semantic::symbol_table::DEFAULT_MAX_INCLUDE_DEPTH;
use crate::semantic::{DefinitionLookup, DepthFirstLookup, SymbolTable};

/// Handler configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerOptions {
    /// Name of the file list searched for by [`SymbolTableHandler::load_project_file_list`]
    pub file_list_name: String,
    /// Limit on `` `include `` nesting during Build
    pub max_include_depth: usize,
}

impl Default for HandlerOptions {
    fn default() -> Self {
        Self {
            file_list_name: FILE_LIST_NAME.to_string(),
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
        }
    }
}

impl HandlerOptions {
    pub fn with_file_list_name(mut self, name: impl Into<String>) -> Self {
        self.file_list_name = name.into();
        self
    }

    pub fn with_max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = depth;
        self
    }
}

/// Whether the symbol table reflects the current project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerState {
    /// No project set yet
    Unconfigured,
    /// Project changed since the last full build
    Dirty,
    /// Table built and resolved for the current project
    Clean,
}

/// Owns the project snapshot and its symbol table, and answers definition
/// queries against them.
#[derive(Debug)]
pub struct SymbolTableHandler {
    fs: Arc<dyn FileSystem>,
    project: Option<VerilogProject>,
    table: SymbolTable,
    /// Files built into the current table since the last reset
    checked_files: FxHashSet<FileId>,
    state: HandlerState,
    full_builds: usize,
    options: HandlerOptions,
    lookup: Box<dyn DefinitionLookup>,
}

impl Default for SymbolTableHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTableHandler {
    /// Handler over the real filesystem with default options.
    pub fn new() -> Self {
        Self::with_file_system(Arc::new(RealFileSystem), HandlerOptions::default())
    }

    pub fn with_file_system(fs: Arc<dyn FileSystem>, options: HandlerOptions) -> Self {
        let table = SymbolTable::new().with_max_include_depth(options.max_include_depth);
        Self {
            fs,
            project: None,
            table,
            checked_files: FxHashSet::default(),
            state: HandlerState::Unconfigured,
            full_builds: 0,
            options,
            lookup: Box::new(DepthFirstLookup),
        }
    }

    /// Replace the name-to-declaration strategy used by definition queries.
    pub fn with_definition_lookup(mut self, lookup: Box<dyn DefinitionLookup>) -> Self {
        self.lookup = lookup;
        self
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Replace the project and start over with an empty, dirty table.
    ///
    /// Every node of the previous table refers to files of the previous
    /// project, so nothing is kept.
    pub fn set_project(
        &mut self,
        root: impl Into<PathBuf>,
        include_paths: Vec<PathBuf>,
        corpus: impl Into<String>,
    ) {
        let project = VerilogProject::new(root, include_paths, corpus, Arc::clone(&self.fs));
        info!("project set to {}", project.root().display());
        self.project = Some(project);
        self.reset_symbol_table();
        self.state = HandlerState::Dirty;
    }

    /// Discard the table and forget which files were built into it.
    pub fn reset_symbol_table(&mut self) {
        self.checked_files.clear();
        self.table = SymbolTable::new().with_max_include_depth(self.options.max_include_depth);
    }

    // ========================================================================
    // Building
    // ========================================================================

    /// Build one file into the current table. Files already built since the
    /// last reset are skipped.
    pub fn build_symbol_table_for(&mut self, file: FileId) {
        let Some(project) = self.project.as_mut() else {
            warn!("cannot build {}: no project configured", file);
            return;
        };
        if !self.checked_files.insert(file) {
            debug!("{} already built", file);
            return;
        }
        for diagnostic in self.table.build_file(project, file) {
            warn!("{}", diagnostic);
        }
    }

    /// Reset, then Build every registered translation unit and Resolve.
    ///
    /// Diagnostics are logged, never returned as errors; the table is clean
    /// afterwards whatever they say.
    pub fn build_project_symbol_table(&mut self) {
        self.reset_symbol_table();
        let Some(project) = self.project.as_mut() else {
            return;
        };
        info!("parsing project files...");
        let build = self.table.build(project);
        for diagnostic in &build {
            warn!("{}", diagnostic);
        }
        self.checked_files.extend(project.translation_units());

        let resolve = self.table.resolve();
        for diagnostic in &resolve {
            warn!("{}", diagnostic);
        }
        info!(
            "symbol table built: {} nodes, {} build and {} resolve diagnostics",
            self.table.len(),
            build.len(),
            resolve.len()
        );
        self.full_builds += 1;
        self.state = HandlerState::Clean;
    }

    /// Find the file list by walking up from `start_dir`, register its include
    /// paths and files, and build each listed file.
    ///
    /// A missing or malformed file list changes nothing. Registering anything
    /// new marks the table dirty.
    pub fn load_project_file_list(&mut self, start_dir: impl AsRef<Path>) {
        let start_dir = start_dir.as_ref();
        let Some(project) = self.project.as_ref() else {
            warn!("cannot load file list: no project configured");
            return;
        };
        let fs = Arc::clone(project.file_system());

        let Some(path) = find_file_upwards(fs.as_ref(), start_dir, &self.options.file_list_name) else {
            info!(
                "{} not found above {}",
                self.options.file_list_name,
                start_dir.display()
            );
            return;
        };
        info!("found file list {}", path.display());

        let file_list = match FileList::load(fs.as_ref(), &path) {
            Ok(file_list) => file_list,
            Err(err) => {
                warn!("failed to parse file list {}: {}", path.display(), err);
                return;
            }
        };

        let mut changed = false;
        let mut opened = Vec::new();
        if let Some(project) = self.project.as_mut() {
            for dir in &file_list.include_dirs {
                info!("adding include path {}", dir.display());
                changed |= project.add_include_path(dir);
            }
            for file in &file_list.files {
                let known = project.len();
                match project.open_translation_unit(file) {
                    Ok(id) => {
                        changed |= project.len() != known;
                        opened.push(id);
                    }
                    Err(err) => {
                        warn!("file listed in {} not opened: {}", path.display(), err);
                    }
                }
            }
        }

        for id in opened {
            debug!("building symbol table for {}", id);
            self.build_symbol_table_for(id);
        }
        if changed {
            self.state = HandlerState::Dirty;
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Definition of the symbol under the cursor: zero or one location.
    ///
    /// A dirty table is rebuilt first.
    pub fn find_definition(
        &mut self,
        params: &DefinitionParams,
        buffers: &BufferTrackerContainer,
    ) -> Vec<Location> {
        if self.state == HandlerState::Dirty {
            self.build_project_symbol_table();
        }
        let Some(project) = self.project.as_ref() else {
            goto::log_query_error(&QueryError::NoProject);
            return Vec::new();
        };
        goto::find_definition(project, &self.table, self.lookup.as_ref(), params, buffers)
    }

    /// [`find_definition`](Self::find_definition) with the failure reason.
    pub fn definition_location(
        &mut self,
        params: &DefinitionParams,
        buffers: &BufferTrackerContainer,
    ) -> Result<Location, QueryError> {
        if self.state == HandlerState::Dirty {
            self.build_project_symbol_table();
        }
        let project = self.project.as_ref().ok_or(QueryError::NoProject)?;
        goto::definition_location(project, &self.table, self.lookup.as_ref(), params, buffers)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn state(&self) -> HandlerState {
        self.state
    }

    /// Number of full Build+Resolve passes run so far.
    pub fn full_build_count(&self) -> usize {
        self.full_builds
    }

    pub fn project(&self) -> Option<&VerilogProject> {
        self.project.as_ref()
    }

    /// Mutable project access, e.g. to register in-memory documents.
    ///
    /// Changes made here do not mark the table dirty; call
    /// [`mark_dirty`](Self::mark_dirty) when they should be picked up.
    pub fn project_mut(&mut self) -> Option<&mut VerilogProject> {
        self.project.as_mut()
    }

    /// Force a full rebuild before the next query.
    pub fn mark_dirty(&mut self) {
        if self.project.is_some() {
            self.state = HandlerState::Dirty;
        }
    }

    pub fn symbol_table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn options(&self) -> &HandlerOptions {
        &self.options
    }
}
