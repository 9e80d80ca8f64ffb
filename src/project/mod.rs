mod error;
pub mod file_list;
mod fs;
mod source_file;
mod verilog_project;

pub use error::{FileListError, ProjectError};
pub use file_list::{FILE_LIST_NAME, FileList, find_file_upwards};
pub use fs::{FileSystem, MemoryFileSystem, RealFileSystem, normalize_path};
pub use source_file::{FileOrigin, FileStatus, SourceFile};
pub use verilog_project::VerilogProject;
