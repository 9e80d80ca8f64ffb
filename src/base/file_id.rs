/// Identifier of a source file registered in a [`VerilogProject`].
///
/// A `FileId` is a plain index and does not own the file record. It is only
/// meaningful for the project snapshot that issued it; replacing the project
/// invalidates every id handed out before.
///
/// [`VerilogProject`]: crate::project::VerilogProject
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId(u32);

impl FileId {
    /// Create a FileId from a raw index
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// Get the index into the project's file arena
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "file#{}", self.0)
    }
}
