//! Parsed buffers of the documents open in the editor.
//!
//! The editor owns document contents; each change hands a full text here and
//! the tracker keeps the newest parse plus the newest parse without syntax
//! errors.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::syntax::TextStructure;

/// One parsed version of an open document.
#[derive(Debug)]
pub struct ParsedBuffer {
    version: i64,
    uri: String,
    text: TextStructure,
}

impl ParsedBuffer {
    pub fn new(version: i64, uri: impl Into<String>, content: impl Into<Arc<str>>) -> Self {
        Self {
            version,
            uri: uri.into(),
            text: TextStructure::new(content),
        }
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn text_structure(&self) -> &TextStructure {
        &self.text
    }

    pub fn parsed_successfully(&self) -> bool {
        !self.text.has_errors()
    }
}

/// Parse history of a single document.
#[derive(Debug, Default)]
pub struct BufferTracker {
    current: Option<Arc<ParsedBuffer>>,
    last_good: Option<Arc<ParsedBuffer>>,
}

impl BufferTracker {
    /// Parse a new version of the document.
    pub fn update(&mut self, buffer: ParsedBuffer) {
        let buffer = Arc::new(buffer);
        if buffer.parsed_successfully() {
            self.last_good = Some(Arc::clone(&buffer));
        }
        self.current = Some(buffer);
    }

    /// The newest version, syntax errors or not.
    pub fn current(&self) -> Option<&ParsedBuffer> {
        self.current.as_deref()
    }

    /// The newest version that parsed without errors.
    pub fn last_good(&self) -> Option<&ParsedBuffer> {
        self.last_good.as_deref()
    }
}

/// All open documents, keyed by URI.
#[derive(Debug, Default)]
pub struct BufferTrackerContainer {
    trackers: FxHashMap<String, BufferTracker>,
}

impl BufferTrackerContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and record new content for `uri`.
    pub fn update(&mut self, uri: &str, version: i64, content: impl Into<Arc<str>>) -> &BufferTracker {
        debug!("buffer {} updated to version {}", uri, version);
        let tracker = self.trackers.entry(uri.to_string()).or_default();
        tracker.update(ParsedBuffer::new(version, uri, content));
        tracker
    }

    /// Forget a closed document.
    pub fn remove(&mut self, uri: &str) -> Option<BufferTracker> {
        self.trackers.remove(uri)
    }

    pub fn find_buffer_tracker(&self, uri: &str) -> Option<&BufferTracker> {
        self.trackers.get(uri)
    }

    pub fn len(&self) -> usize {
        self.trackers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }
}
