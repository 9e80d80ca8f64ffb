//! IDE features: the layer between the symbol table and an editor client.
//!
//! - [`SymbolTableHandler`] owns the project and its symbol table and keeps
//!   track of when the table must be rebuilt.
//! - [`find_definition`] answers `textDocument/definition` against a built
//!   table and the editor's open buffers.
//! - [`BufferTrackerContainer`] holds the latest parsed text of every open
//!   document.
//!
//! ## Usage
//!
//! ```ignore
//! use vls::ide::{BufferTrackerContainer, DefinitionParams, SymbolTableHandler};
//!
//! let mut handler = SymbolTableHandler::new();
//! handler.set_project("/work", Vec::new(), "");
//! handler.load_project_file_list("/work/rtl");
//!
//! let mut buffers = BufferTrackerContainer::new();
//! buffers.update("file:///work/rtl/top.sv", 1, text);
//!
//! let params = DefinitionParams::new("file:///work/rtl/top.sv", 3, 4);
//! let locations = handler.find_definition(&params, &buffers);
//! ```

mod buffers;
mod goto;
mod handler;
mod lsp;
mod lsp_uri;

pub use buffers::{BufferTracker, BufferTrackerContainer, ParsedBuffer};
pub use goto::{QueryError, definition_location, find_definition};
pub use handler::{HandlerOptions, HandlerState, SymbolTableHandler};
pub use lsp::{DefinitionParams, Location, Position, Range, TextDocumentIdentifier};
pub use lsp_uri::{FILE_SCHEME_PREFIX, lsp_uri_to_path, path_to_lsp_uri};
