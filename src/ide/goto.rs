//! Go-to-definition: cursor position → declaration location.

use thiserror::Error;
use tracing::{error, info, warn};

use super::buffers::BufferTrackerContainer;
use super::lsp::{DefinitionParams, Location};
use super::lsp_uri::{lsp_uri_to_path, path_to_lsp_uri};
use crate::project::VerilogProject;
use crate::semantic::{DefinitionLookup, SymbolTable};

/// Why a definition request produced no location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("could not convert URI {0} to a filesystem path")]
    UnsupportedUri(String),

    #[error("no project configured")]
    NoProject,

    #[error("buffer not found among opened buffers: {0}")]
    BufferNotOpen(String),

    #[error("no token at {line}:{character} in {uri}")]
    NoToken { uri: String, line: u32, character: u32 },

    #[error("unable to look up {0} in the project")]
    FileNotRegistered(String),

    #[error("symbol `{0}` not found in symbol table")]
    SymbolNotFound(String),

    #[error("origin file of `{0}` not available")]
    OriginUnavailable(String),

    #[error("origin file of `{0}` is not parsed")]
    OriginNotParsed(String),
}

/// Location of the declaration named by the token under the cursor.
///
/// The name is looked up with `lookup` over the whole table; the location is
/// rendered in the declaring file, which may differ from the queried one.
pub fn definition_location(
    project: &VerilogProject,
    table: &SymbolTable,
    lookup: &dyn DefinitionLookup,
    params: &DefinitionParams,
    buffers: &BufferTrackerContainer,
) -> Result<Location, QueryError> {
    let uri = params.text_document.uri.as_str();
    let path = lsp_uri_to_path(uri);
    if path.is_empty() {
        return Err(QueryError::UnsupportedUri(uri.to_string()));
    }
    let relative = project.relative_path_to_source(path);

    let buffer = buffers
        .find_buffer_tracker(uri)
        .and_then(|tracker| tracker.current())
        .ok_or_else(|| QueryError::BufferNotOpen(uri.to_string()))?;

    let token = buffer
        .text_structure()
        .find_token_at(params.position.into())
        .ok_or_else(|| QueryError::NoToken {
            uri: uri.to_string(),
            line: params.position.line,
            character: params.position.character,
        })?;
    let symbol = token.text();

    if project.lookup_registered_file(&relative).is_none() {
        return Err(QueryError::FileNotRegistered(uri.to_string()));
    }

    let node = lookup
        .lookup(table, symbol)
        .ok_or_else(|| QueryError::SymbolNotFound(symbol.to_string()))?;
    let info = table
        .info(node)
        .ok_or_else(|| QueryError::SymbolNotFound(symbol.to_string()))?;

    let origin = info
        .file_origin
        .and_then(|id| project.file(id))
        .ok_or_else(|| QueryError::OriginUnavailable(symbol.to_string()))?;
    let range = info
        .anchor
        .and_then(|anchor| origin.range_for(anchor))
        .ok_or_else(|| QueryError::OriginNotParsed(symbol.to_string()))?;

    Ok(Location {
        uri: path_to_lsp_uri(origin.resolved_path()),
        range: range.into(),
    })
}

/// Definition request: zero or one location. Every failure is logged and
/// answered with an empty list.
pub fn find_definition(
    project: &VerilogProject,
    table: &SymbolTable,
    lookup: &dyn DefinitionLookup,
    params: &DefinitionParams,
    buffers: &BufferTrackerContainer,
) -> Vec<Location> {
    match definition_location(project, table, lookup, params, buffers) {
        Ok(location) => vec![location],
        Err(err) => {
            log_query_error(&err);
            Vec::new()
        }
    }
}

pub(crate) fn log_query_error(err: &QueryError) {
    match err {
        QueryError::SymbolNotFound(_) | QueryError::NoToken { .. } => info!("{}", err),
        QueryError::UnsupportedUri(_) => warn!("{}", err),
        _ => error!("{}", err),
    }
}
