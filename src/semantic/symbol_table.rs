/// Scoped tree of Verilog declarations with cross-file reference resolution
mod kind;
mod lookup;
mod reference;
mod symbol;
mod table;

pub use kind::SymbolKind;
pub use lookup::{DefinitionLookup, DepthFirstLookup};
pub use reference::{Reference, ReferenceComponent, ReferenceKind, Separator};
pub use symbol::{NodeId, SymbolInfo, SymbolNode};
pub use table::{DEFAULT_MAX_INCLUDE_DEPTH, DepthFirst, SymbolTable};
