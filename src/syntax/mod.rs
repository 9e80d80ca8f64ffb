// Parsed source text with position lookup
pub mod file;

pub use file::TextStructure;
