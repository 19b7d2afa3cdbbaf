//! gml_core: Core utilities for the GML front end.
//!
//! Provides source locations and line maps used throughout
//! the scanning, parsing and AST construction pipeline.

pub mod text;

// Re-export commonly used types
pub use text::{count_line_breaks, LineAndColumn, LineMap, Location, TextPos};
