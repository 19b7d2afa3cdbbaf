//! gml_options: Parser options.
//!
//! Options arrive as camelCase JSON, matching the option bag the GML
//! tooling passes around. Every field is optional; the accessors resolve
//! the defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub use gml_parser::DEFAULT_MAX_DEPTH;

/// Options for one parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParserOptions {
    // -- Output --
    pub get_comments: Option<bool>,
    pub get_locations: Option<bool>,
    /// Render locations as bare offsets instead of `{line, index}`.
    pub simplify_locations: Option<bool>,
    pub get_identifier_metadata: Option<bool>,

    // -- Input --
    pub sanitize_conditional_assignments: Option<bool>,
    pub max_depth: Option<u32>,
}

impl ParserOptions {
    pub fn comments(&self) -> bool {
        self.get_comments.unwrap_or(true)
    }

    pub fn locations(&self) -> bool {
        self.get_locations.unwrap_or(true)
    }

    pub fn simplified_locations(&self) -> bool {
        self.simplify_locations.unwrap_or(false)
    }

    pub fn identifier_metadata(&self) -> bool {
        self.get_identifier_metadata.unwrap_or(false)
    }

    pub fn sanitizes_conditional_assignments(&self) -> bool {
        self.sanitize_conditional_assignments.unwrap_or(true)
    }

    pub fn depth_limit(&self) -> u32 {
        self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH)
    }

    // Builder-style setters for callers that construct options in code.

    pub fn with_comments(mut self, on: bool) -> Self {
        self.get_comments = Some(on);
        self
    }

    pub fn with_locations(mut self, on: bool) -> Self {
        self.get_locations = Some(on);
        self
    }

    pub fn with_simplified_locations(mut self, on: bool) -> Self {
        self.simplify_locations = Some(on);
        self
    }

    pub fn with_identifier_metadata(mut self, on: bool) -> Self {
        self.get_identifier_metadata = Some(on);
        self
    }

    pub fn with_sanitizer(mut self, on: bool) -> Self {
        self.sanitize_conditional_assignments = Some(on);
        self
    }

    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = Some(depth);
        self
    }
}

/// Failure to load options from a file.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("cannot read options file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid options: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse options from a JSON string.
pub fn parse_options(content: &str) -> Result<ParserOptions, serde_json::Error> {
    serde_json::from_str(content)
}

/// Parse options from a JSON file.
pub fn parse_options_file(path: impl AsRef<Path>) -> Result<ParserOptions, OptionsError> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_options(&content)?)
}
