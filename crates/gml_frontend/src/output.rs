use gml_ast::{Comment, Node, NodeKind, Whitespace};
use gml_binder::Scope;
use gml_options::ParserOptions;
use serde_json::Value;

/// A successful parse.
#[derive(Debug, Clone)]
pub struct ParseOutput {
    /// The `Program` node.
    pub program: Node,
    pub comments: Vec<Comment>,
    pub whitespaces: Vec<Whitespace>,
    /// Every scope opened during the build, indexed by scope id. `None`
    /// unless identifier metadata was requested.
    pub scopes: Option<Vec<Scope>>,
}

impl ParseOutput {
    /// The top-level statements.
    pub fn body(&self) -> &[Node] {
        match &self.program.kind {
            NodeKind::Program { body } => body,
            _ => &[],
        }
    }

    /// Render the program as JSON, with the side lists attached as
    /// `comments` and `whitespaces` when comments were requested.
    pub fn to_json(&self, options: &ParserOptions) -> serde_json::Result<Value> {
        let mut value = serde_json::to_value(&self.program)?;
        if options.comments() {
            if let Value::Object(map) = &mut value {
                map.insert("comments".to_string(), serde_json::to_value(&self.comments)?);
                map.insert("whitespaces".to_string(), serde_json::to_value(&self.whitespaces)?);
            }
        }
        if options.simplified_locations() {
            simplify_locations(&mut value);
        }
        Ok(value)
    }
}

/// Collapse every `start`/`end` location object to its bare index.
fn simplify_locations(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, child) in map.iter_mut() {
                if matches!(key.as_str(), "start" | "end") {
                    if let Some(index) = child.get("index").cloned() {
                        *child = index;
                        continue;
                    }
                }
                simplify_locations(child);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(simplify_locations),
        _ => {}
    }
}
