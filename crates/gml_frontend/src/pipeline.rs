use crate::output::ParseOutput;
use gml_builder::{build, BuildOptions, BuildOutput};
use gml_core::LineMap;
use gml_diagnostics::{ParseError, ParseResult, SyntaxError};
use gml_options::ParserOptions;
use gml_parser::Parser;
use gml_scanner::tokenize;
use gml_sourcemap::{remap_locations, sanitize_conditional_assignments, IndexMapper};
use std::thread;

/// Stack for one parse before the per-level allowance.
const BASE_STACK_SIZE: usize = 4 * 1024 * 1024;
/// Stack allowed for each level of rule nesting the depth limit admits.
const STACK_PER_LEVEL: usize = 128 * 1024;
const MAX_STACK_SIZE: usize = 1024 * 1024 * 1024;

/// Parse GML source into a located AST with its comment and whitespace
/// side lists.
///
/// The work runs on a dedicated thread whose stack is sized from the depth
/// limit, so input nested up to the limit is reported as a syntax error
/// instead of exhausting the caller's stack.
pub fn parse(source: &str, options: &ParserOptions) -> ParseResult<ParseOutput> {
    let stack_size = stack_size_for(options.depth_limit());
    let run = || parse_on_current_thread(source, options);
    thread::scope(|scope| {
        let spawned = thread::Builder::new()
            .name("gml-parse".to_string())
            .stack_size(stack_size)
            .spawn_scoped(scope, || run());
        match spawned {
            Ok(handle) => handle
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic)),
            Err(error) => {
                tracing::warn!(%error, stack_size, "could not spawn parse thread, parsing inline");
                run()
            }
        }
    })
}

fn stack_size_for(depth_limit: u32) -> usize {
    (depth_limit as usize)
        .saturating_mul(STACK_PER_LEVEL)
        .saturating_add(BASE_STACK_SIZE)
        .min(MAX_STACK_SIZE)
}

fn parse_on_current_thread(source: &str, options: &ParserOptions) -> ParseResult<ParseOutput> {
    let sanitized = options
        .sanitizes_conditional_assignments()
        .then(|| sanitize_conditional_assignments(source));
    let (text, adjustments) = match &sanitized {
        Some(sanitized) => (sanitized.source_text.as_str(), sanitized.index_adjustments.as_deref()),
        None => (source, None),
    };
    let mapper = IndexMapper::new(adjustments);
    let located = |error: SyntaxError| relocate(error, &mapper, source);

    let tokens = tokenize(text).map_err(located)?;
    tracing::debug!(tokens = tokens.len(), "scanned");

    let tree = Parser::new(tokens)
        .with_max_depth(options.depth_limit())
        .parse_program()
        .map_err(located)?;
    tracing::debug!(children = tree.root.children.len(), "parsed");

    let build_options = BuildOptions {
        locations: options.locations(),
        identifier_metadata: options.identifier_metadata(),
        comments: options.comments(),
        max_depth: options.depth_limit(),
    };
    let BuildOutput {
        mut program,
        mut comments,
        mut whitespaces,
        mut scopes,
    } = build(&tree, &build_options).map_err(|error| mapper.remap_error(error, &LineMap::new(source)))?;

    remap_locations(&mut program, &mut comments, &mut whitespaces, adjustments);
    mapper.remap_scopes(&mut scopes);

    Ok(ParseOutput {
        program,
        comments,
        whitespaces,
        scopes: options.identifier_metadata().then_some(scopes),
    })
}

/// Move `error` back into original coordinates and attach the original text
/// for report rendering.
fn relocate(mut error: SyntaxError, mapper: &IndexMapper, original: &str) -> ParseError {
    if !mapper.is_identity() {
        mapper.remap_syntax_error(&mut error, &LineMap::new(original));
    }
    error.with_source(original).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_size_grows_with_depth_limit() {
        assert_eq!(stack_size_for(0), BASE_STACK_SIZE);
        assert!(stack_size_for(512) > stack_size_for(256));
        assert_eq!(stack_size_for(u32::MAX), MAX_STACK_SIZE);
    }
}
