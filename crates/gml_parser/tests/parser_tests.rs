//! Parser integration tests.
//!
//! Verifies the parse tree shapes and the syntax errors produced for GML source.

use gml_diagnostics::SyntaxError;
use gml_parser::{ParseChild, ParseNode, ParseNodeKind as K, ParseTree, Parser};
use gml_scanner::tokenize;

/// Helper: parse source text into a tree.
fn parse(source: &str) -> ParseTree {
    let tokens = tokenize(source).expect("tokenize");
    Parser::new(tokens).parse_program().expect("parse")
}

/// Helper: parse source text that must fail.
fn parse_err(source: &str) -> SyntaxError {
    let tokens = tokenize(source).expect("tokenize");
    Parser::new(tokens).parse_program().expect_err("expected a syntax error")
}

/// Helper: the top-level statement wrappers.
fn statements(tree: &ParseTree) -> Vec<&ParseNode> {
    tree.root
        .first_child(K::StatementList)
        .map(|list| list.child_nodes().collect())
        .unwrap_or_default()
}

/// Helper: the specific node of the first top-level statement.
fn first_statement(tree: &ParseTree) -> &ParseNode {
    let stmts = statements(tree);
    let wrapper = stmts.first().copied().expect("a statement");
    wrapper.child_nodes().next().expect("statement body")
}

fn assert_statement_count(source: &str, expected: usize) {
    let tree = parse(source);
    assert_eq!(statements(&tree).len(), expected, "source: {}", source);
}

// ============================================================================
// Statements
// ============================================================================

#[test]
fn test_parse_empty_program() {
    let tree = parse("");
    assert!(tree.root.children.is_empty());
    assert_eq!(tree.root.stop, None);
}

#[test]
fn test_parse_multiple_statements() {
    assert_statement_count("a = 1; b = 2\nc = 3;", 3);
}

#[test]
fn test_parse_var_declaration_list() {
    let tree = parse("var a = 1, b;");
    let decl = first_statement(&tree);
    assert_eq!(decl.kind, K::VariableDeclarationList);
    assert_eq!(decl.child_nodes().filter(|n| n.kind == K::VariableDeclaration).count(), 2);
}

#[test]
fn test_parse_globalvar() {
    let tree = parse("globalvar score, lives;");
    let stmt = first_statement(&tree);
    assert_eq!(stmt.kind, K::GlobalVarStatement);
    assert_eq!(stmt.child_nodes().count(), 2);
}

#[test]
fn test_parse_if_then_else() {
    let tree = parse("if a then b = 1 else b = 2");
    let stmt = first_statement(&tree);
    assert_eq!(stmt.kind, K::IfStatement);
    assert_eq!(stmt.child_nodes().filter(|n| n.kind == K::Statement).count(), 2);
}

#[test]
fn test_parse_begin_end_block() {
    let tree = parse("begin a = 1; end");
    assert_eq!(first_statement(&tree).kind, K::Block);
}

#[test]
fn test_parse_for_statement_parts() {
    let tree = parse("for (var i = 0; i < 10; i++) { x += i; }");
    let stmt = first_statement(&tree);
    assert_eq!(stmt.kind, K::ForStatement);
    let kinds: Vec<K> = stmt.child_nodes().map(|n| n.kind).collect();
    assert_eq!(
        kinds,
        vec![K::VariableDeclarationList, K::BinaryExpression, K::IncDecStatement, K::Statement]
    );
}

#[test]
fn test_parse_loops() {
    assert_eq!(first_statement(&parse("while (a) a--;")).kind, K::WhileStatement);
    assert_eq!(first_statement(&parse("repeat 3 { b(); }")).kind, K::RepeatStatement);
    assert_eq!(first_statement(&parse("do { a++; } until a > 3")).kind, K::DoStatement);
    assert_eq!(first_statement(&parse("with (other) x = 1;")).kind, K::WithStatement);
}

#[test]
fn test_parse_switch_statement() {
    let tree = parse("switch (a) { case 1: b(); break; default: c(); }");
    let stmt = first_statement(&tree);
    assert_eq!(stmt.kind, K::SwitchStatement);
    assert!(stmt.first_child(K::CaseClause).is_some());
    assert!(stmt.first_child(K::DefaultClause).is_some());
}

#[test]
fn test_parse_try_catch_finally() {
    let tree = parse("try { a(); } catch (e) { b(e); } finally { c(); }");
    let stmt = first_statement(&tree);
    assert_eq!(stmt.kind, K::TryStatement);
    let catch = stmt.first_child(K::CatchProduction).expect("catch");
    assert!(catch.first_child(K::Identifier).is_some());
    assert!(stmt.first_child(K::FinallyProduction).is_some());
}

#[test]
fn test_parse_enum() {
    let tree = parse("enum Color { Red, Green = 5, }");
    let stmt = first_statement(&tree);
    assert_eq!(stmt.kind, K::EnumeratorDeclaration);
    assert_eq!(stmt.child_nodes().filter(|n| n.kind == K::Enumerator).count(), 2);
}

#[test]
fn test_parse_macro_and_region() {
    let tree = parse("#macro SPEED 4\n#region Movement\nx += SPEED;\n#endregion\n");
    let kinds: Vec<K> = statements(&tree)
        .iter()
        .filter_map(|s| s.child_nodes().next())
        .map(|n| n.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![K::MacroStatement, K::RegionStatement, K::AssignmentExpression, K::RegionStatement]
    );
}

#[test]
fn test_parse_constructor_function() {
    let tree = parse("function Child(a) : Parent(a) constructor { b = a; }");
    let func = first_statement(&tree);
    assert_eq!(func.kind, K::FunctionDeclaration);
    let clause = func.first_child(K::ConstructorClause).expect("constructor clause");
    assert!(clause.first_child(K::Identifier).is_some());
    assert!(clause.first_child(K::Arguments).is_some());
}

#[test]
fn test_parse_default_parameters() {
    let tree = parse("function f(a, b = 2) {}");
    let params = first_statement(&tree).first_child(K::ParameterList).expect("params");
    assert_eq!(params.child_nodes().count(), 2);
}

// ============================================================================
// Expressions
// ============================================================================

/// Helper: the value of `x = <expr>`.
fn assigned_value(source: &str) -> (ParseTree, ParseNode) {
    let tree = parse(source);
    let assign = first_statement(&tree).clone();
    assert_eq!(assign.kind, K::AssignmentExpression, "source: {}", source);
    let value = assign.child_nodes().nth(1).cloned().expect("value");
    (tree, value)
}

fn operator_text<'a>(tree: &'a ParseTree, node: &ParseNode) -> &'a str {
    let op = node.child_tokens().next().expect("operator token");
    &tree.token(op).text
}

#[test]
fn test_binary_precedence_nests_tighter_operator() {
    let (tree, value) = assigned_value("x = a + b * c;");
    assert_eq!(value.kind, K::BinaryExpression);
    assert_eq!(operator_text(&tree, &value), "+");
    let right = value.child_nodes().nth(1).expect("right");
    assert_eq!(operator_text(&tree, right), "*");
}

#[test]
fn test_left_associative_subtraction() {
    let (tree, value) = assigned_value("x = a - b - c;");
    let left = value.child_nodes().next().expect("left");
    assert_eq!(left.kind, K::BinaryExpression);
    assert_eq!(operator_text(&tree, left), "-");
    assert_eq!(value.child_nodes().nth(1).map(|n| n.kind), Some(K::Identifier));
}

#[test]
fn test_right_associative_null_coalesce() {
    let (tree, value) = assigned_value("x = a ?? b ?? c;");
    assert_eq!(value.child_nodes().next().map(|n| n.kind), Some(K::Identifier));
    let right = value.child_nodes().nth(1).expect("right");
    assert_eq!(operator_text(&tree, right), "??");
}

#[test]
fn test_word_operators() {
    let (tree, value) = assigned_value("x = a and b or c;");
    assert_eq!(operator_text(&tree, &value), "or");
}

#[test]
fn test_ternary_and_unary() {
    let (_, value) = assigned_value("x = !a ? -b : c;");
    assert_eq!(value.kind, K::TernaryExpression);
    assert_eq!(value.child_nodes().next().map(|n| n.kind), Some(K::UnaryExpression));
}

#[test]
fn test_member_chain_marks_final_operator() {
    let tree = parse("a.b[c].d = 1;");
    let assign = first_statement(&tree);
    let target = assign.child_nodes().next().expect("target");
    assert_eq!(target.kind, K::LValueExpression);
    let last = target.child_nodes().last().expect("last link");
    assert_eq!(last.kind, K::FinalOperator);
    assert!(last.first_child(K::MemberDotLValue).is_some());
}

#[test]
fn test_call_statement() {
    let tree = parse("show_debug_message(a, b);");
    let stmt = first_statement(&tree);
    assert_eq!(stmt.kind, K::CallStatement);
}

#[test]
fn test_arguments_keep_commas_for_missing_values() {
    let tree = parse("f(1,,3);");
    let call = first_statement(&tree).child_nodes().next().expect("chain");
    let args = call
        .child_nodes()
        .last()
        .and_then(|link| link.first_child(K::Arguments))
        .expect("arguments");
    assert_eq!(args.child_nodes().count(), 2);
    assert_eq!(args.child_tokens().count(), 4);
}

#[test]
fn test_accessor_index() {
    let tree = parse("list[| 0] = 1;");
    let target = first_statement(&tree).child_nodes().next().expect("target");
    let link = target.child_nodes().last().expect("link");
    assert!(link.first_child(K::MemberIndexLValue).is_some());
}

#[test]
fn test_struct_and_array_literals() {
    let (_, value) = assigned_value("x = { a: 1, \"b\": [1, 2,], };");
    assert_eq!(value.kind, K::StructLiteral);
    assert_eq!(value.child_nodes().count(), 2);
}

#[test]
fn test_template_string() {
    let (_, value) = assigned_value("x = $\"hp: {hp + 1}!\";");
    assert_eq!(value.kind, K::TemplateStringLiteral);
    assert!(value.first_child(K::TemplateStringAtom).is_some());
}

#[test]
fn test_new_expression_and_function_expression() {
    let (_, value) = assigned_value("x = new Vec2(1, 2);");
    assert_eq!(value.kind, K::NewExpression);
    let (_, value) = assigned_value("x = function(a) { return a; };");
    assert_eq!(value.kind, K::FunctionDeclaration);
}

#[test]
fn test_node_ranges_cover_tokens() {
    let tree = parse("x = a + b;");
    let assign = first_statement(&tree);
    let stop = assign.stop.expect("stop token");
    assert_eq!(tree.token(assign.start).text, "x");
    assert_eq!(tree.token(stop).text, "b");
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_error_unexpected_end_in_expression() {
    let err = parse_err("if (");
    assert_eq!(err.rule.as_deref(), Some("expression"));
    assert_eq!(err.wrong_symbol, "end of file");
    assert_eq!(err.line, 1);
    assert_eq!(err.column, 4);
    assert_eq!(err.message, "Syntax Error (line 1, column 4): unexpected end of file in expression");
}

#[test]
fn test_error_missing_brace_points_at_open_brace() {
    let err = parse_err("function f() {\n  a = 1;\n");
    assert_eq!(err.rule.as_deref(), Some("closeBlock"));
    assert_eq!(err.line, 1);
    assert_eq!(err.column, 13);
    assert!(err.message.ends_with("missing associated closing brace for this block"));
}

#[test]
fn test_error_unclosed_switch_points_at_its_brace() {
    let err = parse_err("switch (x) {\n  case 1:\n    y = 2;\n");
    assert_eq!(err.rule.as_deref(), Some("closeBlock"));
    assert_eq!((err.line, err.column), (1, 11));
    assert!(err.message.ends_with("missing associated closing brace for this block"));
}

#[test]
fn test_error_inc_dec_on_literal() {
    let err = parse_err("5++;");
    assert_eq!(err.rule.as_deref(), Some("incDecStatement"));
    assert!(err.message.ends_with("++, -- can only be used on a variable-addressing expression"));
}

#[test]
fn test_error_bad_parameter() {
    let err = parse_err("function f(1) {}");
    assert_eq!(err.rule.as_deref(), Some("parameterList"));
    assert_eq!(err.wrong_symbol, "symbol '1'");
}

#[test]
fn test_error_statement_level() {
    let err = parse_err("x = 1;\n)");
    assert_eq!(err.rule.as_deref(), Some("statement"));
    assert_eq!(err.line, 2);
    assert_eq!(err.column, 0);
}

#[test]
fn test_error_assignment_in_condition_without_sanitizing() {
    let err = parse_err("if (a = b) {}");
    assert_eq!(err.offending_text.as_deref(), Some("="));
}

#[test]
fn test_depth_limit() {
    let source = format!("x = {}1{};", "(".repeat(24), ")".repeat(24));
    let tokens = tokenize(&source).expect("tokenize");
    let err = Parser::new(tokens)
        .with_max_depth(16)
        .parse_program()
        .expect_err("too deep");
    assert!(err.message.contains("maximum nesting depth exceeded"));

    let tokens = tokenize(&source).expect("tokenize");
    assert!(Parser::new(tokens).with_max_depth(1024).parse_program().is_ok());
}

#[test]
fn test_long_flat_chain_is_not_nesting() {
    let terms: Vec<String> = (0..1000).map(|i| format!("a{}", i)).collect();
    let source = format!("x = {};", terms.join(" + "));
    let tokens = tokenize(&source).expect("tokenize");
    let tree = Parser::new(tokens).with_max_depth(16).parse_program().expect("flat chain");
    let assign = first_statement(&tree);
    let value = assign.child_nodes().nth(1).expect("value");
    assert_eq!(value.kind, K::BinaryExpression);
}

#[test]
fn test_statement_children_are_tokens_or_nodes() {
    let tree = parse("x = 1;");
    let stmt = statements(&tree)[0];
    assert!(matches!(stmt.children.last(), Some(ParseChild::Token(_))));
}
