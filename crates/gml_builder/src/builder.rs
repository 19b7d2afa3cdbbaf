//! The AST builder.
//!
//! One visit per parse node kind, dispatched through a single `match`. Every
//! node gets its `start`/`end` from [`AstBuilder::locate`]; scopes and roles
//! are pushed around the constructs that introduce them.

use gml_ast::{Comment, Node, NodeKind, Whitespace};
use gml_binder::{GlobalIdentifierRegistry, IdentifierKind, Role, Scope, ScopeKind, ScopeTracker};
use gml_core::Location;
use gml_diagnostics::{
    BuildError, OffendingSymbol, ParseError, ParseResult, Recognizer, SyntaxErrorListener,
    TokenPosition,
};
use gml_parser::{ParseChild, ParseNode, ParseNodeKind as K, ParseTree, DEFAULT_MAX_DEPTH};
use gml_scanner::{HiddenTokenProcessor, Token, TokenKind};

/// Statement kinds probed, in priority order, under a statement wrapper.
const STATEMENT_PROBE: &[K] = &[
    K::Block,
    K::IfStatement,
    K::VariableDeclarationList,
    K::CallStatement,
    K::AssignmentExpression,
    K::IncDecStatement,
    K::ForStatement,
    K::WhileStatement,
    K::DoStatement,
    K::RepeatStatement,
    K::WithStatement,
    K::SwitchStatement,
    K::TryStatement,
    K::ReturnStatement,
    K::ExitStatement,
    K::BreakStatement,
    K::ContinueStatement,
    K::ThrowStatement,
    K::DeleteStatement,
    K::GlobalVarStatement,
    K::FunctionDeclaration,
    K::EnumeratorDeclaration,
    K::MacroStatement,
    K::RegionStatement,
    K::DefineStatement,
    K::ExpressionStatement,
    K::EmptyStatement,
];

/// What the builder produces besides the tree.
#[derive(Debug, Clone, Copy)]
pub struct BuildOptions {
    /// Attach `start`/`end` locations.
    pub locations: bool,
    /// Track scopes and annotate identifiers.
    pub identifier_metadata: bool,
    /// Collect comment and whitespace side lists.
    pub comments: bool,
    pub max_depth: u32,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            locations: true,
            identifier_metadata: false,
            comments: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// The result of one build.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub program: Node,
    pub comments: Vec<Comment>,
    pub whitespaces: Vec<Whitespace>,
    /// Empty unless identifier metadata was requested.
    pub scopes: Vec<Scope>,
}

/// Build the AST for a parse tree.
pub fn build(tree: &ParseTree, options: &BuildOptions) -> ParseResult<BuildOutput> {
    let mut comments = Vec::new();
    let mut whitespaces = Vec::new();
    if options.comments {
        let mut hidden = HiddenTokenProcessor::new(&mut comments, &mut whitespaces);
        hidden.process_all(&tree.tokens);
        debug_assert!(hidden.has_reached_end());
    }

    let mut builder = AstBuilder::new(tree, options);
    let program = builder.build_program()?;
    tracing::debug!(
        comments = comments.len(),
        whitespaces = whitespaces.len(),
        scopes = builder.tracker.scopes().len(),
        "built"
    );
    Ok(BuildOutput {
        program,
        comments,
        whitespaces,
        scopes: builder.tracker.into_scopes(),
    })
}

/// Walks a parse tree and builds AST nodes.
pub struct AstBuilder<'t> {
    tree: &'t ParseTree,
    locations: bool,
    pub(crate) tracker: ScopeTracker,
    globals: GlobalIdentifierRegistry,
    /// Parse nodes being visited, innermost last.
    stack: Vec<(K, usize)>,
    max_depth: u32,
}

impl<'t> AstBuilder<'t> {
    pub fn new(tree: &'t ParseTree, options: &BuildOptions) -> Self {
        Self {
            tree,
            locations: options.locations,
            tracker: ScopeTracker::new(options.identifier_metadata),
            globals: GlobalIdentifierRegistry::new(),
            stack: Vec::new(),
            // The parser already bounds rule nesting. This bound only matters
            // for trees that did not come from the parser.
            max_depth: options.max_depth.saturating_mul(2).max(1),
        }
    }

    /// Build the `Program` node and apply global identifiers to the whole tree.
    pub fn build_program(&mut self) -> ParseResult<Node> {
        let tree = self.tree;
        let root = &tree.root;
        let mut program = self.with_scope(ScopeKind::Program, |b| {
            b.enter(root)?;
            let body = b.statement_list(root.first_child(K::StatementList))?;
            b.leave();
            Ok(b.make(NodeKind::Program { body }, root))
        })?;
        self.globals.apply_to_tree(&mut program);
        Ok(program)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    #[inline]
    pub(crate) fn token(&self, index: usize) -> &'t Token {
        &self.tree.tokens[index]
    }

    /// The `start`/`end` of a parse node. `end` falls back to `start` when the
    /// node matched no tokens.
    pub(crate) fn locate(&self, node: &ParseNode) -> (Option<Location>, Option<Location>) {
        self.locate_range(node.start, node.stop)
    }

    fn locate_range(&self, start: usize, stop: Option<usize>) -> (Option<Location>, Option<Location>) {
        if !self.locations {
            return (None, None);
        }
        let start = self.token(start).start_location();
        let end = stop.map_or(start, |stop| self.token(stop).end_location());
        (Some(start), Some(end))
    }

    pub(crate) fn make(&self, kind: NodeKind, node: &ParseNode) -> Node {
        let (start, end) = self.locate(node);
        Node::new(kind, start, end)
    }

    fn make_at_token(&self, kind: NodeKind, index: usize) -> Node {
        let (start, end) = self.locate_range(index, Some(index));
        Node::new(kind, start, end)
    }

    pub(crate) fn missing(&self, node: &ParseNode, expected: &'static str) -> ParseError {
        BuildError::MissingChild {
            rule: node.kind.rule_name(),
            expected,
            index: self.token(node.start).start_index,
        }
        .into()
    }

    pub(crate) fn unexpected(&self, node: &ParseNode, found: &ParseNode) -> ParseError {
        BuildError::UnexpectedNode {
            rule: node.kind.rule_name(),
            found: found.kind.rule_name(),
            index: self.token(found.start).start_index,
        }
        .into()
    }

    fn required<'n>(&self, node: &'n ParseNode, kind: K) -> ParseResult<&'n ParseNode> {
        node.first_child(kind)
            .ok_or_else(|| self.missing(node, kind.rule_name()))
    }

    /// The `n`th nested rule that yields a value.
    fn expression_at<'n>(&self, node: &'n ParseNode, n: usize) -> ParseResult<&'n ParseNode> {
        node.expressions()
            .nth(n)
            .ok_or_else(|| self.missing(node, "expression"))
    }

    fn token_text(&self, index: usize) -> String {
        self.token(index).text.clone()
    }

    /// Whether the token before the closing delimiter is a comma.
    fn has_trailing_comma(&self, node: &ParseNode) -> bool {
        node.children.len() >= 2
            && matches!(
                &node.children[node.children.len() - 2],
                ParseChild::Token(index) if self.token(*index).kind == TokenKind::Comma
            )
    }

    pub(crate) fn enter(&mut self, node: &ParseNode) -> ParseResult<()> {
        self.stack.push((node.kind, node.start));
        if self.stack.len() as u32 > self.max_depth {
            let token = self.token(node.start);
            let offending = OffendingSymbol::Token {
                text: Some(token.text.clone()),
                is_eof: token.kind == TokenKind::EndOfFile,
            };
            let at = self.position(node.start);
            return Err(SyntaxErrorListener::new()
                .depth_exceeded(self, Some(&offending), at)
                .into());
        }
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.stack.pop();
    }

    fn position(&self, index: usize) -> TokenPosition {
        let token = self.token(index);
        TokenPosition {
            line: token.line,
            column: token.column,
            index: token.start_index,
        }
    }

    fn with_scope<R>(&mut self, kind: ScopeKind, body: impl FnOnce(&mut Self) -> ParseResult<R>) -> ParseResult<R> {
        self.tracker.push_scope(kind);
        let result = body(self);
        self.tracker.pop_scope();
        result
    }

    fn with_role<R>(&mut self, role: Role, body: impl FnOnce(&mut Self) -> ParseResult<R>) -> ParseResult<R> {
        self.tracker.push_role(role);
        let result = body(self);
        self.tracker.pop_role();
        result
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Build the AST node for any parse node.
    pub fn visit(&mut self, node: &ParseNode) -> ParseResult<Node> {
        if node.kind == K::BinaryExpression {
            return self.handle_binary(node, false);
        }
        self.enter(node)?;
        tracing::trace!(rule = node.kind.rule_name(), start = node.start, "visit");
        let result = self.visit_kind(node);
        self.leave();
        result
    }

    fn visit_kind(&mut self, node: &ParseNode) -> ParseResult<Node> {
        match node.kind {
            K::Statement => self.visit_statement(node),
            K::Block => self.visit_block(node),
            K::EmptyStatement => Ok(self.make(NodeKind::EmptyStatement, node)),
            K::IfStatement => self.visit_if(node),
            K::ForStatement => self.visit_for(node),
            K::WhileStatement => {
                let (test, body) = self.test_and_body(node)?;
                Ok(self.make(NodeKind::WhileStatement { test, body }, node))
            }
            K::RepeatStatement => {
                let (test, body) = self.test_and_body(node)?;
                Ok(self.make(NodeKind::RepeatStatement { test, body }, node))
            }
            K::WithStatement => {
                let object = Box::new(self.visit(self.expression_at(node, 0)?)?);
                let body = self.required(node, K::Statement)?;
                let body = Box::new(self.with_scope(ScopeKind::With, |b| b.visit(body))?);
                Ok(self.make(NodeKind::WithStatement { object, body }, node))
            }
            K::DoStatement => {
                let body = Box::new(self.visit(self.required(node, K::Statement)?)?);
                let test = Box::new(self.visit(self.expression_at(node, 0)?)?);
                Ok(self.make(NodeKind::DoUntilStatement { body, test }, node))
            }
            K::SwitchStatement => self.visit_switch(node),
            K::TryStatement => self.visit_try(node),
            K::ReturnStatement => {
                let argument = match node.expressions().next() {
                    Some(expr) => Some(Box::new(self.visit(expr)?)),
                    None => None,
                };
                Ok(self.make(NodeKind::ReturnStatement { argument }, node))
            }
            K::ExitStatement => Ok(self.make(NodeKind::ExitStatement, node)),
            K::BreakStatement => Ok(self.make(NodeKind::BreakStatement, node)),
            K::ContinueStatement => Ok(self.make(NodeKind::ContinueStatement, node)),
            K::ThrowStatement => {
                let argument = Box::new(self.visit(self.expression_at(node, 0)?)?);
                Ok(self.make(NodeKind::ThrowStatement { argument }, node))
            }
            K::DeleteStatement => {
                let argument = Box::new(self.visit(self.expression_at(node, 0)?)?);
                Ok(self.make(NodeKind::DeleteStatement { argument }, node))
            }
            K::VariableDeclarationList => self.visit_variable_declarations(node),
            K::GlobalVarStatement => self.visit_globalvar(node),
            K::FunctionDeclaration => self.visit_function(node),
            K::EnumeratorDeclaration => self.visit_enum(node),
            K::MacroStatement => self.visit_macro(node),
            K::RegionStatement | K::DefineStatement => self.visit_directive(node),
            K::AssignmentExpression => self.visit_assignment(node),
            K::IncDecStatement => Ok(self.visit_inc_dec(node)?.retag_inc_dec(true)),
            K::PreIncDecExpression | K::PostIncDecExpression => {
                Ok(self.visit_inc_dec(node)?.retag_inc_dec(false))
            }
            K::CallStatement | K::ExpressionStatement => self.visit(self.expression_at(node, 0)?),
            K::BinaryExpression => self.handle_binary(node, false),
            K::UnaryExpression => {
                let operator = node
                    .child_tokens()
                    .next()
                    .ok_or_else(|| self.missing(node, "operator"))?;
                let argument = Box::new(self.visit(self.expression_at(node, 0)?)?);
                Ok(self.make(
                    NodeKind::UnaryExpression {
                        operator: self.token_text(operator),
                        prefix: true,
                        argument,
                    },
                    node,
                ))
            }
            K::TernaryExpression => {
                let test = Box::new(self.visit(self.expression_at(node, 0)?)?);
                let consequent = Box::new(self.visit(self.expression_at(node, 1)?)?);
                let alternate = Box::new(self.visit(self.expression_at(node, 2)?)?);
                Ok(self.make(
                    NodeKind::TernaryExpression {
                        test,
                        consequent,
                        alternate,
                    },
                    node,
                ))
            }
            K::ParenthesizedExpression => {
                let expression = Box::new(self.visit(self.expression_at(node, 0)?)?);
                Ok(self.make(
                    NodeKind::ParenthesizedExpression {
                        expression,
                        synthetic: false,
                    },
                    node,
                ))
            }
            K::NewExpression => {
                let id = self.required(node, K::Identifier)?;
                let expression = Box::new(
                    self.with_role(Role::reference(IdentifierKind::Struct), |b| b.visit_identifier(id))?,
                );
                let arguments = match node.first_child(K::Arguments) {
                    Some(args) => self.visit_arguments(args)?,
                    None => Vec::new(),
                };
                Ok(self.make(
                    NodeKind::NewExpression {
                        expression,
                        arguments,
                    },
                    node,
                ))
            }
            K::LValueExpression => self.visit_chain(node),
            K::Identifier => self.visit_identifier(node),
            K::Literal => {
                let token = node
                    .child_tokens()
                    .next()
                    .ok_or_else(|| self.missing(node, "literal token"))?;
                Ok(self.make(
                    NodeKind::Literal {
                        value: self.token_text(token),
                    },
                    node,
                ))
            }
            K::ArrayLiteral => {
                let mut elements = Vec::new();
                for element in node.expressions() {
                    elements.push(self.visit(element)?);
                }
                let has_trailing_comma = self.has_trailing_comma(node);
                Ok(self.make(
                    NodeKind::ArrayExpression {
                        elements,
                        has_trailing_comma,
                    },
                    node,
                ))
            }
            K::StructLiteral => self.visit_struct(node),
            K::TemplateStringLiteral => self.visit_template(node),
            K::Program
            | K::StatementList
            | K::CloseBlock
            | K::CaseClause
            | K::DefaultClause
            | K::CatchProduction
            | K::FinallyProduction
            | K::VariableDeclaration
            | K::ConstructorClause
            | K::ParameterList
            | K::ParameterArgument
            | K::Enumerator
            | K::Expression
            | K::ChainOperator
            | K::FinalOperator
            | K::MemberDotLValue
            | K::MemberIndexLValue
            | K::Arguments
            | K::PropertyAssignment
            | K::TemplateStringAtom => Err(BuildError::UnexpectedNode {
                rule: "visit",
                found: node.kind.rule_name(),
                index: self.token(node.start).start_index,
            }
            .into()),
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn statement_list(&mut self, list: Option<&ParseNode>) -> ParseResult<Vec<Node>> {
        let Some(list) = list else {
            return Ok(Vec::new());
        };
        let mut body = Vec::new();
        for statement in list.child_nodes() {
            body.push(self.visit(statement)?);
        }
        Ok(body)
    }

    fn visit_statement(&mut self, node: &ParseNode) -> ParseResult<Node> {
        let inner = node
            .first_child_of(STATEMENT_PROBE)
            .ok_or_else(|| self.missing(node, "statement"))?;
        self.visit(inner)
    }

    fn visit_block(&mut self, node: &ParseNode) -> ParseResult<Node> {
        let body = self.statement_list(node.first_child(K::StatementList))?;
        Ok(self.make(NodeKind::BlockStatement { body }, node))
    }

    fn test_and_body(&mut self, node: &ParseNode) -> ParseResult<(Box<Node>, Box<Node>)> {
        let test = Box::new(self.visit(self.expression_at(node, 0)?)?);
        let body = Box::new(self.visit(self.required(node, K::Statement)?)?);
        Ok((test, body))
    }

    fn visit_if(&mut self, node: &ParseNode) -> ParseResult<Node> {
        let test = Box::new(self.visit(self.expression_at(node, 0)?)?);
        let mut branches = node.child_nodes().filter(|n| n.kind == K::Statement);
        let consequent = branches
            .next()
            .ok_or_else(|| self.missing(node, "statement"))?;
        let alternate = branches.next();
        let consequent = Box::new(self.visit(consequent)?);
        let alternate = match alternate {
            Some(alt) => Some(Box::new(self.visit(alt)?)),
            None => None,
        };
        Ok(self.make(
            NodeKind::IfStatement {
                test,
                consequent,
                alternate,
            },
            node,
        ))
    }

    /// The `;` separators decide which clause a child belongs to.
    fn visit_for(&mut self, node: &ParseNode) -> ParseResult<Node> {
        let (mut init, mut test, mut update, mut body) = (None, None, None, None);
        let mut clause = 0;
        for child in &node.children {
            match child {
                ParseChild::Token(index) => match self.token(*index).kind {
                    TokenKind::SemiColon => clause += 1,
                    TokenKind::CloseParen => clause = 3,
                    _ => {}
                },
                ParseChild::Node(child) => {
                    let built = Some(Box::new(self.visit(child)?));
                    match clause {
                        0 => init = built,
                        1 => test = built,
                        2 => update = built,
                        _ => body = built,
                    }
                }
            }
        }
        let body = body.ok_or_else(|| self.missing(node, "statement"))?;
        Ok(self.make(
            NodeKind::ForStatement {
                init,
                test,
                update,
                body,
            },
            node,
        ))
    }

    fn visit_switch(&mut self, node: &ParseNode) -> ParseResult<Node> {
        let discriminant = Box::new(self.visit(self.expression_at(node, 0)?)?);
        let mut cases = Vec::new();
        for clause in node.child_nodes() {
            let test = match clause.kind {
                K::CaseClause => Some(Box::new(self.visit(self.expression_at(clause, 0)?)?)),
                K::DefaultClause => None,
                _ => continue,
            };
            let body = self.statement_list(clause.first_child(K::StatementList))?;
            cases.push(self.make(NodeKind::SwitchCase { test, body }, clause));
        }
        Ok(self.make(NodeKind::SwitchStatement { discriminant, cases }, node))
    }

    fn visit_try(&mut self, node: &ParseNode) -> ParseResult<Node> {
        let block = Box::new(self.visit(self.required(node, K::Block)?)?);
        let handler = match node.first_child(K::CatchProduction) {
            Some(catch) => {
                let clause = self.with_scope(ScopeKind::Catch, |b| {
                    let param = match catch.first_child(K::Identifier) {
                        Some(id) => {
                            let role = Role::declaration(IdentifierKind::Variable).with_tag("catchParameter");
                            Some(Box::new(b.with_role(role, |b| b.visit_identifier(id))?))
                        }
                        None => None,
                    };
                    let body = Box::new(b.visit(b.required(catch, K::Block)?)?);
                    Ok(b.make(NodeKind::CatchClause { param, body }, catch))
                })?;
                Some(Box::new(clause))
            }
            None => None,
        };
        let finalizer = match node.first_child(K::FinallyProduction) {
            Some(finally) => {
                let body = Box::new(self.visit(self.required(finally, K::Block)?)?);
                Some(Box::new(self.make(NodeKind::Finalizer { body }, finally)))
            }
            None => None,
        };
        Ok(self.make(
            NodeKind::TryStatement {
                block,
                handler,
                finalizer,
            },
            node,
        ))
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn visit_variable_declarations(&mut self, node: &ParseNode) -> ParseResult<Node> {
        let keyword = node
            .child_tokens()
            .next()
            .ok_or_else(|| self.missing(node, "keyword"))?;
        let kind = self.token_text(keyword);
        let tag = if kind == "static" { "static" } else { "local" };
        let mut declarations = Vec::new();
        for decl in node.child_nodes().filter(|n| n.kind == K::VariableDeclaration) {
            let id = self.required(decl, K::Identifier)?;
            let role = Role::declaration(IdentifierKind::Variable).with_tag(tag);
            let id = Box::new(self.with_role(role, |b| b.visit_identifier(id))?);
            let init = match decl.child_nodes().nth(1) {
                Some(init) => Some(Box::new(self.visit(init)?)),
                None => None,
            };
            declarations.push(self.make(NodeKind::VariableDeclarator { id, init }, decl));
        }
        Ok(self.make(NodeKind::VariableDeclaration { declarations, kind }, node))
    }

    fn visit_globalvar(&mut self, node: &ParseNode) -> ParseResult<Node> {
        let mut declarations = Vec::new();
        for id in node.child_nodes().filter(|n| n.kind == K::Identifier) {
            let role = Role::declaration(IdentifierKind::Variable)
                .with_tag("global")
                .global();
            let mut ident = self.with_role(role, |b| b.visit_identifier(id))?;
            self.globals.mark_global_identifier(&mut ident);
            declarations.push(self.make(
                NodeKind::VariableDeclarator {
                    id: Box::new(ident),
                    init: None,
                },
                id,
            ));
        }
        Ok(self.make(
            NodeKind::GlobalVarStatement {
                declarations,
                kind: "globalvar".to_string(),
            },
            node,
        ))
    }

    /// Function declarations and expressions, plain or constructor.
    fn visit_function(&mut self, node: &ParseNode) -> ParseResult<Node> {
        let clause = node.first_child(K::ConstructorClause);
        let id = match node.first_child(K::Identifier) {
            Some(id) => {
                let role = match clause {
                    Some(_) => Role::declaration(IdentifierKind::Struct).with_tag("constructor"),
                    None => Role::declaration(IdentifierKind::Variable).with_tag("function"),
                };
                Some(Box::new(self.with_role(role, |b| b.visit_identifier(id))?))
            }
            None => None,
        };
        let params = self.required(node, K::ParameterList)?;
        let body = self.required(node, K::Block)?;

        self.with_scope(ScopeKind::Function, |b| {
            let params = b.visit_parameters(params)?;
            let parent = match clause.and_then(|c| c.first_child(K::Identifier).map(|id| (c, id))) {
                Some((clause, parent_id)) => {
                    let id = Box::new(
                        b.with_role(Role::reference(IdentifierKind::Struct), |b| b.visit_identifier(parent_id))?,
                    );
                    let params = match clause.first_child(K::Arguments) {
                        Some(args) => b.visit_arguments(args)?,
                        None => Vec::new(),
                    };
                    Some(Box::new(b.make(NodeKind::ConstructorParentClause { id, params }, clause)))
                }
                None => None,
            };
            let body = Box::new(b.visit(body)?);
            let kind = if clause.is_some() {
                NodeKind::ConstructorDeclaration {
                    id,
                    params,
                    parent,
                    body,
                }
            } else {
                NodeKind::FunctionDeclaration { id, params, body }
            };
            Ok(b.make(kind, node))
        })
    }

    fn visit_parameters(&mut self, list: &ParseNode) -> ParseResult<Vec<Node>> {
        let mut params = Vec::new();
        for param in list.child_nodes().filter(|n| n.kind == K::ParameterArgument) {
            let id = self.required(param, K::Identifier)?;
            let role = Role::declaration(IdentifierKind::Parameter);
            let id = self.with_role(role, |b| b.visit_identifier(id))?;
            let built = match param.child_nodes().nth(1) {
                Some(default) => {
                    let right = Box::new(self.visit(default)?);
                    self.make(
                        NodeKind::DefaultParameter {
                            left: Box::new(id),
                            right,
                        },
                        param,
                    )
                }
                None => id,
            };
            params.push(built);
        }
        Ok(params)
    }

    fn visit_enum(&mut self, node: &ParseNode) -> ParseResult<Node> {
        let name = self.required(node, K::Identifier)?;
        let role = Role::declaration(IdentifierKind::Enum).global();
        let name = Box::new(self.with_role(role, |b| b.visit_identifier(name))?);
        let mut members = Vec::new();
        for member in node.child_nodes().filter(|n| n.kind == K::Enumerator) {
            let id = self.required(member, K::Identifier)?;
            let role = Role::declaration(IdentifierKind::EnumMember);
            let member_name = Box::new(self.with_role(role, |b| b.visit_identifier(id))?);
            let initializer = match member.child_nodes().nth(1) {
                Some(init) => Some(Box::new(self.visit(init)?)),
                None => None,
            };
            members.push(self.make(
                NodeKind::EnumMember {
                    name: member_name,
                    initializer,
                },
                member,
            ));
        }
        let has_trailing_comma = self.has_trailing_comma(node);
        Ok(self.make(
            NodeKind::EnumDeclaration {
                name,
                members,
                has_trailing_comma,
            },
            node,
        ))
    }

    fn visit_macro(&mut self, node: &ParseNode) -> ParseResult<Node> {
        let name = self
            .tree
            .find_token(node, TokenKind::MacroName)
            .ok_or_else(|| self.missing(node, "macro name"))?;
        let role = Role::declaration(IdentifierKind::Macro).global();
        let mut name = self.with_role(role, |b| Ok(b.identifier_from_token(name)))?;
        self.globals.mark_global_identifier(&mut name);
        let tokens = self
            .tree
            .find_token(node, TokenKind::MacroBody)
            .map(|body| macro_lines(&self.token(body).text))
            .unwrap_or_default();
        Ok(self.make(
            NodeKind::MacroDeclaration {
                name: Box::new(name),
                tokens,
            },
            node,
        ))
    }

    fn visit_directive(&mut self, node: &ParseNode) -> ParseResult<Node> {
        let index = node
            .child_tokens()
            .next()
            .ok_or_else(|| self.missing(node, "directive"))?;
        let token = self.token(index);
        let prefix = match token.kind {
            TokenKind::Region => "#region",
            TokenKind::EndRegion => "#endregion",
            _ => "#define",
        };
        let name = token
            .text
            .strip_prefix(prefix)
            .unwrap_or(&token.text)
            .trim()
            .to_string();
        let kind = match token.kind {
            TokenKind::Region => NodeKind::RegionStatement { name },
            TokenKind::EndRegion => NodeKind::EndRegionStatement { name },
            _ => NodeKind::DefineStatement { name },
        };
        Ok(self.make(kind, node))
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn visit_assignment(&mut self, node: &ParseNode) -> ParseResult<Node> {
        let operator = node
            .child_tokens()
            .next()
            .ok_or_else(|| self.missing(node, "operator"))?;
        let operator = match self.token(operator).kind {
            TokenKind::Assign => "=".to_string(),
            _ => self.token_text(operator),
        };
        let left = Box::new(self.visit(self.expression_at(node, 0)?)?);
        let right = Box::new(self.visit(self.expression_at(node, 1)?)?);
        Ok(self.make(
            NodeKind::AssignmentExpression {
                operator,
                left,
                right,
            },
            node,
        ))
    }

    /// Increment/decrement in either position; the caller retags it.
    fn visit_inc_dec(&mut self, node: &ParseNode) -> ParseResult<Node> {
        let prefix = matches!(node.children.first(), Some(ParseChild::Token(_)));
        let operator = node
            .child_tokens()
            .next()
            .ok_or_else(|| self.missing(node, "operator"))?;
        let argument = Box::new(self.visit(self.expression_at(node, 0)?)?);
        Ok(self.make(
            NodeKind::IncDecExpression {
                operator: self.token_text(operator),
                prefix,
                argument,
            },
            node,
        ))
    }

    pub(crate) fn visit_identifier(&mut self, node: &ParseNode) -> ParseResult<Node> {
        let index = node
            .child_tokens()
            .next()
            .ok_or_else(|| self.missing(node, "identifier token"))?;
        Ok(self.identifier_from_token(index))
    }

    fn identifier_from_token(&mut self, index: usize) -> Node {
        let (start, end) = self.locate_range(index, Some(index));
        let mut ident = Node::identifier(self.token_text(index), start, end);
        self.tracker.record_identifier(&mut ident);
        self.globals.apply_global_identifiers_to_node(&mut ident);
        ident
    }

    /// A property name after `.`: stamped as global when registered, never
    /// resolved against scopes.
    fn property_identifier(&self, node: &ParseNode) -> ParseResult<Node> {
        let index = node
            .child_tokens()
            .next()
            .ok_or_else(|| self.missing(node, "identifier token"))?;
        let (start, end) = self.locate_range(index, Some(index));
        let mut ident = Node::identifier(self.token_text(index), start, end);
        self.globals.apply_global_identifiers_to_node(&mut ident);
        Ok(ident)
    }

    /// Fold `start (link)*` left to right; each link takes the expression
    /// built so far as its object.
    fn visit_chain(&mut self, node: &ParseNode) -> ParseResult<Node> {
        let mut links = node.child_nodes();
        let first = links.next().ok_or_else(|| self.missing(node, "expression"))?;
        let mut object = self.visit(first)?;
        for wrapper in links {
            let Some(link) = wrapper.child_nodes().next() else {
                tracing::warn!(
                    index = self.token(wrapper.start).start_index,
                    "chain link without an operator, skipped"
                );
                continue;
            };
            self.enter(link)?;
            let kind = match link.kind {
                K::MemberDotLValue => {
                    let property = self.required(link, K::Identifier)?;
                    NodeKind::MemberDotExpression {
                        object: Box::new(object),
                        property: Box::new(self.property_identifier(property)?),
                    }
                }
                K::MemberIndexLValue => {
                    let accessor = link
                        .child_tokens()
                        .next()
                        .ok_or_else(|| self.missing(link, "accessor"))?;
                    let mut property = Vec::new();
                    for index in link.expressions() {
                        property.push(self.visit(index)?);
                    }
                    NodeKind::MemberIndexExpression {
                        object: Box::new(object),
                        property,
                        accessor: self.token_text(accessor),
                    }
                }
                K::Arguments => NodeKind::CallExpression {
                    object: Box::new(object),
                    arguments: self.visit_arguments(link)?,
                },
                _ => return Err(self.unexpected(node, link)),
            };
            self.leave();
            let (start, end) = self.locate_range(node.start, link.stop.or(wrapper.stop));
            object = Node::new(kind, start, end);
        }
        Ok(object)
    }

    /// Call arguments; empty slots become `MissingOptionalArgument`.
    fn visit_arguments(&mut self, node: &ParseNode) -> ParseResult<Vec<Node>> {
        let mut arguments = Vec::new();
        let mut slot_open = true;
        let mut last_comma = None;
        for child in &node.children {
            match child {
                ParseChild::Token(index) => {
                    if self.token(*index).kind != TokenKind::Comma {
                        continue;
                    }
                    if slot_open {
                        arguments.push(self.make_at_token(NodeKind::MissingOptionalArgument, *index));
                    }
                    slot_open = true;
                    last_comma = Some(*index);
                }
                ParseChild::Node(arg) => {
                    arguments.push(self.visit(arg)?);
                    slot_open = false;
                }
            }
        }
        if let (true, Some(comma)) = (slot_open, last_comma) {
            arguments.push(self.make_at_token(NodeKind::MissingOptionalArgument, comma));
        }
        Ok(arguments)
    }

    fn visit_struct(&mut self, node: &ParseNode) -> ParseResult<Node> {
        let has_trailing_comma = self.has_trailing_comma(node);
        self.with_scope(ScopeKind::Struct, |b| {
            let mut properties = Vec::new();
            for property in node.child_nodes().filter(|n| n.kind == K::PropertyAssignment) {
                let mut parts = property.child_nodes();
                let name = parts.next().ok_or_else(|| b.missing(property, "property name"))?;
                let value = parts.next().ok_or_else(|| b.missing(property, "expression"))?;
                let name = match name.kind {
                    K::Identifier => {
                        let role = Role::declaration(IdentifierKind::Property);
                        b.with_role(role, |b| b.visit_identifier(name))?
                    }
                    _ => b.visit(name)?,
                };
                let value = b.visit(value)?;
                properties.push(b.make(
                    NodeKind::Property {
                        name: Box::new(name),
                        value: Box::new(value),
                    },
                    property,
                ));
            }
            Ok(b.make(
                NodeKind::StructExpression {
                    properties,
                    has_trailing_comma,
                },
                node,
            ))
        })
    }

    fn visit_template(&mut self, node: &ParseNode) -> ParseResult<Node> {
        let mut atoms = Vec::new();
        for child in &node.children {
            match child {
                ParseChild::Token(index) if self.token(*index).kind == TokenKind::TemplateStringText => {
                    atoms.push(self.make_at_token(
                        NodeKind::TemplateStringText {
                            value: self.token_text(*index),
                        },
                        *index,
                    ));
                }
                ParseChild::Token(_) => {}
                ParseChild::Node(atom) => {
                    atoms.push(self.visit(self.expression_at(atom, 0)?)?);
                }
            }
        }
        Ok(self.make(NodeKind::TemplateStringExpression { atoms }, node))
    }
}

/// The lines of a macro body, with continuation backslashes removed.
fn macro_lines(body: &str) -> Vec<String> {
    body.lines()
        .map(|line| line.trim_end().trim_end_matches('\\').trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

impl Recognizer for AstBuilder<'_> {
    fn rule_invocation_stack(&self) -> Vec<&'static str> {
        self.stack.iter().rev().map(|(kind, _)| kind.rule_name()).collect()
    }

    fn context_start(&self, depth: usize) -> Option<TokenPosition> {
        let index = self.stack.len().checked_sub(1 + depth)?;
        Some(self.position(self.stack[index].1))
    }
}
