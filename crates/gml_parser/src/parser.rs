//! The GML parser.
//!
//! A recursive-descent parser that turns the scanner's token stream into a
//! grammar-shaped [`ParseTree`]. Hidden tokens stay in the stream but are
//! skipped by the parser. The first mismatch is reported through the
//! [`SyntaxErrorListener`] and ends the parse.

use crate::parse_tree::{ParseChild, ParseNode, ParseNodeKind as K, ParseTree};
use crate::precedence::{binary_operator_info, Associativity};
use gml_diagnostics::{OffendingSymbol, Recognizer, SyntaxError, SyntaxErrorListener, TokenPosition};
use gml_scanner::{Token, TokenKind as T};

/// Default bound on rule nesting.
pub const DEFAULT_MAX_DEPTH: u32 = 256;

type PResult<N> = Result<N, SyntaxError>;

/// Parse a full token stream (hidden tokens included) into a parse tree.
pub fn parse(tokens: Vec<Token>) -> PResult<ParseTree> {
    Parser::new(tokens).parse_program()
}

/// The parser state.
pub struct Parser {
    /// Every token, hidden ones included.
    tokens: Vec<Token>,
    /// Indices of the significant tokens. The last one is always `EndOfFile`.
    significant: Vec<usize>,
    /// Position in `significant`.
    pos: usize,
    /// Open rules with the token index they started at, innermost last.
    rule_stack: Vec<(K, usize)>,
    depth: u32,
    max_depth: u32,
    listener: SyntaxErrorListener,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(T::EndOfFile) {
            let (line, index) = tokens
                .last()
                .map_or((1, 0), |t| (t.end_location().line.unwrap_or(t.line), t.stop_index + 1));
            tokens.push(Token {
                kind: T::EndOfFile,
                text: "<EOF>".to_string(),
                line,
                column: 0,
                start_index: index,
                stop_index: index,
            });
        }
        let significant = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_hidden())
            .map(|(i, _)| i)
            .collect();
        Self {
            tokens,
            significant,
            pos: 0,
            rule_stack: Vec::new(),
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            listener: SyntaxErrorListener::new(),
        }
    }

    /// Bound rule nesting; deeper input is reported as a syntax error.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    // ========================================================================
    // Token access
    // ========================================================================

    #[inline]
    fn current_index(&self) -> usize {
        self.significant[self.pos.min(self.significant.len() - 1)]
    }

    #[inline]
    fn current(&self) -> &Token {
        &self.tokens[self.current_index()]
    }

    #[inline]
    fn kind(&self) -> T {
        self.current().kind
    }

    #[inline]
    fn at(&self, kind: T) -> bool {
        self.kind() == kind
    }

    fn at_any(&self, kinds: &[T]) -> bool {
        kinds.contains(&self.kind())
    }

    /// Consume the current token and return its index.
    fn bump(&mut self) -> usize {
        let index = self.current_index();
        if self.pos < self.significant.len() - 1 {
            self.pos += 1;
        }
        index
    }

    fn last_consumed(&self) -> Option<usize> {
        self.pos.checked_sub(1).map(|p| self.significant[p])
    }

    fn push_bump(&mut self, node: &mut ParseNode) -> usize {
        let index = self.bump();
        node.children.push(ParseChild::Token(index));
        index
    }

    fn expect(&mut self, kind: T, node: &mut ParseNode) -> PResult<usize> {
        if self.at(kind) {
            Ok(self.push_bump(node))
        } else {
            Err(self.error())
        }
    }

    fn eat(&mut self, kind: T, node: &mut ParseNode) -> bool {
        if self.at(kind) {
            self.push_bump(node);
            true
        } else {
            false
        }
    }

    // ========================================================================
    // Rule bookkeeping
    // ========================================================================

    fn start_node(&mut self, kind: K) -> PResult<ParseNode> {
        let start = self.current_index();
        self.rule_stack.push((kind, start));
        self.descend()?;
        Ok(ParseNode::new(kind, start))
    }

    fn finish_node(&mut self, mut node: ParseNode) -> ParseNode {
        self.rule_stack.pop();
        self.ascend();
        node.stop = self.last_consumed().filter(|stop| *stop >= node.start);
        node
    }

    fn descend(&mut self) -> PResult<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            let offending = self.offending(self.current_index());
            let at = self.position(self.current_index());
            let listener = self.listener;
            return Err(listener.depth_exceeded(&*self, Some(&offending), at));
        }
        Ok(())
    }

    fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn leaf(&mut self, kind: K) -> ParseNode {
        let index = self.bump();
        ParseNode {
            kind,
            children: vec![ParseChild::Token(index)],
            start: index,
            stop: Some(index),
        }
    }

    // ========================================================================
    // Errors
    // ========================================================================

    fn position(&self, index: usize) -> TokenPosition {
        let token = &self.tokens[index];
        TokenPosition {
            line: token.line,
            column: token.column,
            index: token.start_index,
        }
    }

    fn offending(&self, index: usize) -> OffendingSymbol {
        let token = &self.tokens[index];
        OffendingSymbol::Token {
            text: Some(token.text.clone()),
            is_eof: token.kind == T::EndOfFile,
        }
    }

    fn error(&self) -> SyntaxError {
        self.error_at(self.current_index())
    }

    fn error_at(&self, index: usize) -> SyntaxError {
        let offending = self.offending(index);
        let at = self.position(index);
        let message = format!("mismatched input '{}'", self.tokens[index]);
        self.listener.syntax_error(self, Some(&offending), at, &message)
    }

    // ========================================================================
    // Program and statements
    // ========================================================================

    /// Parse the whole program.
    pub fn parse_program(mut self) -> PResult<ParseTree> {
        let mut node = self.start_node(K::Program)?;
        let list = self.parse_statement_list()?;
        if !list.children.is_empty() {
            node.children.push(ParseChild::Node(list));
        }
        if !self.at(T::EndOfFile) {
            return Err(self.error());
        }
        let root = self.finish_node(node);
        tracing::trace!(tokens = self.tokens.len(), "parse_program");
        Ok(ParseTree {
            tokens: self.tokens,
            root,
        })
    }

    fn parse_statement_list(&mut self) -> PResult<ParseNode> {
        let mut node = self.start_node(K::StatementList)?;
        while !self.at_any(&[T::EndOfFile, T::CloseBrace, T::End, T::Case, T::Default]) {
            let statement = self.parse_statement()?;
            node.children.push(ParseChild::Node(statement));
        }
        Ok(self.finish_node(node))
    }

    fn parse_statement(&mut self) -> PResult<ParseNode> {
        tracing::trace!(pos = self.current().start_index, "parse_statement");
        let mut node = self.start_node(K::Statement)?;
        let inner = match self.kind() {
            T::OpenBrace | T::Begin => self.parse_block()?,
            T::SemiColon => {
                let mut empty = self.start_node(K::EmptyStatement)?;
                self.push_bump(&mut empty);
                self.finish_node(empty)
            }
            T::If => self.parse_if_statement()?,
            T::For => self.parse_for_statement()?,
            T::While => self.parse_keyword_expression_statement(K::WhileStatement)?,
            T::Repeat => self.parse_keyword_expression_statement(K::RepeatStatement)?,
            T::With => self.parse_keyword_expression_statement(K::WithStatement)?,
            T::Do => self.parse_do_statement()?,
            T::Switch => self.parse_switch_statement()?,
            T::Try => self.parse_try_statement()?,
            T::Return => self.parse_return_statement()?,
            T::Exit => self.parse_keyword_only(K::ExitStatement)?,
            T::Break => self.parse_keyword_only(K::BreakStatement)?,
            T::Continue => self.parse_keyword_only(K::ContinueStatement)?,
            T::Throw => self.parse_keyword_argument(K::ThrowStatement)?,
            T::Delete => self.parse_keyword_argument(K::DeleteStatement)?,
            T::Var | T::Static => self.parse_variable_declaration_list()?,
            T::GlobalVar => self.parse_global_var_statement()?,
            T::Function => self.parse_function()?,
            T::Enum => self.parse_enum_declaration()?,
            T::Macro => self.parse_macro_statement()?,
            T::Region | T::EndRegion => self.parse_directive(K::RegionStatement)?,
            T::Define => self.parse_directive(K::DefineStatement)?,
            _ => self.parse_simple_statement()?,
        };
        let is_empty = inner.kind == K::EmptyStatement;
        node.children.push(ParseChild::Node(inner));
        if !is_empty {
            self.eat(T::SemiColon, &mut node);
        }
        Ok(self.finish_node(node))
    }

    fn parse_block(&mut self) -> PResult<ParseNode> {
        let mut node = self.start_node(K::Block)?;
        self.push_bump(&mut node);
        let list = self.parse_statement_list()?;
        if !list.children.is_empty() {
            node.children.push(ParseChild::Node(list));
        }
        self.parse_close_block(&mut node)?;
        Ok(self.finish_node(node))
    }

    /// Match the `}` (or `end`) closing `block`.
    fn parse_close_block(&mut self, block: &mut ParseNode) -> PResult<()> {
        let close = self.start_node(K::CloseBlock)?;
        if !self.at_any(&[T::CloseBrace, T::End]) {
            return Err(self.error());
        }
        let index = self.bump();
        self.finish_node(close);
        block.children.push(ParseChild::Token(index));
        Ok(())
    }

    fn parse_if_statement(&mut self) -> PResult<ParseNode> {
        let mut node = self.start_node(K::IfStatement)?;
        self.push_bump(&mut node);
        let test = self.parse_expression()?;
        node.children.push(ParseChild::Node(test));
        self.eat(T::Then, &mut node);
        let consequent = self.parse_statement()?;
        node.children.push(ParseChild::Node(consequent));
        if self.eat(T::Else, &mut node) {
            let alternate = self.parse_statement()?;
            node.children.push(ParseChild::Node(alternate));
        }
        Ok(self.finish_node(node))
    }

    /// `for ( init? ; test? ; update? ) statement`
    fn parse_for_statement(&mut self) -> PResult<ParseNode> {
        let mut node = self.start_node(K::ForStatement)?;
        self.push_bump(&mut node);
        self.expect(T::OpenParen, &mut node)?;
        if self.at_any(&[T::Var, T::Static]) {
            let init = self.parse_variable_declaration_list()?;
            node.children.push(ParseChild::Node(init));
        } else if !self.at(T::SemiColon) {
            let init = self.parse_simple_statement()?;
            node.children.push(ParseChild::Node(init));
        }
        self.expect(T::SemiColon, &mut node)?;
        if !self.at(T::SemiColon) {
            let test = self.parse_expression()?;
            node.children.push(ParseChild::Node(test));
        }
        self.expect(T::SemiColon, &mut node)?;
        if !self.at(T::CloseParen) {
            let update = self.parse_simple_statement()?;
            node.children.push(ParseChild::Node(update));
        }
        self.expect(T::CloseParen, &mut node)?;
        let body = self.parse_statement()?;
        node.children.push(ParseChild::Node(body));
        Ok(self.finish_node(node))
    }

    /// `while`, `repeat` and `with`: keyword, expression, statement.
    fn parse_keyword_expression_statement(&mut self, kind: K) -> PResult<ParseNode> {
        let mut node = self.start_node(kind)?;
        self.push_bump(&mut node);
        let expr = self.parse_expression()?;
        node.children.push(ParseChild::Node(expr));
        let body = self.parse_statement()?;
        node.children.push(ParseChild::Node(body));
        Ok(self.finish_node(node))
    }

    fn parse_do_statement(&mut self) -> PResult<ParseNode> {
        let mut node = self.start_node(K::DoStatement)?;
        self.push_bump(&mut node);
        let body = self.parse_statement()?;
        node.children.push(ParseChild::Node(body));
        self.expect(T::Until, &mut node)?;
        let test = self.parse_expression()?;
        node.children.push(ParseChild::Node(test));
        Ok(self.finish_node(node))
    }

    fn parse_switch_statement(&mut self) -> PResult<ParseNode> {
        let mut node = self.start_node(K::SwitchStatement)?;
        self.push_bump(&mut node);
        let discriminant = self.parse_expression()?;
        node.children.push(ParseChild::Node(discriminant));
        let open = self.expect(T::OpenBrace, &mut node)?;
        // An unclosed switch reports its `{`, the way a block does.
        if let Some(context) = self.rule_stack.last_mut() {
            context.1 = open;
        }
        loop {
            let clause = match self.kind() {
                T::Case => {
                    let mut clause = self.start_node(K::CaseClause)?;
                    self.push_bump(&mut clause);
                    let test = self.parse_expression()?;
                    clause.children.push(ParseChild::Node(test));
                    self.expect(T::Colon, &mut clause)?;
                    clause
                }
                T::Default => {
                    let mut clause = self.start_node(K::DefaultClause)?;
                    self.push_bump(&mut clause);
                    self.expect(T::Colon, &mut clause)?;
                    clause
                }
                _ => break,
            };
            let mut clause = clause;
            let body = self.parse_statement_list()?;
            if !body.children.is_empty() {
                clause.children.push(ParseChild::Node(body));
            }
            let clause = self.finish_node(clause);
            node.children.push(ParseChild::Node(clause));
        }
        self.parse_close_block(&mut node)?;
        Ok(self.finish_node(node))
    }

    fn parse_try_statement(&mut self) -> PResult<ParseNode> {
        let mut node = self.start_node(K::TryStatement)?;
        self.push_bump(&mut node);
        let block = self.parse_required_block()?;
        node.children.push(ParseChild::Node(block));
        if self.at(T::Catch) {
            let mut catch = self.start_node(K::CatchProduction)?;
            self.push_bump(&mut catch);
            if self.eat(T::OpenParen, &mut catch) {
                if self.at(T::Identifier) {
                    let param = self.leaf(K::Identifier);
                    catch.children.push(ParseChild::Node(param));
                }
                self.expect(T::CloseParen, &mut catch)?;
            }
            let body = self.parse_required_block()?;
            catch.children.push(ParseChild::Node(body));
            let catch = self.finish_node(catch);
            node.children.push(ParseChild::Node(catch));
        }
        if self.at(T::Finally) {
            let mut finally = self.start_node(K::FinallyProduction)?;
            self.push_bump(&mut finally);
            let body = self.parse_required_block()?;
            finally.children.push(ParseChild::Node(body));
            let finally = self.finish_node(finally);
            node.children.push(ParseChild::Node(finally));
        }
        Ok(self.finish_node(node))
    }

    fn parse_required_block(&mut self) -> PResult<ParseNode> {
        if self.at_any(&[T::OpenBrace, T::Begin]) {
            self.parse_block()
        } else {
            Err(self.error())
        }
    }

    fn parse_return_statement(&mut self) -> PResult<ParseNode> {
        let mut node = self.start_node(K::ReturnStatement)?;
        self.push_bump(&mut node);
        if self.can_start_expression() {
            let argument = self.parse_expression()?;
            node.children.push(ParseChild::Node(argument));
        }
        Ok(self.finish_node(node))
    }

    fn parse_keyword_only(&mut self, kind: K) -> PResult<ParseNode> {
        let mut node = self.start_node(kind)?;
        self.push_bump(&mut node);
        Ok(self.finish_node(node))
    }

    fn parse_keyword_argument(&mut self, kind: K) -> PResult<ParseNode> {
        let mut node = self.start_node(kind)?;
        self.push_bump(&mut node);
        let argument = self.parse_expression()?;
        node.children.push(ParseChild::Node(argument));
        Ok(self.finish_node(node))
    }

    /// `var a = 1, b` or `static c = 2`
    fn parse_variable_declaration_list(&mut self) -> PResult<ParseNode> {
        let mut node = self.start_node(K::VariableDeclarationList)?;
        self.push_bump(&mut node);
        loop {
            let mut decl = self.start_node(K::VariableDeclaration)?;
            if !self.at(T::Identifier) {
                return Err(self.error());
            }
            let id = self.leaf(K::Identifier);
            decl.children.push(ParseChild::Node(id));
            if self.eat(T::Assign, &mut decl) {
                let init = self.parse_expression()?;
                decl.children.push(ParseChild::Node(init));
            }
            let decl = self.finish_node(decl);
            node.children.push(ParseChild::Node(decl));
            if !self.eat(T::Comma, &mut node) {
                break;
            }
        }
        Ok(self.finish_node(node))
    }

    fn parse_global_var_statement(&mut self) -> PResult<ParseNode> {
        let mut node = self.start_node(K::GlobalVarStatement)?;
        self.push_bump(&mut node);
        loop {
            if !self.at(T::Identifier) {
                return Err(self.error());
            }
            let id = self.leaf(K::Identifier);
            node.children.push(ParseChild::Node(id));
            if !self.eat(T::Comma, &mut node) {
                break;
            }
        }
        Ok(self.finish_node(node))
    }

    /// `function name? (params) (: Parent(args))? constructor? block`
    fn parse_function(&mut self) -> PResult<ParseNode> {
        let mut node = self.start_node(K::FunctionDeclaration)?;
        self.push_bump(&mut node);
        if self.at(T::Identifier) {
            let id = self.leaf(K::Identifier);
            node.children.push(ParseChild::Node(id));
        }
        let params = self.parse_parameter_list()?;
        node.children.push(ParseChild::Node(params));
        if self.at_any(&[T::Colon, T::Constructor]) {
            let mut clause = self.start_node(K::ConstructorClause)?;
            if self.eat(T::Colon, &mut clause) {
                if !self.at(T::Identifier) {
                    return Err(self.error());
                }
                let parent = self.leaf(K::Identifier);
                clause.children.push(ParseChild::Node(parent));
                let args = self.parse_arguments()?;
                clause.children.push(ParseChild::Node(args));
            }
            self.expect(T::Constructor, &mut clause)?;
            let clause = self.finish_node(clause);
            node.children.push(ParseChild::Node(clause));
        }
        let body = self.parse_required_block()?;
        node.children.push(ParseChild::Node(body));
        Ok(self.finish_node(node))
    }

    fn parse_parameter_list(&mut self) -> PResult<ParseNode> {
        let mut node = self.start_node(K::ParameterList)?;
        self.expect(T::OpenParen, &mut node)?;
        while !self.at(T::CloseParen) {
            if !self.at(T::Identifier) {
                return Err(self.error());
            }
            let mut param = self.start_node(K::ParameterArgument)?;
            let id = self.leaf(K::Identifier);
            param.children.push(ParseChild::Node(id));
            if self.eat(T::Assign, &mut param) {
                let default = self.parse_expression()?;
                param.children.push(ParseChild::Node(default));
            }
            let param = self.finish_node(param);
            node.children.push(ParseChild::Node(param));
            if !self.eat(T::Comma, &mut node) {
                break;
            }
        }
        self.expect(T::CloseParen, &mut node)?;
        Ok(self.finish_node(node))
    }

    /// `enum Name { A, B = 2, }`
    fn parse_enum_declaration(&mut self) -> PResult<ParseNode> {
        let mut node = self.start_node(K::EnumeratorDeclaration)?;
        self.push_bump(&mut node);
        if !self.at(T::Identifier) {
            return Err(self.error());
        }
        let name = self.leaf(K::Identifier);
        node.children.push(ParseChild::Node(name));
        self.expect(T::OpenBrace, &mut node)?;
        while self.at(T::Identifier) {
            let mut member = self.start_node(K::Enumerator)?;
            let id = self.leaf(K::Identifier);
            member.children.push(ParseChild::Node(id));
            if self.eat(T::Assign, &mut member) {
                let value = self.parse_expression()?;
                member.children.push(ParseChild::Node(value));
            }
            let member = self.finish_node(member);
            node.children.push(ParseChild::Node(member));
            if !self.eat(T::Comma, &mut node) {
                break;
            }
        }
        self.expect(T::CloseBrace, &mut node)?;
        Ok(self.finish_node(node))
    }

    fn parse_macro_statement(&mut self) -> PResult<ParseNode> {
        let mut node = self.start_node(K::MacroStatement)?;
        self.push_bump(&mut node);
        self.expect(T::MacroName, &mut node)?;
        self.eat(T::MacroBody, &mut node);
        Ok(self.finish_node(node))
    }

    fn parse_directive(&mut self, kind: K) -> PResult<ParseNode> {
        let mut node = self.start_node(kind)?;
        self.push_bump(&mut node);
        Ok(self.finish_node(node))
    }

    /// Assignment, increment/decrement, call, or a bare addressable expression.
    fn parse_simple_statement(&mut self) -> PResult<ParseNode> {
        if self.at_any(&[T::PlusPlus, T::MinusMinus]) {
            let mut node = self.start_node(K::IncDecStatement)?;
            let op = self.push_bump(&mut node);
            let target = self.parse_chain()?;
            if !is_addressable(&target) {
                return Err(self.error_at(op));
            }
            node.children.push(ParseChild::Node(target));
            return Ok(self.finish_node(node));
        }

        let start = self.current_index();
        let target = self.parse_chain()?;
        if self.current().kind.is_assignment_operator() {
            let mut node = self.start_node(K::AssignmentExpression)?;
            node.start = start;
            node.children.push(ParseChild::Node(target));
            self.push_bump(&mut node);
            let value = self.parse_expression()?;
            node.children.push(ParseChild::Node(value));
            return Ok(self.finish_node(node));
        }
        if self.at_any(&[T::PlusPlus, T::MinusMinus]) {
            let mut node = self.start_node(K::IncDecStatement)?;
            node.start = start;
            if !is_addressable(&target) {
                return Err(self.error());
            }
            node.children.push(ParseChild::Node(target));
            self.push_bump(&mut node);
            return Ok(self.finish_node(node));
        }

        let kind = if is_call(&target) {
            K::CallStatement
        } else if matches!(
            target.kind,
            K::Identifier | K::LValueExpression | K::NewExpression | K::FunctionDeclaration
        ) && self.at_statement_end()
        {
            K::ExpressionStatement
        } else {
            return Err(self.error());
        };
        let mut node = ParseNode::new(kind, start);
        node.stop = target.stop;
        node.children.push(ParseChild::Node(target));
        Ok(node)
    }

    fn at_statement_end(&self) -> bool {
        if self.at_any(&[T::SemiColon, T::CloseBrace, T::End, T::EndOfFile]) {
            return true;
        }
        // A statement may also end at a line break.
        match self.last_consumed() {
            Some(prev) => self.current().line > self.tokens[prev].end_location().line.unwrap_or(0),
            None => false,
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn can_start_expression(&self) -> bool {
        matches!(
            self.kind(),
            T::Identifier
                | T::DecimalLiteral
                | T::HexIntegerLiteral
                | T::BinaryLiteral
                | T::StringLiteral
                | T::VerbatimStringLiteral
                | T::TemplateStringStart
                | T::BooleanLiteral
                | T::Undefined
                | T::NoOne
                | T::OpenParen
                | T::OpenBracket
                | T::OpenBrace
                | T::Function
                | T::New
                | T::Not
                | T::BitNot
                | T::Minus
                | T::Plus
                | T::PlusPlus
                | T::MinusMinus
        )
    }

    fn parse_expression(&mut self) -> PResult<ParseNode> {
        let _ = self.start_node(K::Expression)?;
        let expr = self.parse_ternary()?;
        self.rule_stack.pop();
        self.ascend();
        Ok(expr)
    }

    fn parse_ternary(&mut self) -> PResult<ParseNode> {
        let start = self.current_index();
        let test = self.parse_binary(1)?;
        if !self.at(T::QuestionMark) {
            return Ok(test);
        }
        let mut node = self.start_node(K::TernaryExpression)?;
        node.start = start;
        node.children.push(ParseChild::Node(test));
        self.push_bump(&mut node);
        let consequent = self.parse_expression()?;
        node.children.push(ParseChild::Node(consequent));
        self.expect(T::Colon, &mut node)?;
        let alternate = self.parse_expression()?;
        node.children.push(ParseChild::Node(alternate));
        Ok(self.finish_node(node))
    }

    fn binary_operator(&self) -> Option<crate::precedence::OperatorInfo> {
        let token = self.current();
        let is_operator = matches!(
            token.kind,
            T::Plus
                | T::Minus
                | T::Multiply
                | T::Divide
                | T::IntegerDivide
                | T::Modulo
                | T::LeftShift
                | T::RightShift
                | T::LessThan
                | T::MoreThan
                | T::LessThanEquals
                | T::GreaterThanEquals
                | T::Equals
                | T::NotEquals
                | T::BitAnd
                | T::BitXOr
                | T::BitOr
                | T::And
                | T::Or
                | T::Xor
                | T::NullCoalesce
        );
        if is_operator {
            binary_operator_info(&token.text)
        } else {
            None
        }
    }

    /// Precedence climbing over the operator table.
    fn parse_binary(&mut self, min_precedence: u8) -> PResult<ParseNode> {
        self.descend()?;
        let start = self.current_index();
        let mut left = self.parse_unary()?;
        // Operators of one precedence level loop here; only operands that
        // recurse count against the depth bound.
        while let Some(info) = self.binary_operator() {
            if info.precedence < min_precedence {
                break;
            }
            let op = self.bump();
            let next_min = match info.associativity {
                Associativity::Left => info.precedence + 1,
                Associativity::Right => info.precedence,
            };
            let right = self.parse_binary(next_min)?;
            let stop = self.last_consumed();
            left = ParseNode {
                kind: K::BinaryExpression,
                children: vec![ParseChild::Node(left), ParseChild::Token(op), ParseChild::Node(right)],
                start,
                stop,
            };
        }
        self.ascend();
        Ok(left)
    }

    fn parse_unary(&mut self) -> PResult<ParseNode> {
        match self.kind() {
            T::Not | T::BitNot | T::Minus | T::Plus => {
                let mut node = self.start_node(K::UnaryExpression)?;
                self.push_bump(&mut node);
                let argument = self.parse_unary()?;
                node.children.push(ParseChild::Node(argument));
                Ok(self.finish_node(node))
            }
            T::PlusPlus | T::MinusMinus => {
                let mut node = self.start_node(K::PreIncDecExpression)?;
                let op = self.push_bump(&mut node);
                let target = self.parse_chain()?;
                if !is_addressable(&target) {
                    return Err(self.error_at(op));
                }
                node.children.push(ParseChild::Node(target));
                Ok(self.finish_node(node))
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> PResult<ParseNode> {
        let start = self.current_index();
        let expr = self.parse_chain()?;
        if !self.at_any(&[T::PlusPlus, T::MinusMinus]) {
            return Ok(expr);
        }
        let mut node = self.start_node(K::PostIncDecExpression)?;
        node.start = start;
        if !is_addressable(&expr) {
            return Err(self.error());
        }
        node.children.push(ParseChild::Node(expr));
        self.push_bump(&mut node);
        Ok(self.finish_node(node))
    }

    fn at_chain_operator(&self) -> bool {
        self.at(T::Dot) || self.at(T::OpenParen) || self.kind().is_accessor_open()
    }

    /// A primary expression followed by any number of `.name`, `[index]`
    /// and `(args)` links. A trailing dot or index link is the final operator.
    fn parse_chain(&mut self) -> PResult<ParseNode> {
        let start = self.current_index();
        let primary = self.parse_primary()?;
        if !self.at_chain_operator() {
            return Ok(primary);
        }
        let mut chain = self.start_node(K::LValueExpression)?;
        chain.start = start;
        chain.children.push(ParseChild::Node(primary));
        while self.at_chain_operator() {
            let mut link = self.start_node(K::ChainOperator)?;
            let op = match self.kind() {
                T::Dot => self.parse_member_dot()?,
                T::OpenParen => self.parse_arguments()?,
                _ => self.parse_member_index()?,
            };
            link.children.push(ParseChild::Node(op));
            let link = self.finish_node(link);
            chain.children.push(ParseChild::Node(link));
        }
        if let Some(ParseChild::Node(last)) = chain.children.last_mut() {
            if last.first_child(K::Arguments).is_none() {
                last.kind = K::FinalOperator;
            }
        }
        Ok(self.finish_node(chain))
    }

    fn parse_member_dot(&mut self) -> PResult<ParseNode> {
        let mut node = self.start_node(K::MemberDotLValue)?;
        self.push_bump(&mut node);
        if !self.at(T::Identifier) {
            return Err(self.error());
        }
        let property = self.leaf(K::Identifier);
        node.children.push(ParseChild::Node(property));
        Ok(self.finish_node(node))
    }

    fn parse_member_index(&mut self) -> PResult<ParseNode> {
        let mut node = self.start_node(K::MemberIndexLValue)?;
        self.push_bump(&mut node);
        loop {
            let index = self.parse_expression()?;
            node.children.push(ParseChild::Node(index));
            if !self.eat(T::Comma, &mut node) {
                break;
            }
        }
        self.expect(T::CloseBracket, &mut node)?;
        Ok(self.finish_node(node))
    }

    /// `( arg? (, arg?)* )` where any argument may be left out.
    fn parse_arguments(&mut self) -> PResult<ParseNode> {
        let mut node = self.start_node(K::Arguments)?;
        self.expect(T::OpenParen, &mut node)?;
        let mut expect_argument = true;
        while !self.at(T::CloseParen) {
            if self.eat(T::Comma, &mut node) {
                expect_argument = true;
                continue;
            }
            if !expect_argument {
                return Err(self.error());
            }
            let argument = self.parse_expression()?;
            node.children.push(ParseChild::Node(argument));
            expect_argument = false;
        }
        self.expect(T::CloseParen, &mut node)?;
        Ok(self.finish_node(node))
    }

    fn parse_primary(&mut self) -> PResult<ParseNode> {
        match self.kind() {
            T::Identifier => Ok(self.leaf(K::Identifier)),
            T::DecimalLiteral
            | T::HexIntegerLiteral
            | T::BinaryLiteral
            | T::StringLiteral
            | T::VerbatimStringLiteral
            | T::BooleanLiteral
            | T::Undefined
            | T::NoOne => Ok(self.leaf(K::Literal)),
            T::TemplateStringStart => self.parse_template_string(),
            T::OpenParen => {
                let mut node = self.start_node(K::ParenthesizedExpression)?;
                self.push_bump(&mut node);
                let inner = self.parse_expression()?;
                node.children.push(ParseChild::Node(inner));
                self.expect(T::CloseParen, &mut node)?;
                Ok(self.finish_node(node))
            }
            T::OpenBracket => self.parse_array_literal(),
            T::OpenBrace => self.parse_struct_literal(),
            T::Function => self.parse_function(),
            T::New => {
                let mut node = self.start_node(K::NewExpression)?;
                self.push_bump(&mut node);
                if !self.at(T::Identifier) {
                    return Err(self.error());
                }
                let id = self.leaf(K::Identifier);
                node.children.push(ParseChild::Node(id));
                if self.at(T::OpenParen) {
                    let args = self.parse_arguments()?;
                    node.children.push(ParseChild::Node(args));
                }
                Ok(self.finish_node(node))
            }
            _ => Err(self.error()),
        }
    }

    fn parse_array_literal(&mut self) -> PResult<ParseNode> {
        let mut node = self.start_node(K::ArrayLiteral)?;
        self.push_bump(&mut node);
        while !self.at(T::CloseBracket) {
            let element = self.parse_expression()?;
            node.children.push(ParseChild::Node(element));
            if !self.eat(T::Comma, &mut node) {
                break;
            }
        }
        self.expect(T::CloseBracket, &mut node)?;
        Ok(self.finish_node(node))
    }

    fn parse_struct_literal(&mut self) -> PResult<ParseNode> {
        let mut node = self.start_node(K::StructLiteral)?;
        self.push_bump(&mut node);
        while !self.at(T::CloseBrace) {
            let mut property = self.start_node(K::PropertyAssignment)?;
            let name = match self.kind() {
                T::Identifier => self.leaf(K::Identifier),
                T::StringLiteral => self.leaf(K::Literal),
                _ => return Err(self.error()),
            };
            property.children.push(ParseChild::Node(name));
            self.expect(T::Colon, &mut property)?;
            let value = self.parse_expression()?;
            property.children.push(ParseChild::Node(value));
            let property = self.finish_node(property);
            node.children.push(ParseChild::Node(property));
            if !self.eat(T::Comma, &mut node) {
                break;
            }
        }
        self.expect(T::CloseBrace, &mut node)?;
        Ok(self.finish_node(node))
    }

    fn parse_template_string(&mut self) -> PResult<ParseNode> {
        let mut node = self.start_node(K::TemplateStringLiteral)?;
        self.push_bump(&mut node);
        loop {
            match self.kind() {
                T::TemplateStringText => {
                    self.push_bump(&mut node);
                }
                T::TemplateStringStartExpression => {
                    let mut atom = self.start_node(K::TemplateStringAtom)?;
                    self.push_bump(&mut atom);
                    let expr = self.parse_expression()?;
                    atom.children.push(ParseChild::Node(expr));
                    self.expect(T::TemplateStringEndExpression, &mut atom)?;
                    let atom = self.finish_node(atom);
                    node.children.push(ParseChild::Node(atom));
                }
                _ => break,
            }
        }
        self.expect(T::TemplateStringEnd, &mut node)?;
        Ok(self.finish_node(node))
    }
}

/// Whether a parsed expression can be assigned to or incremented.
pub fn is_addressable(node: &ParseNode) -> bool {
    match node.kind {
        K::Identifier => true,
        K::LValueExpression => matches!(
            node.children.last(),
            Some(ParseChild::Node(last)) if last.kind == K::FinalOperator
        ),
        _ => false,
    }
}

/// Whether a parsed expression ends in a call.
pub fn is_call(node: &ParseNode) -> bool {
    node.kind == K::LValueExpression
        && matches!(
            node.children.last(),
            Some(ParseChild::Node(last)) if last.kind == K::ChainOperator
        )
}

impl Recognizer for Parser {
    fn rule_invocation_stack(&self) -> Vec<&'static str> {
        self.rule_stack.iter().rev().map(|(kind, _)| kind.rule_name()).collect()
    }

    fn context_start(&self, depth: usize) -> Option<TokenPosition> {
        let index = self.rule_stack.len().checked_sub(1 + depth)?;
        Some(self.position(self.rule_stack[index].1))
    }
}
