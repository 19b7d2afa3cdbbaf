//! The grammar-shaped parse tree handed to the AST builder.

use gml_scanner::{Token, TokenKind};

/// One kind per grammar production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseNodeKind {
    Program,
    StatementList,
    Statement,
    Block,
    CloseBlock,
    EmptyStatement,
    IfStatement,
    ForStatement,
    WhileStatement,
    DoStatement,
    RepeatStatement,
    WithStatement,
    SwitchStatement,
    CaseClause,
    DefaultClause,
    TryStatement,
    CatchProduction,
    FinallyProduction,
    ReturnStatement,
    ExitStatement,
    BreakStatement,
    ContinueStatement,
    ThrowStatement,
    DeleteStatement,
    VariableDeclarationList,
    VariableDeclaration,
    GlobalVarStatement,
    FunctionDeclaration,
    ConstructorClause,
    ParameterList,
    ParameterArgument,
    EnumeratorDeclaration,
    Enumerator,
    MacroStatement,
    RegionStatement,
    DefineStatement,
    AssignmentExpression,
    IncDecStatement,
    CallStatement,
    ExpressionStatement,

    // -- Expressions --
    Expression,
    BinaryExpression,
    UnaryExpression,
    PreIncDecExpression,
    PostIncDecExpression,
    TernaryExpression,
    ParenthesizedExpression,
    NewExpression,
    LValueExpression,
    ChainOperator,
    FinalOperator,
    MemberDotLValue,
    MemberIndexLValue,
    Arguments,
    Identifier,
    Literal,
    ArrayLiteral,
    StructLiteral,
    PropertyAssignment,
    TemplateStringLiteral,
    TemplateStringAtom,
}

impl ParseNodeKind {
    /// The grammar rule name, as reported in syntax errors.
    pub fn rule_name(self) -> &'static str {
        use ParseNodeKind::*;
        match self {
            Program => "program",
            StatementList => "statementList",
            Statement => "statement",
            Block => "block",
            CloseBlock => "closeBlock",
            EmptyStatement => "emptyStatement",
            IfStatement => "ifStatement",
            ForStatement => "forStatement",
            WhileStatement => "whileStatement",
            DoStatement => "doStatement",
            RepeatStatement => "repeatStatement",
            WithStatement => "withStatement",
            SwitchStatement => "switchStatement",
            CaseClause => "caseClause",
            DefaultClause => "defaultClause",
            TryStatement => "tryStatement",
            CatchProduction => "catchProduction",
            FinallyProduction => "finallyProduction",
            ReturnStatement => "returnStatement",
            ExitStatement => "exitStatement",
            BreakStatement => "breakStatement",
            ContinueStatement => "continueStatement",
            ThrowStatement => "throwStatement",
            DeleteStatement => "deleteStatement",
            VariableDeclarationList => "variableDeclarationList",
            VariableDeclaration => "variableDeclaration",
            GlobalVarStatement => "globalVarStatement",
            FunctionDeclaration => "functionDeclaration",
            ConstructorClause => "constructorClause",
            ParameterList => "parameterList",
            ParameterArgument => "parameterArgument",
            EnumeratorDeclaration => "enumeratorDeclaration",
            Enumerator => "enumerator",
            MacroStatement => "macroStatement",
            RegionStatement => "regionStatement",
            DefineStatement => "defineStatement",
            AssignmentExpression => "assignmentExpression",
            IncDecStatement => "incDecStatement",
            CallStatement => "callStatement",
            ExpressionStatement => "expressionStatement",
            Expression => "expression",
            BinaryExpression => "binaryExpression",
            UnaryExpression => "unaryExpression",
            PreIncDecExpression | PostIncDecExpression => "incDecExpression",
            TernaryExpression => "ternaryExpression",
            ParenthesizedExpression => "parenthesizedExpression",
            NewExpression => "newExpression",
            LValueExpression => "lValueExpression",
            ChainOperator => "lValueChainOperator",
            FinalOperator => "lValueFinalOperator",
            MemberDotLValue => "memberDotLValue",
            MemberIndexLValue => "memberIndexLValue",
            Arguments => "arguments",
            Identifier => "identifier",
            Literal => "literal",
            ArrayLiteral => "arrayLiteral",
            StructLiteral => "structLiteral",
            PropertyAssignment => "propertyAssignment",
            TemplateStringLiteral => "templateStringLiteral",
            TemplateStringAtom => "templateStringAtom",
        }
    }

    /// Whether this production yields a value.
    pub fn is_expression(self) -> bool {
        use ParseNodeKind::*;
        matches!(
            self,
            Expression
                | BinaryExpression
                | UnaryExpression
                | PreIncDecExpression
                | PostIncDecExpression
                | TernaryExpression
                | ParenthesizedExpression
                | NewExpression
                | LValueExpression
                | Identifier
                | Literal
                | ArrayLiteral
                | StructLiteral
                | TemplateStringLiteral
                | FunctionDeclaration
        )
    }
}

/// A child of a parse node: a nested rule or a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseChild {
    Node(ParseNode),
    /// Index into [`ParseTree::tokens`].
    Token(usize),
}

/// A matched grammar rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNode {
    pub kind: ParseNodeKind,
    pub children: Vec<ParseChild>,
    /// Index of the first token of the rule.
    pub start: usize,
    /// Index of the last token of the rule, `None` when it matched nothing.
    pub stop: Option<usize>,
}

impl ParseNode {
    pub fn new(kind: ParseNodeKind, start: usize) -> Self {
        Self {
            kind,
            children: Vec::new(),
            start,
            stop: None,
        }
    }

    /// Nested rule nodes, in order.
    pub fn child_nodes(&self) -> impl Iterator<Item = &ParseNode> {
        self.children.iter().filter_map(|child| match child {
            ParseChild::Node(node) => Some(node),
            ParseChild::Token(_) => None,
        })
    }

    /// Token indices of direct token children, in order.
    pub fn child_tokens(&self) -> impl Iterator<Item = usize> + '_ {
        self.children.iter().filter_map(|child| match child {
            ParseChild::Token(index) => Some(*index),
            ParseChild::Node(_) => None,
        })
    }

    /// The first nested rule of `kind`.
    pub fn first_child(&self, kind: ParseNodeKind) -> Option<&ParseNode> {
        self.child_nodes().find(|node| node.kind == kind)
    }

    /// The first nested rule whose kind appears in `kinds`, probing `kinds`
    /// in priority order.
    pub fn first_child_of(&self, kinds: &[ParseNodeKind]) -> Option<&ParseNode> {
        kinds.iter().find_map(|kind| self.first_child(*kind))
    }

    /// Nested rules that yield values.
    pub fn expressions(&self) -> impl Iterator<Item = &ParseNode> {
        self.child_nodes().filter(|node| node.kind.is_expression())
    }
}

/// The parse tree together with the token stream it indexes.
#[derive(Debug, Clone)]
pub struct ParseTree {
    /// Every token, hidden ones included.
    pub tokens: Vec<Token>,
    pub root: ParseNode,
}

impl ParseTree {
    #[inline]
    pub fn token(&self, index: usize) -> &Token {
        &self.tokens[index]
    }

    /// Index of the first direct token child of `node` with the given kind.
    pub fn find_token(&self, node: &ParseNode, kind: TokenKind) -> Option<usize> {
        node.child_tokens().find(|index| self.tokens[*index].kind == kind)
    }
}
