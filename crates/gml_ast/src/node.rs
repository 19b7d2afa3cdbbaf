//! AST node definitions.
//!
//! A [`Node`] owns its children exclusively: the tree never shares a node
//! between two parents, so every walk over it terminates.

use gml_core::Location;
use serde::Serialize;

/// A located AST node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    #[serde(flatten)]
    pub kind: NodeKind,
    pub start: Option<Location>,
    pub end: Option<Location>,
}

/// The source range of the declaration an identifier reference resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeclarationRange {
    pub start: Option<Location>,
    pub end: Option<Location>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Every node kind with its kind-specific fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum NodeKind {
    // -- Program and blocks --
    Program {
        body: Vec<Node>,
    },
    BlockStatement {
        body: Vec<Node>,
    },
    EmptyStatement,

    // -- Control flow --
    IfStatement {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Option<Box<Node>>,
    },
    ForStatement {
        init: Option<Box<Node>>,
        test: Option<Box<Node>>,
        update: Option<Box<Node>>,
        body: Box<Node>,
    },
    WhileStatement {
        test: Box<Node>,
        body: Box<Node>,
    },
    DoUntilStatement {
        body: Box<Node>,
        test: Box<Node>,
    },
    RepeatStatement {
        test: Box<Node>,
        body: Box<Node>,
    },
    WithStatement {
        object: Box<Node>,
        body: Box<Node>,
    },
    SwitchStatement {
        discriminant: Box<Node>,
        cases: Vec<Node>,
    },
    SwitchCase {
        /// `None` for the `default` clause.
        test: Option<Box<Node>>,
        body: Vec<Node>,
    },
    TryStatement {
        block: Box<Node>,
        handler: Option<Box<Node>>,
        finalizer: Option<Box<Node>>,
    },
    CatchClause {
        param: Option<Box<Node>>,
        body: Box<Node>,
    },
    Finalizer {
        body: Box<Node>,
    },
    ReturnStatement {
        argument: Option<Box<Node>>,
    },
    ExitStatement,
    BreakStatement,
    ContinueStatement,
    ThrowStatement {
        argument: Box<Node>,
    },
    DeleteStatement {
        argument: Box<Node>,
    },

    // -- Declarations --
    VariableDeclaration {
        declarations: Vec<Node>,
        /// `var` or `static`.
        kind: String,
    },
    VariableDeclarator {
        id: Box<Node>,
        init: Option<Box<Node>>,
    },
    GlobalVarStatement {
        declarations: Vec<Node>,
        kind: String,
    },
    FunctionDeclaration {
        id: Option<Box<Node>>,
        params: Vec<Node>,
        body: Box<Node>,
    },
    ConstructorDeclaration {
        id: Option<Box<Node>>,
        params: Vec<Node>,
        parent: Option<Box<Node>>,
        body: Box<Node>,
    },
    ConstructorParentClause {
        id: Box<Node>,
        params: Vec<Node>,
    },
    DefaultParameter {
        left: Box<Node>,
        right: Box<Node>,
    },
    EnumDeclaration {
        name: Box<Node>,
        members: Vec<Node>,
        #[serde(skip_serializing_if = "is_false")]
        has_trailing_comma: bool,
    },
    EnumMember {
        name: Box<Node>,
        initializer: Option<Box<Node>>,
    },
    MacroDeclaration {
        name: Box<Node>,
        /// The raw macro body text.
        tokens: Vec<String>,
    },
    RegionStatement {
        name: String,
    },
    EndRegionStatement {
        name: String,
    },
    DefineStatement {
        name: String,
    },

    // -- Expressions --
    AssignmentExpression {
        operator: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    BinaryExpression {
        operator: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    UnaryExpression {
        operator: String,
        prefix: bool,
        argument: Box<Node>,
    },
    IncDecExpression {
        operator: String,
        prefix: bool,
        argument: Box<Node>,
    },
    IncDecStatement {
        operator: String,
        prefix: bool,
        argument: Box<Node>,
    },
    TernaryExpression {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Box<Node>,
    },
    CallExpression {
        object: Box<Node>,
        arguments: Vec<Node>,
    },
    NewExpression {
        expression: Box<Node>,
        arguments: Vec<Node>,
    },
    MemberDotExpression {
        object: Box<Node>,
        property: Box<Node>,
    },
    MemberIndexExpression {
        object: Box<Node>,
        property: Vec<Node>,
        /// The accessor opener: `[`, `[|`, `[?`, `[#`, `[@` or `[$`.
        accessor: String,
    },
    ParenthesizedExpression {
        expression: Box<Node>,
        /// Inserted by the builder to preserve evaluation order, not present in source.
        #[serde(skip_serializing_if = "is_false")]
        synthetic: bool,
    },
    Identifier {
        name: String,
        #[serde(skip_serializing_if = "is_false")]
        is_global_identifier: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        scope_id: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        declaration: Option<DeclarationRange>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        classifications: Vec<String>,
    },
    Literal {
        value: String,
    },
    TemplateStringExpression {
        atoms: Vec<Node>,
    },
    TemplateStringText {
        value: String,
    },
    ArrayExpression {
        elements: Vec<Node>,
        #[serde(skip_serializing_if = "is_false")]
        has_trailing_comma: bool,
    },
    StructExpression {
        properties: Vec<Node>,
        #[serde(skip_serializing_if = "is_false")]
        has_trailing_comma: bool,
    },
    Property {
        name: Box<Node>,
        value: Box<Node>,
    },
    MissingOptionalArgument,
}

impl Node {
    /// Create a new node.
    #[inline]
    pub fn new(kind: NodeKind, start: Option<Location>, end: Option<Location>) -> Self {
        Self { kind, start, end }
    }

    /// Create a plain identifier node.
    pub fn identifier(name: impl Into<String>, start: Option<Location>, end: Option<Location>) -> Self {
        Self::new(
            NodeKind::Identifier {
                name: name.into(),
                is_global_identifier: false,
                scope_id: None,
                declaration: None,
                classifications: Vec::new(),
            },
            start,
            end,
        )
    }

    /// The `type` string this node serializes with.
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// The identifier name, if this is an identifier.
    pub fn identifier_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Identifier { name, .. } => Some(name),
            _ => None,
        }
    }

    /// The operator of a binary expression.
    pub fn binary_operator(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::BinaryExpression { operator, .. } => Some(operator),
            _ => None,
        }
    }

    /// Wrap this node in parentheses spanning the same range.
    pub fn into_parenthesized(self, synthetic: bool) -> Node {
        let (start, end) = (self.start, self.end);
        Node::new(
            NodeKind::ParenthesizedExpression {
                expression: Box::new(self),
                synthetic,
            },
            start,
            end,
        )
    }

    /// Retag an increment/decrement node between its expression and statement
    /// forms, keeping operator and prefix information. Other nodes are returned
    /// unchanged.
    pub fn retag_inc_dec(self, as_statement: bool) -> Node {
        let Node { kind, start, end } = self;
        let kind = match kind {
            NodeKind::IncDecExpression {
                operator,
                prefix,
                argument,
            }
            | NodeKind::IncDecStatement {
                operator,
                prefix,
                argument,
            } => {
                if as_statement {
                    NodeKind::IncDecStatement {
                        operator,
                        prefix,
                        argument,
                    }
                } else {
                    NodeKind::IncDecExpression {
                        operator,
                        prefix,
                        argument,
                    }
                }
            }
            other => other,
        };
        Node { kind, start, end }
    }

    /// Call `f` on each direct child, in source order.
    pub fn for_each_child<'a>(&'a self, f: &mut dyn FnMut(&'a Node)) {
        use NodeKind::*;
        fn opt<'a>(node: &'a Option<Box<Node>>, f: &mut dyn FnMut(&'a Node)) {
            if let Some(node) = node {
                f(node);
            }
        }
        fn list<'a>(nodes: &'a [Node], f: &mut dyn FnMut(&'a Node)) {
            for node in nodes {
                f(node);
            }
        }
        match &self.kind {
            Program { body } | BlockStatement { body } => list(body, f),
            IfStatement {
                test,
                consequent,
                alternate,
            } => {
                f(test);
                f(consequent);
                opt(alternate, f);
            }
            ForStatement {
                init,
                test,
                update,
                body,
            } => {
                opt(init, f);
                opt(test, f);
                opt(update, f);
                f(body);
            }
            WhileStatement { test, body } | RepeatStatement { test, body } => {
                f(test);
                f(body);
            }
            DoUntilStatement { body, test } => {
                f(body);
                f(test);
            }
            WithStatement { object, body } => {
                f(object);
                f(body);
            }
            SwitchStatement {
                discriminant,
                cases,
            } => {
                f(discriminant);
                list(cases, f);
            }
            SwitchCase { test, body } => {
                opt(test, f);
                list(body, f);
            }
            TryStatement {
                block,
                handler,
                finalizer,
            } => {
                f(block);
                opt(handler, f);
                opt(finalizer, f);
            }
            CatchClause { param, body } => {
                opt(param, f);
                f(body);
            }
            Finalizer { body } => f(body),
            ReturnStatement { argument } => opt(argument, f),
            ThrowStatement { argument } | DeleteStatement { argument } => f(argument),
            VariableDeclaration { declarations, .. } | GlobalVarStatement { declarations, .. } => {
                list(declarations, f)
            }
            VariableDeclarator { id, init } => {
                f(id);
                opt(init, f);
            }
            FunctionDeclaration { id, params, body } => {
                opt(id, f);
                list(params, f);
                f(body);
            }
            ConstructorDeclaration {
                id,
                params,
                parent,
                body,
            } => {
                opt(id, f);
                list(params, f);
                opt(parent, f);
                f(body);
            }
            ConstructorParentClause { id, params } => {
                f(id);
                list(params, f);
            }
            DefaultParameter { left, right }
            | AssignmentExpression { left, right, .. }
            | BinaryExpression { left, right, .. } => {
                f(left);
                f(right);
            }
            EnumDeclaration { name, members, .. } => {
                f(name);
                list(members, f);
            }
            EnumMember { name, initializer } => {
                f(name);
                opt(initializer, f);
            }
            MacroDeclaration { name, .. } => f(name),
            UnaryExpression { argument, .. }
            | IncDecExpression { argument, .. }
            | IncDecStatement { argument, .. } => f(argument),
            TernaryExpression {
                test,
                consequent,
                alternate,
            } => {
                f(test);
                f(consequent);
                f(alternate);
            }
            CallExpression { object, arguments } => {
                f(object);
                list(arguments, f);
            }
            NewExpression {
                expression,
                arguments,
            } => {
                f(expression);
                list(arguments, f);
            }
            MemberDotExpression { object, property } => {
                f(object);
                f(property);
            }
            MemberIndexExpression {
                object, property, ..
            } => {
                f(object);
                list(property, f);
            }
            ParenthesizedExpression { expression, .. } => f(expression),
            TemplateStringExpression { atoms } => list(atoms, f),
            ArrayExpression { elements, .. } => list(elements, f),
            StructExpression { properties, .. } => list(properties, f),
            Property { name, value } => {
                f(name);
                f(value);
            }
            EmptyStatement
            | ExitStatement
            | BreakStatement
            | ContinueStatement
            | RegionStatement { .. }
            | EndRegionStatement { .. }
            | DefineStatement { .. }
            | Identifier { .. }
            | Literal { .. }
            | TemplateStringText { .. }
            | MissingOptionalArgument => {}
        }
    }

    /// Call `f` on each direct child mutably, in source order.
    pub fn for_each_child_mut(&mut self, f: &mut dyn FnMut(&mut Node)) {
        use NodeKind::*;
        fn opt(node: &mut Option<Box<Node>>, f: &mut dyn FnMut(&mut Node)) {
            if let Some(node) = node {
                f(node);
            }
        }
        fn list(nodes: &mut [Node], f: &mut dyn FnMut(&mut Node)) {
            for node in nodes {
                f(node);
            }
        }
        match &mut self.kind {
            Program { body } | BlockStatement { body } => list(body, f),
            IfStatement {
                test,
                consequent,
                alternate,
            } => {
                f(test);
                f(consequent);
                opt(alternate, f);
            }
            ForStatement {
                init,
                test,
                update,
                body,
            } => {
                opt(init, f);
                opt(test, f);
                opt(update, f);
                f(body);
            }
            WhileStatement { test, body } | RepeatStatement { test, body } => {
                f(test);
                f(body);
            }
            DoUntilStatement { body, test } => {
                f(body);
                f(test);
            }
            WithStatement { object, body } => {
                f(object);
                f(body);
            }
            SwitchStatement {
                discriminant,
                cases,
            } => {
                f(discriminant);
                list(cases, f);
            }
            SwitchCase { test, body } => {
                opt(test, f);
                list(body, f);
            }
            TryStatement {
                block,
                handler,
                finalizer,
            } => {
                f(block);
                opt(handler, f);
                opt(finalizer, f);
            }
            CatchClause { param, body } => {
                opt(param, f);
                f(body);
            }
            Finalizer { body } => f(body),
            ReturnStatement { argument } => opt(argument, f),
            ThrowStatement { argument } | DeleteStatement { argument } => f(argument),
            VariableDeclaration { declarations, .. } | GlobalVarStatement { declarations, .. } => {
                list(declarations, f)
            }
            VariableDeclarator { id, init } => {
                f(id);
                opt(init, f);
            }
            FunctionDeclaration { id, params, body } => {
                opt(id, f);
                list(params, f);
                f(body);
            }
            ConstructorDeclaration {
                id,
                params,
                parent,
                body,
            } => {
                opt(id, f);
                list(params, f);
                opt(parent, f);
                f(body);
            }
            ConstructorParentClause { id, params } => {
                f(id);
                list(params, f);
            }
            DefaultParameter { left, right }
            | AssignmentExpression { left, right, .. }
            | BinaryExpression { left, right, .. } => {
                f(left);
                f(right);
            }
            EnumDeclaration { name, members, .. } => {
                f(name);
                list(members, f);
            }
            EnumMember { name, initializer } => {
                f(name);
                opt(initializer, f);
            }
            MacroDeclaration { name, .. } => f(name),
            UnaryExpression { argument, .. }
            | IncDecExpression { argument, .. }
            | IncDecStatement { argument, .. } => f(argument),
            TernaryExpression {
                test,
                consequent,
                alternate,
            } => {
                f(test);
                f(consequent);
                f(alternate);
            }
            CallExpression { object, arguments } => {
                f(object);
                list(arguments, f);
            }
            NewExpression {
                expression,
                arguments,
            } => {
                f(expression);
                list(arguments, f);
            }
            MemberDotExpression { object, property } => {
                f(object);
                f(property);
            }
            MemberIndexExpression {
                object, property, ..
            } => {
                f(object);
                list(property, f);
            }
            ParenthesizedExpression { expression, .. } => f(expression),
            TemplateStringExpression { atoms } => list(atoms, f),
            ArrayExpression { elements, .. } => list(elements, f),
            StructExpression { properties, .. } => list(properties, f),
            Property { name, value } => {
                f(name);
                f(value);
            }
            EmptyStatement
            | ExitStatement
            | BreakStatement
            | ContinueStatement
            | RegionStatement { .. }
            | EndRegionStatement { .. }
            | DefineStatement { .. }
            | Identifier { .. }
            | Literal { .. }
            | TemplateStringText { .. }
            | MissingOptionalArgument => {}
        }
    }
}

impl NodeKind {
    /// The `type` string this kind serializes with.
    pub fn type_name(&self) -> &'static str {
        use NodeKind::*;
        match self {
            Program { .. } => "Program",
            BlockStatement { .. } => "BlockStatement",
            EmptyStatement => "EmptyStatement",
            IfStatement { .. } => "IfStatement",
            ForStatement { .. } => "ForStatement",
            WhileStatement { .. } => "WhileStatement",
            DoUntilStatement { .. } => "DoUntilStatement",
            RepeatStatement { .. } => "RepeatStatement",
            WithStatement { .. } => "WithStatement",
            SwitchStatement { .. } => "SwitchStatement",
            SwitchCase { .. } => "SwitchCase",
            TryStatement { .. } => "TryStatement",
            CatchClause { .. } => "CatchClause",
            Finalizer { .. } => "Finalizer",
            ReturnStatement { .. } => "ReturnStatement",
            ExitStatement => "ExitStatement",
            BreakStatement => "BreakStatement",
            ContinueStatement => "ContinueStatement",
            ThrowStatement { .. } => "ThrowStatement",
            DeleteStatement { .. } => "DeleteStatement",
            VariableDeclaration { .. } => "VariableDeclaration",
            VariableDeclarator { .. } => "VariableDeclarator",
            GlobalVarStatement { .. } => "GlobalVarStatement",
            FunctionDeclaration { .. } => "FunctionDeclaration",
            ConstructorDeclaration { .. } => "ConstructorDeclaration",
            ConstructorParentClause { .. } => "ConstructorParentClause",
            DefaultParameter { .. } => "DefaultParameter",
            EnumDeclaration { .. } => "EnumDeclaration",
            EnumMember { .. } => "EnumMember",
            MacroDeclaration { .. } => "MacroDeclaration",
            RegionStatement { .. } => "RegionStatement",
            EndRegionStatement { .. } => "EndRegionStatement",
            DefineStatement { .. } => "DefineStatement",
            AssignmentExpression { .. } => "AssignmentExpression",
            BinaryExpression { .. } => "BinaryExpression",
            UnaryExpression { .. } => "UnaryExpression",
            IncDecExpression { .. } => "IncDecExpression",
            IncDecStatement { .. } => "IncDecStatement",
            TernaryExpression { .. } => "TernaryExpression",
            CallExpression { .. } => "CallExpression",
            NewExpression { .. } => "NewExpression",
            MemberDotExpression { .. } => "MemberDotExpression",
            MemberIndexExpression { .. } => "MemberIndexExpression",
            ParenthesizedExpression { .. } => "ParenthesizedExpression",
            Identifier { .. } => "Identifier",
            Literal { .. } => "Literal",
            TemplateStringExpression { .. } => "TemplateStringExpression",
            TemplateStringText { .. } => "TemplateStringText",
            ArrayExpression { .. } => "ArrayExpression",
            StructExpression { .. } => "StructExpression",
            Property { .. } => "Property",
            MissingOptionalArgument => "MissingOptionalArgument",
        }
    }
}
