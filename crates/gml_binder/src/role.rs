//! Identifier roles.

/// What an identifier names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
    Variable,
    Parameter,
    Macro,
    Enum,
    EnumMember,
    Struct,
    Type,
    Property,
}

impl IdentifierKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IdentifierKind::Variable => "variable",
            IdentifierKind::Parameter => "parameter",
            IdentifierKind::Macro => "macro",
            IdentifierKind::Enum => "enum",
            IdentifierKind::EnumMember => "enumMember",
            IdentifierKind::Struct => "struct",
            IdentifierKind::Type => "type",
            IdentifierKind::Property => "property",
        }
    }
}

/// Where a declaration lands instead of the active scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeOverride {
    Global,
}

/// The part an identifier plays at the point it is visited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    Declaration {
        kind: IdentifierKind,
        tags: Vec<String>,
        scope_override: Option<ScopeOverride>,
    },
    Reference {
        kind: IdentifierKind,
        tags: Vec<String>,
    },
}

impl Role {
    pub fn declaration(kind: IdentifierKind) -> Self {
        Role::Declaration {
            kind,
            tags: Vec::new(),
            scope_override: None,
        }
    }

    pub fn reference(kind: IdentifierKind) -> Self {
        Role::Reference {
            kind,
            tags: Vec::new(),
        }
    }

    /// Add a tag. Tags form a set; duplicates are ignored.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        let tags = match &mut self {
            Role::Declaration { tags, .. } | Role::Reference { tags, .. } => tags,
        };
        if !tags.contains(&tag) {
            tags.push(tag);
        }
        self
    }

    /// Send a declaration to the program scope. References are unaffected.
    pub fn global(mut self) -> Self {
        if let Role::Declaration { scope_override, .. } = &mut self {
            *scope_override = Some(ScopeOverride::Global);
        }
        self
    }

    pub fn kind(&self) -> IdentifierKind {
        match self {
            Role::Declaration { kind, .. } | Role::Reference { kind, .. } => *kind,
        }
    }

    pub fn tags(&self) -> &[String] {
        match self {
            Role::Declaration { tags, .. } | Role::Reference { tags, .. } => tags,
        }
    }

    pub fn is_declaration(&self) -> bool {
        matches!(self, Role::Declaration { .. })
    }

    pub fn scope_override(&self) -> Option<ScopeOverride> {
        match self {
            Role::Declaration { scope_override, .. } => *scope_override,
            Role::Reference { .. } => None,
        }
    }

    /// Classification strings stamped on annotated identifiers.
    pub fn classifications(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(3 + self.tags().len());
        out.push("identifier".to_string());
        out.push(if self.is_declaration() { "declaration" } else { "reference" }.to_string());
        out.push(self.kind().as_str().to_string());
        out.extend(self.tags().iter().cloned());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_a_set() {
        let role = Role::declaration(IdentifierKind::Variable)
            .with_tag("local")
            .with_tag("local")
            .with_tag("static");
        assert_eq!(role.tags(), ["local".to_string(), "static".to_string()]);
    }

    #[test]
    fn test_global_only_applies_to_declarations() {
        let decl = Role::declaration(IdentifierKind::Variable).global();
        assert_eq!(decl.scope_override(), Some(ScopeOverride::Global));
        let reference = Role::reference(IdentifierKind::Variable).global();
        assert_eq!(reference.scope_override(), None);
    }

    #[test]
    fn test_classifications() {
        let role = Role::reference(IdentifierKind::EnumMember).with_tag("member");
        assert_eq!(role.classifications(), ["identifier", "reference", "enumMember", "member"]);
    }
}
