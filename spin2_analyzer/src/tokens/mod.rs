//! Semantic tokens emitted by the reference resolver
//!
//! The kind and modifier sets are closed and mirror the semantic-token legend
//! an editor registers for Spin2. Positions are 0-based `(line, start_column)`.

use serde::{Serialize, Serializer};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// Primary token classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    Comment,
    Debug,
    Directive,
    String,
    Keyword,
    Number,
    Operator,
    Namespace,
    Type,
    Struct,
    Function,
    Method,
    Macro,
    Variable,
    Parameter,
    Property,
    Label,
    EnumMember,
    ReturnValue,
    StorageType,
    ColorName,
    DisplayType,
    DisplayName,
    SetupParameter,
    FeedParameter,
    Filename,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Comment => "comment",
            TokenKind::Debug => "debug",
            TokenKind::Directive => "directive",
            TokenKind::String => "string",
            TokenKind::Keyword => "keyword",
            TokenKind::Number => "number",
            TokenKind::Operator => "operator",
            TokenKind::Namespace => "namespace",
            TokenKind::Type => "type",
            TokenKind::Struct => "struct",
            TokenKind::Function => "function",
            TokenKind::Method => "method",
            TokenKind::Macro => "macro",
            TokenKind::Variable => "variable",
            TokenKind::Parameter => "parameter",
            TokenKind::Property => "property",
            TokenKind::Label => "label",
            TokenKind::EnumMember => "enumMember",
            TokenKind::ReturnValue => "returnValue",
            TokenKind::StorageType => "storageType",
            TokenKind::ColorName => "colorName",
            TokenKind::DisplayType => "displayType",
            TokenKind::DisplayName => "displayName",
            TokenKind::SetupParameter => "setupParameter",
            TokenKind::FeedParameter => "feedParameter",
            TokenKind::Filename => "filename",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for TokenKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Additional classification tags carried alongside a `TokenKind`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenModifier {
    Declaration,
    Disabled,
    Documentation,
    Readonly,
    Function,
    Static,
    Deprecated,
    Modification,
    Definition,
    DefaultLibrary,
    Local,
    PasmInline,
    Instance,
    MissingDeclaration,
    IllegalUse,
}

impl TokenModifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenModifier::Declaration => "declaration",
            TokenModifier::Disabled => "disabled",
            TokenModifier::Documentation => "documentation",
            TokenModifier::Readonly => "readonly",
            TokenModifier::Function => "function",
            TokenModifier::Static => "static",
            TokenModifier::Deprecated => "deprecated",
            TokenModifier::Modification => "modification",
            TokenModifier::Definition => "definition",
            TokenModifier::DefaultLibrary => "defaultLibrary",
            TokenModifier::Local => "local",
            TokenModifier::PasmInline => "pasmInline",
            TokenModifier::Instance => "instance",
            TokenModifier::MissingDeclaration => "missingDeclaration",
            TokenModifier::IllegalUse => "illegalUse",
        }
    }
}

impl fmt::Display for TokenModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for TokenModifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One classified span of source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub line: usize,
    pub start_column: usize,
    pub length: usize,
    pub kind: TokenKind,
    pub modifiers: BTreeSet<TokenModifier>,
}

impl Token {
    pub fn new(
        line: usize,
        start_column: usize,
        length: usize,
        kind: TokenKind,
        modifiers: &[TokenModifier],
    ) -> Self {
        Self {
            line,
            start_column,
            length,
            kind,
            modifiers: modifiers.iter().copied().collect(),
        }
    }

    pub fn with_modifiers(
        line: usize,
        start_column: usize,
        length: usize,
        kind: TokenKind,
        modifiers: BTreeSet<TokenModifier>,
    ) -> Self {
        Self {
            line,
            start_column,
            length,
            kind,
            modifiers,
        }
    }

    pub fn has_modifier(&self, modifier: TokenModifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    pub fn end_column(&self) -> usize {
        self.start_column + self.length
    }

    /// Modifier names in legend order, for display and JSON consumers
    pub fn modifier_names(&self) -> Vec<&'static str> {
        self.modifiers.iter().map(|m| m.as_str()).collect()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}+{} {}",
            self.line + 1,
            self.start_column + 1,
            self.length,
            self.kind
        )?;
        if !self.modifiers.is_empty() {
            write!(f, " [{}]", self.modifier_names().join(", "))?;
        }
        Ok(())
    }
}

/// Collection of tokens with at most one token per `(line, start_column)`
#[derive(Debug, Default, Clone)]
pub struct TokenSet {
    tokens: Vec<Token>,
    positions: HashSet<(usize, usize)>,
}

impl TokenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a token; returns false when the position is taken or the token is empty
    pub fn record(&mut self, token: Token) -> bool {
        if token.length == 0 {
            return false;
        }
        if !self.positions.insert((token.line, token.start_column)) {
            return false;
        }
        self.tokens.push(token);
        true
    }

    pub fn contains_position(&self, line: usize, start_column: usize) -> bool {
        self.positions.contains(&(line, start_column))
    }

    /// Remove every token on `line`
    pub fn drop_line(&mut self, line: usize) {
        self.tokens.retain(|t| t.line != line);
        self.positions.retain(|(l, _)| *l != line);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    pub fn into_sorted(mut self) -> Vec<Token> {
        self.tokens
            .sort_by(|a, b| (a.line, a.start_column).cmp(&(b.line, b.start_column)));
        self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_positions_rejected() {
        let mut set = TokenSet::new();
        assert!(set.record(Token::new(2, 4, 3, TokenKind::Variable, &[])));
        assert!(!set.record(Token::new(2, 4, 5, TokenKind::Method, &[])));
        assert!(set.record(Token::new(2, 8, 1, TokenKind::Operator, &[])));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_empty_tokens_rejected() {
        let mut set = TokenSet::new();
        assert!(!set.record(Token::new(0, 0, 0, TokenKind::Variable, &[])));
        assert!(set.is_empty());
    }

    #[test]
    fn test_into_sorted_orders_by_position() {
        let mut set = TokenSet::new();
        set.record(Token::new(3, 1, 1, TokenKind::Variable, &[]));
        set.record(Token::new(1, 9, 1, TokenKind::Variable, &[]));
        set.record(Token::new(1, 2, 1, TokenKind::Variable, &[]));

        let positions: Vec<(usize, usize)> = set
            .into_sorted()
            .iter()
            .map(|t| (t.line, t.start_column))
            .collect();
        assert_eq!(positions, vec![(1, 2), (1, 9), (3, 1)]);
    }

    #[test]
    fn test_drop_line_frees_positions() {
        let mut set = TokenSet::new();
        set.record(Token::new(5, 0, 3, TokenKind::Variable, &[]));
        set.drop_line(5);
        assert!(set.is_empty());
        assert!(set.record(Token::new(5, 0, 10, TokenKind::Comment, &[TokenModifier::Disabled])));
    }

    #[test]
    fn test_token_serializes_legend_names() {
        let token = Token::new(
            0,
            4,
            5,
            TokenKind::EnumMember,
            &[TokenModifier::Readonly, TokenModifier::Declaration],
        );
        let json = serde_json::to_string(&token).unwrap();
        assert!(json.contains("\"kind\":\"enumMember\""));
        assert!(json.contains("\"modifiers\":[\"declaration\",\"readonly\"]"));
        assert_eq!(token.to_string(), "1:5+5 enumMember [declaration, readonly]");
    }
}
