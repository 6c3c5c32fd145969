//! Declared names and their classification

use crate::tokens::{TokenKind, TokenModifier};
use crate::utils::Span;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SymbolKind {
    Variable,
    Constant,
    EnumMember,
    Label,
    Method,
    Parameter,
    ReturnValue,
    Namespace,
    StorageType,
    Structure,
    StructureMember,
    DisplayName,
    Filename,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Variable => "variable",
            SymbolKind::Constant => "constant",
            SymbolKind::EnumMember => "enumMember",
            SymbolKind::Label => "label",
            SymbolKind::Method => "method",
            SymbolKind::Parameter => "parameter",
            SymbolKind::ReturnValue => "returnValue",
            SymbolKind::Namespace => "namespace",
            SymbolKind::StorageType => "storageType",
            SymbolKind::Structure => "structure",
            SymbolKind::StructureMember => "structureMember",
            SymbolKind::DisplayName => "displayName",
            SymbolKind::Filename => "filename",
        }
    }

    /// Token kind used when a reference to this symbol is emitted
    pub fn token_kind(&self) -> TokenKind {
        match self {
            SymbolKind::Variable | SymbolKind::Constant => TokenKind::Variable,
            SymbolKind::EnumMember => TokenKind::EnumMember,
            SymbolKind::Label => TokenKind::Label,
            SymbolKind::Method => TokenKind::Method,
            SymbolKind::Parameter => TokenKind::Parameter,
            SymbolKind::ReturnValue => TokenKind::ReturnValue,
            SymbolKind::Namespace => TokenKind::Namespace,
            SymbolKind::StorageType => TokenKind::StorageType,
            SymbolKind::Structure => TokenKind::Struct,
            SymbolKind::StructureMember => TokenKind::Property,
            SymbolKind::DisplayName => TokenKind::DisplayName,
            SymbolKind::Filename => TokenKind::Filename,
        }
    }
}

/// Extra binding carried by some symbols
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Attachment {
    /// OBJ instances and FILE data
    Filename(String),
    /// Variables, parameters and labels declared with a structure type
    StructureType { name: String, pointer: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub decl_line: usize,
    pub decl_column: usize,
    pub modifiers: BTreeSet<TokenModifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
}

impl Symbol {
    pub fn new(name: &str, kind: SymbolKind, decl_line: usize, decl_column: usize) -> Self {
        Self {
            name: name.to_string(),
            kind,
            decl_line,
            decl_column,
            modifiers: BTreeSet::new(),
            comment: None,
            attachment: None,
        }
    }

    pub fn with_modifiers(mut self, modifiers: &[TokenModifier]) -> Self {
        self.modifiers.extend(modifiers.iter().copied());
        self
    }

    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    pub fn has_modifier(&self, modifier: TokenModifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    pub fn span(&self) -> Span {
        Span::single_line(
            self.decl_line,
            self.decl_column,
            self.decl_column + self.name.len(),
        )
    }

    /// Structure type this symbol was declared with, if any
    pub fn structure_type(&self) -> Option<&str> {
        match &self.attachment {
            Some(Attachment::StructureType { name, .. }) => Some(name),
            _ => None,
        }
    }

    pub fn filename(&self) -> Option<&str> {
        match &self.attachment {
            Some(Attachment::Filename(name)) => Some(name),
            _ => None,
        }
    }

    /// Visible to objects that import this document
    pub fn is_public(&self) -> bool {
        match self.kind {
            SymbolKind::Constant | SymbolKind::EnumMember | SymbolKind::Structure => true,
            SymbolKind::Variable => self.has_modifier(TokenModifier::Readonly),
            SymbolKind::Method => !self.has_modifier(TokenModifier::Static),
            _ => false,
        }
    }

    /// Modifiers for a reference (non-declaration) token
    pub fn reference_modifiers(&self) -> BTreeSet<TokenModifier> {
        let mut modifiers = self.modifiers.clone();
        modifiers.remove(&TokenModifier::Declaration);
        if self.kind == SymbolKind::Constant {
            modifiers.insert(TokenModifier::Readonly);
        }
        modifiers
    }

    /// Modifiers for the declaration token itself
    pub fn declaration_modifiers(&self) -> BTreeSet<TokenModifier> {
        let mut modifiers = self.reference_modifiers();
        modifiers.insert(TokenModifier::Declaration);
        modifiers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_tokens_are_readonly_variables() {
        let symbol = Symbol::new("SPEED", SymbolKind::Constant, 2, 2);
        assert_eq!(symbol.kind.token_kind(), TokenKind::Variable);
        assert!(symbol.reference_modifiers().contains(&TokenModifier::Readonly));
        assert!(symbol.declaration_modifiers().contains(&TokenModifier::Declaration));
        assert!(symbol.is_public());
    }

    #[test]
    fn test_private_methods_are_not_public() {
        let public = Symbol::new("start", SymbolKind::Method, 0, 4);
        let private =
            Symbol::new("helper", SymbolKind::Method, 9, 4).with_modifiers(&[TokenModifier::Static]);
        assert!(public.is_public());
        assert!(!private.is_public());
        assert!(!Symbol::new("count", SymbolKind::Variable, 3, 7).is_public());
    }

    #[test]
    fn test_attachments() {
        let symbol = Symbol::new("p", SymbolKind::Variable, 1, 8).with_attachment(
            Attachment::StructureType {
                name: "point".to_string(),
                pointer: false,
            },
        );
        assert_eq!(symbol.structure_type(), Some("point"));
        assert_eq!(symbol.filename(), None);
        assert_eq!(symbol.span(), Span::single_line(1, 8, 9));
    }
}
