//! Error types for symbol table operations

use crate::logging::codes::{self, Code};
use crate::utils::Span;

/// Result type for symbol table operations
pub type SymbolResult<T> = Result<T, SymbolError>;

/// Rejected declarations. The first declaration of a name is always kept;
/// these errors describe the later one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SymbolError {
    #[error("Duplicate declaration [{name}] found earlier at line {}", .first_line + 1)]
    DuplicateSymbol {
        name: String,
        first_line: usize,
        span: Span,
    },

    #[error("Duplicate method Declaration: found earlier [{} {name}()]", if *.first_is_public { "PUB" } else { "PRI" })]
    DuplicateMethod {
        name: String,
        first_is_public: bool,
        span: Span,
    },

    #[error("Duplicate structure [{name}] found earlier at line {}", .first_line + 1)]
    DuplicateStructure {
        name: String,
        first_line: usize,
        span: Span,
    },

    #[error("Duplicate member [{member}] in structure [{structure}]")]
    DuplicateMember {
        member: String,
        structure: String,
        span: Span,
    },

    #[error("Too many {table} symbols: limit is {limit}")]
    CapacityExceeded {
        table: String,
        limit: usize,
        span: Span,
    },
}

impl SymbolError {
    /// Create a duplicate symbol error
    pub fn duplicate_symbol(name: &str, first_line: usize, span: Span) -> Self {
        Self::DuplicateSymbol {
            name: name.to_string(),
            first_line,
            span,
        }
    }

    /// Create a duplicate method error
    pub fn duplicate_method(name: &str, first_is_public: bool, span: Span) -> Self {
        Self::DuplicateMethod {
            name: name.to_string(),
            first_is_public,
            span,
        }
    }

    /// Create a duplicate structure error
    pub fn duplicate_structure(name: &str, first_line: usize, span: Span) -> Self {
        Self::DuplicateStructure {
            name: name.to_string(),
            first_line,
            span,
        }
    }

    /// Create a duplicate structure member error
    pub fn duplicate_member(member: &str, structure: &str, span: Span) -> Self {
        Self::DuplicateMember {
            member: member.to_string(),
            structure: structure.to_string(),
            span,
        }
    }

    /// Create a capacity error
    pub fn capacity_exceeded(table: &str, limit: usize, span: Span) -> Self {
        Self::CapacityExceeded {
            table: table.to_string(),
            limit,
            span,
        }
    }

    /// Where the rejected declaration sits
    pub fn span(&self) -> Span {
        match self {
            Self::DuplicateSymbol { span, .. }
            | Self::DuplicateMethod { span, .. }
            | Self::DuplicateStructure { span, .. }
            | Self::DuplicateMember { span, .. }
            | Self::CapacityExceeded { span, .. } => *span,
        }
    }

    /// Get error code for global logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::DuplicateSymbol { .. } => codes::declarations::DUPLICATE_DECLARATION,
            Self::DuplicateMethod { .. } => codes::declarations::DUPLICATE_METHOD,
            Self::DuplicateStructure { .. } => codes::declarations::DUPLICATE_STRUCTURE,
            Self::DuplicateMember { .. } => codes::declarations::DUPLICATE_MEMBER,
            Self::CapacityExceeded { .. } => codes::declarations::SYMBOL_LIMIT_EXCEEDED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_use_one_based_lines() {
        let error = SymbolError::duplicate_symbol("X", 2, Span::single_line(5, 2, 3));
        assert_eq!(error.to_string(), "Duplicate declaration [X] found earlier at line 3");
        assert_eq!(error.span().start().line, 5);
        assert_eq!(error.error_code(), codes::declarations::DUPLICATE_DECLARATION);

        let error = SymbolError::duplicate_structure("point", 0, Span::single_line(4, 7, 12));
        assert_eq!(error.to_string(), "Duplicate structure [point] found earlier at line 1");
    }

    #[test]
    fn test_duplicate_method_names_first_scope() {
        let error = SymbolError::duplicate_method("start", true, Span::single_line(9, 4, 9));
        assert_eq!(
            error.to_string(),
            "Duplicate method Declaration: found earlier [PUB start()]"
        );
        let error = SymbolError::duplicate_method("helper", false, Span::single_line(9, 4, 10));
        assert_eq!(
            error.to_string(),
            "Duplicate method Declaration: found earlier [PRI helper()]"
        );
    }
}
