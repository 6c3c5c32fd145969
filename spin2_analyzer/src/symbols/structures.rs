//! STRUCT definitions: ordered, uniquely named members

use super::error::SymbolError;
use crate::utils::Span;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MemberType {
    Byte,
    Word,
    Long,
    /// Another structure, by name
    Structure(String),
}

impl MemberType {
    /// Type named by a member prefix; unknown words are structure names
    pub fn from_word(word: &str) -> Self {
        match word.to_ascii_lowercase().as_str() {
            "byte" => MemberType::Byte,
            "word" => MemberType::Word,
            "long" => MemberType::Long,
            _ => MemberType::Structure(word.to_string()),
        }
    }

    pub fn structure_name(&self) -> Option<&str> {
        match self {
            MemberType::Structure(name) => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ArraySize {
    Count(u32),
    /// A constant name resolved later
    Symbolic(String),
}

impl ArraySize {
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        match trimmed.replace('_', "").parse::<u32>() {
            Ok(count) => Some(ArraySize::Count(count)),
            Err(_) => Some(ArraySize::Symbolic(trimmed.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructureMember {
    pub name: String,
    pub member_type: MemberType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub array_size: Option<ArraySize>,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructureDef {
    pub name: String,
    pub members: Vec<StructureMember>,
    pub line: usize,
    pub column: usize,
}

impl StructureDef {
    pub fn new(name: &str, line: usize, column: usize) -> Self {
        Self {
            name: name.to_string(),
            members: Vec::new(),
            line,
            column,
        }
    }

    /// Append a member; a repeated name is rejected and the first kept
    pub fn add_member(&mut self, member: StructureMember) -> Result<(), SymbolError> {
        if self.member(&member.name).is_some() {
            return Err(SymbolError::duplicate_member(
                &member.name,
                &self.name,
                Span::single_line(member.line, member.column, member.column + member.name.len()),
            ));
        }
        self.members.push(member);
        Ok(())
    }

    pub fn member(&self, name: &str) -> Option<&StructureMember> {
        self.members
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn member(name: &str, column: usize) -> StructureMember {
        StructureMember {
            name: name.to_string(),
            member_type: MemberType::Long,
            array_size: None,
            line: 0,
            column,
        }
    }

    #[test]
    fn test_duplicate_member_rejected() {
        let mut point = StructureDef::new("point", 0, 7);
        point.add_member(member("x", 13)).unwrap();
        let result = point.add_member(member("X", 16));
        assert_matches!(result, Err(SymbolError::DuplicateMember { .. }));
        assert_eq!(point.members.len(), 1);
        assert_eq!(
            result.unwrap_err().to_string(),
            "Duplicate member [X] in structure [point]"
        );
    }

    #[test]
    fn test_member_types_and_sizes() {
        assert_eq!(MemberType::from_word("WORD"), MemberType::Word);
        assert_eq!(
            MemberType::from_word("point").structure_name(),
            Some("point")
        );
        assert_eq!(ArraySize::parse("1_0"), Some(ArraySize::Count(10)));
        assert_eq!(
            ArraySize::parse("MAX_ITEMS"),
            Some(ArraySize::Symbolic("MAX_ITEMS".to_string()))
        );
        assert_eq!(ArraySize::parse(" "), None);
    }
}
