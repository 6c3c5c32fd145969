//! Statement shapes shared by both passes
//!
//! Pass 1 registers what these parsers find and pass 2 colors the same
//! pieces, so both passes always agree on where a declaration sits. Every
//! parser takes logical code with comments already blanked plus a start
//! offset; returned pieces carry byte offsets into that code.

use crate::builtins::{is_alignment, is_dat_or_pasm_label, is_pasm_condition};
use crate::lexical::text::{
    blank_strings, is_identifier_char, skip_whitespace, split_top_level_commas, words,
};

/// A slice of the logical code and its byte offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece<'a> {
    pub offset: usize,
    pub text: &'a str,
}

impl<'a> Piece<'a> {
    pub fn new(offset: usize, text: &'a str) -> Self {
        Self { offset, text }
    }

    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }

    /// `code[start..end]` with surrounding whitespace removed; None when empty
    pub fn trimmed(code: &'a str, start: usize, end: usize) -> Option<Self> {
        let end = end.min(code.len());
        if start >= end {
            return None;
        }
        let slice = &code[start..end];
        let leading = slice.len() - slice.trim_start().len();
        let text = slice.trim();
        (!text.is_empty()).then(|| Piece::new(start + leading, text))
    }
}

/// Length of the identifier starting at `start`
pub fn identifier_len(text: &str, start: usize) -> usize {
    text[start.min(text.len())..]
        .char_indices()
        .find(|(_, c)| !is_identifier_char(*c))
        .map(|(i, _)| i)
        .unwrap_or(text.len().saturating_sub(start))
}

pub fn starts_identifier(text: &str, at: usize) -> bool {
    text[at.min(text.len())..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
}

/// Offset of the bracket closing the one at `open`. `text` should have its
/// strings blanked.
pub fn matching_close(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let (open_ch, close_ch) = match bytes.get(open)? {
        b'(' => (b'(', b')'),
        b'[' => (b'[', b']'),
        _ => return None,
    };
    let mut depth = 0i32;
    for (index, &byte) in bytes.iter().enumerate().skip(open) {
        if byte == open_ch {
            depth += 1;
        } else if byte == close_ch {
            depth -= 1;
            if depth == 0 {
                return Some(index);
            }
        }
    }
    None
}

/// A name with the optional prefixes the declaration grammars allow:
/// `[ALIGNL|ALIGNW] [^][type] name[[count]] [= default]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypedName<'a> {
    pub alignment: Option<Piece<'a>>,
    pub type_name: Option<Piece<'a>>,
    pub pointer: bool,
    pub name: Piece<'a>,
    pub count: Option<Piece<'a>>,
    pub default: Option<Piece<'a>>,
}

/// Parse one comma-separated declaration piece of `code[start..end]`
pub fn parse_typed_name(code: &str, start: usize, end: usize) -> Option<TypedName<'_>> {
    let piece = Piece::trimmed(code, start, end)?;
    let (head_end, default) = match piece.text.find('=') {
        Some(eq) => (
            piece.offset + eq,
            Piece::trimmed(code, piece.offset + eq + 1, piece.end()),
        ),
        None => (piece.end(), None),
    };

    let head = &code[piece.offset..head_end];
    let found = words(head);
    let mut index = 0;
    let mut alignment = None;
    if found.len() > 1 && is_alignment(found[0].text) {
        alignment = Some(Piece::new(piece.offset + found[0].offset, found[0].text));
        index = 1;
    }
    let remaining = &found[index..];
    let first = remaining.first()?;

    let mut pointer = false;
    let mut type_name = None;
    let name_word = if remaining.len() >= 2 && !first.text.contains('[') {
        let (text, offset) = match first.text.strip_prefix('^') {
            Some(stripped) => {
                pointer = true;
                (stripped, first.offset + 1)
            }
            None => (first.text, first.offset),
        };
        if !text.is_empty() {
            type_name = Some(Piece::new(piece.offset + offset, text));
        }
        remaining[1]
    } else {
        *first
    };

    let mut name_offset = piece.offset + name_word.offset;
    if code[name_offset..].starts_with('^') {
        pointer = true;
        name_offset += 1;
    }
    if !starts_identifier(code, name_offset) {
        return None;
    }
    let name_len = identifier_len(code, name_offset);
    let name = Piece::new(name_offset, &code[name_offset..name_offset + name_len]);

    let after_name = skip_whitespace(code, name.end()).min(head_end);
    let count = if code[after_name..head_end].starts_with('[') {
        let blanked = blank_strings(&code[..head_end]);
        matching_close(&blanked, after_name)
            .and_then(|close| Piece::trimmed(code, after_name + 1, close))
    } else {
        None
    };

    Some(TypedName {
        alignment,
        type_name,
        pointer,
        name,
        count,
        default,
    })
}

/// Comma-separated list of typed names in `code[start..end]`
pub fn parse_typed_list(code: &str, start: usize, end: usize) -> Vec<TypedName<'_>> {
    let end = end.min(code.len());
    if start >= end {
        return Vec::new();
    }
    split_top_level_commas(&code[start..end])
        .into_iter()
        .filter_map(|(offset, piece)| {
            parse_typed_name(code, start + offset, start + offset + piece.len())
        })
        .collect()
}

// ============================================================================
// CON
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConStatement<'a> {
    /// `NAME = value`
    Constant { name: Piece<'a>, value: Piece<'a> },
    /// `#value[step]` restarting an enumeration
    EnumStart {
        value: Piece<'a>,
        step: Option<Piece<'a>>,
    },
    /// A bare name inside an enumeration, optionally `[step]`
    EnumMember {
        name: Piece<'a>,
        step: Option<Piece<'a>>,
    },
    /// `STRUCT name(member, ...)`
    Structure {
        keyword: Piece<'a>,
        name: Piece<'a>,
        members: Vec<TypedName<'a>>,
    },
    /// `STRUCT name = target`
    StructureAlias {
        keyword: Piece<'a>,
        name: Piece<'a>,
        target: Piece<'a>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConLine<'a> {
    pub statements: Vec<ConStatement<'a>>,
    /// Starts with `#` or holds a statement without `=`
    pub is_enum: bool,
}

/// Splits on top-level commas, then reads each statement on its own, so
/// structures, assignments and enum members can share one line.
pub fn parse_con_line(code: &str, start: usize) -> ConLine<'_> {
    let mut line = ConLine::default();
    let begin = skip_whitespace(code, start);
    if begin >= code.len() {
        return line;
    }

    line.is_enum = code[begin..].starts_with('#');
    for (offset, text) in split_top_level_commas(&code[begin..]) {
        let statement_start = begin + offset;
        let statement_end = statement_start + text.len();
        let Some(statement) = Piece::trimmed(code, statement_start, statement_end) else {
            continue;
        };

        let first = words(statement.text).into_iter().next();
        if first.is_some_and(|w| w.text.eq_ignore_ascii_case("struct")) {
            let keyword = Piece::new(statement.offset, &statement.text[.."struct".len()]);
            if let Some(structure) = parse_structure(code, keyword, statement.end()) {
                line.statements.push(structure);
            }
            continue;
        }

        match statement.text.find('=') {
            Some(eq) => {
                let name = Piece::trimmed(code, statement.offset, statement.offset + eq);
                let value = Piece::trimmed(code, statement.offset + eq + 1, statement.end());
                if let (Some(name), Some(value)) = (name, value) {
                    line.statements.push(ConStatement::Constant { name, value });
                }
            }
            None => {
                line.is_enum = true;
                push_enum_words(code, statement, &mut line.statements);
            }
        }
    }
    line
}

fn push_enum_words<'a>(code: &'a str, statement: Piece<'a>, out: &mut Vec<ConStatement<'a>>) {
    for word in words(statement.text) {
        let offset = statement.offset + word.offset;
        let (body, body_offset) = match word.text.strip_prefix('#') {
            Some(rest) => (rest, offset + 1),
            None => (word.text, offset),
        };
        let (value_text, step) = match body.find('[') {
            Some(open) => {
                let close = body.rfind(']').unwrap_or(body.len());
                let step = Piece::trimmed(code, body_offset + open + 1, body_offset + close.max(open + 1));
                (&body[..open], step)
            }
            None => (body, None),
        };
        let Some(value) = Piece::trimmed(code, body_offset, body_offset + value_text.len()) else {
            continue;
        };
        if word.text.starts_with('#') {
            out.push(ConStatement::EnumStart { value, step });
        } else if starts_identifier(value.text, 0) {
            out.push(ConStatement::EnumMember { name: value, step });
        }
    }
}

/// `name(members)` or `name = target` between the keyword and `end`
fn parse_structure<'a>(code: &'a str, keyword: Piece<'a>, end: usize) -> Option<ConStatement<'a>> {
    let name_start = skip_whitespace(code, keyword.end());
    if name_start >= end || !starts_identifier(code, name_start) {
        return None;
    }
    let name_len = identifier_len(code, name_start);
    let name = Piece::new(name_start, &code[name_start..name_start + name_len]);
    let next = skip_whitespace(code, name.end());
    match code.as_bytes().get(next) {
        Some(b'(') => {
            let blanked = blank_strings(code);
            let close = matching_close(&blanked, next).map_or(end, |close| close.min(end));
            let members = parse_typed_list(code, next + 1, close);
            Some(ConStatement::Structure {
                keyword,
                name,
                members,
            })
        }
        Some(b'=') => {
            let target = Piece::trimmed(code, next + 1, end)?;
            let len = identifier_len(target.text, 0);
            (len > 0).then(|| ConStatement::StructureAlias {
                keyword,
                name,
                target: Piece::new(target.offset, &target.text[..len]),
            })
        }
        _ => None,
    }
}

// ============================================================================
// VAR
// ============================================================================

/// `[type] name[[count]], name...`; a leading type applies to every name
pub fn parse_var_line(code: &str, start: usize) -> Vec<TypedName<'_>> {
    let mut names = parse_typed_list(code, start, code.len());
    let shared = names
        .first()
        .and_then(|first| first.type_name.map(|t| (t, first.pointer)));
    if let Some((type_name, pointer)) = shared {
        for entry in names.iter_mut().skip(1) {
            if entry.type_name.is_none() {
                entry.type_name = Some(type_name);
                entry.pointer = entry.pointer || pointer;
            }
        }
    }
    names
}

// ============================================================================
// OBJ
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjDeclaration<'a> {
    pub instance: Piece<'a>,
    pub count: Option<Piece<'a>>,
    /// Text between the quotes
    pub filename: Piece<'a>,
    /// `| NAME = value, ...`
    pub overrides: Vec<(Piece<'a>, Option<Piece<'a>>)>,
}

/// `inst[count] : "file" | OVR = value, ...`. On failure the trimmed
/// statement is returned for the diagnostic.
pub fn parse_obj_line(code: &str, start: usize) -> Result<ObjDeclaration<'_>, Piece<'_>> {
    let statement = Piece::trimmed(code, start, code.len()).ok_or(Piece::new(start, ""))?;
    let blanked = blank_strings(code);
    let region = &blanked[statement.offset..statement.end()];
    let bar = region.find('|').map(|i| statement.offset + i);
    let decl_end = bar.unwrap_or(statement.end());

    let colon = blanked[statement.offset..decl_end]
        .find(':')
        .map(|i| statement.offset + i)
        .ok_or(statement)?;

    let instance_start = skip_whitespace(code, statement.offset);
    if !starts_identifier(code, instance_start) {
        return Err(statement);
    }
    let instance_len = identifier_len(code, instance_start);
    let instance = Piece::new(instance_start, &code[instance_start..instance_start + instance_len]);

    let after_instance = skip_whitespace(code, instance.end());
    let count = if after_instance < colon && code[after_instance..].starts_with('[') {
        matching_close(&blanked, after_instance)
            .filter(|close| *close < colon)
            .and_then(|close| Piece::trimmed(code, after_instance + 1, close))
    } else {
        None
    };

    let open_quote = code[colon..decl_end]
        .find('"')
        .map(|i| colon + i)
        .ok_or(statement)?;
    let close_quote = code[open_quote + 1..decl_end]
        .find('"')
        .map(|i| open_quote + 1 + i)
        .ok_or(statement)?;
    let filename = Piece::trimmed(code, open_quote + 1, close_quote).ok_or(statement)?;

    let mut overrides = Vec::new();
    if let Some(bar) = bar {
        let list = &code[bar + 1..statement.end()];
        for (offset, text) in split_top_level_commas(list) {
            let piece_start = bar + 1 + offset;
            let Some(piece) = Piece::trimmed(code, piece_start, piece_start + text.len()) else {
                continue;
            };
            let (name_end, value) = match piece.text.find('=') {
                Some(eq) => (
                    piece.offset + eq,
                    Piece::trimmed(code, piece.offset + eq + 1, piece.end()),
                ),
                None => (piece.end(), None),
            };
            if let Some(name) = Piece::trimmed(code, piece.offset, name_end) {
                overrides.push((name, value));
            }
        }
    }

    Ok(ObjDeclaration {
        instance,
        count,
        filename,
        overrides,
    })
}

// ============================================================================
// PUB / PRI
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodHeader<'a> {
    pub name: Piece<'a>,
    /// Spin2 requires `()` even without parameters
    pub has_parens: bool,
    pub parameters: Vec<TypedName<'a>>,
    pub returns: Vec<TypedName<'a>>,
    pub locals: Vec<TypedName<'a>>,
}

/// `name(params) : returns | locals`, starting after the PUB/PRI keyword
pub fn parse_method_header(code: &str, start: usize) -> Option<MethodHeader<'_>> {
    let name_start = skip_whitespace(code, start);
    let name_end = code[name_start..]
        .find(|c: char| c == '(' || c == ':' || c == '|' || c.is_whitespace())
        .map(|i| name_start + i)
        .unwrap_or(code.len());
    if name_end == name_start {
        return None;
    }
    let name = Piece::new(name_start, &code[name_start..name_end]);
    let blanked = blank_strings(code);

    let mut position = skip_whitespace(code, name_end);
    let mut has_parens = false;
    let mut parameters = Vec::new();
    if blanked.as_bytes().get(position) == Some(&b'(') {
        has_parens = true;
        let close = matching_close(&blanked, position).unwrap_or(code.len());
        parameters = parse_typed_list(code, position + 1, close);
        position = (close + 1).min(code.len());
    }

    let bar = blanked[position..].find('|').map(|i| position + i);
    let returns_end = bar.unwrap_or(code.len());
    let returns = match blanked[position..returns_end].find(':') {
        Some(colon) => parse_typed_list(code, position + colon + 1, returns_end),
        None => Vec::new(),
    };
    let locals = match bar {
        Some(bar) => parse_typed_list(code, bar + 1, code.len()),
        None => Vec::new(),
    };

    Some(MethodHeader {
        name,
        has_parens,
        parameters,
        returns,
        locals,
    })
}

// ============================================================================
// DAT and assembly
// ============================================================================

/// `[label] [condition] [mnemonic operands...]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PasmLine<'a> {
    pub label: Option<Piece<'a>>,
    pub condition: Option<Piece<'a>>,
    /// Instruction, directive, storage type, `RES`, `FILE` or `DEBUG`
    pub mnemonic: Option<Piece<'a>>,
    /// Everything after the mnemonic
    pub operands: Option<Piece<'a>>,
}

/// Label-ish word at `start`: identifier with an optional `.` or `:` prefix
fn label_word(code: &str, start: usize) -> Option<Piece<'_>> {
    let prefix = match code.as_bytes().get(start) {
        Some(b'.') | Some(b':') => 1,
        _ => 0,
    };
    if !starts_identifier(code, start + prefix) {
        return None;
    }
    let end = start + prefix + identifier_len(code, start + prefix);
    Some(Piece::new(start, &code[start..end]))
}

pub fn parse_pasm_line(code: &str, start: usize) -> PasmLine<'_> {
    let mut line = PasmLine::default();
    let mut position = skip_whitespace(code, start);

    if let Some(word) = label_word(code, position) {
        let ends_word = code[word.end()..]
            .chars()
            .next()
            .map_or(true, char::is_whitespace);
        if ends_word && is_dat_or_pasm_label(word.text) {
            line.label = Some(word);
            position = skip_whitespace(code, word.end());
        }
    }

    if let Some(word) = label_word(code, position) {
        if is_pasm_condition(word.text) {
            line.condition = Some(word);
            position = skip_whitespace(code, word.end());
        }
    }

    if starts_identifier(code, position) {
        let len = identifier_len(code, position);
        let mnemonic = Piece::new(position, &code[position..position + len]);
        line.operands = Piece::trimmed(code, mnemonic.end(), code.len());
        line.mnemonic = Some(mnemonic);
    } else {
        line.operands = Piece::trimmed(code, position, code.len());
    }
    line
}

/// Text between the first pair of double quotes in `code[start..]`
pub fn quoted_text(code: &str, start: usize) -> Option<Piece<'_>> {
    let open = start + code[start..].find('"')?;
    let close = open + 1 + code[open + 1..].find('"')?;
    Some(Piece::new(open + 1, &code[open + 1..close]))
}
