//! Line classification for Spin2 sources
//!
//! Both analysis passes walk the document through a `LineWalker`, which owns
//! the section/comment state machine, joins continued lines and reports
//! comments. Keeping one walker guarantees the passes agree on every state
//! transition while each pass still re-walks the text on its own.

pub mod classifier;
pub mod continuation;
pub mod text;
pub mod walker;

pub use classifier::{classify_line, ClassifiedLine, CommentRange, CommentState};
pub use continuation::ContinuedLines;
pub use walker::{LineKind, LineWalker, LogicalLine, WalkItem};

use crate::findings::BlockKind;
use regex::Regex;
use std::sync::OnceLock;

/// Section and comment state in effect for a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParseState {
    #[default]
    Con,
    Var,
    Obj,
    Pub,
    Pri,
    Dat,
    /// Assembly inside a DAT section, after ORG
    DatAsm,
    /// ORG ... END inside a PUB or PRI method
    InlineAsm,
    BlockComment,
    DocBlockComment,
}

impl ParseState {
    pub fn from_block(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Con => ParseState::Con,
            BlockKind::Var => ParseState::Var,
            BlockKind::Obj => ParseState::Obj,
            BlockKind::Pub => ParseState::Pub,
            BlockKind::Pri => ParseState::Pri,
            BlockKind::Dat => ParseState::Dat,
        }
    }

    pub fn is_method(&self) -> bool {
        matches!(self, ParseState::Pub | ParseState::Pri | ParseState::InlineAsm)
    }
}

/// Section keyword starting `code`, if any.
/// The keyword is the first word and is followed by whitespace or end of line.
pub fn section_start(code: &str) -> Option<BlockKind> {
    let word = text::first_word(code)?;
    if word.text.len() != 3 {
        return None;
    }
    BlockKind::from_keyword(word.text)
}

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\{\s*spin2_v(\d{2,3})\s*\}$").expect("valid version directive regex")
    })
}

/// Language version from a `{Spin2_v##}` comment
pub fn parse_version_directive(comment: &str) -> Option<u32> {
    version_regex()
        .captures(comment.trim())
        .and_then(|captures| captures.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
}
