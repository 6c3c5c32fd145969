//! Structural findings recorded during the declaration scan
//!
//! Block, method, assembly and comment extents are kept for folding and
//! outline consumers, and `method_at` backs local-scope lookup in pass 2.

use crate::builtins::DebugDisplayType;
use serde::Serialize;

/// The six top-level section kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BlockKind {
    Con,
    Var,
    Obj,
    Pub,
    Pri,
    Dat,
}

impl BlockKind {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "con" => Some(BlockKind::Con),
            "var" => Some(BlockKind::Var),
            "obj" => Some(BlockKind::Obj),
            "pub" => Some(BlockKind::Pub),
            "pri" => Some(BlockKind::Pri),
            "dat" => Some(BlockKind::Dat),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Con => "CON",
            BlockKind::Var => "VAR",
            BlockKind::Obj => "OBJ",
            BlockKind::Pub => "PUB",
            BlockKind::Pri => "PRI",
            BlockKind::Dat => "DAT",
        }
    }

    pub fn is_method(&self) -> bool {
        matches!(self, BlockKind::Pub | BlockKind::Pri)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockSpan {
    pub kind: BlockKind,
    pub start_line: usize,
    pub end_line: usize,
    /// Position within a run of consecutive blocks of the same kind
    pub sequence: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodSpan {
    pub name: String,
    pub is_public: bool,
    pub start_line: usize,
    pub end_line: usize,
}

impl MethodSpan {
    pub fn contains(&self, line: usize) -> bool {
        line >= self.start_line && line <= self.end_line
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasmSpan {
    pub start_line: usize,
    pub end_line: usize,
    pub inline: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CommentKind {
    Block,
    Doc,
    Line,
    DocLine,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentSpan {
    pub kind: CommentKind,
    pub start_line: usize,
    pub end_line: usize,
}

/// A user-named debug display declared with `` debug(`type name ...) ``
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebugDisplay {
    pub name: String,
    pub display_type: DebugDisplayType,
    pub line: usize,
}

#[derive(Debug, Clone)]
struct OpenMethod {
    name: String,
    is_public: bool,
    start_line: usize,
}

/// Findings collected by pass 1, read-only afterwards
#[derive(Debug, Clone, Default)]
pub struct Findings {
    blocks: Vec<BlockSpan>,
    methods: Vec<MethodSpan>,
    pasm: Vec<PasmSpan>,
    comments: Vec<CommentSpan>,
    debug_displays: Vec<DebugDisplay>,
    open_block: Option<(BlockKind, usize)>,
    open_method: Option<OpenMethod>,
    open_pasm: Option<(usize, bool)>,
}

impl Findings {
    /// New findings with the implicit leading CON block open at line 0
    pub fn new() -> Self {
        Self {
            open_block: Some((BlockKind::Con, 0)),
            ..Self::default()
        }
    }

    /// Start a new block, closing the previous one on the line before
    pub fn record_block_start(&mut self, kind: BlockKind, line: usize) {
        if let Some((open_kind, start)) = self.open_block.take() {
            // An explicit block on line 0 replaces the implicit CON
            if line > start {
                self.push_block(open_kind, start, line - 1);
            }
        }
        self.open_block = Some((kind, line));
    }

    fn push_block(&mut self, kind: BlockKind, start_line: usize, end_line: usize) {
        let sequence = match self.blocks.last() {
            Some(prev) if prev.kind == kind => prev.sequence + 1,
            _ => 0,
        };
        self.blocks.push(BlockSpan {
            kind,
            start_line,
            end_line,
            sequence,
        });
    }

    pub fn begin_method(&mut self, name: &str, is_public: bool, line: usize) {
        self.open_method = Some(OpenMethod {
            name: name.to_string(),
            is_public,
            start_line: line,
        });
    }

    /// Close the open method (if any) ending at `end_line`
    pub fn end_method(&mut self, end_line: usize) {
        if let Some(open) = self.open_method.take() {
            self.methods.push(MethodSpan {
                name: open.name,
                is_public: open.is_public,
                start_line: open.start_line,
                end_line: end_line.max(open.start_line),
            });
        }
    }

    pub fn begin_pasm(&mut self, line: usize, inline: bool) {
        self.open_pasm = Some((line, inline));
    }

    pub fn end_pasm(&mut self, line: usize) {
        if let Some((start_line, inline)) = self.open_pasm.take() {
            self.pasm.push(PasmSpan {
                start_line,
                end_line: line.max(start_line),
                inline,
            });
        }
    }

    pub fn record_comment(&mut self, comment: CommentSpan) {
        self.comments.push(comment);
    }

    pub fn record_debug_display(&mut self, display: DebugDisplay) {
        self.debug_displays.push(display);
    }

    /// Close everything still open at end of document
    pub fn finish(&mut self, last_line: usize) {
        self.end_method(last_line);
        self.end_pasm(last_line);
        if let Some((kind, start)) = self.open_block.take() {
            self.push_block(kind, start, last_line.max(start));
        }
        self.comments.sort_by_key(|c| (c.start_line, c.end_line));
    }

    /// Method whose span covers `line`
    pub fn method_at(&self, line: usize) -> Option<&MethodSpan> {
        self.methods.iter().find(|m| m.contains(line))
    }

    pub fn display(&self, name: &str) -> Option<&DebugDisplay> {
        self.debug_displays
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
    }

    pub fn blocks(&self) -> &[BlockSpan] {
        &self.blocks
    }

    pub fn methods(&self) -> &[MethodSpan] {
        &self.methods
    }

    pub fn pasm_spans(&self) -> &[PasmSpan] {
        &self.pasm
    }

    pub fn comments(&self) -> &[CommentSpan] {
        &self.comments
    }

    pub fn debug_displays(&self) -> &[DebugDisplay] {
        &self.debug_displays
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_implicit_con_block_replaced_by_line_zero_block() {
        let mut findings = Findings::new();
        findings.record_block_start(BlockKind::Pub, 0);
        findings.finish(4);

        assert_eq!(findings.blocks().len(), 1);
        assert_eq!(findings.blocks()[0].kind, BlockKind::Pub);
        assert_eq!(findings.blocks()[0].end_line, 4);
    }

    #[test]
    fn test_block_sequence_counts_consecutive_kinds() {
        let mut findings = Findings::new();
        findings.record_block_start(BlockKind::Con, 0);
        findings.record_block_start(BlockKind::Con, 3);
        findings.record_block_start(BlockKind::Var, 5);
        findings.record_block_start(BlockKind::Con, 7);
        findings.finish(9);

        let sequences: Vec<(BlockKind, usize)> =
            findings.blocks().iter().map(|b| (b.kind, b.sequence)).collect();
        assert_eq!(
            sequences,
            vec![
                (BlockKind::Con, 0),
                (BlockKind::Con, 1),
                (BlockKind::Var, 0),
                (BlockKind::Con, 0)
            ]
        );
        assert_eq!(findings.blocks()[0].end_line, 2);
    }

    #[test]
    fn test_method_at() {
        let mut findings = Findings::new();
        findings.begin_method("main", true, 2);
        findings.end_method(6);
        findings.begin_method("helper", false, 7);
        findings.finish(10);

        assert_eq!(findings.method_at(4).map(|m| m.name.as_str()), Some("main"));
        assert_eq!(findings.method_at(9).map(|m| m.name.as_str()), Some("helper"));
        assert!(findings.method_at(1).is_none());
    }
}
