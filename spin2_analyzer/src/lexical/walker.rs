//! The section/comment state machine shared by both passes
//!
//! `LineWalker` turns physical lines into `WalkItem`s: complete logical lines
//! of code, comment-only lines and blank lines. It owns every state
//! transition (section starts, DAT and inline assembly, block comments) and
//! the `{Spin2_v##}` version hunt.

use super::classifier::{classify_line, ClassifiedLine, CommentRange, CommentState};
use super::continuation::ContinuedLines;
use super::text::{first_word, open_bracket_balance, words};
use super::{parse_version_directive, section_start, ParseState};
use crate::builtins::{
    is_flexspin_directive, is_pasm_condition, is_pasm_instruction, is_pasm_lang_directive,
};
use crate::findings::{BlockKind, CommentKind, CommentSpan};
use crate::pipeline::LineFilter;
use std::collections::VecDeque;

/// What a logical line does to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Starts a section; code after the keyword begins at `body_offset`
    SectionStart { kind: BlockKind, body_offset: usize },
    Code,
    /// `ORG` opening inline assembly inside a method
    PasmStart,
    /// `END` closing inline assembly
    PasmEnd,
    /// A flexspin preprocessor directive line
    Preprocessor,
}

/// One complete statement with its physical mapping
#[derive(Debug, Clone)]
pub struct LogicalLine {
    pub state: ParseState,
    pub kind: LineKind,
    pub text: ContinuedLines,
    /// Prior-line or right-edge comment offered to declarations on this line
    pub doc_comment: Option<String>,
    pub comments: Vec<(usize, CommentRange)>,
}

impl LogicalLine {
    pub fn first_line(&self) -> usize {
        self.text.first_line()
    }

    pub fn code(&self) -> &str {
        self.text.text()
    }

    /// Code after the section keyword, with its offset in the logical text
    pub fn body(&self) -> (usize, &str) {
        let offset = match self.kind {
            LineKind::SectionStart { body_offset, .. } => body_offset,
            _ => 0,
        };
        let code = self.text.text();
        let offset = offset.min(code.len());
        (offset, &code[offset..])
    }

    pub fn section(&self) -> Option<BlockKind> {
        match self.kind {
            LineKind::SectionStart { kind, .. } => Some(kind),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum WalkItem {
    Line(LogicalLine),
    Comment {
        line: usize,
        ranges: Vec<CommentRange>,
    },
    /// Empty or disabled line
    Blank { line: usize },
}

struct PendingLine {
    line: LogicalLine,
    bracket_balance: Option<i32>,
}

pub struct LineWalker<'a> {
    lines: &'a [String],
    filter: &'a dyn LineFilter,
    next_index: usize,
    finished: bool,
    comment_state: CommentState,
    section: ParseState,
    pre_pasm_state: ParseState,
    /// The open DAT PASM block started with ORGH
    hub_pasm: bool,
    version: u32,
    hunting_for_version_directive: bool,
    prior_comment: Option<String>,
    pending: Option<PendingLine>,
    queue: VecDeque<WalkItem>,
    comment_spans: Vec<CommentSpan>,
    open_comment: Option<(CommentKind, usize)>,
}

impl<'a> LineWalker<'a> {
    pub fn new(lines: &'a [String], filter: &'a dyn LineFilter) -> Self {
        Self {
            lines,
            filter,
            next_index: 0,
            finished: false,
            comment_state: CommentState::None,
            section: ParseState::Con,
            pre_pasm_state: ParseState::Pub,
            hub_pasm: false,
            version: 0,
            hunting_for_version_directive: true,
            prior_comment: None,
            pending: None,
            queue: VecDeque::new(),
            comment_spans: Vec::new(),
            open_comment: None,
        }
    }

    /// Language version from `{Spin2_v##}`, 0 when none was found
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Current state, block comments included
    pub fn state(&self) -> ParseState {
        match self.comment_state {
            CommentState::None => self.section,
            CommentState::Block(_) => ParseState::BlockComment,
            CommentState::Doc => ParseState::DocBlockComment,
        }
    }

    /// Comment spans seen so far, leaving the walker's list empty
    pub fn take_comment_spans(&mut self) -> Vec<CommentSpan> {
        std::mem::take(&mut self.comment_spans)
    }

    fn process(&mut self, index: usize) {
        if self.filter.is_line_disabled(index) {
            self.flush_pending();
            self.prior_comment = None;
            self.queue.push_back(WalkItem::Blank { line: index });
            return;
        }

        let lines = self.lines;
        let raw = lines[index].as_str();
        let classified = classify_line(raw, &mut self.comment_state);
        self.record_comment_spans(index, &classified);

        if self.hunting_for_version_directive {
            for range in classified.comments.iter().filter(|r| !r.is_line_comment()) {
                if let Some(version) = parse_version_directive(&raw[range.start..range.end]) {
                    self.version = version;
                }
            }
        }

        if !classified.has_code() {
            self.process_non_code(index, raw, classified);
            return;
        }
        self.hunting_for_version_directive = false;

        let trailing = classified
            .trailing_line_comment()
            .map(|range| comment_text(raw, range));
        let comments: Vec<(usize, CommentRange)> =
            classified.comments.iter().map(|r| (index, *r)).collect();
        let code = classified.code;

        if self.pending.is_some() {
            if section_start(&code).is_none() {
                self.continue_pending(index, &code, comments);
                return;
            }
            self.flush_pending();
        }
        self.start_line(index, &code, comments, trailing);
    }

    fn process_non_code(&mut self, index: usize, raw: &str, classified: ClassifiedLine) {
        if classified.comments.is_empty() && !classified.entry_state.is_open() {
            self.flush_pending();
            self.prior_comment = None;
            self.queue.push_back(WalkItem::Blank { line: index });
            return;
        }

        if self.pending.is_none() && classified.comments.len() == 1 {
            if let Some(range) = classified.trailing_line_comment() {
                self.prior_comment = Some(comment_text(raw, range));
            }
        }
        self.queue.push_back(WalkItem::Comment {
            line: index,
            ranges: classified.comments,
        });
    }

    fn start_line(
        &mut self,
        index: usize,
        code: &str,
        comments: Vec<(usize, CommentRange)>,
        trailing: Option<String>,
    ) {
        let (state, kind) = self.advance_state(code);
        let doc_comment = self.prior_comment.take().or(trailing);

        let (piece, explicit) = strip_continuation_marker(code);
        let bracket_mode = matches!(
            kind,
            LineKind::SectionStart {
                kind: BlockKind::Pub | BlockKind::Pri | BlockKind::Obj,
                ..
            }
        ) || (state == ParseState::Obj && kind == LineKind::Code);
        let bracket_balance = bracket_mode.then(|| open_bracket_balance(piece));

        let mut text = ContinuedLines::new();
        text.add(index, piece);

        let wants_more = explicit || bracket_balance.is_some_and(|b| b > 0);
        self.pending = Some(PendingLine {
            line: LogicalLine {
                state,
                kind,
                text,
                doc_comment,
                comments,
            },
            bracket_balance,
        });
        if !wants_more || self.pending.as_ref().is_some_and(|p| p.line.text.is_complete()) {
            self.flush_pending();
        }
    }

    fn continue_pending(&mut self, index: usize, code: &str, comments: Vec<(usize, CommentRange)>) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        let (piece, explicit) = strip_continuation_marker(code);
        pending.line.text.add(index, piece);
        pending.line.comments.extend(comments);
        if let Some(balance) = pending.bracket_balance.as_mut() {
            *balance += open_bracket_balance(piece);
        }

        let wants_more = explicit || pending.bracket_balance.is_some_and(|b| b > 0);
        if !wants_more || pending.line.text.is_complete() {
            self.flush_pending();
        }
    }

    fn flush_pending(&mut self) {
        if let Some(mut pending) = self.pending.take() {
            pending.line.text.mark_complete();
            self.queue.push_back(WalkItem::Line(pending.line));
        }
    }

    /// Apply section, assembly and preprocessor transitions for a new statement
    fn advance_state(&mut self, code: &str) -> (ParseState, LineKind) {
        if let Some(block) = section_start(code) {
            let body_offset = first_word(code).map(|w| w.end()).unwrap_or(0);
            self.section = ParseState::from_block(block);
            if block == BlockKind::Dat {
                self.enter_dat_pasm(&code[body_offset..]);
            }
            return (self.section, LineKind::SectionStart { kind: block, body_offset });
        }

        let first = first_word(code).map(|w| w.text).unwrap_or("");
        if first.starts_with('#') && is_flexspin_directive(first) {
            return (self.section, LineKind::Preprocessor);
        }

        match self.section {
            ParseState::Dat => {
                self.enter_dat_pasm(code);
                (self.section, LineKind::Code)
            }
            ParseState::DatAsm => {
                let leaves = pasm_directive(code).is_some_and(|directive| {
                    directive.eq_ignore_ascii_case("fit")
                        || (directive.eq_ignore_ascii_case("end") && !self.hub_pasm)
                });
                if leaves {
                    self.section = ParseState::Dat;
                }
                (ParseState::DatAsm, LineKind::Code)
            }
            ParseState::Pub | ParseState::Pri if first.eq_ignore_ascii_case("org") => {
                self.pre_pasm_state = self.section;
                self.section = ParseState::InlineAsm;
                (ParseState::InlineAsm, LineKind::PasmStart)
            }
            ParseState::InlineAsm if first.eq_ignore_ascii_case("end") => {
                self.section = self.pre_pasm_state;
                (ParseState::InlineAsm, LineKind::PasmEnd)
            }
            state => (state, LineKind::Code),
        }
    }

    fn enter_dat_pasm(&mut self, code: &str) {
        let Some(directive) = pasm_directive(code) else {
            return;
        };
        if ["org", "orgf", "orgh"]
            .iter()
            .any(|org| directive.eq_ignore_ascii_case(org))
        {
            self.section = ParseState::DatAsm;
            self.hub_pasm = directive.eq_ignore_ascii_case("orgh");
        }
    }

    fn record_comment_spans(&mut self, index: usize, classified: &ClassifiedLine) {
        let count = classified.comments.len();
        for (position, range) in classified.comments.iter().enumerate() {
            if range.is_line_comment() {
                self.comment_spans.push(CommentSpan {
                    kind: range.kind,
                    start_line: index,
                    end_line: index,
                });
                continue;
            }
            let started_earlier = position == 0 && classified.entry_state.is_open();
            let open_at_end = position + 1 == count && self.comment_state.is_open();
            match (started_earlier, open_at_end) {
                (true, false) => {
                    let (kind, start_line) = self.open_comment.take().unwrap_or((range.kind, index));
                    self.comment_spans.push(CommentSpan {
                        kind,
                        start_line,
                        end_line: index,
                    });
                }
                (false, true) => self.open_comment = Some((range.kind, index)),
                (false, false) => self.comment_spans.push(CommentSpan {
                    kind: range.kind,
                    start_line: index,
                    end_line: index,
                }),
                (true, true) => {}
            }
        }
    }

    fn finish(&mut self) {
        self.flush_pending();
        if let Some((kind, start_line)) = self.open_comment.take() {
            self.comment_spans.push(CommentSpan {
                kind,
                start_line,
                end_line: self.lines.len().saturating_sub(1),
            });
        }
    }
}

impl Iterator for LineWalker<'_> {
    type Item = WalkItem;

    fn next(&mut self) -> Option<WalkItem> {
        loop {
            if let Some(item) = self.queue.pop_front() {
                return Some(item);
            }
            if self.next_index < self.lines.len() {
                let index = self.next_index;
                self.next_index += 1;
                self.process(index);
            } else if !self.finished {
                self.finished = true;
                self.finish();
            } else {
                return None;
            }
        }
    }
}

/// The word in the directive slot of a DAT line: the first word, or the
/// second when the first is a label. `END` takes no operands, so a leading
/// `end` followed by more words is a label.
fn pasm_directive(code: &str) -> Option<&str> {
    let found = words(code);
    let (first, rest) = found.split_first()?;
    let second = rest.first().map(|w| w.text);
    if first.text.eq_ignore_ascii_case("end") {
        return Some(second.unwrap_or(first.text));
    }
    if is_pasm_condition(first.text)
        || is_pasm_instruction(first.text)
        || is_pasm_lang_directive(first.text, 0)
    {
        return Some(first.text);
    }
    Some(second.unwrap_or(first.text))
}

/// Strip a trailing `...` continuation marker
fn strip_continuation_marker(code: &str) -> (&str, bool) {
    let trimmed = code.trim_end();
    match trimmed.strip_suffix("...") {
        Some(piece) => (piece, true),
        None => (code, false),
    }
}

/// Comment text without the leading quote marks
fn comment_text(raw: &str, range: &CommentRange) -> String {
    raw[range.start..range.end]
        .trim_start_matches('\'')
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::AllLinesEnabled;

    fn lines(source: &str) -> Vec<String> {
        source.lines().map(str::to_string).collect()
    }

    fn logical_lines(source: &str) -> Vec<LogicalLine> {
        let text = lines(source);
        LineWalker::new(&text, &AllLinesEnabled)
            .filter_map(|item| match item {
                WalkItem::Line(line) => Some(line),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_initial_state_is_con() {
        let found = logical_lines("  X = 5");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].state, ParseState::Con);
        assert_eq!(found[0].kind, LineKind::Code);
    }

    #[test]
    fn test_section_starts_and_body() {
        let found = logical_lines("CON X = 1\nVAR long a\nPUB main()\n  a := X");
        let states: Vec<ParseState> = found.iter().map(|l| l.state).collect();
        assert_eq!(
            states,
            vec![ParseState::Con, ParseState::Var, ParseState::Pub, ParseState::Pub]
        );
        assert_eq!(found[0].body(), (3, " X = 1"));
        assert_eq!(found[2].section(), Some(BlockKind::Pub));
    }

    #[test]
    fn test_explicit_continuation_joins_lines() {
        let found = logical_lines("PUB go(a, ...\n       b)\n  a := b");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].text.line_count(), 2);
        assert_eq!(found[0].code(), "PUB go(a,         b)");
    }

    #[test]
    fn test_open_paren_continues_signature() {
        let found = logical_lines("PUB go(a,\n       b) : r | t\n  r := a");
        assert_eq!(found.len(), 2);
        let b_offset = found[0].code().rfind('b').unwrap();
        assert_eq!(found[0].text.position_of(b_offset).line, 1);
        assert_eq!(found[0].text.position_of(b_offset).column, 7);
    }

    #[test]
    fn test_paren_inside_string_does_not_continue_obj() {
        let found = logical_lines("OBJ\n  a : \"x(1\"\n  b : \"y\"");
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn test_dat_org_enters_and_fit_leaves_pasm() {
        let found = logical_lines("DAT\n  org 0\nentry mov a, b\n  fit 496\ntable long 1");
        let states: Vec<ParseState> = found.iter().map(|l| l.state).collect();
        assert_eq!(
            states,
            vec![
                ParseState::Dat,
                ParseState::DatAsm,
                ParseState::DatAsm,
                ParseState::DatAsm,
                ParseState::Dat
            ]
        );
    }

    #[test]
    fn test_end_label_and_operand_stay_in_pasm() {
        let found = logical_lines("DAT\n  org\nloop  jmp #end\nend   mov a, b\n  jmp end\n  fit\ntable long 1");
        let states: Vec<ParseState> = found.iter().map(|l| l.state).collect();
        assert_eq!(
            states,
            vec![
                ParseState::Dat,
                ParseState::DatAsm,
                ParseState::DatAsm,
                ParseState::DatAsm,
                ParseState::DatAsm,
                ParseState::DatAsm,
                ParseState::Dat
            ]
        );
    }

    #[test]
    fn test_end_directive_leaves_cog_pasm_only() {
        let found = logical_lines("DAT\n  org\n  nop\n  end\nx long 1\n  orgh\n  nop\n  end\ny long 2\n  fit\nz long 3");
        let states: Vec<ParseState> = found.iter().map(|l| l.state).collect();
        assert_eq!(states[4], ParseState::Dat);
        assert_eq!(states[5], ParseState::DatAsm);
        assert_eq!(states[8], ParseState::DatAsm);
        assert_eq!(states[10], ParseState::Dat);
    }

    #[test]
    fn test_inline_pasm_in_method() {
        let found = logical_lines("PUB f()\n  org\n    mov pa, #1\n  end\n  pa := 2");
        let kinds: Vec<(ParseState, LineKind)> = found.iter().map(|l| (l.state, l.kind)).collect();
        assert_eq!(kinds[1], (ParseState::InlineAsm, LineKind::PasmStart));
        assert_eq!(kinds[2], (ParseState::InlineAsm, LineKind::Code));
        assert_eq!(kinds[3], (ParseState::InlineAsm, LineKind::PasmEnd));
        assert_eq!(kinds[4], (ParseState::Pub, LineKind::Code));
    }

    #[test]
    fn test_version_directive_only_before_code() {
        let text = lines("{Spin2_v45}\nCON X = 1\n{Spin2_v50}");
        let mut walker = LineWalker::new(&text, &AllLinesEnabled);
        while walker.next().is_some() {}
        assert_eq!(walker.version(), 45);
    }

    #[test]
    fn test_unterminated_block_comment_swallows_rest() {
        let text = lines("CON X = 1\n{ open\nY = 2\nPUB main()");
        let mut walker = LineWalker::new(&text, &AllLinesEnabled);
        let mut code_lines = 0;
        while let Some(item) = walker.next() {
            if matches!(item, WalkItem::Line(_)) {
                code_lines += 1;
            }
        }
        assert_eq!(code_lines, 1);
        assert_eq!(walker.state(), ParseState::BlockComment);
        let spans = walker.take_comment_spans();
        assert_eq!(spans.len(), 1);
        assert_eq!((spans[0].start_line, spans[0].end_line), (1, 3));
    }

    #[test]
    fn test_prior_comment_attaches_to_next_line() {
        let found = logical_lines("CON\n  ' the answer\n  X = 42\n\n  Y = 1 ' trailing");
        assert_eq!(found[1].doc_comment.as_deref(), Some("the answer"));
        assert_eq!(found[2].doc_comment.as_deref(), Some("trailing"));
    }

    #[test]
    fn test_preprocessor_lines_keep_state() {
        let found = logical_lines("CON\n#ifdef FOO\n  #0, A, B");
        assert_eq!(found[1].kind, LineKind::Preprocessor);
        assert_eq!(found[2].kind, LineKind::Code);
    }

    #[test]
    fn test_disabled_lines_are_blank() {
        struct DisableSecond;
        impl LineFilter for DisableSecond {
            fn is_line_disabled(&self, line: usize) -> bool {
                line == 1
            }
        }
        let text = lines("CON\n  X = 1\n  Y = 2");
        let items: Vec<WalkItem> = LineWalker::new(&text, &DisableSecond).collect();
        assert!(matches!(items[1], WalkItem::Blank { line: 1 }));
    }
}
