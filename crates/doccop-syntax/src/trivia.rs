//! Documentation trivia lookup
//!
//! Finds the run of `///` / `/** */` comments that documents a declaration.

use std::ops::Range;

use mago_span::{Position, Span};

use crate::lexer::TokenKind;
use crate::tree::{Declaration, SyntaxTree};

/// The documentation comments in front of a declaration
#[derive(Debug, Clone)]
pub struct DocTrivia {
    /// From the first comment's opening marker to the end of the last comment
    pub span: Span,
    /// Token indices covered by the run
    pub tokens: Range<usize>,
}

impl DocTrivia {
    pub fn start_offset(&self) -> usize {
        self.span.start.offset as usize
    }

    pub fn end_offset(&self) -> usize {
        self.span.end.offset as usize
    }

    /// Raw comment text, markers included
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start_offset()..self.end_offset()]
    }
}

/// Collect the contiguous documentation comments preceding a declaration
///
/// Whitespace and line breaks are skipped; any other trivia (plain
/// comments, preprocessor directives) or a significant token ends the
/// run. Returns `None` for undocumented declarations.
pub fn documentation_trivia(
    tree: &SyntaxTree,
    source: &str,
    declaration: &Declaration,
) -> Option<DocTrivia> {
    let tokens = tree.tokens();
    let mut first: Option<usize> = None;
    let mut last: Option<usize> = None;

    let mut index = declaration.first_token.min(tokens.len());
    while index > 0 {
        index -= 1;
        let token = &tokens[index];
        match token.kind {
            TokenKind::Whitespace | TokenKind::Newline => continue,
            _ if token.is_doc_comment(source) => {
                first = Some(index);
                last.get_or_insert(index);
            }
            _ => break,
        }
    }

    let (first, last) = (first?, last?);
    let start = tokens[first].start_offset();
    let end = tokens[last].end_offset();

    Some(DocTrivia {
        span: Span::new(
            tree.file_id(),
            Position::new(start as u32),
            Position::new(end as u32),
        ),
        tokens: first..last + 1,
    })
}
