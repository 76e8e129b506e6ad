//! Token definitions for C# source text
//!
//! The lexer keeps every byte of the input: whitespace, line breaks,
//! comments and preprocessor directives come out as trivia tokens so
//! that the parser can hand them to the trivia scanner unchanged.

use logos::{Lexer, Logos};
use mago_database::file::FileId;
use mago_span::{Position, Span};

/// All token kinds produced by the C# lexer
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Trivia
    #[regex(r"[ \t\f]+")]
    Whitespace,

    #[regex(r"\r?\n")]
    Newline,

    #[regex(r"//[^\r\n]*")]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment,

    #[regex(r"#[^\r\n]*")]
    Directive,

    // Words and literals
    #[regex(r"@?[\p{L}_][\p{L}\p{N}_]*")]
    Identifier,

    #[regex(r"[0-9][0-9A-Za-z_]*")]
    Number,

    #[regex(r#""([^"\\\r\n]|\\.)*""#)]
    #[regex(r#"\$"([^"\\\r\n]|\\.)*""#)]
    #[token("@\"", verbatim_string)]
    #[token("@$\"", verbatim_string)]
    #[token("$@\"", verbatim_string)]
    String,

    #[regex(r"'([^'\\\r\n]|\\.)*'")]
    Char,

    // Punctuation the parser cares about
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("::")]
    ColonColon,
    #[token(":")]
    Colon,
    #[token("=>")]
    Arrow,
    #[token("==")]
    EqEq,
    #[token("=")]
    Eq,
    #[token("?")]
    Question,
    #[token("*")]
    Star,
    #[token("~")]
    Tilde,

    /// Any character the lexer has no rule for (operators, stray bytes)
    Unknown,
}

/// Consume a block comment body through the closing `*/`
///
/// An unterminated comment runs to the end of the input.
fn block_comment(lex: &mut Lexer<TokenKind>) -> bool {
    let rest = lex.remainder();
    match rest.find("*/") {
        Some(end) => lex.bump(end + 2),
        None => lex.bump(rest.len()),
    }
    true
}

/// Consume a verbatim string body, where `""` stands for one quote
fn verbatim_string(lex: &mut Lexer<TokenKind>) -> bool {
    let rest = lex.remainder().as_bytes();
    let mut i = 0;
    while i < rest.len() {
        if rest[i] == b'"' {
            if rest.get(i + 1) == Some(&b'"') {
                i += 2;
                continue;
            }
            lex.bump(i + 1);
            return true;
        }
        i += 1;
    }
    lex.bump(rest.len());
    true
}

impl TokenKind {
    /// Whitespace, line breaks, comments and directives
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace
                | TokenKind::Newline
                | TokenKind::LineComment
                | TokenKind::BlockComment
                | TokenKind::Directive
        )
    }
}

/// A lexed token with its absolute position in the file
#[derive(Debug, Clone, Copy)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn start_offset(&self) -> usize {
        self.span.start.offset as usize
    }

    pub fn end_offset(&self) -> usize {
        self.span.end.offset as usize
    }

    /// The source text covered by this token
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start_offset()..self.end_offset()]
    }

    /// Whether this token is a `///` or `/** */` documentation comment
    pub fn is_doc_comment(&self, source: &str) -> bool {
        let text = self.text(source);
        match self.kind {
            TokenKind::LineComment => text.starts_with("///") && !text.starts_with("////"),
            TokenKind::BlockComment => text.starts_with("/**") && !text.starts_with("/**/"),
            _ => false,
        }
    }
}

/// Split source text into tokens, trivia included
///
/// Bytes the lexer does not recognise become `Unknown` tokens, so the
/// returned tokens always cover the whole input without gaps.
pub fn tokenize(source: &str, file_id: FileId) -> Vec<Token> {
    let mut lexer = TokenKind::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let range = lexer.span();
        let kind = result.unwrap_or(TokenKind::Unknown);
        tokens.push(Token {
            kind,
            span: Span::new(
                file_id,
                Position::new(range.start as u32),
                Position::new(range.end as u32),
            ),
        });
    }

    tokens
}
