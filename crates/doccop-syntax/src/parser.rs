//! Shallow, error-tolerant C# declaration parser
//!
//! Only the declaration structure is recovered: namespaces and type bodies
//! are descended into, while method bodies, accessor blocks, initializers
//! and enum bodies are skipped by bracket balancing. The parser never
//! fails; anything it cannot make sense of is skipped one token at a time.

use mago_database::file::FileId;
use mago_span::{Position, Span};

use crate::lexer::{tokenize, Token, TokenKind};
use crate::tree::{Declaration, DeclarationKind, OtherKind, SyntaxTree, TypeRef};

const MODIFIERS: &[&str] = &[
    "public", "private", "protected", "internal", "static", "virtual", "override", "abstract",
    "sealed", "async", "extern", "unsafe", "new", "partial", "readonly", "volatile", "const",
    "ref", "required", "file", "fixed",
];

const TYPE_KEYWORDS: &[&str] = &["class", "struct", "interface", "record", "enum"];

/// Parse C# source text into a declaration tree
pub fn parse(source: &str) -> SyntaxTree {
    parse_with_file_id(source, FileId::zero())
}

/// Parse C# source text, tagging every span with the given file
pub fn parse_with_file_id(source: &str, file_id: FileId) -> SyntaxTree {
    let tokens = tokenize(source, file_id);
    let significant = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| !t.kind.is_trivia())
        .map(|(i, _)| i)
        .collect();

    let mut parser = Parser {
        source,
        file_id,
        tokens: &tokens,
        significant,
        pos: 0,
        declarations: Vec::new(),
    };
    parser.parse_members(false);

    let mut declarations = parser.declarations;
    declarations.sort_by_key(|d| d.first_token);

    SyntaxTree::new(file_id, tokens, declarations)
}

struct Parser<'s> {
    source: &'s str,
    file_id: FileId,
    tokens: &'s [Token],
    /// Indices into `tokens` of the non-trivia tokens
    significant: Vec<usize>,
    /// Cursor into `significant`
    pos: usize,
    declarations: Vec<Declaration>,
}

impl<'s> Parser<'s> {
    fn peek(&self, ahead: usize) -> Option<&'s Token> {
        let tokens = self.tokens;
        self.significant.get(self.pos + ahead).map(move |&i| &tokens[i])
    }

    fn kind(&self, ahead: usize) -> Option<TokenKind> {
        self.peek(ahead).map(|t| t.kind)
    }

    fn text(&self, ahead: usize) -> &'s str {
        self.peek(ahead).map(|t| t.text(self.source)).unwrap_or("")
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.kind(0) == Some(kind)
    }

    fn at_word(&self, word: &str) -> bool {
        self.at(TokenKind::Identifier) && self.text(0) == word
    }

    fn at_end(&self) -> bool {
        self.pos >= self.significant.len()
    }

    fn bump(&mut self) {
        if !self.at_end() {
            self.pos += 1;
        }
    }

    /// End offset of the last consumed token
    fn prev_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|p| self.significant.get(p))
            .map(|&i| self.tokens[i].end_offset())
            .unwrap_or(0)
    }

    fn span(&self, start: usize, end: usize) -> Span {
        Span::new(
            self.file_id,
            Position::new(start as u32),
            Position::new(end.max(start) as u32),
        )
    }

    /// Parse declarations until end of input, or until the closing brace
    /// of the enclosing body when `in_body` is set
    fn parse_members(&mut self, in_body: bool) {
        while !self.at_end() {
            if self.at(TokenKind::CloseBrace) {
                self.bump();
                if in_body {
                    return;
                }
                continue;
            }

            let before = self.pos;
            self.parse_member();
            if self.pos == before {
                self.bump();
            }
        }
    }

    fn parse_member(&mut self) {
        let start_pos = self.pos;
        let Some(first) = self.peek(0) else {
            return;
        };
        let first_token = self.significant[start_pos];
        let start = first.start_offset();

        while self.at(TokenKind::OpenBracket) {
            self.skip_balanced();
        }
        while self.at(TokenKind::Identifier) && MODIFIERS.contains(&self.text(0)) {
            self.bump();
        }

        let word = if self.at(TokenKind::Identifier) { self.text(0) } else { "" };

        match word {
            "using" => {
                self.skip_to_semicolon();
                return;
            }
            "namespace" => {
                self.parse_namespace();
                return;
            }
            _ if TYPE_KEYWORDS.contains(&word) => {
                self.parse_type_declaration(first_token, start);
                return;
            }
            "delegate" => {
                self.bump();
                let return_type = self.parse_type().unwrap_or_else(|| TypeRef::new(""));
                let name = self.take_name();
                self.skip_member_tail();
                self.push(DeclarationKind::Delegate { return_type }, name, first_token, start);
                return;
            }
            "event" => {
                self.bump();
                let _ = self.parse_type();
                let name = self.take_name();
                self.skip_member_tail();
                self.push(DeclarationKind::Other(OtherKind::Event), name, first_token, start);
                return;
            }
            "implicit" | "explicit" | "operator" => {
                self.skip_member_tail();
                self.push(DeclarationKind::Other(OtherKind::Operator), "operator".into(), first_token, start);
                return;
            }
            _ => {}
        }

        if self.at(TokenKind::Tilde) {
            self.bump();
            let name = self.take_name();
            self.skip_member_tail();
            self.push(DeclarationKind::Other(OtherKind::Destructor), name, first_token, start);
            return;
        }

        if self.at(TokenKind::Identifier) && self.kind(1) == Some(TokenKind::OpenParen) {
            let name = self.take_name();
            self.skip_member_tail();
            self.push(DeclarationKind::Other(OtherKind::Constructor), name, first_token, start);
            return;
        }

        let Some(ty) = self.parse_type() else {
            // Not a declaration we understand; resynchronise on the next terminator
            if self.pos == start_pos {
                self.skip_to_semicolon();
            }
            return;
        };

        if self.at_word("operator") {
            self.skip_member_tail();
            self.push(DeclarationKind::Other(OtherKind::Operator), "operator".into(), first_token, start);
            return;
        }

        // Member name, including explicit interface qualification
        let mut name = String::new();
        loop {
            if self.at_word("this") {
                self.bump();
                self.skip_balanced();
                self.skip_property_tail();
                self.push(DeclarationKind::Indexer { ty }, "this".into(), first_token, start);
                return;
            }
            if !self.at(TokenKind::Identifier) {
                break;
            }
            name = self.text(0).to_string();
            self.bump();
            if self.at(TokenKind::Less) {
                self.skip_angle();
            }
            if self.at(TokenKind::Dot) {
                self.bump();
                continue;
            }
            break;
        }

        match self.kind(0) {
            Some(TokenKind::OpenParen) => {
                self.skip_member_tail();
                self.push(DeclarationKind::Method { return_type: ty }, name, first_token, start);
            }
            Some(TokenKind::OpenBrace) | Some(TokenKind::Arrow) => {
                self.skip_property_tail();
                self.push(DeclarationKind::Property { ty }, name, first_token, start);
            }
            _ => {
                self.skip_to_semicolon();
                self.push(DeclarationKind::Other(OtherKind::Field), name, first_token, start);
            }
        }
    }

    fn parse_namespace(&mut self) {
        self.bump();
        while !self.at_end()
            && !self.at(TokenKind::OpenBrace)
            && !self.at(TokenKind::Semicolon)
            && !self.at(TokenKind::CloseBrace)
        {
            self.bump();
        }
        if self.at(TokenKind::OpenBrace) {
            self.bump();
            self.parse_members(true);
        } else if self.at(TokenKind::Semicolon) {
            // File-scoped namespace: members follow at the current level
            self.bump();
        }
    }

    fn parse_type_declaration(&mut self, first_token: usize, start: usize) {
        let is_enum = self.at_word("enum");
        self.bump();
        if self.at_word("class") || self.at_word("struct") {
            // record class / record struct
            self.bump();
        }
        let name = self.take_name();
        let index = self.declarations.len();
        self.push(DeclarationKind::Other(OtherKind::Type), name, first_token, start);

        // Skip type parameters, primary constructor, base list and constraints
        while !self.at_end()
            && !self.at(TokenKind::OpenBrace)
            && !self.at(TokenKind::Semicolon)
            && !self.at(TokenKind::CloseBrace)
        {
            if matches!(self.kind(0), Some(TokenKind::OpenParen) | Some(TokenKind::OpenBracket)) {
                self.skip_balanced();
            } else {
                self.bump();
            }
        }

        if self.at(TokenKind::Semicolon) {
            self.bump();
        } else if self.at(TokenKind::OpenBrace) {
            if is_enum {
                self.skip_balanced();
            } else {
                self.bump();
                self.parse_members(true);
            }
            if self.at(TokenKind::Semicolon) {
                self.bump();
            }
        }

        let end = self.prev_end();
        let span = self.span(start, end);
        if let Some(declaration) = self.declarations.get_mut(index) {
            declaration.span = span;
        }
    }

    fn push(&mut self, kind: DeclarationKind, name: String, first_token: usize, start: usize) {
        let span = self.span(start, self.prev_end());
        self.declarations.push(Declaration {
            kind,
            name,
            first_token,
            span,
        });
    }

    fn take_name(&mut self) -> String {
        if self.at(TokenKind::Identifier) {
            let name = self.text(0).to_string();
            self.bump();
            name
        } else {
            String::new()
        }
    }

    /// Parse a type reference and return its source text
    fn parse_type(&mut self) -> Option<TypeRef> {
        let start = self.peek(0)?.start_offset();

        if self.at(TokenKind::OpenParen) {
            // Tuple type
            self.skip_balanced();
        } else if self.at(TokenKind::Identifier) && !matches!(self.text(0), "this" | "operator") {
            self.bump();
            loop {
                if self.at(TokenKind::Less) {
                    self.skip_angle();
                }
                let qualified = matches!(self.kind(0), Some(TokenKind::Dot) | Some(TokenKind::ColonColon))
                    && self.kind(1) == Some(TokenKind::Identifier)
                    // `IFoo.Bar(` is an explicit interface member, not a type
                    && !matches!(
                        self.kind(2),
                        Some(TokenKind::OpenParen) | Some(TokenKind::OpenBrace) | Some(TokenKind::Arrow)
                    )
                    && self.text(1) != "this";
                if !qualified {
                    break;
                }
                self.bump();
                self.bump();
            }
        } else {
            return None;
        }

        loop {
            match self.kind(0) {
                Some(TokenKind::Question) | Some(TokenKind::Star) => self.bump(),
                Some(TokenKind::OpenBracket)
                    if matches!(self.kind(1), Some(TokenKind::CloseBracket) | Some(TokenKind::Comma)) =>
                {
                    self.skip_balanced()
                }
                _ => break,
            }
        }

        let end = self.prev_end();
        Some(TypeRef::new(&self.source[start..end]))
    }

    /// Skip a bracketed group starting at the current open token
    fn skip_balanced(&mut self) {
        let mut depth = 0usize;
        while let Some(kind) = self.kind(0) {
            match kind {
                TokenKind::OpenBrace | TokenKind::OpenParen | TokenKind::OpenBracket => depth += 1,
                TokenKind::CloseBrace | TokenKind::CloseParen | TokenKind::CloseBracket => {
                    depth = depth.saturating_sub(1);
                }
                _ => {}
            }
            self.bump();
            if depth == 0 {
                return;
            }
        }
    }

    /// Skip generic arguments `<...>`, giving up at statement boundaries
    fn skip_angle(&mut self) {
        let mut depth = 0usize;
        while let Some(kind) = self.kind(0) {
            match kind {
                TokenKind::Less => depth += 1,
                TokenKind::Greater => depth = depth.saturating_sub(1),
                TokenKind::OpenParen | TokenKind::OpenBracket => {
                    self.skip_balanced();
                    continue;
                }
                TokenKind::Semicolon | TokenKind::OpenBrace | TokenKind::CloseBrace => return,
                _ => {}
            }
            self.bump();
            if depth == 0 {
                return;
            }
        }
    }

    /// Skip through the next `;` at this nesting level; stops before an
    /// unmatched `}` so the enclosing body can close
    fn skip_to_semicolon(&mut self) {
        while let Some(kind) = self.kind(0) {
            match kind {
                TokenKind::Semicolon => {
                    self.bump();
                    return;
                }
                TokenKind::CloseBrace => return,
                TokenKind::OpenBrace | TokenKind::OpenParen | TokenKind::OpenBracket => {
                    self.skip_balanced()
                }
                _ => self.bump(),
            }
        }
    }

    /// Skip parameters, constraints and the body of a method-like member
    fn skip_member_tail(&mut self) {
        while let Some(kind) = self.kind(0) {
            match kind {
                TokenKind::Semicolon => {
                    self.bump();
                    return;
                }
                TokenKind::OpenBrace => {
                    self.skip_balanced();
                    return;
                }
                TokenKind::Arrow => {
                    self.skip_to_semicolon();
                    return;
                }
                TokenKind::CloseBrace => return,
                TokenKind::OpenParen | TokenKind::OpenBracket => self.skip_balanced(),
                _ => self.bump(),
            }
        }
    }

    /// Skip an accessor block or expression body, plus any initializer
    fn skip_property_tail(&mut self) {
        if self.at(TokenKind::Arrow) {
            self.skip_to_semicolon();
            return;
        }
        if self.at(TokenKind::OpenBrace) {
            self.skip_balanced();
        }
        if self.at(TokenKind::Eq) {
            self.skip_to_semicolon();
        }
    }
}
