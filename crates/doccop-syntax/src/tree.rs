//! Declaration tree produced by the parser

use mago_database::file::FileId;
use mago_span::Span;

use crate::lexer::Token;

/// A type as written in source, e.g. `void`, `List<int>`, `(int, string)?`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub text: String,
}

impl TypeRef {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Whether this is the `void` keyword (a verbatim `@void` is an identifier)
    pub fn is_void(&self) -> bool {
        self.text == "void"
    }
}

/// Declarations outside the return-value rule family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtherKind {
    /// class, struct, interface, record, enum
    Type,
    Field,
    Event,
    Constructor,
    Destructor,
    Operator,
}

/// The closed set of member kinds the rules distinguish
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationKind {
    Method { return_type: TypeRef },
    Delegate { return_type: TypeRef },
    Property { ty: TypeRef },
    Indexer { ty: TypeRef },
    Other(OtherKind),
}

/// A member or type declaration
#[derive(Debug, Clone)]
pub struct Declaration {
    pub kind: DeclarationKind,
    /// Declared name (`this` for indexers, the type name for constructors)
    pub name: String,
    /// Index into [`SyntaxTree::tokens`] of the first token, attributes included
    pub first_token: usize,
    /// From the first token through the declaration's terminator
    pub span: Span,
}

impl Declaration {
    pub fn start_offset(&self) -> usize {
        self.span.start.offset as usize
    }
}

/// Parsed file: the full token stream plus declarations in source order
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    file_id: FileId,
    tokens: Vec<Token>,
    declarations: Vec<Declaration>,
}

impl SyntaxTree {
    pub(crate) fn new(file_id: FileId, tokens: Vec<Token>, declarations: Vec<Declaration>) -> Self {
        Self {
            file_id,
            tokens,
            declarations,
        }
    }

    pub fn file_id(&self) -> FileId {
        self.file_id
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Declarations ordered by their first token
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }
}
