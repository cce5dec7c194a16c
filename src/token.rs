use std::fmt;

use crate::intern::StringAtom;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Plus,
    Minus,
    Star,
    Slash,
    DoubleStar,
    DoubleSlash,

    Identifier,
    Number,
    String,
    True,
    False,
    Nil,

    ParenOpen,
    ParenClose,

    Let,

    BangEqual,
    Equal,
    SemicolonEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,

    Block,
    If,
    Then,
    ElseIf,
    Else,
    While,
    Do,
    End,

    And,
    Or,
    Not,

    Print,

    Eof,
}

/// A token as stored in the syntax tree.
///
/// `index` is the token's position in the token stream.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub index: usize,
    lexeme: StringAtom,
}

impl Token {
    pub fn new(kind: TokenKind, index: usize, lexeme: StringAtom) -> Self {
        Self {
            kind,
            index,
            lexeme,
        }
    }

    #[inline]
    pub fn lexeme(&self) -> &str {
        self.lexeme.as_str()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?})", self.kind, self.lexeme())
    }
}
