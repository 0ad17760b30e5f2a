//! Lexical analysis for the MIDL subset.
//!
//! Produces a flat token stream with 1-based line/column spans. Literal
//! tokens keep their raw source text, quotes and suffixes included, because
//! later phases validate and re-emit that text verbatim.

use std::fmt::{self, Display, Formatter};

use crate::ast::NameId;
use crate::diagnostic::ParseError;
use crate::source::{SourcePos, SourceSpan};

#[cfg(test)]
mod tests_lexer;

/// MIDL token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // === LITERALS ===
    IntegerLit(NameId),
    FloatLit(NameId),
    CharLit(NameId),
    StringLit(NameId),
    BooleanLit(NameId),

    // === IDENTIFIERS ===
    Identifier(NameId),

    // === KEYWORDS ===
    Module,
    Struct,
    Short,
    Long,
    Unsigned,
    Int16,
    Int32,
    Int64,
    Uint16,
    Uint32,
    Uint64,
    Float,
    Double,
    Char,
    String,
    Boolean,

    // === OPERATORS ===
    Or,
    Xor,
    And,
    LShift,
    RShift,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Tilde,

    // === PUNCTUATION ===
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Assign,
    ScopeSep,

    Eof,
}

impl TokenKind {
    /// Source spelling of keyword tokens, used to assemble the concatenated
    /// type-spec text (`unsigned short` becomes `unsignedshort`).
    pub fn keyword_text(self) -> Option<&'static str> {
        match self {
            TokenKind::Module => Some("module"),
            TokenKind::Struct => Some("struct"),
            TokenKind::Short => Some("short"),
            TokenKind::Long => Some("long"),
            TokenKind::Unsigned => Some("unsigned"),
            TokenKind::Int16 => Some("int16"),
            TokenKind::Int32 => Some("int32"),
            TokenKind::Int64 => Some("int64"),
            TokenKind::Uint16 => Some("uint16"),
            TokenKind::Uint32 => Some("uint32"),
            TokenKind::Uint64 => Some("uint64"),
            TokenKind::Float => Some("float"),
            TokenKind::Double => Some("double"),
            TokenKind::Char => Some("char"),
            TokenKind::String => Some("string"),
            TokenKind::Boolean => Some("boolean"),
            _ => None,
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::IntegerLit(text)
            | TokenKind::FloatLit(text)
            | TokenKind::CharLit(text)
            | TokenKind::StringLit(text)
            | TokenKind::BooleanLit(text)
            | TokenKind::Identifier(text) => write!(f, "'{}'", text),
            TokenKind::Or => f.write_str("'|'"),
            TokenKind::Xor => f.write_str("'^'"),
            TokenKind::And => f.write_str("'&'"),
            TokenKind::LShift => f.write_str("'<<'"),
            TokenKind::RShift => f.write_str("'>>'"),
            TokenKind::Plus => f.write_str("'+'"),
            TokenKind::Minus => f.write_str("'-'"),
            TokenKind::Star => f.write_str("'*'"),
            TokenKind::Slash => f.write_str("'/'"),
            TokenKind::Percent => f.write_str("'%'"),
            TokenKind::Tilde => f.write_str("'~'"),
            TokenKind::LBrace => f.write_str("'{'"),
            TokenKind::RBrace => f.write_str("'}'"),
            TokenKind::LBracket => f.write_str("'['"),
            TokenKind::RBracket => f.write_str("']'"),
            TokenKind::Semicolon => f.write_str("';'"),
            TokenKind::Comma => f.write_str("','"),
            TokenKind::Assign => f.write_str("'='"),
            TokenKind::ScopeSep => f.write_str("'::'"),
            TokenKind::Eof => f.write_str("end of file"),
            kind => match kind.keyword_text() {
                Some(text) => write!(f, "'{}'", text),
                None => write!(f, "{:?}", kind),
            },
        }
    }
}

/// A token with its source span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: SourceSpan,
}

/// Hand-written lexer over the raw input text.
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
    /// Position of the most recently consumed character.
    last_pos: SourcePos,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            last_pos: SourcePos::new(1, 1),
        }
    }

    /// Tokenize the whole input. The result always ends with an `Eof` token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia()?;
            let start = self.cursor();
            let Some(ch) = self.peek() else {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    span: SourceSpan::point(start),
                });
                return Ok(tokens);
            };
            let kind = match ch {
                c if c.is_ascii_digit() => self.lex_number()?,
                c if c.is_ascii_alphabetic() || c == '_' => self.lex_word(),
                '\'' => self.lex_char()?,
                '"' => self.lex_string()?,
                _ => self.lex_punct()?,
            };
            tokens.push(Token {
                kind,
                span: SourceSpan::new(start, self.last_pos),
            });
        }
    }

    fn cursor(&self) -> SourcePos {
        SourcePos::new(self.line, self.column)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.last_pos = self.cursor();
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Skip whitespace plus `//` and `/* */` comments.
    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') if self.peek_at(1) == Some('/') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                Some('/') if self.peek_at(1) == Some('*') => {
                    let open = self.cursor();
                    self.bump();
                    self.bump();
                    loop {
                        match self.peek() {
                            Some('*') if self.peek_at(1) == Some('/') => {
                                self.bump();
                                self.bump();
                                break;
                            }
                            Some(_) => {
                                self.bump();
                            }
                            None => {
                                return Err(ParseError::UnterminatedLiteral {
                                    what: "comment",
                                    pos: open,
                                });
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Integer or floating-point literal, raw text preserved (including an
    /// optional `f`/`d` suffix and exponent).
    fn lex_number(&mut self) -> Result<TokenKind, ParseError> {
        let mut text = String::new();
        let mut is_float = false;

        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            text.push('.');
            self.bump();
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    text.push(c);
                    self.bump();
                } else {
                    break;
                }
            }
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            let mut lookahead = 1;
            if matches!(self.peek_at(1), Some('+') | Some('-')) {
                lookahead = 2;
            }
            if self.peek_at(lookahead).is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                for _ in 0..lookahead {
                    text.push(self.bump().expect("exponent prefix"));
                }
                while let Some(c) = self.peek() {
                    if c.is_ascii_digit() {
                        text.push(c);
                        self.bump();
                    } else {
                        break;
                    }
                }
            }
        }
        if matches!(self.peek(), Some('f') | Some('d')) {
            is_float = true;
            text.push(self.bump().expect("suffix"));
        }

        let text = NameId::new(&text);
        if is_float {
            Ok(TokenKind::FloatLit(text))
        } else {
            Ok(TokenKind::IntegerLit(text))
        }
    }

    /// Identifier, keyword, or boolean literal.
    fn lex_word(&mut self) -> TokenKind {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }
        match text.as_str() {
            "module" => TokenKind::Module,
            "struct" => TokenKind::Struct,
            "short" => TokenKind::Short,
            "long" => TokenKind::Long,
            "unsigned" => TokenKind::Unsigned,
            "int16" => TokenKind::Int16,
            "int32" => TokenKind::Int32,
            "int64" => TokenKind::Int64,
            "uint16" => TokenKind::Uint16,
            "uint32" => TokenKind::Uint32,
            "uint64" => TokenKind::Uint64,
            "float" => TokenKind::Float,
            "double" => TokenKind::Double,
            "char" => TokenKind::Char,
            "string" => TokenKind::String,
            "boolean" => TokenKind::Boolean,
            "true" | "false" => TokenKind::BooleanLit(NameId::new(&text)),
            _ => TokenKind::Identifier(NameId::new(&text)),
        }
    }

    /// Character literal, quotes kept in the text. A backslash escapes the
    /// next character.
    fn lex_char(&mut self) -> Result<TokenKind, ParseError> {
        let open = self.cursor();
        let mut text = String::new();
        text.push(self.bump().expect("opening quote"));
        loop {
            match self.peek() {
                Some('\'') => {
                    text.push(self.bump().expect("closing quote"));
                    return Ok(TokenKind::CharLit(NameId::new(&text)));
                }
                Some('\\') => {
                    text.push(self.bump().expect("backslash"));
                    if let Some(c) = self.bump() {
                        text.push(c);
                    }
                }
                Some(c) if c != '\n' => {
                    text.push(c);
                    self.bump();
                }
                _ => {
                    return Err(ParseError::UnterminatedLiteral {
                        what: "character",
                        pos: open,
                    });
                }
            }
        }
    }

    /// String literal, quotes kept in the text.
    fn lex_string(&mut self) -> Result<TokenKind, ParseError> {
        let open = self.cursor();
        let mut text = String::new();
        text.push(self.bump().expect("opening quote"));
        loop {
            match self.peek() {
                Some('"') => {
                    text.push(self.bump().expect("closing quote"));
                    return Ok(TokenKind::StringLit(NameId::new(&text)));
                }
                Some('\\') => {
                    text.push(self.bump().expect("backslash"));
                    if let Some(c) = self.bump() {
                        text.push(c);
                    }
                }
                Some(c) if c != '\n' => {
                    text.push(c);
                    self.bump();
                }
                _ => {
                    return Err(ParseError::UnterminatedLiteral {
                        what: "string",
                        pos: open,
                    });
                }
            }
        }
    }

    fn lex_punct(&mut self) -> Result<TokenKind, ParseError> {
        let pos = self.cursor();
        let ch = self.bump().expect("punctuation character");
        let kind = match ch {
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            '=' => TokenKind::Assign,
            '|' => TokenKind::Or,
            '^' => TokenKind::Xor,
            '&' => TokenKind::And,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '~' => TokenKind::Tilde,
            ':' if self.peek() == Some(':') => {
                self.bump();
                TokenKind::ScopeSep
            }
            '<' if self.peek() == Some('<') => {
                self.bump();
                TokenKind::LShift
            }
            '>' if self.peek() == Some('>') => {
                self.bump();
                TokenKind::RShift
            }
            other => return Err(ParseError::UnexpectedCharacter { ch: other, pos }),
        };
        Ok(kind)
    }
}
