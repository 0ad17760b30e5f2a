//! Recursive-descent parser for the MIDL subset.
//!
//! The parser's only product is the generic [`ParseTree`]: rule-tagged nodes
//! with ordered children and line/column spans. Binary-operator tiers are
//! deliberately left flat — operands interleaved with operator terminals,
//! exactly as matched — and folded into trees later by the AST builder.

use crate::ast::NameId;
use crate::diagnostic::ParseError;
use crate::lexer::{Token, TokenKind};
use crate::parse_tree::{ParseNode, ParseNodeRef, ParseTree, Rule};
use crate::source::SourceSpan;

#[cfg(test)]
mod tests_parser;

/// A parser that converts a token stream into a parse tree.
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    tree: ParseTree,
}

impl Parser {
    /// Creates a new `Parser` over a token stream. The stream must be
    /// `Eof`-terminated, which [`Lexer::tokenize`](crate::lexer::Lexer)
    /// guarantees.
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            position: 0,
            tree: ParseTree::new(),
        }
    }

    /// Parses the entire input into a parse tree.
    pub fn parse(mut self) -> Result<ParseTree, ParseError> {
        let root = self.parse_specification()?;
        self.tree.set_root(root);
        Ok(self.tree)
    }

    fn current(&self) -> Token {
        self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn bump(&mut self) -> Token {
        let token = self.current();
        if !matches!(token.kind, TokenKind::Eof) {
            self.position += 1;
        }
        token
    }

    /// Consumes the current token if it matches `kind`.
    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.current().kind == kind {
            self.bump();
            return true;
        }
        false
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, ParseError> {
        let token = self.current();
        if token.kind == kind {
            return Ok(self.bump());
        }
        Err(self.unexpected(expected))
    }

    fn expect_identifier(&mut self) -> Result<(NameId, SourceSpan), ParseError> {
        let token = self.current();
        if let TokenKind::Identifier(name) = token.kind {
            self.bump();
            return Ok((name, token.span));
        }
        Err(self.unexpected("an identifier"))
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.current();
        if matches!(token.kind, TokenKind::Eof) {
            return ParseError::UnexpectedEof {
                pos: token.span.start,
            };
        }
        ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: token.kind.to_string(),
            pos: token.span.start,
        }
    }

    fn push(&mut self, rule: Rule, span: SourceSpan, children: Vec<ParseNodeRef>) -> ParseNodeRef {
        let mut node = ParseNode::new(rule, span);
        node.children = children.into_iter().collect();
        self.tree.push_node(node)
    }

    fn push_terminal(&mut self, rule: Rule, text: NameId, span: SourceSpan) -> ParseNodeRef {
        self.tree.push_node(ParseNode::terminal(rule, text, span))
    }

    fn span_of(&self, node: ParseNodeRef) -> SourceSpan {
        self.tree.get(node).span
    }

    /// `specification: definition+`
    fn parse_specification(&mut self) -> Result<ParseNodeRef, ParseError> {
        let start = self.current().span;
        let mut children = Vec::new();
        while !matches!(self.current().kind, TokenKind::Eof) {
            children.push(self.parse_definition()?);
        }
        let span = match children.last() {
            Some(&last) => start.to(self.span_of(last)),
            None => start,
        };
        Ok(self.push(Rule::Specification, span, children))
    }

    /// `definition: (module | struct_decl) ';'`
    fn parse_definition(&mut self) -> Result<ParseNodeRef, ParseError> {
        let node = match self.current().kind {
            TokenKind::Module => self.parse_module()?,
            TokenKind::Struct => self.parse_struct_decl()?,
            _ => return Err(self.unexpected("'module' or 'struct'")),
        };
        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(node)
    }

    /// `module: 'module' ID '{' definition+ '}'`
    fn parse_module(&mut self) -> Result<ParseNodeRef, ParseError> {
        let keyword = self.expect(TokenKind::Module, "'module'")?;
        let (name, name_span) = self.expect_identifier()?;
        let ident = self.push_terminal(Rule::Identifier, name, name_span);

        self.expect(TokenKind::LBrace, "'{'")?;
        let mut children = vec![ident];
        while !matches!(self.current().kind, TokenKind::RBrace | TokenKind::Eof) {
            children.push(self.parse_definition()?);
        }
        let close = self.expect(TokenKind::RBrace, "'}'")?;

        let span = keyword.span.to(close.span);
        Ok(self.push(Rule::Module, span, children))
    }

    /// `struct_decl: 'struct' ID ('{' member* '}')?`
    ///
    /// The body-less form is a forward declaration and yields a
    /// `StructType` node with only the identifier child.
    fn parse_struct_decl(&mut self) -> Result<ParseNodeRef, ParseError> {
        let keyword = self.expect(TokenKind::Struct, "'struct'")?;
        let (name, name_span) = self.expect_identifier()?;
        let ident = self.push_terminal(Rule::Identifier, name, name_span);

        let mut children = vec![ident];
        let mut span = keyword.span.to(name_span);
        if self.eat(TokenKind::LBrace) {
            while !matches!(self.current().kind, TokenKind::RBrace | TokenKind::Eof) {
                children.push(self.parse_member()?);
            }
            let close = self.expect(TokenKind::RBrace, "'}'")?;
            span = keyword.span.to(close.span);
        }
        Ok(self.push(Rule::StructType, span, children))
    }

    /// `member: type_spec declarator (',' declarator)* ';'`
    fn parse_member(&mut self) -> Result<ParseNodeRef, ParseError> {
        let type_spec = self.parse_type_spec()?;
        let mut children = vec![type_spec];
        loop {
            children.push(self.parse_declarator()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::Semicolon, "';'")?;

        let last = *children.last().expect("member has declarators");
        let span = self.span_of(type_spec).to(self.span_of(last));
        Ok(self.push(Rule::Member, span, children))
    }

    /// `type_spec: base type spelling | scoped name`
    ///
    /// Multi-token spellings concatenate without separators, matching the
    /// names the type table recognizes: `unsigned short` → `unsignedshort`,
    /// `long long` → `longlong`.
    fn parse_type_spec(&mut self) -> Result<ParseNodeRef, ParseError> {
        let token = self.current();
        let start = token.span;
        let mut end = token.span;

        let text: String = match token.kind {
            TokenKind::Unsigned => {
                self.bump();
                match self.current().kind {
                    TokenKind::Short => {
                        end = self.bump().span;
                        "unsignedshort".to_string()
                    }
                    TokenKind::Long => {
                        end = self.bump().span;
                        if self.current().kind == TokenKind::Long {
                            end = self.bump().span;
                            "unsignedlonglong".to_string()
                        } else {
                            "unsignedlong".to_string()
                        }
                    }
                    _ => return Err(self.unexpected("'short' or 'long' after 'unsigned'")),
                }
            }
            TokenKind::Long => {
                self.bump();
                match self.current().kind {
                    TokenKind::Long => {
                        end = self.bump().span;
                        "longlong".to_string()
                    }
                    TokenKind::Double => {
                        end = self.bump().span;
                        "longdouble".to_string()
                    }
                    _ => "long".to_string(),
                }
            }
            TokenKind::Identifier(first) => {
                self.bump();
                let mut text = first.as_str().to_string();
                while self.current().kind == TokenKind::ScopeSep {
                    self.bump();
                    let (part, part_span) = self.expect_identifier()?;
                    text.push_str("::");
                    text.push_str(part.as_str());
                    end = part_span;
                }
                text
            }
            kind => match kind.keyword_text() {
                Some(spelling) if !matches!(kind, TokenKind::Module | TokenKind::Struct) => {
                    self.bump();
                    spelling.to_string()
                }
                _ => return Err(self.unexpected("a type name")),
            },
        };

        let span = start.to(end);
        Ok(self.push_terminal(Rule::TypeSpec, NameId::new(&text), span))
    }

    /// `declarator: ID '[' or_expr ']' ('=' '[' or_expr (',' or_expr)* ']')?`
    /// `          | ID ('=' or_expr)?`
    fn parse_declarator(&mut self) -> Result<ParseNodeRef, ParseError> {
        let (name, name_span) = self.expect_identifier()?;
        let ident = self.push_terminal(Rule::Identifier, name, name_span);

        if self.eat(TokenKind::LBracket) {
            let bound = self.parse_or_expr()?;
            let close = self.expect(TokenKind::RBracket, "']'")?;
            let mut children = vec![ident, bound];
            let mut span = name_span.to(close.span);

            if self.eat(TokenKind::Assign) {
                self.expect(TokenKind::LBracket, "'['")?;
                loop {
                    children.push(self.parse_or_expr()?);
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                }
                let close = self.expect(TokenKind::RBracket, "']'")?;
                span = name_span.to(close.span);
            }
            return Ok(self.push(Rule::ArrayDeclarator, span, children));
        }

        if self.eat(TokenKind::Assign) {
            let init = self.parse_or_expr()?;
            let span = name_span.to(self.span_of(init));
            return Ok(self.push(Rule::SimpleDeclarator, span, vec![ident, init]));
        }

        Ok(self.push(Rule::SimpleDeclarator, name_span, vec![ident]))
    }

    fn parse_or_expr(&mut self) -> Result<ParseNodeRef, ParseError> {
        self.parse_binary_chain(Rule::OrExpr, &[TokenKind::Or], Self::parse_xor_expr)
    }

    fn parse_xor_expr(&mut self) -> Result<ParseNodeRef, ParseError> {
        self.parse_binary_chain(Rule::XorExpr, &[TokenKind::Xor], Self::parse_and_expr)
    }

    fn parse_and_expr(&mut self) -> Result<ParseNodeRef, ParseError> {
        self.parse_binary_chain(Rule::AndExpr, &[TokenKind::And], Self::parse_shift_expr)
    }

    fn parse_shift_expr(&mut self) -> Result<ParseNodeRef, ParseError> {
        self.parse_binary_chain(
            Rule::ShiftExpr,
            &[TokenKind::LShift, TokenKind::RShift],
            Self::parse_add_expr,
        )
    }

    fn parse_add_expr(&mut self) -> Result<ParseNodeRef, ParseError> {
        self.parse_binary_chain(
            Rule::AddExpr,
            &[TokenKind::Plus, TokenKind::Minus],
            Self::parse_mult_expr,
        )
    }

    fn parse_mult_expr(&mut self) -> Result<ParseNodeRef, ParseError> {
        self.parse_binary_chain(
            Rule::MultExpr,
            &[TokenKind::Star, TokenKind::Slash, TokenKind::Percent],
            Self::parse_unary_expr,
        )
    }

    /// One precedence tier. A single operand passes through untouched; a
    /// chain keeps operands and operator terminals flat, in source order.
    fn parse_binary_chain(
        &mut self,
        rule: Rule,
        operators: &[TokenKind],
        next: fn(&mut Self) -> Result<ParseNodeRef, ParseError>,
    ) -> Result<ParseNodeRef, ParseError> {
        let first = next(self)?;
        let mut children = vec![first];

        while operators.contains(&self.current().kind) {
            let op = self.bump();
            let text = operator_text(op.kind);
            children.push(self.push_terminal(Rule::Operator, NameId::new(text), op.span));
            children.push(next(self)?);
        }

        if children.len() == 1 {
            return Ok(first);
        }
        let last = *children.last().expect("chain has operands");
        let span = self.span_of(first).to(self.span_of(last));
        Ok(self.push(rule, span, children))
    }

    /// `unary_expr: ('+' | '-' | '~')? literal`
    fn parse_unary_expr(&mut self) -> Result<ParseNodeRef, ParseError> {
        let token = self.current();
        match token.kind {
            TokenKind::Plus | TokenKind::Minus | TokenKind::Tilde => {
                self.bump();
                let text = operator_text(token.kind);
                let op = self.push_terminal(Rule::Operator, NameId::new(text), token.span);
                let literal = self.parse_literal()?;
                let span = token.span.to(self.span_of(literal));
                Ok(self.push(Rule::UnaryExpr, span, vec![op, literal]))
            }
            _ => self.parse_literal(),
        }
    }

    fn parse_literal(&mut self) -> Result<ParseNodeRef, ParseError> {
        let token = self.current();
        let (rule, text) = match token.kind {
            TokenKind::IntegerLit(text) => (Rule::IntegerLit, text),
            TokenKind::FloatLit(text) => (Rule::FloatLit, text),
            TokenKind::CharLit(text) => (Rule::CharLit, text),
            TokenKind::StringLit(text) => (Rule::StringLit, text),
            TokenKind::BooleanLit(text) => (Rule::BooleanLit, text),
            _ => return Err(self.unexpected("a literal")),
        };
        self.bump();
        Ok(self.push_terminal(rule, text, token.span))
    }
}

fn operator_text(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Or => "|",
        TokenKind::Xor => "^",
        TokenKind::And => "&",
        TokenKind::LShift => "<<",
        TokenKind::RShift => ">>",
        TokenKind::Plus => "+",
        TokenKind::Minus => "-",
        TokenKind::Star => "*",
        TokenKind::Slash => "/",
        TokenKind::Percent => "%",
        TokenKind::Tilde => "~",
        _ => unreachable!("not an operator token"),
    }
}
