use miette::SourceSpan;

use crate::ast::{BodyItem, Declaration, PlainRule, Stylesheet};
use crate::directive::classify;
use crate::error::{SyntaxError, SyntaxResult};
use crate::lexer::{lex, Token, TokenKind};

/// Parses stylesheet text into a rule tree.
pub fn parse(source: &str) -> SyntaxResult<Stylesheet> {
    let tokens = lex(source)?;
    Parser::new(source, &tokens).parse_stylesheet()
}

/// Our hand-rolled parser structure.
///
/// Preludes and declaration values are sliced straight out of `source`
/// between their first and last token, so anything the lexer splits apart
/// (strings, slashes, inner whitespace) comes back exactly as written. The
/// text between those slices, comments included, is kept on the nodes.
pub struct Parser<'a> {
    source: &'a str,
    tokens: &'a [Token<'a>],
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, tokens: &'a [Token<'a>]) -> Self {
        Self { source, tokens, pos: 0 }
    }

    /// Peek at the current token without consuming it.
    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn eof_span(&self) -> SourceSpan {
        SourceSpan::new(self.source.len().into(), 0usize)
    }

    /// Source text and span covering tokens `from..to`.
    fn slice(&self, from: usize, to: usize) -> (&'a str, SourceSpan) {
        let start = self.tokens[from].start();
        let end = self.tokens[to - 1].end();
        (&self.source[start..end], SourceSpan::new(start.into(), end - start))
    }

    fn unexpected(&self, token: &Token<'a>, expected: &str) -> SyntaxError {
        SyntaxError::UnexpectedToken {
            found: token.lexeme.to_string(),
            expected: expected.to_string(),
            span: token.span,
        }
    }

    /// End offset of the last consumed token.
    fn consumed(&self) -> usize {
        self.pos
            .checked_sub(1)
            .map_or(0, |last| self.tokens[last].end())
    }

    //--------------------------------------------------------------------------
    // <Stylesheet> ::= (<Rule> | ";")*
    //--------------------------------------------------------------------------

    pub fn parse_stylesheet(&mut self) -> SyntaxResult<Stylesheet> {
        let mut rules = Vec::new();
        let mut cursor = 0;

        let tokens = self.tokens;
        while let Some(kind) = self.peek_kind() {
            match kind {
                TokenKind::Semicolon => self.bump(),
                TokenKind::RBrace => return Err(self.unexpected(&tokens[self.pos], "a rule")),
                _ => {
                    let rule = self.parse_rule(cursor)?;
                    cursor = self.consumed();
                    rules.push(classify(rule));
                }
            }
        }

        Ok(Stylesheet {
            rules,
            trailing: self.source[cursor..].to_string(),
        })
    }

    //--------------------------------------------------------------------------
    // <Rule> ::= <prelude> "{" <Body> "}" | "@" <prelude> ";"
    //--------------------------------------------------------------------------

    /// Parses a rule whose leading text starts at `cursor`.
    fn parse_rule(&mut self, cursor: usize) -> SyntaxResult<PlainRule> {
        let tokens = self.tokens;
        let start = self.pos;

        loop {
            match self.peek_kind() {
                None => {
                    return Err(SyntaxError::UnexpectedEof {
                        expected: "`{`".to_string(),
                        span: self.eof_span(),
                    })
                }
                Some(TokenKind::RBrace) => {
                    return Err(self.unexpected(&tokens[self.pos], "`{`"))
                }
                Some(TokenKind::LBrace) | Some(TokenKind::Semicolon) => {
                    if self.pos == start {
                        return Err(self.unexpected(&tokens[self.pos], "a selector"));
                    }
                    break;
                }
                Some(_) => self.bump(),
            }
        }

        let before = self.source[cursor..tokens[start].start()].to_string();
        let (prelude, prelude_span) = self.slice(start, self.pos);
        let terminator = &tokens[self.pos];
        let between = self.source[self.consumed()..terminator.start()].to_string();

        if terminator.kind == TokenKind::Semicolon {
            if !prelude.starts_with('@') {
                return Err(self.unexpected(terminator, "`{`"));
            }
            let (_, span) = self.slice(start, self.pos + 1);
            self.bump();
            return Ok(PlainRule {
                before,
                prelude: prelude.to_string(),
                between,
                body: None,
                after: String::new(),
                span,
            });
        }

        // consume '{'
        let open = terminator.span;
        self.bump();
        let (body, after) = self.parse_body(open, terminator.end())?;
        let (_, span) = self.slice(start, self.pos);
        log::trace!("Parsed rule `{}` at {:?}", prelude, prelude_span);

        Ok(PlainRule {
            before,
            prelude: prelude.to_string(),
            between,
            body: Some(body),
            after,
            span,
        })
    }

    //--------------------------------------------------------------------------
    // <Body> ::= (<Declaration> | <Rule> | ";")* "}"
    //--------------------------------------------------------------------------

    /// Parses block items up to the closing `}`, returning them with the text
    /// between the last item and the `}`.
    fn parse_body(&mut self, open: SourceSpan, mut cursor: usize) -> SyntaxResult<(Vec<BodyItem>, String)> {
        let mut items = Vec::new();

        let tokens = self.tokens;
        loop {
            match self.peek_kind() {
                None => return Err(SyntaxError::UnclosedBlock { span: open }),
                Some(TokenKind::RBrace) => {
                    let after = self.source[cursor..tokens[self.pos].start()].to_string();
                    self.bump();
                    return Ok((items, after));
                }
                Some(TokenKind::Semicolon) => self.bump(),
                Some(_) => {
                    let item = if self.starts_nested_rule() {
                        BodyItem::Rule(self.parse_rule(cursor)?)
                    } else {
                        BodyItem::Declaration(self.parse_declaration(cursor)?)
                    };
                    cursor = self.consumed();
                    items.push(item);
                }
            }
        }
    }

    /// A body item is a nested rule when a `{` comes before the next `;` or
    /// `}`, or when it is an at-rule statement. Semicolons inside
    /// parentheses, as in `url(data:...;base64,...)`, do not end the item.
    fn starts_nested_rule(&self) -> bool {
        let at_rule = self.peek().map_or(false, |t| t.lexeme.starts_with('@'));
        let mut depth = 0;
        for tok in &self.tokens[self.pos..] {
            match tok.kind {
                TokenKind::LBrace if depth == 0 => return true,
                TokenKind::Semicolon if depth == 0 => return at_rule,
                TokenKind::RBrace => return false,
                TokenKind::Text => depth = nest(depth, tok.lexeme),
                _ => {}
            }
        }
        false
    }

    //--------------------------------------------------------------------------
    // <Declaration> ::= <name> ":" <value> (";" | &"}")
    //--------------------------------------------------------------------------

    fn parse_declaration(&mut self, cursor: usize) -> SyntaxResult<Declaration> {
        let tokens = self.tokens;
        let start = self.pos;

        // Scan the property name up to the first ':'
        let colon = loop {
            match self.peek_kind() {
                Some(TokenKind::Colon) => break self.pos,
                Some(TokenKind::Semicolon) | Some(TokenKind::RBrace) | None => {
                    let (text, span) = self.slice(start, self.pos.max(start + 1));
                    return Err(SyntaxError::MissingColon { text: text.to_string(), span });
                }
                Some(_) => self.bump(),
            }
        };

        if colon == start {
            return Err(self.unexpected(&tokens[colon], "a property name"));
        }
        let before = self.source[cursor..tokens[start].start()].to_string();
        let (property, _) = self.slice(start, colon);
        let property_end = tokens[colon - 1].end();

        // consume ':'
        self.bump();
        let value_start = self.pos;
        let mut depth = 0;
        while let Some(token) = tokens.get(self.pos) {
            match token.kind {
                TokenKind::RBrace => break,
                TokenKind::Semicolon if depth == 0 => break,
                TokenKind::Text => depth = nest(depth, token.lexeme),
                _ => {}
            }
            self.bump();
        }

        let (value, between_end) = if self.pos > value_start {
            let (value, span) = self.slice(value_start, self.pos);
            (value, span.offset())
        } else {
            ("", tokens[colon].end())
        };
        let value_end = self.consumed();
        let between = self.source[property_end..between_end].to_string();
        let (_, span) = self.slice(start, self.pos);

        let after = match tokens.get(self.pos) {
            Some(token) if token.kind == TokenKind::Semicolon => {
                self.bump();
                self.source[value_end..token.end()].to_string()
            }
            _ => String::new(),
        };

        Ok(Declaration {
            before,
            property: property.to_string(),
            between,
            value: value.to_string(),
            after,
            span,
        })
    }
}

/// Parenthesis depth after `lexeme`.
fn nest(depth: usize, lexeme: &str) -> usize {
    lexeme.chars().fold(depth, |depth, c| match c {
        '(' => depth + 1,
        ')' => depth.saturating_sub(1),
        _ => depth,
    })
}
