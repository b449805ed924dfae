//! Recursive-descent parser for check declarations.

use super::ast::{Decl, Expr};
use super::lexer::{self, Token};
use crate::error::{GuardError, Result};

/// Parses declaration text into [`Decl`]s.
///
/// The parser only ensures the syntax is well-formed. It accepts
/// declarations the compiler later rejects, such as unquoted names or
/// lambda bodies, so those surface as compile errors identifying the
/// declaration rather than as syntax errors.
pub struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
}

impl Parser {
    /// Parses a whole declaration block. Declarations are `name ':' body`,
    /// optionally terminated with `;`.
    pub fn parse(input: &str) -> Result<Vec<Decl>> {
        let mut parser = Self {
            tokens: lexer::tokenize(input)?,
            pos: 0,
        };
        let mut decls = Vec::new();
        while !parser.at_end() {
            decls.push(parser.parse_decl()?);
        }
        Ok(decls)
    }

    fn parse_decl(&mut self) -> Result<Decl> {
        let name = self.parse_expr()?;
        self.expect(Token::Colon)?;
        let body = self.parse_expr()?;
        self.eat(&Token::Semicolon);
        Ok(Decl { name, body })
    }

    fn parse_expr(&mut self) -> Result<Expr> {
        let (line, token) = self.next()?;
        match token {
            Token::Str(s) => Ok(Expr::Str(s)),
            Token::Number(n) => Ok(Expr::Number(n)),
            Token::Ident(name) => {
                if self.eat(&Token::OpenParen) {
                    let args = self.parse_args()?;
                    Ok(Expr::Call {
                        function: name,
                        args,
                    })
                } else {
                    Ok(Expr::Column(name))
                }
            }
            Token::Pipe => self.parse_lambda(),
            token => Err(GuardError::Parse {
                line,
                message: format!("unexpected token `{token}`"),
            }),
        }
    }

    /// Parses call arguments after the opening paren, through the closing
    /// paren.
    fn parse_args(&mut self) -> Result<Vec<Expr>> {
        let mut args = Vec::new();
        if self.eat(&Token::CloseParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.expect(Token::CloseParen)?;
        Ok(args)
    }

    /// Parses a lambda after the opening pipe: `|a, b| body`.
    fn parse_lambda(&mut self) -> Result<Expr> {
        let mut params = Vec::new();
        if !self.eat(&Token::Pipe) {
            loop {
                let (line, token) = self.next()?;
                match token {
                    Token::Ident(name) => params.push(name),
                    token => {
                        return Err(GuardError::Parse {
                            line,
                            message: format!("expected parameter name, got `{token}`"),
                        })
                    }
                }
                if !self.eat(&Token::Comma) {
                    break;
                }
            }
            self.expect(Token::Pipe)?;
        }
        let body = self.parse_expr()?;
        Ok(Expr::Lambda {
            params,
            body: Box::new(body),
        })
    }

    fn next(&mut self) -> Result<(usize, Token)> {
        let entry = self.tokens.get(self.pos).cloned().ok_or_else(|| {
            GuardError::Parse {
                line: self.last_line(),
                message: "unexpected end of input".into(),
            }
        })?;
        self.pos += 1;
        Ok(entry)
    }

    /// Consumes the next token if it equals `token`.
    fn eat(&mut self, token: &Token) -> bool {
        if self.tokens.get(self.pos).map(|(_, t)| t) == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token) -> Result<()> {
        let (line, found) = self.next()?;
        if found == token {
            Ok(())
        } else {
            Err(GuardError::Parse {
                line,
                message: format!("expected `{token}`, got `{found}`"),
            })
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn last_line(&self) -> usize {
        self.tokens.last().map(|(line, _)| *line).unwrap_or(1)
    }
}
