//! Lexer for the check-declaration language.

use crate::error::{GuardError, Result};
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

/// A lexical token in a declaration block.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A double-quoted string literal (contents, with escapes resolved).
    Str(String),
    /// A numeric literal.
    Number(f64),
    /// An identifier: column reference, function name, or lambda parameter.
    Ident(String),
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `|`
    Pipe,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Str(s) => write!(f, "{s:?}"),
            Token::Number(n) => write!(f, "{n}"),
            Token::Ident(name) => write!(f, "{name}"),
            Token::Colon => write!(f, ":"),
            Token::Comma => write!(f, ","),
            Token::Semicolon => write!(f, ";"),
            Token::OpenParen => write!(f, "("),
            Token::CloseParen => write!(f, ")"),
            Token::Pipe => write!(f, "|"),
        }
    }
}

/// Tokenizes a whole declaration block, pairing each token with its
/// 1-based line number for error reporting.
pub fn tokenize(input: &str) -> Result<Vec<(usize, Token)>> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

/// Streams tokens from declaration text. `#` starts a comment running to
/// the end of the line.
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
        }
    }

    fn err(&self, message: impl Into<String>) -> GuardError {
        GuardError::Parse {
            line: self.line,
            message: message.into(),
        }
    }

    /// Produces the next token with its line number, or `None` at the end
    /// of input.
    pub fn next_token(&mut self) -> Result<Option<(usize, Token)>> {
        self.skip_ignored();
        let Some(&c) = self.chars.peek() else {
            return Ok(None);
        };
        let line = self.line;
        let token = match c {
            '"' => self.scan_string()?,
            c if c.is_ascii_digit() => Token::Number(self.scan_number()?),
            '-' => {
                self.chars.next();
                match self.chars.peek() {
                    Some(d) if d.is_ascii_digit() => Token::Number(-self.scan_number()?),
                    _ => return Err(self.err("unexpected character `-`")),
                }
            }
            c if c.is_alphabetic() || c == '_' => self.scan_ident(),
            _ => {
                self.chars.next();
                match c {
                    ':' => Token::Colon,
                    ',' => Token::Comma,
                    ';' => Token::Semicolon,
                    '(' => Token::OpenParen,
                    ')' => Token::CloseParen,
                    '|' => Token::Pipe,
                    other => return Err(self.err(format!("unexpected character `{other}`"))),
                }
            }
        };
        Ok(Some((line, token)))
    }

    fn skip_ignored(&mut self) {
        while let Some(&c) = self.chars.peek() {
            match c {
                '\n' => {
                    self.line += 1;
                    self.chars.next();
                }
                c if c.is_whitespace() => {
                    self.chars.next();
                }
                '#' => {
                    while let Some(&c) = self.chars.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.chars.next();
                    }
                }
                _ => break,
            }
        }
    }

    fn scan_ident(&mut self) -> Token {
        let mut name = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                name.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        Token::Ident(name)
    }

    fn scan_number(&mut self) -> Result<f64> {
        let mut literal = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() || c == '.' {
                literal.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        literal
            .parse::<f64>()
            .map_err(|_| self.err(format!("invalid number `{literal}`")))
    }

    fn scan_string(&mut self) -> Result<Token> {
        self.chars.next();
        let mut contents = String::new();
        loop {
            match self.chars.next() {
                Some('"') => return Ok(Token::Str(contents)),
                Some('\\') => match self.chars.next() {
                    Some('"') => contents.push('"'),
                    Some('\\') => contents.push('\\'),
                    Some(other) => {
                        return Err(self.err(format!("unknown escape `\\{other}`")));
                    }
                    None => return Err(self.err("unterminated string literal")),
                },
                Some('\n') | None => return Err(self.err("unterminated string literal")),
                Some(c) => contents.push(c),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|(_, token)| token)
            .collect()
    }

    #[test]
    fn test_declaration_tokens() {
        assert_eq!(
            tokens(r#""positive": is_positive(a);"#),
            vec![
                Token::Str("positive".into()),
                Token::Colon,
                Token::Ident("is_positive".into()),
                Token::OpenParen,
                Token::Ident("a".into()),
                Token::CloseParen,
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            tokens("f(1, -2.5)"),
            vec![
                Token::Ident("f".into()),
                Token::OpenParen,
                Token::Number(1.0),
                Token::Comma,
                Token::Number(-2.5),
                Token::CloseParen,
            ]
        );
    }

    #[test]
    fn test_comments_and_line_numbers() {
        let tokens = tokenize("# header\n\"a\": p(x)\n\"b\": q(y)").unwrap();
        assert_eq!(tokens[0], (2, Token::Str("a".into())));
        assert_eq!(tokens[6], (3, Token::Str("b".into())));
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(tokens(r#""a \"b\"""#), vec![Token::Str(r#"a "b""#.into())]);
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("\"oops").unwrap_err();
        assert!(err.to_string().contains("unterminated string"));
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize("\"a\": p(x) @").unwrap_err();
        assert!(err.to_string().contains("unexpected character `@`"));
    }
}
