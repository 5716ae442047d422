use log::trace;
use thiserror::Error;

use crate::ast::{Token, TokenKind};

const LOG_TARGET: &str = "constraint::lexer";

/// An illegal character sequence in the expression source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at position {position}")]
pub struct TokenizerError {
    pub message: String,
    /// Character offset of the offending input
    pub position: usize,
}

impl TokenizerError {
    fn new(message: impl Into<String>, position: usize) -> Self {
        TokenizerError {
            message: message.into(),
            position,
        }
    }
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_string(&mut self) -> Result<String, TokenizerError> {
        let start = self.position;
        let mut result = String::new();
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                '\'' => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => match self.peek_char(1) {
                    Some(escaped @ ('\'' | '\\')) => {
                        result.push(escaped);
                        self.advance();
                        self.advance();
                    }
                    // Unknown escapes are kept verbatim
                    _ => {
                        result.push('\\');
                        self.advance();
                    }
                },
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(TokenizerError::new("Unterminated string literal", start))
    }

    fn read_number(&mut self) -> String {
        let mut number = String::new();
        let mut is_float = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.'
                && !is_float
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                is_float = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        number
    }

    fn single(&mut self, kind: TokenKind, ch: char) -> Token {
        let token = Token::new(kind, ch.to_string(), self.position);
        self.advance();
        token
    }

    fn double(&mut self, kind: TokenKind, text: &str) -> Token {
        let token = Token::new(kind, text, self.position);
        self.advance();
        self.advance();
        token
    }

    /// Returns the next token, `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>, TokenizerError> {
        self.skip_whitespace();
        let start = self.position;

        let token = match self.current_char() {
            None => return Ok(None),
            Some('=') => match self.peek_char(1) {
                Some('>') => self.double(TokenKind::Arrow, "=>"),
                Some('=') => self.double(TokenKind::Operator, "=="),
                _ => return Err(TokenizerError::new("Unexpected character: =", start)),
            },
            Some('!') => {
                if self.peek_char(1) == Some('=') {
                    self.double(TokenKind::Operator, "!=")
                } else {
                    self.single(TokenKind::Operator, '!')
                }
            }
            Some('<') => {
                if self.peek_char(1) == Some('=') {
                    self.double(TokenKind::Operator, "<=")
                } else {
                    self.single(TokenKind::Operator, '<')
                }
            }
            Some('>') => {
                if self.peek_char(1) == Some('=') {
                    self.double(TokenKind::Operator, ">=")
                } else {
                    self.single(TokenKind::Operator, '>')
                }
            }
            Some('&') if self.peek_char(1) == Some('&') => self.double(TokenKind::Operator, "&&"),
            Some('|') if self.peek_char(1) == Some('|') => self.double(TokenKind::Operator, "||"),
            Some(ch @ ('(' | ')')) => self.single(TokenKind::Paren, ch),
            Some(ch @ ('[' | ']')) => self.single(TokenKind::Bracket, ch),
            Some(',') => self.single(TokenKind::Comma, ','),
            Some('.') => self.single(TokenKind::Dot, '.'),
            Some('\'') => {
                let text = self.read_string()?;
                Token::new(TokenKind::String, text, start).with_end(self.position)
            }
            Some(ch) if ch.is_ascii_digit() => {
                let text = self.read_number();
                Token::new(TokenKind::Number, text, start)
            }
            Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => {
                let text = self.read_identifier();
                Token::new(TokenKind::Ident, text, start)
            }
            Some(ch) => {
                return Err(TokenizerError::new(
                    format!("Unexpected character: {}", ch),
                    start,
                ));
            }
        };

        Ok(Some(token))
    }
}

/// Converts an expression source string into its token stream.
pub fn tokenize(input: &str) -> Result<Vec<Token>, TokenizerError> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    trace!(target: LOG_TARGET, "tokenized {} tokens", tokens.len());
    Ok(tokens)
}

#[test]
fn test_keywords_are_identifiers() {
    let tokens = tokenize("true false null every length").unwrap();
    assert!(tokens.iter().all(|t| t.kind == TokenKind::Ident));
    assert_eq!(tokens[3].text, "every");
}

#[test]
fn test_arrow_before_equality() {
    let tokens = tokenize("a => b == c").unwrap();
    assert_eq!(tokens[1], Token::new(TokenKind::Arrow, "=>", 2));
    assert_eq!(tokens[3], Token::new(TokenKind::Operator, "==", 7));
}
