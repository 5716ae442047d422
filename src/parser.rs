use std::iter::Peekable;
use std::vec;

use log::debug;
use thiserror::Error;

use crate::ast::{BinOp, Expr, FieldPath, PathSegment, Token, TokenKind};
use crate::builtins::{Arity, Builtin};

const LOG_TARGET: &str = "constraint::parser";

/// Maximum nesting of expressions: parenthesized groups, lambda bodies and call arguments.
pub const MAX_EXPRESSION_DEPTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    #[error("{0}")]
    Malformed(String),

    #[error("Expression nesting exceeds maximum depth")]
    DepthExceeded,

    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error("{name}() expects {expected} argument(s), got {found}")]
    ArityMismatch {
        name: &'static str,
        expected: Arity,
        found: usize,
    },

    #[error("{0}() requires a field path argument")]
    ExpectedFieldPath(&'static str),
}

/// A token stream that does not match the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at position {position}")]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    /// Character offset of the offending token (end of input for EOF errors)
    pub position: usize,
}

impl SyntaxError {
    fn malformed(message: impl Into<String>, position: usize) -> Self {
        SyntaxError {
            kind: SyntaxErrorKind::Malformed(message.into()),
            position,
        }
    }

    /// The error text without its position.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// Recursive-descent parser over a fully tokenized expression.
///
/// Grammar, from lowest to highest precedence:
///
/// ```text
/// Expr        := Or ( '=>' Or )?
/// Or          := And ( '||' And )*
/// And         := Comparison ( '&&' Comparison )*
/// Comparison  := Unary ( CompOp Unary )?
/// Unary       := '!' Unary | Primary
/// Primary     := '(' Expr ')' | '[' FieldPath (',' FieldPath)* ']'
///              | Number | String | null | true | false
///              | FunctionCall | FieldPath
/// ```
pub struct Parser {
    tokens: Peekable<vec::IntoIter<Token>>,
    last_end: usize,
    depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens: tokens.into_iter().peekable(),
            last_end: 0,
            depth: 0,
        }
    }

    /// Parses a complete expression. Trailing tokens are an error.
    pub fn parse(mut self) -> Result<Expr, SyntaxError> {
        let expr = self.parse_expression()?;
        if let Some(token) = self.tokens.peek() {
            return Err(SyntaxError::malformed(
                format!("Unexpected token after expression: {}", token),
                token.position,
            ));
        }
        debug!(target: LOG_TARGET, "parsed expression: {:?}", expr);
        Ok(expr)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.next();
        if let Some(token) = &token {
            self.last_end = token.end;
        }
        token
    }

    fn check(&mut self, kind: TokenKind, text: &str) -> bool {
        self.tokens.peek().is_some_and(|t| t.is(kind, text))
    }

    fn expect(&mut self, kind: TokenKind, text: &str) -> Result<Token, SyntaxError> {
        match self.tokens.peek() {
            Some(token) if token.is(kind, text) => {}
            Some(token) => {
                return Err(SyntaxError::malformed(
                    format!("Expected {} \"{}\", got {}", kind, text, token),
                    token.position,
                ));
            }
            None => {
                return Err(SyntaxError::malformed(
                    format!("Expected {} \"{}\", got EOF", kind, text),
                    self.last_end,
                ));
            }
        }
        self.advance()
            .ok_or_else(|| SyntaxError::malformed("Unexpected end of expression", self.last_end))
    }

    fn current_position(&mut self) -> usize {
        match self.tokens.peek() {
            Some(token) => token.position,
            None => self.last_end,
        }
    }

    fn enter(&mut self) -> Result<(), SyntaxError> {
        self.depth += 1;
        if self.depth > MAX_EXPRESSION_DEPTH {
            return Err(SyntaxError {
                kind: SyntaxErrorKind::DepthExceeded,
                position: self.current_position(),
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn parse_expression(&mut self) -> Result<Expr, SyntaxError> {
        self.enter()?;
        let mut expr = self.parse_or()?;
        if self.check(TokenKind::Arrow, "=>") {
            self.advance();
            let consequent = self.parse_or()?;
            expr = binary(BinOp::Implies, expr, consequent);
        }
        self.leave();
        Ok(expr)
    }

    /// Chains stay flat so tree depth does not grow with chain length.
    fn parse_or(&mut self) -> Result<Expr, SyntaxError> {
        let mut operands = vec![self.parse_and()?];
        while self.check(TokenKind::Operator, "||") {
            self.advance();
            operands.push(self.parse_and()?);
        }
        Ok(flatten(operands, Expr::Or))
    }

    fn parse_and(&mut self) -> Result<Expr, SyntaxError> {
        let mut operands = vec![self.parse_comparison()?];
        while self.check(TokenKind::Operator, "&&") {
            self.advance();
            operands.push(self.parse_comparison()?);
        }
        Ok(flatten(operands, Expr::And))
    }

    /// At most one comparison per level; `a < b < c` leaves trailing tokens.
    fn parse_comparison(&mut self) -> Result<Expr, SyntaxError> {
        let left = self.parse_unary()?;
        let op = match self.tokens.peek() {
            Some(token) if token.kind == TokenKind::Operator => BinOp::comparison(&token.text),
            _ => None,
        };
        match op {
            Some(op) => {
                self.advance();
                let right = self.parse_unary()?;
                Ok(binary(op, left, right))
            }
            None => Ok(left),
        }
    }

    /// A run of `!` folds to one negation (odd count) or a double negation
    /// (even count), which keeps the boolean coercion of `!!x`.
    fn parse_unary(&mut self) -> Result<Expr, SyntaxError> {
        let mut negations = 0usize;
        while self.check(TokenKind::Operator, "!") {
            self.advance();
            negations += 1;
        }
        let operand = self.parse_primary()?;
        Ok(match negations {
            0 => operand,
            n if n % 2 == 1 => Expr::Not(Box::new(operand)),
            _ => Expr::Not(Box::new(Expr::Not(Box::new(operand)))),
        })
    }

    fn parse_primary(&mut self) -> Result<Expr, SyntaxError> {
        let Some(token) = self.advance() else {
            return Err(SyntaxError::malformed(
                "Unexpected end of expression",
                self.last_end,
            ));
        };

        match token.kind {
            TokenKind::Paren if token.text == "(" => {
                let expr = self.parse_expression()?;
                self.expect(TokenKind::Paren, ")")?;
                Ok(expr)
            }
            TokenKind::Bracket if token.text == "[" => self.parse_field_list(),
            TokenKind::Number => parse_number(&token),
            TokenKind::String => Ok(Expr::String(token.text)),
            TokenKind::Ident => match token.text.as_str() {
                "null" => Ok(Expr::Null),
                "true" => Ok(Expr::Boolean(true)),
                "false" => Ok(Expr::Boolean(false)),
                _ if self.check(TokenKind::Paren, "(") => self.parse_call(token),
                _ => Ok(Expr::Path(self.parse_field_path(token.text)?)),
            },
            _ => Err(SyntaxError::malformed(
                format!("Unexpected token: {}", token),
                token.position,
            )),
        }
    }

    /// `[a, b.c, ...]` after the opening bracket.
    fn parse_field_list(&mut self) -> Result<Expr, SyntaxError> {
        let mut paths = vec![self.parse_list_element()?];
        while self.check(TokenKind::Comma, ",") {
            self.advance();
            paths.push(self.parse_list_element()?);
        }
        self.expect(TokenKind::Bracket, "]")?;
        Ok(Expr::List(paths))
    }

    fn parse_list_element(&mut self) -> Result<FieldPath, SyntaxError> {
        match self.advance() {
            Some(token) if token.kind == TokenKind::Ident => self.parse_field_path(token.text),
            Some(token) => Err(SyntaxError::malformed(
                format!("Expected field path in array, got {}", token),
                token.position,
            )),
            None => Err(SyntaxError::malformed(
                "Expected field path in array, got EOF",
                self.last_end,
            )),
        }
    }

    fn parse_field_path(&mut self, root: String) -> Result<FieldPath, SyntaxError> {
        let mut path = FieldPath::new(root);
        while self.check(TokenKind::Dot, ".") {
            self.advance();
            let segment = match self.advance() {
                Some(token) if token.kind == TokenKind::Ident => match token.text.as_str() {
                    "length" => PathSegment::Length,
                    "every" if self.check(TokenKind::Paren, "(") => self.parse_every()?,
                    _ => PathSegment::Field(token.text),
                },
                Some(token) => {
                    return Err(SyntaxError::malformed(
                        "Expected identifier after dot",
                        token.position,
                    ));
                }
                None => {
                    return Err(SyntaxError::malformed(
                        "Expected identifier after dot",
                        self.last_end,
                    ));
                }
            };
            path.segments.push(segment);
        }
        Ok(path)
    }

    /// `.every(param => body)` after the `every` identifier.
    fn parse_every(&mut self) -> Result<PathSegment, SyntaxError> {
        self.expect(TokenKind::Paren, "(")?;
        let param = match self.tokens.peek() {
            Some(token) if token.kind == TokenKind::Ident => Some(token.text.clone()),
            _ => None,
        };
        let Some(param) = param else {
            let position = self.current_position();
            return Err(SyntaxError::malformed(
                "Expected parameter name in .every()",
                position,
            ));
        };
        self.advance();
        if !self.check(TokenKind::Arrow, "=>") {
            let position = self.current_position();
            return Err(SyntaxError::malformed(
                "Expected => in .every() lambda",
                position,
            ));
        }
        self.advance();
        let body = self.parse_expression()?;
        self.expect(TokenKind::Paren, ")")?;
        Ok(PathSegment::Every {
            param,
            body: Box::new(body),
        })
    }

    fn parse_call(&mut self, name: Token) -> Result<Expr, SyntaxError> {
        let Some(builtin) = Builtin::from_name(&name.text) else {
            return Err(SyntaxError {
                kind: SyntaxErrorKind::UnknownFunction(name.text),
                position: name.position,
            });
        };
        self.expect(TokenKind::Paren, "(")?;

        let mut args = Vec::new();
        if !self.check(TokenKind::Paren, ")") {
            loop {
                args.push(self.parse_expression()?);
                if !self.check(TokenKind::Comma, ",") {
                    break;
                }
                self.advance();
            }
        }
        self.expect(TokenKind::Paren, ")")?;

        let arity = builtin.arity();
        if !arity.accepts(args.len()) {
            return Err(SyntaxError {
                kind: SyntaxErrorKind::ArityMismatch {
                    name: builtin.name(),
                    expected: arity,
                    found: args.len(),
                },
                position: name.position,
            });
        }
        if builtin.is_temporal() && !matches!(args.first(), Some(Expr::Path(path)) if path.keys().is_some()) {
            return Err(SyntaxError {
                kind: SyntaxErrorKind::ExpectedFieldPath(builtin.name()),
                position: name.position,
            });
        }

        Ok(Expr::Call { builtin, args })
    }
}

/// A single operand is returned as is; two or more become one n-ary node.
fn flatten(mut operands: Vec<Expr>, chain: fn(Vec<Expr>) -> Expr) -> Expr {
    if operands.len() == 1 {
        operands.remove(0)
    } else {
        chain(operands)
    }
}

fn binary(op: BinOp, left: Expr, right: Expr) -> Expr {
    Expr::BinaryOp {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn parse_number(token: &Token) -> Result<Expr, SyntaxError> {
    if !token.text.contains('.') {
        if let Ok(n) = token.text.parse::<i64>() {
            return Ok(Expr::Integer(n));
        }
    }
    token
        .text
        .parse::<f64>()
        .map(Expr::Float)
        .map_err(|_| SyntaxError::malformed(format!("Invalid number: {}", token.text), token.position))
}

/// Parses a token stream into an expression tree.
pub fn parse(tokens: Vec<Token>) -> Result<Expr, SyntaxError> {
    Parser::new(tokens).parse()
}
