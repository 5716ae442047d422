use std::fmt;

/// The category of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier, keyword or builtin name
    ///
    /// Must start with a letter or underscore, followed by letters, digits, or underscores.
    ///
    /// # Examples
    /// ```text
    /// status
    /// budget_limit_micro
    /// true
    /// bigint_sum
    /// ```
    Ident,

    /// Decimal number literal
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 0.7
    /// ```
    Number,

    /// Single-quoted string literal. The token text holds the unescaped content.
    ///
    /// # Examples
    /// ```text
    /// 'verified'
    /// 'it\'s'
    /// ```
    String,

    /// Comparison or boolean operator: `== != < > <= >= && || !`
    Operator,

    /// `(` or `)`
    Paren,

    /// `[` or `]`
    Bracket,

    /// `,`
    Comma,

    /// `.`
    Dot,

    /// Implication / lambda arrow `=>`
    Arrow,
}

impl TokenKind {
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Ident => "ident",
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Operator => "operator",
            TokenKind::Paren => "paren",
            TokenKind::Bracket => "bracket",
            TokenKind::Comma => "comma",
            TokenKind::Dot => "dot",
            TokenKind::Arrow => "arrow",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single token produced by the lexer.
///
/// Tokens are produced once, in order, and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text of the token (unescaped content for strings)
    pub text: String,
    /// Character offset of the first character of the token
    pub position: usize,
    /// Character offset just past the last character, quotes and escapes included
    pub end: usize,
}

impl Token {
    /// Assumes the source spelling is `text` itself (plus quotes for strings).
    /// Use [`Token::with_end`] when the spelling is longer.
    pub fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Self {
        let text = text.into();
        let quotes = if kind == TokenKind::String { 2 } else { 0 };
        let end = position + text.chars().count() + quotes;
        Token {
            kind,
            text,
            position,
            end,
        }
    }

    pub fn with_end(mut self, end: usize) -> Self {
        self.end = end;
        self
    }

    /// True if the token has the given kind and text.
    pub fn is(&self, kind: TokenKind, text: &str) -> bool {
        self.kind == kind && self.text == text
    }

}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \"{}\"", self.kind, self.text)
    }
}
