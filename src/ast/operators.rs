use std::fmt;

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Comparison
    /// Equal (`==`)
    Equal,
    /// Not equal (`!=`)
    NotEqual,
    /// Less than (`<`)
    LessThan,
    /// Greater than (`>`)
    GreaterThan,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,

    // Logical
    /// Implication (`=>`), `a => b` is `!a || b`
    Implies,
}

impl BinOp {
    /// Maps a comparison operator's source text to its operator.
    pub fn comparison(text: &str) -> Option<BinOp> {
        match text {
            "==" => Some(BinOp::Equal),
            "!=" => Some(BinOp::NotEqual),
            "<" => Some(BinOp::LessThan),
            ">" => Some(BinOp::GreaterThan),
            "<=" => Some(BinOp::LessEqual),
            ">=" => Some(BinOp::GreaterEqual),
            _ => None,
        }
    }

    pub fn is_comparison(&self) -> bool {
        !matches!(self, BinOp::Implies)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Equal => "==",
            BinOp::NotEqual => "!=",
            BinOp::LessThan => "<",
            BinOp::GreaterThan => ">",
            BinOp::LessEqual => "<=",
            BinOp::GreaterEqual => ">=",
            BinOp::Implies => "=>",
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
