use crate::ast::BinOp;
use crate::builtins::Builtin;

/// Abstract Syntax Tree node representing a parsed constraint expression.
///
/// Produced by the parser once per expression and evaluated any number of
/// times against different records.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    // Literals
    /// Literal integer
    ///
    /// # Example
    /// ```text
    /// 100
    /// ```
    Integer(i64),

    /// Literal floating point number (also used for integers too large for `i64`)
    ///
    /// # Example
    /// ```text
    /// 0.7
    /// ```
    Float(f64),

    /// String literal
    ///
    /// # Example
    /// ```text
    /// 'verified'
    /// ```
    String(String),

    /// Boolean literal
    Boolean(bool),

    /// Null literal
    Null,

    // References
    /// Field path resolved against the record (or a lambda binding)
    ///
    /// # Examples
    /// ```text
    /// status
    /// policy.conservation_ceiling
    /// steps.length
    /// links.every(l => l.delegator != null)
    /// ```
    Path(FieldPath),

    /// Bracket array of field paths, only used as builtin argument syntax
    ///
    /// # Example
    /// ```text
    /// bigint_sum([field_a, field_b])
    /// ```
    List(Vec<FieldPath>),

    // Operations
    /// Logical negation (`!`)
    Not(Box<Expr>),

    /// Conjunction of two or more operands, short-circuiting left to right
    ///
    /// # Example
    /// ```text
    /// a && b && c
    /// ```
    And(Vec<Expr>),

    /// Disjunction of two or more operands, short-circuiting left to right
    Or(Vec<Expr>),

    /// Binary operation (comparison or implication)
    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Builtin function call, resolved to the registry at parse time
    ///
    /// # Examples
    /// ```text
    /// bigint_gte(budget, cost)
    /// changed(status)
    /// ```
    Call { builtin: Builtin, args: Vec<Expr> },
}

/// A dotted field path: a root identifier followed by zero or more segments.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPath {
    pub root: String,
    pub segments: Vec<PathSegment>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    /// `.name`
    Field(String),
    /// `.length`
    Length,
    /// `.every(param => body)`
    Every { param: String, body: Box<Expr> },
}

impl FieldPath {
    pub fn new(root: impl Into<String>) -> Self {
        FieldPath {
            root: root.into(),
            segments: Vec::new(),
        }
    }

    /// Returns the plain dotted keys if the path contains only field segments.
    pub fn keys(&self) -> Option<Vec<&str>> {
        let mut keys = vec![self.root.as_str()];
        for segment in &self.segments {
            match segment {
                PathSegment::Field(name) => keys.push(name),
                _ => return None,
            }
        }
        Some(keys)
    }
}

impl Expr {
    /// Collects the root identifiers of every field path in the expression,
    /// excluding lambda parameters bound by `.every()`.
    pub fn referenced_roots(&self) -> Vec<String> {
        let mut roots = Vec::new();
        self.collect_roots(&mut Vec::new(), &mut roots);
        roots
    }

    fn collect_roots(&self, bound: &mut Vec<String>, out: &mut Vec<String>) {
        match self {
            Expr::Path(path) => collect_path_roots(path, bound, out),
            Expr::List(paths) => {
                for path in paths {
                    collect_path_roots(path, bound, out);
                }
            }
            Expr::Not(inner) => inner.collect_roots(bound, out),
            Expr::And(operands) | Expr::Or(operands) => {
                for operand in operands {
                    operand.collect_roots(bound, out);
                }
            }
            Expr::BinaryOp { left, right, .. } => {
                left.collect_roots(bound, out);
                right.collect_roots(bound, out);
            }
            Expr::Call { args, .. } => {
                for arg in args {
                    arg.collect_roots(bound, out);
                }
            }
            Expr::Integer(_) | Expr::Float(_) | Expr::String(_) | Expr::Boolean(_) | Expr::Null => {}
        }
    }
}

fn collect_path_roots(path: &FieldPath, bound: &mut Vec<String>, out: &mut Vec<String>) {
    if !bound.contains(&path.root) && !out.contains(&path.root) {
        out.push(path.root.clone());
    }
    for segment in &path.segments {
        if let PathSegment::Every { param, body } = segment {
            bound.push(param.clone());
            body.collect_roots(bound, out);
            bound.pop();
        }
    }
}
