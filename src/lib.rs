//! A small, total expression language for declarative data constraints.
//!
//! Expressions such as `bigint_gte(budget, cost) && status == 'active'` are
//! tokenized, parsed once into an [`Expr`] and evaluated against JSON records.
//! Evaluation never fails on data: missing fields, wrong types and malformed
//! amounts all resolve to a definite boolean.

pub mod amount;
pub mod ast;
pub mod builtins;
pub mod constraint_file;
pub mod convert;
pub mod evaluator;
pub mod expression;
pub mod lexer;
pub mod parser;
pub mod timestamp;
pub mod type_checker;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{BinOp, Expr, FieldPath, PathSegment, Token, TokenKind};
pub use builtins::{Arity, Builtin, BuiltinSpec, RESERVED_EVALUATOR_NAMES};
pub use constraint_file::{
    CompiledConstraintFile, Constraint, ConstraintFile, ConstraintFileError, ConstraintOutcome,
    FileIssue, Severity,
};
pub use evaluator::{EvaluationContext, Evaluator};
pub use expression::{
    CompiledExpression, EXPRESSION_VERSION, EvaluationResult, ExpressionError,
    MAX_EXPRESSION_DEPTH, MIN_SUPPORTED_EXPRESSION_VERSION, ValidationResult,
    evaluate_constraint, evaluate_constraint_detailed, evaluate_constraint_with,
    expression_version_supported, parse_expression, validate_expression,
};
pub use lexer::{Lexer, TokenizerError, tokenize};
pub use parser::{Parser, SyntaxError, SyntaxErrorKind};
pub use type_checker::{SchemaRegistry, SchemaRegistryEntry, TypeCheckResult, type_check_constraint_file};
pub use value::Value;
