//! # Constraint Expression Language - Abstract Syntax Tree
//!
//! This module defines the syntax tree for constraint expressions: short,
//! side-effect-free boolean formulas evaluated against JSON-shaped records.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Expression nodes (literals, field paths, calls, operations)
//! - **[operators]** - Binary operators (comparison, logical, implication)
//!
//! ## Quick Start
//!
//! ```text
//! trust_score >= 0.7 && reputation_state == 'verified'
//! ```
//!
//! ## Precedence
//!
//! From loosest to tightest binding:
//!
//! - `=>` implication (at most one per level)
//! - `||`
//! - `&&`
//! - `== != < > <= >=` (at most one per level, no chaining)
//! - `!`
//! - literals, `( )`, `[ ]`, calls, field paths
//!
//! ## Examples
//!
//! ### Transition guard
//!
//! ```text
//! changed(status) => previous(status) == 'pending'
//! ```
//!
//! ### Quantifier
//!
//! ```text
//! links.every(l => l.delegator != null)
//! ```
//!
//! ### Monetary conservation
//!
//! ```text
//! bigint_sum([reserved_micro, spent_micro]) == budget_limit_micro
//! ```
pub mod expressions;
pub mod operators;
pub mod tokens;

pub use expressions::{Expr, FieldPath, PathSegment};
pub use operators::BinOp;
pub use tokens::{Token, TokenKind};
