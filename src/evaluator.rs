use std::borrow::Cow;

use log::trace;

use crate::ast::{BinOp, Expr, FieldPath, PathSegment};
use crate::builtins::{Builtin, temporal};
use crate::value::Value;

const LOG_TARGET: &str = "constraint::evaluator";

/// Per-call inputs that are not part of the data record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationContext {
    /// Frozen instant returned by `now()`. Without one, `now()` is undefined.
    pub evaluation_timestamp: Option<String>,
}

impl EvaluationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timestamp(timestamp: impl Into<String>) -> Self {
        EvaluationContext {
            evaluation_timestamp: Some(timestamp.into()),
        }
    }
}

/// Name resolution scope: the data record plus lambda parameters bound by `.every()`.
#[derive(Debug, Clone)]
struct Scope<'a> {
    record: &'a Value,
    bindings: Vec<(&'a str, &'a Value)>,
}

impl<'a> Scope<'a> {
    fn new(record: &'a Value) -> Self {
        Scope {
            record,
            bindings: Vec::new(),
        }
    }

    /// Child scope with one more lambda binding. Inner bindings shadow outer ones.
    fn with_lambda<'b>(&self, param: &'b str, item: &'b Value) -> Scope<'b>
    where
        'a: 'b,
    {
        let mut bindings: Vec<(&'b str, &'b Value)> = self.bindings.clone();
        bindings.push((param, item));
        Scope {
            record: self.record,
            bindings,
        }
    }

    fn binding(&self, name: &str) -> Option<&'a Value> {
        self.bindings
            .iter()
            .rev()
            .find(|(param, _)| *param == name)
            .map(|(_, value)| *value)
    }

    fn lookup(&self, name: &str) -> &'a Value {
        self.binding(name).unwrap_or_else(|| self.record.get(name))
    }
}

/// Tree-walking evaluator over a parsed expression.
///
/// Evaluation is total: type mismatches, missing fields and malformed data
/// all produce a definite value, never an error.
///
/// # Examples
///
/// ```
/// use constraint_lang::{EvaluationContext, Evaluator, Value};
/// use constraint_lang::expression::parse_expression;
///
/// let expr = parse_expression("status == 'active'").unwrap();
/// let record = Value::from(&serde_json::json!({"status": "active"}));
/// let context = EvaluationContext::new();
///
/// assert!(Evaluator::new(&context).evaluate_bool(&expr, &record));
/// ```
pub struct Evaluator<'c> {
    context: &'c EvaluationContext,
}

impl<'c> Evaluator<'c> {
    pub fn new(context: &'c EvaluationContext) -> Self {
        Evaluator { context }
    }

    /// Evaluates an expression against a record, returning the raw value.
    pub fn evaluate(&self, expr: &Expr, record: &Value) -> Value {
        let result = self.eval_expr(expr, &Scope::new(record));
        trace!(target: LOG_TARGET, "evaluated to {:?}", result);
        result
    }

    /// Evaluates an expression and applies the truthiness rule to the result.
    pub fn evaluate_bool(&self, expr: &Expr, record: &Value) -> bool {
        self.evaluate(expr, record).is_truthy()
    }

    fn eval_expr(&self, expr: &Expr, scope: &Scope<'_>) -> Value {
        match expr {
            Expr::Integer(n) => Value::Integer(*n),
            Expr::Float(n) => Value::Float(*n),
            Expr::String(s) => Value::String(s.clone()),
            Expr::Boolean(b) => Value::Boolean(*b),
            Expr::Null => Value::Null,

            Expr::Path(path) => self.resolve_path(path, scope),
            Expr::List(paths) => Value::Array(
                paths
                    .iter()
                    .map(|path| self.resolve_path(path, scope))
                    .collect(),
            ),

            Expr::Not(operand) => Value::Boolean(!self.eval_expr(operand, scope).is_truthy()),

            Expr::And(operands) => Value::Boolean(
                operands
                    .iter()
                    .all(|operand| self.eval_expr(operand, scope).is_truthy()),
            ),
            Expr::Or(operands) => Value::Boolean(
                operands
                    .iter()
                    .any(|operand| self.eval_expr(operand, scope).is_truthy()),
            ),

            Expr::BinaryOp { op, left, right } => self.eval_binop(*op, left, right, scope),

            Expr::Call { builtin, args } if builtin.is_temporal() => {
                self.eval_temporal(*builtin, args, scope)
            }
            Expr::Call { builtin, args } => {
                let values: Vec<Value> = args.iter().map(|arg| self.eval_expr(arg, scope)).collect();
                builtin.call(&values, self.context)
            }
        }
    }

    fn eval_binop(&self, op: BinOp, left: &Expr, right: &Expr, scope: &Scope<'_>) -> Value {
        let result = match op {
            BinOp::Implies => {
                !self.eval_expr(left, scope).is_truthy() || self.eval_expr(right, scope).is_truthy()
            }
            _ => {
                let left = self.eval_expr(left, scope);
                let right = self.eval_expr(right, scope);
                left.compare(op, &right)
            }
        };
        Value::Boolean(result)
    }

    fn resolve_path(&self, path: &FieldPath, scope: &Scope<'_>) -> Value {
        let mut current = Cow::Borrowed(scope.lookup(&path.root));
        for segment in &path.segments {
            current = match segment {
                PathSegment::Field(name) => match current {
                    Cow::Borrowed(value) => Cow::Borrowed(value.get(name)),
                    Cow::Owned(value) => Cow::Owned(value.get(name).clone()),
                },
                PathSegment::Length => Cow::Owned(length(&current)),
                PathSegment::Every { param, body } => {
                    Cow::Owned(Value::Boolean(self.every(&current, param, body, scope)))
                }
            };
        }
        current.into_owned()
    }

    /// Vacuously true on an empty array, false on anything that is not an array.
    fn every(&self, target: &Value, param: &str, body: &Expr, scope: &Scope<'_>) -> bool {
        let Some(items) = target.as_array() else {
            return false;
        };
        items
            .iter()
            .all(|item| self.eval_expr(body, &scope.with_lambda(param, item)).is_truthy())
    }

    /// `changed`, `previous` and `delta` read the field both from the record and
    /// from its `_previous` companion. Lambda-bound roots have no previous state.
    fn eval_temporal(&self, builtin: Builtin, args: &[Expr], scope: &Scope<'_>) -> Value {
        let Some(Expr::Path(path)) = args.first() else {
            return Value::Undefined;
        };
        let Some(keys) = path.keys() else {
            return Value::Undefined;
        };
        let Some((root, rest)) = keys.split_first() else {
            return Value::Undefined;
        };

        let current = scope.lookup(root).get_path(rest);
        let state = scope.record.get(temporal::PREVIOUS_KEY);
        let previous = if scope.binding(root).is_some() || state.is_nullish() {
            None
        } else {
            Some(state.get_path(&keys))
        };

        match builtin {
            Builtin::Changed => temporal::changed(current, previous),
            Builtin::Previous => temporal::previous(previous),
            Builtin::Delta => temporal::delta(current, previous),
            _ => builtin.call(&[current.clone()], self.context),
        }
    }
}

fn length(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Integer(items.len() as i64),
        Value::String(s) => Value::Integer(s.chars().count() as i64),
        _ => Value::Undefined,
    }
}

/// Evaluates a parsed expression against a record with the given context.
pub fn evaluate(expr: &Expr, record: &Value, context: &EvaluationContext) -> Value {
    Evaluator::new(context).evaluate(expr, record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::parse_expression;
    use serde_json::json;

    fn eval(expression: &str, record: serde_json::Value) -> Value {
        let expr = parse_expression(expression).unwrap();
        evaluate(&expr, &Value::from(&record), &EvaluationContext::new())
    }

    #[test]
    fn test_length_of_non_collection_is_undefined() {
        assert_eq!(eval("n.length", json!({"n": 5})), Value::Undefined);
        assert_eq!(eval("s.length", json!({"s": "héllo"})), Value::Integer(5));
    }

    #[test]
    fn test_lambda_shadows_record_field() {
        let record = json!({"x": 100, "items": [{"v": 1}, {"v": 2}]});
        assert_eq!(
            eval("items.every(x => x.v < 5)", record),
            Value::Boolean(true)
        );
    }

    #[test]
    fn test_nested_lambdas_see_outer_bindings() {
        let record = json!({"groups": [{"limit": 3, "items": [1, 2]}]});
        assert_eq!(
            eval("groups.every(g => g.items.every(i => i < g.limit))", record),
            Value::Boolean(true)
        );
    }

    #[test]
    fn test_implication_short_circuits() {
        assert_eq!(eval("false => missing.x == 1", json!({})), Value::Boolean(true));
    }

    #[test]
    fn test_previous_state_lookup() {
        let record = json!({"status": "active", "_previous": {"status": "pending"}});
        assert_eq!(eval("previous(status)", record), Value::from("pending"));
    }
}
