//! Builtin function documentation for the constraint CLI

use std::fmt::Write;

use super::CliError;
use crate::builtins::{Builtin, BuiltinSpec, spec::builtin_specs};
use crate::expression::{EXPRESSION_VERSION, MAX_EXPRESSION_DEPTH};

/// Get the builtin overview (one line per builtin)
pub fn builtins_overview() -> String {
    let mut out = format!(
        "CONSTRAINT EXPRESSION BUILTINS (grammar {}, max depth {})\n\n",
        EXPRESSION_VERSION, MAX_EXPRESSION_DEPTH
    );
    let width = builtin_specs()
        .iter()
        .map(|spec| spec.signature.len())
        .max()
        .unwrap_or(0);
    for spec in builtin_specs() {
        let summary = spec.description.split(". ").next().unwrap_or(spec.description);
        let _ = writeln!(out, "  {:width$}  {}", spec.signature, summary, width = width);
    }
    out.push_str("\nRun 'constraint builtin <name>' for arguments, examples and edge cases.\n");
    out
}

/// Get the full documentation of one builtin
pub fn builtin_doc(name: &str) -> Result<String, CliError> {
    let builtin = Builtin::from_name(name).ok_or_else(|| CliError::UnknownBuiltin(name.to_string()))?;
    Ok(render(builtin.spec()))
}

fn render(spec: &BuiltinSpec) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}\n", spec.signature.to_uppercase());
    let _ = writeln!(out, "{}\n", spec.description);

    let _ = writeln!(out, "ARGUMENTS ({})", spec.arity);
    if spec.arguments.is_empty() {
        out.push_str("  none\n");
    }
    for arg in spec.arguments {
        let _ = writeln!(out, "  {} : {}  {}", arg.name, arg.type_name, arg.description);
    }

    let _ = writeln!(out, "\nRETURNS\n  {}", spec.return_type);
    if spec.short_circuit {
        out.push_str("  (short-circuits without reading the current value)\n");
    }

    out.push_str("\nEXAMPLES\n");
    for example in spec.examples {
        let _ = writeln!(out, "  # {}", example.description);
        let _ = writeln!(out, "  context:    {}", example.context);
        if let Some(ts) = example.evaluation_timestamp {
            let _ = writeln!(out, "  timestamp:  {}", ts);
        }
        let _ = writeln!(out, "  expression: {}", example.expression);
        let _ = writeln!(out, "  result:     {}\n", example.expected);
    }

    out.push_str("EDGE CASES\n");
    for case in spec.edge_cases {
        let _ = writeln!(out, "  - {}", case);
    }
    out
}
