//! Delegation chain and delegation tree invariants.

use num_bigint::BigInt;

use crate::amount::to_amount;
use crate::timestamp::value_to_timestamp;
use crate::value::Value;

/// Deepest node (root is depth 0) the tree builtins will visit.
pub const MAX_TREE_DEPTH: usize = 10;

fn adjacent_pairs(links: &Value) -> Option<impl Iterator<Item = (&Value, &Value)>> {
    let links = links.as_array()?;
    Some(links.iter().zip(links.iter().skip(1)))
}

pub fn all_links_subset_authority(links: &Value) -> bool {
    let Some(mut pairs) = adjacent_pairs(links) else {
        return false;
    };
    pairs.all(|(parent, child)| {
        match (
            parent.get("authority_scope").as_array(),
            child.get("authority_scope").as_array(),
        ) {
            (Some(parent), Some(child)) => child.iter().all(|s| parent.iter().any(|p| p.strict_eq(s))),
            _ => false,
        }
    })
}

/// Null budgets are skipped.
pub fn delegation_budget_conserved(links: &Value) -> bool {
    let Some(mut pairs) = adjacent_pairs(links) else {
        return false;
    };
    pairs.all(|(parent, child)| {
        let parent = parent.get("budget_allocated_micro");
        let child = child.get("budget_allocated_micro");
        if parent.is_nullish() || child.is_nullish() {
            return true;
        }
        match (to_amount(parent), to_amount(child)) {
            (Some(parent), Some(child)) => child <= parent,
            _ => false,
        }
    })
}

pub fn links_temporally_ordered(links: &Value) -> bool {
    let Some(mut pairs) = adjacent_pairs(links) else {
        return false;
    };
    pairs.all(|(earlier, later)| {
        match (
            value_to_timestamp(earlier.get("timestamp")),
            value_to_timestamp(later.get("timestamp")),
        ) {
            (Some(a), Some(b)) => a <= b,
            _ => false,
        }
    })
}

pub fn links_form_chain(links: &Value) -> bool {
    let Some(mut pairs) = adjacent_pairs(links) else {
        return false;
    };
    pairs.all(|(from, to)| {
        let delegatee = from.get("delegatee");
        !delegatee.is_nullish() && delegatee.strict_eq(to.get("delegator"))
    })
}

/// `None` for a missing children list, which counts as a leaf.
fn children(node: &Value) -> Option<&[Value]> {
    match node.get("children") {
        Value::Undefined | Value::Null => Some(&[]),
        other => other.as_array(),
    }
}

pub fn tree_budget_conserved(root: &Value) -> bool {
    if root.is_nullish() {
        return true;
    }
    budget_conserved_at(root, 0)
}

fn budget_conserved_at(node: &Value, depth: usize) -> bool {
    if depth > MAX_TREE_DEPTH || node.as_object().is_none() {
        return false;
    }
    let Some(children) = children(node) else {
        return false;
    };
    if children.is_empty() {
        return true;
    }
    let Some(budget) = to_amount(node.get("budget_allocated_micro")) else {
        return false;
    };
    let mut allocated = BigInt::from(0);
    for child in children {
        match to_amount(child.get("budget_allocated_micro")) {
            Some(amount) => allocated += amount,
            None => return false,
        }
    }
    allocated <= budget
        && children
            .iter()
            .all(|child| budget_conserved_at(child, depth + 1))
}

pub fn tree_authority_narrowing(root: &Value) -> bool {
    if root.is_nullish() {
        return true;
    }
    authority_narrows_at(root, 0)
}

fn lowercase_scope(node: &Value) -> Option<Vec<String>> {
    match node.get("authority_scope") {
        Value::Undefined | Value::Null => Some(Vec::new()),
        Value::Array(items) => items
            .iter()
            .map(|s| s.as_str().map(str::to_lowercase))
            .collect(),
        _ => None,
    }
}

fn authority_narrows_at(node: &Value, depth: usize) -> bool {
    if depth > MAX_TREE_DEPTH || node.as_object().is_none() {
        return false;
    }
    let (Some(children), Some(scope)) = (children(node), lowercase_scope(node)) else {
        return false;
    };
    children.iter().all(|child| {
        lowercase_scope(child).is_some_and(|child_scope| child_scope.iter().all(|s| scope.contains(s)))
            && authority_narrows_at(child, depth + 1)
    })
}
