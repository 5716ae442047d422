use crate::value::Value;

/// Length of an array, key count of an object or character count of a string. Zero otherwise.
pub fn len(value: &Value) -> Value {
    let n = match value {
        Value::Array(items) => items.len(),
        Value::Object(obj) => obj.len(),
        Value::String(s) => s.chars().count(),
        _ => 0,
    };
    Value::Integer(n as i64)
}

pub fn unique_values(items: &Value, field: &Value) -> bool {
    let (Some(items), Some(field)) = (items.as_array(), field.as_str()) else {
        return false;
    };
    let values: Vec<&Value> = items.iter().map(|item| item.get(field)).collect();
    values
        .iter()
        .enumerate()
        .all(|(i, v)| values[i + 1..].iter().all(|w| !v.strict_eq(w)))
}

pub fn object_keys_subset(record: &Value, allowed: &Value) -> bool {
    if record.is_nullish() {
        return true;
    }
    let (Some(record), Some(allowed)) = (record.as_object(), allowed.as_array()) else {
        return false;
    };
    record
        .keys()
        .all(|key| allowed.iter().any(|a| a.as_str() == Some(key)))
}

/// No emergent capability may appear in any of the individual capability lists.
pub fn no_emergent_in_individual(emergent: &Value, individual: &Value) -> bool {
    let Some(emergent) = emergent.as_array() else {
        return false;
    };
    if emergent.is_empty() || individual.is_nullish() {
        return true;
    }
    let Some(individual) = individual.as_object() else {
        return false;
    };
    emergent.iter().all(|capability| {
        individual.values().all(|caps| {
            caps.as_array()
                .is_none_or(|caps| !caps.iter().any(|c| c.strict_eq(capability)))
        })
    })
}

/// Every emergent capability needs at least one evidence record naming it.
pub fn all_emergent_have_evidence(emergent: &Value, evidence: &Value) -> bool {
    let (Some(emergent), Some(evidence)) = (emergent.as_array(), evidence.as_array()) else {
        return false;
    };
    emergent.iter().all(|capability| {
        evidence
            .iter()
            .any(|record| record.get("capability").strict_eq(capability))
    })
}
