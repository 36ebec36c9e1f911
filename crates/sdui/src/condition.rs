//! Evaluation of `when` conditions against the data document.

use std::cmp::Ordering;

use serde_json::Value;
use tracing::debug;

use crate::{Condition, Operator, path::get_by_path};

/// Evaluate `condition` against `document`.
///
/// Ordering operators hold only when both sides are numbers. An operator this engine does
/// not know evaluates to `true`, so newer schemas show content rather than hide it.
pub fn evaluate(condition: &Condition, document: &Value) -> bool {
    let resolved = get_by_path(document, &condition.path);
    let expected = condition.value.as_ref();

    match &condition.operator {
        Operator::Eq => strict_equals(resolved, expected),
        Operator::Neq => !strict_equals(resolved, expected),
        Operator::Gt => compare(resolved, expected).is_some_and(Ordering::is_gt),
        Operator::Lt => compare(resolved, expected).is_some_and(Ordering::is_lt),
        Operator::Gte => compare(resolved, expected).is_some_and(Ordering::is_ge),
        Operator::Lte => compare(resolved, expected).is_some_and(Ordering::is_le),
        Operator::Exists => exists(resolved),
        Operator::NotExists => !exists(resolved),
        Operator::Unknown(op) => {
            debug!(operator = %op, path = %condition.path, "unknown condition operator; showing node");
            true
        }
    }
}

/// Strict equality between two possibly-undefined JSON values.
///
/// Numbers compare by value (`1` equals `1.0`), everything else structurally. `None`
/// equals only `None`, so an undefined value never equals `null`.
pub fn strict_equals(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(Value::Number(x)), Some(Value::Number(y))) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// Present and not null.
fn exists(value: Option<&Value>) -> bool {
    !matches!(value, None | Some(Value::Null))
}

/// Numeric ordering of `a` relative to `b`, or `None` when either side is not a number.
fn compare(a: Option<&Value>, b: Option<&Value>) -> Option<Ordering> {
    let a = a?.as_f64()?;
    let b = b?.as_f64()?;
    a.partial_cmp(&b)
}
