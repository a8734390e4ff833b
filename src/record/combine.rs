// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! Binary merge functions folding two observations of one field.
//!
//! Each is applied left to right as `(accumulated, next)`. Values of
//! mismatched kinds never occur for a schema field; if they do, the
//! accumulated value wins.

use std::collections::BTreeSet;

use super::parser::split_tokens;
use super::types::{Bound, Value};

/// Keep the accumulated value unless it is empty.
pub fn keep_first(acc: Value, next: Value) -> Value {
    if acc.is_empty() {
        next
    } else {
        acc
    }
}

/// Peak across observations.
pub fn numeric_max(acc: Value, next: Value) -> Value {
    match (acc, next) {
        (Value::Count(a), Value::Count(b)) => Value::Count(a.max(b)),
        (Value::Bytes(a), Value::Bytes(b)) => Value::Bytes(a.max(b)),
        (Value::Seconds(a), Value::Seconds(b)) => Value::Seconds(a.max(b)),
        (Value::Text(a), Value::Text(b)) => Value::Text(if b > a { b } else { a }),
        (acc, _) => acc,
    }
}

/// Sorted, de-duplicated union of comma-separated tokens.
pub fn append(acc: Value, next: Value) -> Value {
    match (acc, next) {
        (Value::Text(a), Value::Text(b)) => {
            let tokens: BTreeSet<&str> = split_tokens(&a)
                .into_iter()
                .chain(split_tokens(&b))
                .collect();
            Value::Text(tokens.into_iter().collect::<Vec<_>>().join(","))
        }
        (acc, next) => keep_first(acc, next),
    }
}

/// Latest time; `UNLIMITED` dominates, then `Unknown`, absent yields
/// the other side.
pub fn time_max(acc: Value, next: Value) -> Value {
    match (acc, next) {
        (Value::Limit(a), Value::Limit(b)) => Value::Limit(bound_max(a, b)),
        (Value::Stamp(a), Value::Stamp(b)) => Value::Stamp(bound_max(a, b)),
        (acc, _) => acc,
    }
}

/// Sentinel-aware merge for lower bounds such as the start time.
///
/// Absent and `UNLIMITED` yield the other side. `Unknown` beats a
/// concrete value, and two concrete values resolve to the later one,
/// not the earlier.
pub fn time_min(acc: Value, next: Value) -> Value {
    match (acc, next) {
        (Value::Limit(a), Value::Limit(b)) => Value::Limit(bound_min(a, b)),
        (Value::Stamp(a), Value::Stamp(b)) => Value::Stamp(bound_min(a, b)),
        (acc, _) => acc,
    }
}

fn bound_max<T: PartialOrd>(a: Bound<T>, b: Bound<T>) -> Bound<T> {
    match (a, b) {
        (Bound::Unlimited, _) | (_, Bound::Unlimited) => Bound::Unlimited,
        (Bound::Absent, other) | (other, Bound::Absent) => other,
        (Bound::Unknown, _) | (_, Bound::Unknown) => Bound::Unknown,
        (Bound::At(x), Bound::At(y)) => Bound::At(if y > x { y } else { x }),
    }
}

fn bound_min<T: PartialOrd>(a: Bound<T>, b: Bound<T>) -> Bound<T> {
    match (a, b) {
        (Bound::Absent, other) | (other, Bound::Absent) => other,
        (Bound::Unlimited, other) | (other, Bound::Unlimited) => other,
        (Bound::Unknown, _) | (_, Bound::Unknown) => Bound::Unknown,
        (Bound::At(x), Bound::At(y)) => Bound::At(if y > x { y } else { x }),
    }
}
