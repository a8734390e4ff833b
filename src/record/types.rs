// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

use chrono::NaiveDateTime;

use super::schema::{index_of, FIELDS};

/// A time value that may carry one of the scheduler's sentinels.
#[derive(Debug, Clone, PartialEq)]
pub enum Bound<T> {
    /// Empty, `INVALID` or otherwise unparseable
    Absent,
    /// `Unknown`: the scheduler has not resolved this time yet
    Unknown,
    /// `UNLIMITED`
    Unlimited,
    At(T),
}

/// A parsed field value. Every field parses to exactly one variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Count(u64),
    /// Bytes (binary units)
    Bytes(f64),
    /// Seconds
    Seconds(f64),
    /// Time limit in seconds, or `UNLIMITED`
    Limit(Bound<f64>),
    /// Wall-clock timestamp as printed by sacct (local time)
    Stamp(Bound<NaiveDateTime>),
}

impl Value {
    /// Type-specific empty check, used by `keep_first`.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Text(s) => s.is_empty(),
            Value::Count(n) => *n == 0,
            Value::Bytes(b) => *b == 0.0,
            Value::Seconds(s) => *s == 0.0,
            Value::Limit(b) => matches!(b, Bound::Absent),
            Value::Stamp(b) => matches!(b, Bound::Absent),
        }
    }
}

/// One parsed line from one source, positional per schema field.
pub type Row = Vec<Value>;

/// The single canonical view of a job after folding all rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub values: Vec<Value>,
    /// Dependency expression from squeue (pending jobs only)
    pub dependencies: String,
    /// Pending reason from squeue (pending jobs only)
    pub reason: String,
}

impl Record {
    pub fn new(values: Vec<Value>) -> Self {
        Self {
            values,
            dependencies: String::new(),
            reason: String::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        index_of(name).and_then(|i| self.values.get(i))
    }

    pub fn text(&self, name: &str) -> &str {
        match self.get(name) {
            Some(Value::Text(s)) => s,
            _ => "",
        }
    }

    pub fn count(&self, name: &str) -> u64 {
        match self.get(name) {
            Some(Value::Count(n)) => *n,
            _ => 0,
        }
    }

    pub fn bytes(&self, name: &str) -> f64 {
        match self.get(name) {
            Some(Value::Bytes(b)) => *b,
            _ => 0.0,
        }
    }

    pub fn seconds(&self, name: &str) -> f64 {
        match self.get(name) {
            Some(Value::Seconds(s)) => *s,
            Some(Value::Limit(Bound::At(s))) => *s,
            _ => 0.0,
        }
    }

    pub fn stamp(&self, name: &str) -> Option<NaiveDateTime> {
        match self.get(name) {
            Some(Value::Stamp(Bound::At(t))) => Some(*t),
            _ => None,
        }
    }

    /// Iterate `(field, value)` pairs in schema order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static super::schema::Field, &Value)> {
        FIELDS.iter().zip(self.values.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::schema::empty_row;

    #[test]
    fn test_is_empty_per_kind() {
        assert!(Value::Text(String::new()).is_empty());
        assert!(!Value::Text("x".to_string()).is_empty());
        assert!(Value::Count(0).is_empty());
        assert!(Value::Limit(Bound::Absent).is_empty());
        assert!(!Value::Limit(Bound::Unlimited).is_empty());
        assert!(!Value::Stamp(Bound::Unknown).is_empty());
        assert!(!Value::Seconds(1.0).is_empty());
    }

    #[test]
    fn test_typed_accessors_default() {
        let record = Record::new(empty_row());
        assert_eq!(record.text("JobID"), "");
        assert_eq!(record.count("AllocCPUS"), 0);
        assert_eq!(record.seconds("Elapsed"), 0.0);
        assert_eq!(record.stamp("End"), None);
        assert_eq!(record.text("NoSuchField"), "");
    }
}
