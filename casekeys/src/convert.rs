//! The runtime converter.

use std::slice;

use indexmap::map::{self, Entry};
use tracing::trace;

use crate::{
    Casing,
    shape::{Exclusions, Shape, classify},
    value::{Record, Value, ValueSet},
};

/// Convert the keys of `value` to `casing` with the default exclusions.
pub fn convert_value(value: &Value, casing: Casing) -> Value {
    Converter::new(casing).convert(value)
}

/// Builds deep, key-renamed copies of [`Value`] trees.
///
/// The converter walks the input with an explicit stack, so input depth is bounded by memory
/// rather than by the call stack. The input is never modified.
///
/// # Example
/// ```
/// use casekeys::{Converter, Value};
///
/// let converter = Converter::camel().with_exclusion(|value| value.get("$date").is_some());
///
/// let input = Value::record([
///     ("created_at", Value::record([("$date", Value::from("2024-05-01T00:00:00Z"))])),
///     ("user_name", Value::from("ferris")),
/// ]);
///
/// let output = converter.convert(&input);
/// assert_eq!(output["userName"], Value::from("ferris"));
/// assert_eq!(output["createdAt"], input["created_at"]);
/// ```
#[derive(Debug, Clone)]
pub struct Converter {
    casing: Casing,
    exclusions: Exclusions,
}

impl Converter {
    pub fn new(casing: Casing) -> Self {
        Self {
            casing,
            exclusions: Exclusions::default(),
        }
    }

    /// A converter to camelCase keys.
    pub fn camel() -> Self {
        Self::new(Casing::Camel)
    }

    /// A converter to snake_case keys.
    pub fn snake() -> Self {
        Self::new(Casing::Snake)
    }

    /// Treat values matching `predicate` as opaque.
    pub fn with_exclusion(
        mut self,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.exclusions = self.exclusions.with(predicate);
        self
    }

    /// Add a set of exclusions.
    pub fn with_exclusions(mut self, exclusions: Exclusions) -> Self {
        self.exclusions.extend(exclusions);
        self
    }

    pub fn casing(&self) -> Casing {
        self.casing
    }

    pub fn exclusions(&self) -> &Exclusions {
        &self.exclusions
    }

    /// Convert `value`.
    ///
    /// - Opaque values are cloned unchanged.
    /// - Record keys are renamed. When two keys collide, the last one wins and keeps the
    ///   position of the first.
    /// - Sequences keep their order.
    /// - Set members that become equal are merged.
    #[tracing::instrument(level = "trace", skip_all, fields(casing = %self.casing))]
    pub fn convert(&self, value: &Value) -> Value {
        let mut stack = Vec::new();
        let mut current = value;

        loop {
            let mut finished = self.enter(current, &mut stack);

            loop {
                let Some(frame) = stack.last_mut() else {
                    // Only the root finishes with an empty stack.
                    return finished.unwrap_or_default();
                };

                if let Some(value) = finished.take() {
                    frame.accept(value);
                }

                match frame.next_child(self.casing) {
                    Some(child) => {
                        current = child;
                        break;
                    }
                    None => finished = stack.pop().map(Frame::finish),
                }
            }
        }
    }

    /// Classify `value`. Opaque values are returned, containers are pushed onto the stack.
    fn enter<'a>(&self, value: &'a Value, stack: &mut Vec<Frame<'a>>) -> Option<Value> {
        let frame = match classify(value, &self.exclusions) {
            Shape::Opaque => return Some(value.clone()),
            Shape::Record(record) => Frame::Record {
                source: record.iter(),
                key: None,
                out: Record::with_capacity(record.len()),
            },
            Shape::Sequence(items) => Frame::Sequence {
                source: items.iter(),
                out: Vec::with_capacity(items.len()),
            },
            Shape::UniqueCollection(members) => Frame::Set {
                source: members.iter(),
                out: ValueSet::with_capacity(members.len()),
            },
        };

        stack.push(frame);
        None
    }
}

/// A container being converted: what is left to visit and what has been built so far.
enum Frame<'a> {
    Record {
        source: map::Iter<'a, String, Value>,
        /// Renamed key of the child currently being converted.
        key: Option<String>,
        out: Record,
    },
    Sequence {
        source: slice::Iter<'a, Value>,
        out: Vec<Value>,
    },
    Set {
        source: slice::Iter<'a, Value>,
        out: ValueSet,
    },
}

impl<'a> Frame<'a> {
    fn next_child(&mut self, casing: Casing) -> Option<&'a Value> {
        match self {
            Self::Record { source, key, .. } => source.next().map(|(name, value)| {
                *key = Some(casing.apply(name));
                value
            }),
            Self::Sequence { source, .. } | Self::Set { source, .. } => source.next(),
        }
    }

    fn accept(&mut self, value: Value) {
        match self {
            Self::Record { key, out, .. } => {
                let Some(key) = key.take() else {
                    return;
                };
                match out.entry(key) {
                    Entry::Occupied(mut entry) => {
                        trace!(key = %entry.key(), "renamed keys collide, last value wins");
                        entry.insert(value);
                    }
                    Entry::Vacant(entry) => {
                        entry.insert(value);
                    }
                }
            }
            Self::Sequence { out, .. } => out.push(value),
            Self::Set { out, .. } => {
                if !out.insert(value) {
                    trace!("converted set members are equal, merged");
                }
            }
        }
    }

    fn finish(self) -> Value {
        match self {
            Self::Record { out, .. } => Value::Record(out),
            Self::Sequence { out, .. } => Value::Sequence(out),
            Self::Set { out, .. } => Value::Set(out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nest(depth: usize) -> Value {
        let mut value = Value::from("leaf");
        for _ in 0..depth {
            value = Value::record([("inner_value", Value::sequence([value]))]);
        }
        value
    }

    #[test]
    fn test_root_scalar() {
        let value = Value::from(7);
        assert_eq!(Converter::camel().convert(&value), value);
    }

    #[test]
    fn test_empty_containers() {
        for value in [
            Value::record::<String>([]),
            Value::sequence([]),
            Value::set([]),
        ] {
            assert_eq!(Converter::snake().convert(&value), value);
        }
    }

    #[test]
    fn test_collision_last_write_wins() {
        let input = Value::record([
            ("foo_bar", Value::from(1)),
            ("middle", Value::from(2)),
            ("fooBar", Value::from(3)),
        ]);

        let output = Converter::camel().convert(&input);
        let record = output.as_record().unwrap();
        let keys: Vec<_> = record.keys().map(String::as_str).collect();

        assert_eq!(keys, ["fooBar", "middle"]);
        assert_eq!(record["fooBar"], Value::from(3));
    }

    #[test]
    fn test_set_members_merge_after_conversion() {
        let input = Value::set([
            Value::record([("user_id", Value::from(1))]),
            Value::record([("userId", Value::from(1))]),
            Value::record([("user_id", Value::from(2))]),
        ]);
        assert_eq!(input.as_set().unwrap().len(), 3);

        let output = Converter::camel().convert(&input);
        let members = output.as_set().unwrap();

        assert_eq!(members.len(), 2);
        assert!(members.contains(&Value::record([("userId", Value::from(1))])));
        assert!(members.contains(&Value::record([("userId", Value::from(2))])));
    }

    #[test]
    fn test_deep_input() {
        const DEPTH: usize = 1024;

        let output = Converter::camel().convert(&nest(DEPTH));

        let mut depth = 0;
        let mut cursor = &output;
        while let Some(inner) = cursor.get("innerValue") {
            cursor = &inner[0];
            depth += 1;
        }
        assert_eq!(depth, DEPTH);
        assert_eq!(cursor, &Value::from("leaf"));
    }

    #[test]
    fn test_with_exclusions() {
        let converter = Converter::snake()
            .with_exclusions(Exclusions::new().with_record_key("$oid"))
            .with_exclusion(|value| value.get("keepAsIs").is_some());
        assert_eq!(converter.exclusions().len(), 2);
        assert_eq!(converter.casing(), Casing::Snake);

        let input = Value::record([
            ("objectId", Value::record([("$oid", Value::from("abc"))])),
            ("rawBlob", Value::record([("keepAsIs", Value::from(true))])),
            ("nestedRecord", Value::record([("innerKey", Value::Null)])),
        ]);

        let output = converter.convert(&input);
        assert_eq!(output["object_id"], input["objectId"]);
        assert_eq!(output["raw_blob"], input["rawBlob"]);
        assert_eq!(output["nested_record"]["inner_key"], Value::Null);
        assert!(output["nested_record"].get("inner_key").is_some());
    }
}
