//! Value classification.
//!
//! This module owns the exclusion rules on both sides of the conversion contract:
//! - [`classify`] decides at runtime whether a [`Value`] is opaque or traversed.
//! - The identity [`CaseKeys`] impls at the bottom of the file are the type-level exclusion set:
//!   types that the typed conversion passes through untouched.
//!
//! Both sides treat strings, numbers, booleans, instants and callables as opaque. Keep them in
//! sync.

use std::{
    fmt,
    marker::PhantomData,
    sync::Arc,
    time::{Duration, SystemTime},
};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use crate::{
    CaseKeys,
    value::{Opaque, Record, Value, ValueSet},
};

/// How the converter handles a value.
#[derive(Debug, Clone, Copy)]
pub enum Shape<'a> {
    /// Returned unchanged.
    Opaque,
    /// Keys renamed, values converted.
    Record(&'a Record),
    /// Elements converted in order.
    Sequence(&'a [Value]),
    /// Members converted, duplicates merged.
    UniqueCollection(&'a ValueSet),
}

/// Classify `value`. Containers matched by one of the `exclusions` are opaque.
pub fn classify<'a>(value: &'a Value, exclusions: &Exclusions) -> Shape<'a> {
    let shape = match value {
        Value::Record(record) => Shape::Record(record),
        Value::Sequence(items) => Shape::Sequence(items),
        Value::Set(members) => Shape::UniqueCollection(members),
        Value::Null
        | Value::Bool(_)
        | Value::Number(_)
        | Value::String(_)
        | Value::Instant(_)
        | Value::Opaque(_) => return Shape::Opaque,
    };

    if exclusions.matches(value) {
        Shape::Opaque
    } else {
        shape
    }
}

/// Whether `value` is a record whose keys the converter renames.
pub fn is_record(value: &Value, exclusions: &Exclusions) -> bool {
    matches!(classify(value, exclusions), Shape::Record(_))
}

/// Whether the converter returns `value` unchanged.
pub fn is_opaque(value: &Value, exclusions: &Exclusions) -> bool {
    matches!(classify(value, exclusions), Shape::Opaque)
}

type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Additional opaque values, on top of the scalars, instants and [`Opaque`] handles that are
/// always opaque.
///
/// This is the runtime counterpart of widening the type-level exclusion set with [`opaque!`]
/// or `#[case_keys(opaque)]`.
///
/// [`opaque!`]: crate::opaque
#[derive(Clone, Default)]
pub struct Exclusions {
    predicates: Vec<Predicate>,
}

impl Exclusions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat every value matching `predicate` as opaque.
    pub fn with(mut self, predicate: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        self.predicates.push(Arc::new(predicate));
        self
    }

    /// Treat records containing `key` as opaque, e.g. Extended JSON `{"$date": ...}` wrappers.
    pub fn with_record_key(self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.with(move |value| {
            matches!(value, Value::Record(record) if record.contains_key(key.as_str()))
        })
    }

    /// Add all predicates of `other`.
    pub fn extend(&mut self, other: Exclusions) {
        self.predicates.extend(other.predicates);
    }

    pub fn matches(&self, value: &Value) -> bool {
        self.predicates.iter().any(|predicate| predicate(value))
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl fmt::Debug for Exclusions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exclusions")
            .field("predicates", &self.predicates.len())
            .finish()
    }
}

/// Add types to the type-level exclusion set.
///
/// The listed types convert to themselves, so a struct field of that type is moved into the
/// mirror struct as is, the way [`Exclusions`] keeps a runtime value intact.
///
/// ```
/// #[derive(Debug, PartialEq)]
/// struct Money {
///     minor_units: i64,
/// }
///
/// casekeys::opaque!(Money);
///
/// let price = casekeys::keys_to_camel_case(Money { minor_units: 250 });
/// assert_eq!(price, Money { minor_units: 250 });
/// ```
#[macro_export]
macro_rules! opaque {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::CaseKeys for $ty {
                type CamelCased = Self;
                type SnakeCased = Self;

                #[inline]
                fn into_camel_cased(self) -> Self {
                    self
                }

                #[inline]
                fn into_snake_cased(self) -> Self {
                    self
                }
            }
        )+
    };
}

crate::opaque!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    String,
    Duration,
    SystemTime,
    NaiveDate,
    NaiveTime,
    NaiveDateTime,
    Opaque,
);

impl CaseKeys for &str {
    type CamelCased = Self;
    type SnakeCased = Self;

    fn into_camel_cased(self) -> Self {
        self
    }

    fn into_snake_cased(self) -> Self {
        self
    }
}

impl<Tz: TimeZone> CaseKeys for DateTime<Tz> {
    type CamelCased = Self;
    type SnakeCased = Self;

    fn into_camel_cased(self) -> Self {
        self
    }

    fn into_snake_cased(self) -> Self {
        self
    }
}

impl<T: ?Sized> CaseKeys for PhantomData<T> {
    type CamelCased = Self;
    type SnakeCased = Self;

    fn into_camel_cased(self) -> Self {
        self
    }

    fn into_snake_cased(self) -> Self {
        self
    }
}

macro_rules! callables {
    ($($arg:ident),*) => {
        impl<R, $($arg),*> CaseKeys for fn($($arg),*) -> R {
            type CamelCased = Self;
            type SnakeCased = Self;

            fn into_camel_cased(self) -> Self {
                self
            }

            fn into_snake_cased(self) -> Self {
                self
            }
        }
    };
}

callables!();
callables!(A);
callables!(A, B);
callables!(A, B, C);
callables!(A, B, C, D);

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> Value {
        Value::record([("$date", Value::from("2024-01-01T00:00:00Z"))])
    }

    #[test]
    fn test_scalars_are_opaque() {
        let exclusions = Exclusions::new();
        for value in [
            Value::Null,
            Value::from(true),
            Value::from(3),
            Value::from("text"),
            Value::from(chrono::Utc::now()),
            Value::opaque(|| 42),
        ] {
            assert!(is_opaque(&value, &exclusions), "{value:?}");
            assert!(!is_record(&value, &exclusions), "{value:?}");
        }
    }

    #[test]
    fn test_containers() {
        let exclusions = Exclusions::new();
        assert!(is_record(&sample_record(), &exclusions));
        assert!(matches!(
            classify(&Value::sequence([]), &exclusions),
            Shape::Sequence(items) if items.is_empty()
        ));
        assert!(matches!(
            classify(&Value::set([Value::from(1)]), &exclusions),
            Shape::UniqueCollection(members) if members.len() == 1
        ));
    }

    #[test]
    fn test_exclusions_turn_containers_opaque() {
        let exclusions = Exclusions::new().with_record_key("$date");
        assert!(is_opaque(&sample_record(), &exclusions));
        assert!(is_record(&Value::record([("date", Value::Null)]), &exclusions));

        let exclusions = Exclusions::new().with(|value| matches!(value, Value::Sequence(_)));
        assert!(is_opaque(&Value::sequence([Value::from(1)]), &exclusions));
        assert_eq!(exclusions.len(), 1);
    }

    #[test]
    fn test_exclusions_extend() {
        let mut exclusions = Exclusions::new().with_record_key("$date");
        exclusions.extend(Exclusions::new().with_record_key("$oid"));

        assert_eq!(exclusions.len(), 2);
        assert!(exclusions.matches(&Value::record([("$oid", Value::from("abc"))])));
        assert_eq!(format!("{exclusions:?}"), "Exclusions { predicates: 2 }");
    }
}
