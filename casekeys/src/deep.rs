//! Type-level key conversion.
//!
//! [`CaseKeys`] maps a type to the type its values have after conversion, and converts values
//! along the way. The impls follow the runtime rules in [`crate::convert`]:
//! - Types in the exclusion set map to themselves (see [`crate::shape`]).
//! - Sequences, options and boxes map their elements.
//! - Sets map their members and merge duplicates.
//! - String-keyed maps rename their keys and map their values.
//! - Structs map through `#[derive(CaseKeys)]`, which generates mirror structs with renamed fields.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque},
    hash::{BuildHasher, Hash},
};

use indexmap::IndexMap;

use crate::{
    Casing,
    convert::convert_value,
    value::Value,
};

/// A type whose values can have their keys converted to camelCase and snake_case.
///
/// Implementations exist for the standard containers, for the scalar types that make up the
/// exclusion set and for the dynamic [`Value`]. Derive it for structs with named fields.
pub trait CaseKeys: Sized {
    /// The type produced by [`CaseKeys::into_camel_cased`].
    type CamelCased;
    /// The type produced by [`CaseKeys::into_snake_cased`].
    type SnakeCased;

    fn into_camel_cased(self) -> Self::CamelCased;

    fn into_snake_cased(self) -> Self::SnakeCased;
}

/// The type of `T` after converting its keys to camelCase.
pub type CamelCasedDeep<T> = <T as CaseKeys>::CamelCased;

/// The type of `T` after converting its keys to snake_case.
pub type SnakeCasedDeep<T> = <T as CaseKeys>::SnakeCased;

impl<T: CaseKeys> CaseKeys for Option<T> {
    type CamelCased = Option<T::CamelCased>;
    type SnakeCased = Option<T::SnakeCased>;

    fn into_camel_cased(self) -> Self::CamelCased {
        self.map(T::into_camel_cased)
    }

    fn into_snake_cased(self) -> Self::SnakeCased {
        self.map(T::into_snake_cased)
    }
}

impl<T: CaseKeys> CaseKeys for Box<T> {
    type CamelCased = Box<T::CamelCased>;
    type SnakeCased = Box<T::SnakeCased>;

    fn into_camel_cased(self) -> Self::CamelCased {
        Box::new((*self).into_camel_cased())
    }

    fn into_snake_cased(self) -> Self::SnakeCased {
        Box::new((*self).into_snake_cased())
    }
}

impl<T: CaseKeys> CaseKeys for Vec<T> {
    type CamelCased = Vec<T::CamelCased>;
    type SnakeCased = Vec<T::SnakeCased>;

    fn into_camel_cased(self) -> Self::CamelCased {
        self.into_iter().map(T::into_camel_cased).collect()
    }

    fn into_snake_cased(self) -> Self::SnakeCased {
        self.into_iter().map(T::into_snake_cased).collect()
    }
}

impl<T: CaseKeys> CaseKeys for VecDeque<T> {
    type CamelCased = VecDeque<T::CamelCased>;
    type SnakeCased = VecDeque<T::SnakeCased>;

    fn into_camel_cased(self) -> Self::CamelCased {
        self.into_iter().map(T::into_camel_cased).collect()
    }

    fn into_snake_cased(self) -> Self::SnakeCased {
        self.into_iter().map(T::into_snake_cased).collect()
    }
}

impl<T: CaseKeys, const N: usize> CaseKeys for [T; N] {
    type CamelCased = [T::CamelCased; N];
    type SnakeCased = [T::SnakeCased; N];

    fn into_camel_cased(self) -> Self::CamelCased {
        self.map(T::into_camel_cased)
    }

    fn into_snake_cased(self) -> Self::SnakeCased {
        self.map(T::into_snake_cased)
    }
}

macro_rules! tuples {
    ($($ty:ident $var:ident),+) => {
        impl<$($ty: CaseKeys),+> CaseKeys for ($($ty,)+) {
            type CamelCased = ($($ty::CamelCased,)+);
            type SnakeCased = ($($ty::SnakeCased,)+);

            fn into_camel_cased(self) -> Self::CamelCased {
                let ($($var,)+) = self;
                ($($var.into_camel_cased(),)+)
            }

            fn into_snake_cased(self) -> Self::SnakeCased {
                let ($($var,)+) = self;
                ($($var.into_snake_cased(),)+)
            }
        }
    };
}

tuples!(A a);
tuples!(A a, B b);
tuples!(A a, B b, C c);
tuples!(A a, B b, C c, D d);

impl<T, S> CaseKeys for HashSet<T, S>
where
    T: CaseKeys,
    T::CamelCased: Eq + Hash,
    T::SnakeCased: Eq + Hash,
    S: BuildHasher + Default,
{
    type CamelCased = HashSet<T::CamelCased, S>;
    type SnakeCased = HashSet<T::SnakeCased, S>;

    fn into_camel_cased(self) -> Self::CamelCased {
        self.into_iter().map(T::into_camel_cased).collect()
    }

    fn into_snake_cased(self) -> Self::SnakeCased {
        self.into_iter().map(T::into_snake_cased).collect()
    }
}

impl<T> CaseKeys for BTreeSet<T>
where
    T: CaseKeys,
    T::CamelCased: Ord,
    T::SnakeCased: Ord,
{
    type CamelCased = BTreeSet<T::CamelCased>;
    type SnakeCased = BTreeSet<T::SnakeCased>;

    fn into_camel_cased(self) -> Self::CamelCased {
        self.into_iter().map(T::into_camel_cased).collect()
    }

    fn into_snake_cased(self) -> Self::SnakeCased {
        self.into_iter().map(T::into_snake_cased).collect()
    }
}

/// Rename every key and convert every value. On a key collision the last entry wins.
fn rename_entries<V, W, C>(
    entries: impl IntoIterator<Item = (String, V)>,
    casing: Casing,
    convert: impl Fn(V) -> W,
) -> C
where
    C: FromIterator<(String, W)>,
{
    entries
        .into_iter()
        .map(|(key, value)| (casing.apply(&key), convert(value)))
        .collect()
}

/// `HashMap` iteration order is unspecified, so when two keys collide the surviving value is
/// arbitrary. Use [`IndexMap`] when collisions are possible and the winner matters.
impl<V: CaseKeys, S: BuildHasher + Default> CaseKeys for HashMap<String, V, S> {
    type CamelCased = HashMap<String, V::CamelCased, S>;
    type SnakeCased = HashMap<String, V::SnakeCased, S>;

    fn into_camel_cased(self) -> Self::CamelCased {
        rename_entries(self, Casing::Camel, V::into_camel_cased)
    }

    fn into_snake_cased(self) -> Self::SnakeCased {
        rename_entries(self, Casing::Snake, V::into_snake_cased)
    }
}

/// Colliding keys keep the value of the greatest original key.
impl<V: CaseKeys> CaseKeys for BTreeMap<String, V> {
    type CamelCased = BTreeMap<String, V::CamelCased>;
    type SnakeCased = BTreeMap<String, V::SnakeCased>;

    fn into_camel_cased(self) -> Self::CamelCased {
        rename_entries(self, Casing::Camel, V::into_camel_cased)
    }

    fn into_snake_cased(self) -> Self::SnakeCased {
        rename_entries(self, Casing::Snake, V::into_snake_cased)
    }
}

/// Colliding keys keep the position of the first entry and the value of the last.
impl<V: CaseKeys, S: BuildHasher + Default> CaseKeys for IndexMap<String, V, S> {
    type CamelCased = IndexMap<String, V::CamelCased, S>;
    type SnakeCased = IndexMap<String, V::SnakeCased, S>;

    fn into_camel_cased(self) -> Self::CamelCased {
        rename_entries(self, Casing::Camel, V::into_camel_cased)
    }

    fn into_snake_cased(self) -> Self::SnakeCased {
        rename_entries(self, Casing::Snake, V::into_snake_cased)
    }
}

/// Dynamic values keep their type. Conversion runs the runtime converter with no extra
/// exclusions; use [`crate::Converter`] to configure them.
impl CaseKeys for Value {
    type CamelCased = Value;
    type SnakeCased = Value;

    fn into_camel_cased(self) -> Value {
        convert_value(&self, Casing::Camel)
    }

    fn into_snake_cased(self) -> Value {
        convert_value(&self, Casing::Snake)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_containers_map_elements() {
        let nested: Vec<Option<Box<u8>>> = vec![Some(Box::new(1)), None];
        assert_eq!(nested.clone().into_camel_cased(), nested);

        let array = [1u8, 2, 3];
        assert_eq!(array.into_snake_cased(), [1, 2, 3]);

        let tuple = (1u8, "two", 3.0f64);
        assert_eq!(tuple.into_camel_cased(), (1, "two", 3.0));
    }

    #[test]
    fn test_btree_map_renames_keys() {
        let map = BTreeMap::from([
            ("lorem_ipsum".to_owned(), 1),
            ("dolor_sit".to_owned(), 2),
        ]);

        let camel = map.into_camel_cased();
        assert_eq!(camel.get("loremIpsum"), Some(&1));
        assert_eq!(camel.get("dolorSit"), Some(&2));

        let snake = camel.into_snake_cased();
        assert_eq!(snake.get("lorem_ipsum"), Some(&1));
    }

    #[test]
    fn test_index_map_collision_keeps_first_slot_last_value() {
        let map = IndexMap::<String, i32>::from_iter([
            ("foo_bar".to_owned(), 1),
            ("other".to_owned(), 2),
            ("fooBar".to_owned(), 3),
        ]);

        let camel = map.into_camel_cased();
        let entries: Vec<_> = camel.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(entries, [("fooBar", 3), ("other", 2)]);
    }

    #[test]
    fn test_map_collisions_keep_one_entry() {
        let entries = [("foo_bar".to_owned(), 1), ("fooBar".to_owned(), 3)];

        let sorted = BTreeMap::from(entries.clone()).into_camel_cased();
        assert_eq!(sorted.len(), 1);
        assert_eq!(sorted["fooBar"], 1);

        let hashed = HashMap::<String, i32>::from(entries).into_camel_cased();
        assert_eq!(hashed.len(), 1);
        assert!(matches!(hashed["fooBar"], 1 | 3));
    }

    #[test]
    fn test_hash_map_nested_in_vec() {
        let rows = vec![HashMap::from([("row_id".to_owned(), vec![1u32])])];
        let camel: Vec<HashMap<String, Vec<u32>>> = rows.into_camel_cased();
        assert_eq!(camel[0]["rowId"], [1]);
    }

    #[test]
    fn test_callables_pass_through() {
        fn double(x: i32) -> i32 {
            x * 2
        }

        let f: fn(i32) -> i32 = double;
        assert_eq!(f.into_camel_cased()(4), 8);
    }
}
