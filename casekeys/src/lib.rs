//! Deep key conversion between camelCase and snake_case.
//!
//! Two entry points, [`keys_to_camel_case`] and [`keys_to_snake_case`], accept any [`CaseKeys`]
//! value and return a copy whose record keys are renamed at every depth. Strings, numbers,
//! booleans, instants and callables are never treated as records.
//!
//! - Dynamic trees ([`Value`], [`serde_json::Value`]) go through the runtime [`Converter`].
//! - Typed values go through [`CaseKeys`]. The result type is [`CamelCasedDeep<T>`] or
//!   [`SnakeCasedDeep<T>`], so renamed fields are checked by the compiler.
//!
//! ```
//! use casekeys::{CaseKeys, keys_to_camel_case};
//!
//! #[derive(CaseKeys)]
//! #[case_keys(derive(Debug, PartialEq))]
//! struct Item {
//!     amet_consec: String,
//! }
//!
//! #[derive(CaseKeys)]
//! struct Payload {
//!     lorem_ipsum: i32,
//!     dolor_sit: Vec<Item>,
//! }
//!
//! let cameled = keys_to_camel_case(Payload {
//!     lorem_ipsum: 1,
//!     dolor_sit: vec![Item { amet_consec: "tetur".into() }],
//! });
//!
//! assert_eq!(cameled.loremIpsum, 1);
//! assert_eq!(cameled.dolorSit[0].ametConsec, "tetur");
//! ```

pub mod convert;
pub mod deep;
pub mod json;
pub mod shape;
pub mod value;

pub use casekeys_case::{Casing, ParseCasingError, to_camel, to_snake};
#[cfg(feature = "derive")]
pub use casekeys_derive::CaseKeys;
pub use convert::{Converter, convert_value};
pub use deep::{CamelCasedDeep, CaseKeys, SnakeCasedDeep};
pub use shape::{Exclusions, Shape};
pub use value::{Opaque, Record, Value, ValueSet};

/// Convert every key of `value` to camelCase.
pub fn keys_to_camel_case<T: CaseKeys>(value: T) -> CamelCasedDeep<T> {
    value.into_camel_cased()
}

/// Convert every key of `value` to snake_case.
pub fn keys_to_snake_case<T: CaseKeys>(value: T) -> SnakeCasedDeep<T> {
    value.into_snake_cased()
}
