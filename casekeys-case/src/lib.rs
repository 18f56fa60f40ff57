//! Name conversion between camelCase and snake_case.
//!
//! This crate holds the only definition of the casing rules. The runtime converter in `casekeys`
//! renames record keys with it, and `casekeys-derive` names the fields of the generated mirror
//! structs with it, so a key renamed at runtime and a field renamed at compile time always agree.
//!
//! Both conversions are heuristics, not a bijection:
//! - [`to_camel`] keeps separators that are not followed by a letter (`a__b` -> `a_B`).
//! - [`to_snake`] opens a new word at every capital, so acronyms split letter by letter
//!   (`userID` -> `user_i_d`).

use std::{fmt, str::FromStr};

/// A supported key naming convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Casing {
    /// `loremIpsum`
    Camel,
    /// `lorem_ipsum`
    Snake,
}

impl Casing {
    /// Convert `name` to this casing.
    pub fn apply(self, name: &str) -> String {
        match self {
            Self::Camel => to_camel(name),
            Self::Snake => to_snake(name),
        }
    }
}

impl fmt::Display for Casing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Camel => write!(f, "camelCase"),
            Self::Snake => write!(f, "snake_case"),
        }
    }
}

/// Returned when parsing an unknown casing name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown casing '{0}', expected camelCase or snake_case")]
pub struct ParseCasingError(String);

impl FromStr for Casing {
    type Err = ParseCasingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "camel" | "camelCase" => Ok(Self::Camel),
            "snake" | "snake_case" => Ok(Self::Snake),
            other => Err(ParseCasingError(other.to_owned())),
        }
    }
}

/// Convert a name to camelCase.
///
/// Every `-` or `_` directly followed by an ASCII letter is dropped and the letter uppercased.
/// Any other character, including a separator with no letter after it, is kept as is.
pub fn to_camel(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();

    while let Some(ch) = chars.next() {
        if is_separator(ch) {
            if let Some(next) = chars.next_if(char::is_ascii_alphabetic) {
                result.push(next.to_ascii_uppercase());
                continue;
            }
        }
        result.push(ch);
    }

    result
}

/// Convert a name to snake_case.
///
/// Splits before every ASCII uppercase letter except a leading one, joins the pieces with `_`
/// and lowercases the result.
pub fn to_snake(name: &str) -> String {
    let uppercase = name.chars().filter(char::is_ascii_uppercase).count();
    let mut result = String::with_capacity(name.len() + uppercase);

    for (i, ch) in name.chars().enumerate() {
        if i > 0 && ch.is_ascii_uppercase() {
            result.push('_');
        }
        result.push(ch);
    }

    result.to_lowercase()
}

fn is_separator(ch: char) -> bool {
    ch == '_' || ch == '-'
}
