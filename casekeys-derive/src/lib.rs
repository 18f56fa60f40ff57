use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod expand;
mod utils;

/// Derive `casekeys::CaseKeys` for a struct with named fields.
///
/// Generates two mirror structs, `{Name}CamelCased` and `{Name}SnakeCased`. Their fields are named
/// by converting each field name, and typed by converting each field type
/// (`CamelCasedDeep<T>` / `SnakeCasedDeep<T>`).
///
/// # Container attributes
/// - `#[case_keys(camel = "Name", snake = "Name")]`: rename the mirror structs.
/// - `#[case_keys(derive(Debug, Clone, ...))]`: derives added to both mirrors.
/// - `#[case_keys(round_trip)]`: implement `CaseKeys` for the mirrors too, so a converted value
///   can be converted back. Every field name must survive the round trip.
/// - `#[case_keys(crate = "path")]`: path to the `casekeys` crate. Defaults to `::casekeys`.
///
/// # Field attributes
/// - `#[case_keys(opaque)]`: keep the field type and value unchanged, like a date.
#[proc_macro_derive(CaseKeys, attributes(case_keys))]
pub fn derive_case_keys(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand::expand(&input)
        .unwrap_or_else(|err| err.write_errors())
        .into()
}
