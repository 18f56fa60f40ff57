use syn::Ident;

/// Turn a name converted from `source` into an identifier spanning `source`. Keywords become raw
/// identifiers.
pub(crate) fn to_ident(name: &str, source: &Ident) -> darling::Result<Ident> {
    if syn::parse_str::<Ident>(name).is_ok() {
        return Ok(Ident::new(name, source.span()));
    }

    if syn::parse_str::<Ident>(&format!("r#{name}")).is_ok() {
        return Ok(Ident::new_raw(name, source.span()));
    }

    Err(darling::Error::custom(format!("`{name}` is not a valid identifier")).with_span(source))
}

#[cfg(test)]
mod tests {
    use proc_macro2::Span;

    use super::*;

    #[test]
    fn test_to_ident() {
        let source = Ident::new("source", Span::call_site());

        assert_eq!(to_ident("loremIpsum", &source).unwrap(), "loremIpsum");
        assert_eq!(to_ident("type", &source).unwrap().to_string(), "r#type");
        assert!(to_ident("1abc", &source).is_err());
    }
}
