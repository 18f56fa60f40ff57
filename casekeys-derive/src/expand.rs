use std::collections::HashMap;

use casekeys_case::Casing;
use darling::{FromDeriveInput, FromField, ast, util::PathList};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{
    Attribute, DeriveInput, Generics, Ident, Path, Type, Visibility, ext::IdentExt, parse_quote,
};

use crate::utils::to_ident;

#[derive(FromDeriveInput, Debug)]
#[darling(attributes(case_keys), supports(struct_named))]
pub(crate) struct CaseKeysInput {
    ident: Ident,
    vis: Visibility,
    generics: Generics,
    data: ast::Data<(), CaseKeysField>,
    /// Name of the camelCase mirror. Defaults to `{Name}CamelCased`.
    camel: Option<String>,
    /// Name of the snake_case mirror. Defaults to `{Name}SnakeCased`.
    snake: Option<String>,
    /// Derives added to both mirrors.
    #[darling(default)]
    derive: PathList,
    /// Implement `CaseKeys` for the mirrors.
    #[darling(default)]
    round_trip: bool,
    /// Path to the runtime crate.
    #[darling(rename = "crate")]
    krate: Option<Path>,
}

impl CaseKeysInput {
    fn fields(&self) -> Vec<&CaseKeysField> {
        self.data
            .as_ref()
            .take_struct()
            .map(|fields| fields.fields)
            .unwrap_or_default()
    }

    fn krate(&self) -> Path {
        self.krate.clone().unwrap_or_else(|| parse_quote!(::casekeys))
    }

    fn mirror_name(&self, casing: Casing) -> darling::Result<Ident> {
        let custom = match casing {
            Casing::Camel => self.camel.as_deref(),
            Casing::Snake => self.snake.as_deref(),
        };

        match custom {
            Some(name) => to_ident(name, &self.ident),
            None => Ok(format_ident!(
                "{}{}",
                self.ident.unraw(),
                mirror_suffix(casing)
            )),
        }
    }

    /// The input generics with a `CaseKeys` bound on every type parameter.
    fn bounded_generics(&self) -> Generics {
        let krate = self.krate();
        let mut generics = self.generics.clone();
        let params: Vec<Ident> = self
            .generics
            .type_params()
            .map(|param| param.ident.clone())
            .collect();

        let where_clause = generics.make_where_clause();
        for param in params {
            where_clause
                .predicates
                .push(parse_quote!(#param: #krate::CaseKeys));
        }

        generics
    }
}

#[derive(FromField, Debug)]
#[darling(attributes(case_keys), forward_attrs(doc))]
struct CaseKeysField {
    ident: Option<Ident>,
    vis: Visibility,
    ty: Type,
    /// Doc comments, copied onto the mirror fields.
    attrs: Vec<Attribute>,
    /// Keep the type and value of this field unchanged.
    #[darling(default)]
    opaque: bool,
}

impl CaseKeysField {
    fn ident(&self) -> darling::Result<&Ident> {
        self.ident
            .as_ref()
            .ok_or_else(|| darling::Error::custom("expected a named field").with_span(&self.ty))
    }

    /// The name of this field after converting it to `casing`.
    fn converted_name(&self, casing: Casing) -> darling::Result<String> {
        Ok(casing.apply(&self.ident()?.unraw().to_string()))
    }
}

fn mirror_suffix(casing: Casing) -> &'static str {
    match casing {
        Casing::Camel => "CamelCased",
        Casing::Snake => "SnakeCased",
    }
}

/// The `CaseKeys` method converting to `casing`.
fn method(casing: Casing) -> Ident {
    match casing {
        Casing::Camel => format_ident!("into_camel_cased"),
        Casing::Snake => format_ident!("into_snake_cased"),
    }
}

/// The `CaseKeys` associated type produced by converting to `casing`.
fn assoc(casing: Casing) -> Ident {
    match casing {
        Casing::Camel => format_ident!("CamelCased"),
        Casing::Snake => format_ident!("SnakeCased"),
    }
}

/// The type alias mapping a type to its converted type.
fn alias(casing: Casing) -> Ident {
    match casing {
        Casing::Camel => format_ident!("CamelCasedDeep"),
        Casing::Snake => format_ident!("SnakeCasedDeep"),
    }
}

/// A field of a mirror struct.
struct MirrorField<'a> {
    source: &'a CaseKeysField,
    ident: Ident,
}

/// A builder for one mirror struct of the input: its definition and the conversion into it.
struct Mirror<'a> {
    input: &'a CaseKeysInput,
    casing: Casing,
    name: Ident,
    fields: Vec<MirrorField<'a>>,
}

impl<'a> Mirror<'a> {
    fn try_new(input: &'a CaseKeysInput, casing: Casing) -> darling::Result<Self> {
        let name = input.mirror_name(casing)?;

        let mut errors = darling::Error::accumulator();
        let mut seen: HashMap<String, &Ident> = HashMap::new();
        let mut fields = Vec::new();

        for field in input.fields() {
            let Some(source) = errors.handle(field.ident()) else {
                continue;
            };
            let Some(converted) = errors.handle(field.converted_name(casing)) else {
                continue;
            };

            // A struct cannot hold both.
            if let Some(previous) = seen.insert(converted.clone(), source) {
                errors.push(
                    darling::Error::custom(format!(
                        "fields `{previous}` and `{source}` both become `{converted}` \
                         in the {casing} mirror"
                    ))
                    .with_span(source),
                );
                continue;
            }

            if let Some(ident) = errors.handle(to_ident(&converted, source)) {
                fields.push(MirrorField { source: field, ident });
            }
        }

        errors.finish_with(Self {
            input,
            casing,
            name,
            fields,
        })
    }

    /// The mirror field type of `field`.
    fn field_type(&self, field: &CaseKeysField) -> TokenStream {
        let ty = &field.ty;
        if field.opaque {
            quote! { #ty }
        } else {
            let krate = self.input.krate();
            let alias = alias(self.casing);
            quote! { #krate::#alias<#ty> }
        }
    }

    /// Build the mirror struct definition.
    fn build_definition(&self) -> TokenStream {
        let vis = &self.input.vis;
        let name = &self.name;
        let generics = self.input.bounded_generics();
        let (impl_generics, _, where_clause) = generics.split_for_impl();

        let fields = self.fields.iter().map(|MirrorField { source, ident }| {
            let docs = &source.attrs;
            let vis = &source.vis;
            let ty = self.field_type(source);
            quote! {
                #(#docs)*
                #vis #ident: #ty
            }
        });

        let derives = self.input.derive.iter();
        let derive = if self.input.derive.is_empty() {
            quote! {}
        } else {
            quote! { #[derive(#(#derives),*)] }
        };

        let doc = format!(
            "[`{}`] with {} field names, generated by `#[derive(CaseKeys)]`.",
            self.input.ident.unraw(),
            self.casing
        );

        quote! {
            #[doc = #doc]
            #derive
            #[allow(non_snake_case)]
            #vis struct #name #impl_generics #where_clause {
                #(#fields),*
            }
        }
    }

    /// Build the `CaseKeys` method converting a value of the input struct into this mirror.
    fn build_conversion(&self) -> TokenStream {
        let krate = self.input.krate();
        let name = &self.name;
        let method = method(self.casing);
        let assoc = assoc(self.casing);

        let assignments = self.fields.iter().map(|MirrorField { source, ident }| {
            // `ident()` was checked when the mirror was built.
            let from = source.ident.as_ref();
            if source.opaque {
                quote! { #ident: self.#from }
            } else {
                quote! { #ident: #krate::CaseKeys::#method(self.#from) }
            }
        });

        quote! {
            fn #method(self) -> Self::#assoc {
                #name {
                    #(#assignments),*
                }
            }
        }
    }

    /// Build the `CaseKeys` impl of this mirror, given the mirror of the other casing.
    ///
    /// Converting the mirror to its own casing returns it unchanged, which requires every field
    /// name to already be in that casing. Converting it to the other casing produces `other`,
    /// which requires every field name to convert back to the name it has in `other`.
    fn build_round_trip(&self, other: &Mirror<'_>) -> darling::Result<TokenStream> {
        let krate = self.input.krate();
        let ident = &self.name;
        let other_name = &other.name;

        let mut errors = darling::Error::accumulator();
        for (field, other_field) in self.fields.iter().zip(&other.fields) {
            let name = field.ident.unraw().to_string();
            let source = field
                .source
                .ident
                .as_ref()
                .map(|ident| ident.to_string())
                .unwrap_or_default();

            let again = self.casing.apply(&name);
            if again != name {
                errors.push(
                    darling::Error::custom(format!(
                        "`{source}` becomes `{name}` in the {} mirror, which converts again to \
                         `{again}`",
                        self.casing,
                    ))
                    .with_span(&field.ident),
                );
                continue;
            }

            let back = other.casing.apply(&name);
            if back != other_field.ident.unraw().to_string() {
                errors.push(
                    darling::Error::custom(format!(
                        "`{source}` becomes `{name}` in the {} mirror, which converts to `{back}` \
                         rather than `{}`",
                        self.casing, other_field.ident,
                    ))
                    .with_span(&field.ident),
                );
            }
        }
        errors.finish()?;

        let mut generics = self.input.bounded_generics();
        let (own_assoc, own_method) = (assoc(self.casing), method(self.casing));
        let (other_assoc, other_method) = (assoc(other.casing), method(other.casing));

        // Generic fields only convert back if their converted type does.
        if self.input.generics.type_params().next().is_some() {
            let own_alias = alias(self.casing);
            let other_alias = alias(other.casing);
            let where_clause = generics.make_where_clause();
            for field in self.fields.iter().filter(|field| !field.source.opaque) {
                let ty = &field.source.ty;
                where_clause.predicates.push(parse_quote! {
                    #krate::#own_alias<#ty>:
                        #krate::CaseKeys<#other_assoc = #krate::#other_alias<#ty>>
                });
            }
        }

        let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

        let assignments = self.fields.iter().zip(&other.fields).map(|(field, other_field)| {
            let from = &field.ident;
            let to = &other_field.ident;
            if field.source.opaque {
                quote! { #to: self.#from }
            } else {
                quote! { #to: #krate::CaseKeys::#other_method(self.#from) }
            }
        });

        Ok(quote! {
            impl #impl_generics #krate::CaseKeys for #ident #ty_generics #where_clause {
                type #own_assoc = Self;
                type #other_assoc = #other_name #ty_generics;

                fn #own_method(self) -> Self {
                    self
                }

                fn #other_method(self) -> Self::#other_assoc {
                    #other_name {
                        #(#assignments),*
                    }
                }
            }
        })
    }
}

pub(crate) fn expand(input: &DeriveInput) -> darling::Result<TokenStream> {
    let input = CaseKeysInput::from_derive_input(input)?;

    let camel = Mirror::try_new(&input, Casing::Camel)?;
    let snake = Mirror::try_new(&input, Casing::Snake)?;

    let krate = input.krate();
    let ident = &input.ident;
    let generics = input.bounded_generics();
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let camel_name = &camel.name;
    let snake_name = &snake.name;
    let camel_definition = camel.build_definition();
    let snake_definition = snake.build_definition();
    let camel_conversion = camel.build_conversion();
    let snake_conversion = snake.build_conversion();

    let mut output = quote! {
        #camel_definition

        #snake_definition

        impl #impl_generics #krate::CaseKeys for #ident #ty_generics #where_clause {
            type CamelCased = #camel_name #ty_generics;
            type SnakeCased = #snake_name #ty_generics;

            #camel_conversion

            #snake_conversion
        }
    };

    if input.round_trip {
        let mut errors = darling::Error::accumulator();
        let camel_round_trip = errors.handle(camel.build_round_trip(&snake));
        let snake_round_trip = errors.handle(snake.build_round_trip(&camel));
        errors.finish()?;

        output = quote! {
            #output

            #camel_round_trip

            #snake_round_trip
        };
    }

    Ok(output)
}
