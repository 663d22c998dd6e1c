use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_macro_input, Data, DeriveInput, Fields, GenericArgument, Ident, LitStr, PathArguments,
    Type,
};

/// Derive macro binding struct fields to column names.
///
/// Generates `rowscan::Record` and `rowscan::Target` impls for the annotated
/// struct. The struct must implement `Default`.
///
/// - `#[column(name = "...")]` binds a field to a column.
/// - `#[column(flatten)]` merges the columns of a nested record. The field may
///   be `T`, `Box<T>`, `Option<T>` or `Option<Box<T>>`; optional links are
///   allocated the first time one of their columns is decoded.
///
/// Fields without `#[column]` are never written.
///
/// # Example
///
/// ```ignore
/// #[derive(Record, Default)]
/// pub struct Student {
///     #[column(flatten)]
///     pub people: Option<Box<People>>,
///
///     #[column(name = "no")]
///     pub no: String,
/// }
/// ```
#[proc_macro_derive(Record, attributes(column))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

/// Parsed `#[column(...)]` binding of one field.
enum Binding {
    Name(LitStr),
    Flatten,
}

fn derive_impl(input: &DeriveInput) -> Result<TokenStream2, syn::Error> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Record only supports structs with named fields",
                ))
            }
        },
        _ => return Err(syn::Error::new_spanned(name, "Record only supports structs")),
    };

    let mut register_tokens = Vec::new();

    for field in fields {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected named field"))?;

        let Some(binding) = parse_binding(field_name, &field.attrs)? else {
            continue;
        };

        let tokens = match binding {
            Binding::Name(column) => quote! {
                fields.field(#column, |record: &mut Self| &mut record.#field_name);
            },
            Binding::Flatten => {
                let access = flatten_access(field_name, &field.ty);
                quote! {
                    fields.flatten(|record: &mut Self| #access);
                }
            }
        };
        register_tokens.push(tokens);
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::rowscan::Record for #name #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn resolve(fields: &mut ::rowscan::FieldMap<Self>) {
                #(#register_tokens)*
            }
        }

        impl #impl_generics ::rowscan::Target for #name #ty_generics #where_clause {
            type Decoder = ::rowscan::StructDecoder<Self>;

            fn decoder(cache: &::rowscan::FieldMapCache) -> Self::Decoder {
                ::rowscan::StructDecoder::from_cache(cache)
            }

            fn blank() -> Self {
                ::core::default::Default::default()
            }
        }
    })
}

fn parse_binding(
    field_name: &Ident,
    attrs: &[syn::Attribute],
) -> Result<Option<Binding>, syn::Error> {
    let mut column: Option<LitStr> = None;
    let mut flatten = false;

    for attr in attrs {
        if !attr.path().is_ident("column") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                column = Some(value);
            } else if meta.path.is_ident("flatten") {
                flatten = true;
            } else {
                return Err(meta.error(
                    "unknown column attribute (expected `name` or `flatten`)",
                ));
            }
            Ok(())
        })?;
    }

    match (column, flatten) {
        (Some(_), true) => Err(syn::Error::new_spanned(
            field_name,
            "`name` and `flatten` cannot be combined",
        )),
        (Some(column), false) => Ok(Some(Binding::Name(column))),
        (None, true) => Ok(Some(Binding::Flatten)),
        (None, false) => Ok(None),
    }
}

/// Accessor expression reaching the nested record behind a flattened field.
fn flatten_access(field_name: &Ident, ty: &Type) -> TokenStream2 {
    match wrapper(ty) {
        Some(("Option", inner)) if wrapper(inner).is_some_and(|(w, _)| w == "Box") => quote! {
            &mut **record.#field_name.get_or_insert_with(::core::default::Default::default)
        },
        Some(("Option", _)) => quote! {
            record.#field_name.get_or_insert_with(::core::default::Default::default)
        },
        Some(("Box", _)) => quote! {
            &mut *record.#field_name
        },
        _ => quote! {
            &mut record.#field_name
        },
    }
}

/// Split `Option<T>` / `Box<T>` into the wrapper name and `T`.
fn wrapper(ty: &Type) -> Option<(&'static str, &Type)> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    let kind = if segment.ident == "Option" {
        "Option"
    } else if segment.ident == "Box" {
        "Box"
    } else {
        return None;
    };
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) => Some((kind, inner)),
        _ => None,
    }
}
