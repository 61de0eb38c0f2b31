use proc_macro::TokenStream;
use proc_macro2::{Literal, Span};
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Error, Fields, Lit, Meta, NestedMeta};


const MAX_VALUE_WIDTH: u32 = 48;

fn nanword_crate() -> proc_macro2::TokenStream {
    // nanword declares `extern crate self as nanword` so this also resolves
    // inside the library itself
    quote! { ::nanword }
}


/// Derive macro generating an impl of the trait `Primitive`.
///
/// The type has to be a tuple struct with a single field implementing `Payload`, the
/// `primitive` attribute picks its value width and type offset.
///
/// # Examples
///
/// ```rust
/// use nanword::{Primitive, Word};
///
/// #[derive(Clone, Copy, Debug, PartialEq, Primitive)]
/// #[primitive(width = 16, offset = 5)]
/// struct Port(u16);
///
/// let word = Word::from(Port(8080));
/// assert_eq!(word.downcast::<Port>(), Some(Port(8080)));
/// assert_eq!(word.downcast::<i32>(), None);
/// ```
///
/// Widths are even, from 0 to 48.
///
/// ```rust,compile_fail
/// use nanword::Primitive;
///
/// #[derive(Clone, Copy, Primitive)]
/// #[primitive(width = 33, offset = 0)]
/// struct Odd(u32);
/// ```
///
/// The payload has to fit the width.
///
/// ```rust,compile_fail
/// use nanword::Primitive;
///
/// #[derive(Clone, Copy, Primitive)]
/// #[primitive(width = 16, offset = 0)]
/// struct Narrow(u32);
/// ```
#[proc_macro_derive(Primitive, attributes(primitive))]
pub fn derive_primitive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(input) {
        Ok(expanded) => expanded.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

fn expand(input: DeriveInput) -> Result<proc_macro2::TokenStream, Error> {
    let nanword = nanword_crate();
    let ident = input.ident;
    let name = ident.to_string();

    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            input.generics.params,
            "Primitive cannot have generic parameters",
        ));
    }

    let field_ty = match input.data {
        Data::Struct(data) => match data.fields {
            Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {
                fields.unnamed.into_iter().map(|field| field.ty).next()
            },
            _ => None,
        },
        _ => None,
    };
    let field_ty = field_ty.ok_or_else(|| {
        Error::new_spanned(&ident, "Primitive can only be derived for tuple structs with one field")
    })?;

    let (width, offset) = parse_attrs(&input.attrs)?;
    let width = Literal::u32_unsuffixed(width);
    let offset = Literal::u64_unsuffixed(offset);

    let expanded = quote! {
        impl #nanword::Primitive for #ident {
            const WIDTH: #nanword::ValueWidth = #nanword::ValueWidth::new_const(#width);
            const TYPE_OFFSET: u64 = #offset;
            const NAME: &'static str = #name;

            fn to_payload(self) -> u64 {
                #nanword::Payload::to_bits(self.0)
            }

            fn from_payload(payload: u64) -> Self {
                #ident(#nanword::Payload::from_bits(payload))
            }
        }

        const _: () = {
            assert!(
                <#field_ty as #nanword::Payload>::BITS <= #width,
                "payload of the primitive is wider than its value width",
            );
        };
    };

    Ok(expanded)
}

/// Reads `#[primitive(width = W, offset = O)]`
fn parse_attrs(attrs: &[Attribute]) -> Result<(u32, u64), Error> {
    let attr = attrs
        .iter()
        .find(|attr| attr.path.is_ident("primitive"))
        .ok_or_else(|| {
            Error::new(
                Span::call_site(),
                "missing attribute, for example `#[primitive(width = 32, offset = 2)]`",
            )
        })?;

    let list = match attr.parse_meta()? {
        Meta::List(list) => list,
        meta => return Err(Error::new_spanned(meta, "expected `primitive(width = .., offset = ..)`")),
    };

    let mut width = None;
    let mut offset = None;

    for nested in list.nested {
        let pair = match nested {
            NestedMeta::Meta(Meta::NameValue(pair)) => pair,
            other => return Err(Error::new_spanned(other, "expected `key = value`")),
        };
        let int = match &pair.lit {
            Lit::Int(int) => int,
            other => return Err(Error::new_spanned(other, "expected an integer")),
        };

        if pair.path.is_ident("width") {
            let bits = int.base10_parse::<u32>()?;
            if bits % 2 != 0 || bits > MAX_VALUE_WIDTH {
                return Err(Error::new_spanned(
                    int,
                    format!("value width must be even and at most {}", MAX_VALUE_WIDTH),
                ));
            }
            width = Some(bits);
        } else if pair.path.is_ident("offset") {
            offset = Some((int.base10_parse::<u64>()?, int.clone()));
        } else {
            return Err(Error::new_spanned(pair.path, "unknown key, expected `width` or `offset`"));
        }
    }

    let width = width.ok_or_else(|| Error::new_spanned(attr, "missing `width`"))?;
    let (offset, offset_lit) = offset.ok_or_else(|| Error::new_spanned(attr, "missing `offset`"))?;

    // the offset field sits between the indicator bit and the payload
    let offset_width = (MAX_VALUE_WIDTH - width) / 2 + 2;
    let max_offset = (1u64 << offset_width) - 1;
    if offset > max_offset {
        return Err(Error::new_spanned(
            offset_lit,
            format!("type offset for width {} must be at most {}", width, max_offset),
        ));
    }

    Ok((width, offset))
}
