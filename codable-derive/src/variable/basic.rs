use proc_macro2::{Ident, TokenStream};
use quote::quote;

use crate::variable::{option_inner, Fallback, Location, Variable};

/// Codes a value through its own `Decode` and `Encode` implementations.
///
/// `Option<T>` values are coded with the `*_if_present` operations: an
/// absent or null key decodes as `None` and `None` is not encoded at all.
pub struct BasicVariable {
    name: Ident,
    ty: syn::Type,
    optional: Option<syn::Type>,
    access: TokenStream,
    value: Option<TokenStream>,
}

impl BasicVariable {
    pub fn new(name: Ident, ty: syn::Type, access: TokenStream) -> BasicVariable {
        BasicVariable {
            optional: option_inner(&ty).cloned(),
            name,
            ty,
            access,
            value: None,
        }
    }

    /// Sets the value the field takes when it is not decoded.
    pub fn with_value(mut self, value: Option<TokenStream>) -> BasicVariable {
        self.value = value;
        self
    }
}

impl Variable for BasicVariable {
    fn name(&self) -> &Ident {
        &self.name
    }

    fn ty(&self) -> &syn::Type {
        &self.ty
    }

    fn access(&self) -> &TokenStream {
        &self.access
    }

    fn decode(&self, at: Location<'_>) -> TokenStream {
        let ty = &self.ty;
        match (at, &self.optional) {
            (Location::Keyed { container, key }, Some(inner)) => {
                quote!(#container.decode_if_present::<#inner, _>(#key)?)
            }
            (Location::Keyed { container, key }, None) => {
                quote!(#container.decode::<#ty, _>(#key)?)
            }
            (Location::Root { coder }, _) => {
                quote!(<#ty as ::codable::Decode>::decode(#coder)?)
            }
        }
    }

    fn decode_if_present(&self, at: Location<'_>) -> Option<TokenStream> {
        let ty = &self.ty;
        Some(match (at, &self.optional) {
            (Location::Keyed { container, key }, Some(inner)) => quote! {
                #container
                    .decode_if_present::<#inner, _>(#key)?
                    .map(::codable::__derive::Some)
            },
            (Location::Keyed { container, key }, None) => {
                quote!(#container.decode_if_present::<#ty, _>(#key)?)
            }
            (Location::Root { coder }, _) => quote! {
                if #coder.is_null() {
                    ::codable::__derive::None
                } else {
                    ::codable::__derive::Some(<#ty as ::codable::Decode>::decode(#coder)?)
                }
            },
        })
    }

    fn encode(&self, at: Location<'_>) -> TokenStream {
        let access = &self.access;
        match (at, &self.optional) {
            (Location::Keyed { container, key }, Some(_)) => {
                quote!(#container.encode_if_present(#key, (#access).as_ref())?;)
            }
            (Location::Keyed { container, key }, None) => {
                quote!(#container.encode(#key, #access)?;)
            }
            (Location::Root { coder }, Some(_)) => quote! {
                if let ::codable::__derive::Some(__value) = (#access).as_ref() {
                    ::codable::Encode::encode(__value, #coder)?;
                }
            },
            (Location::Root { coder }, None) => {
                quote!(::codable::Encode::encode(#access, #coder)?;)
            }
        }
    }

    fn fallback(&self) -> Fallback {
        if self.optional.is_some() {
            let name = &self.name;
            Fallback::IfMissing(quote!(#name = ::codable::__derive::None;))
        } else {
            Fallback::Throw
        }
    }

    fn value(&self) -> Option<TokenStream> {
        self.value.clone()
    }
}
