use proc_macro2::{Ident, TokenStream};
use quote::quote;

use crate::variable::{option_inner, AnyVariable, Fallback, Location, Variable};

/// Codes a value through a `HelperCoder` instead of its own implementations.
///
/// For `Option<T>` fields the helper codes `T`.
pub struct HelperCodedVariable {
    base: AnyVariable,
    coder: TokenStream,
    optional: bool,
}

impl HelperCodedVariable {
    pub fn new(base: AnyVariable, coder: &syn::Expr) -> HelperCodedVariable {
        HelperCodedVariable {
            optional: option_inner(base.ty()).is_some(),
            base,
            coder: quote!(&(#coder)),
        }
    }
}

impl Variable for HelperCodedVariable {
    fn name(&self) -> &Ident {
        self.base.name()
    }

    fn ty(&self) -> &syn::Type {
        self.base.ty()
    }

    fn access(&self) -> &TokenStream {
        self.base.access()
    }

    fn decodable(&self) -> bool {
        self.base.decodable()
    }

    fn encodable(&self) -> bool {
        self.base.encodable()
    }

    fn decode(&self, at: Location<'_>) -> TokenStream {
        let coder = &self.coder;
        match at {
            Location::Keyed { container, key } if self.optional => quote! {
                match #container.super_decoder_if_present(#key) {
                    ::codable::__derive::Some(__decoder) => {
                        ::codable::HelperCoder::decode_if_present(#coder, &__decoder)?
                    }
                    ::codable::__derive::None => ::codable::__derive::None,
                }
            },
            Location::Keyed { container, key } => quote! {
                ::codable::HelperCoder::decode(#coder, &#container.super_decoder(#key)?)?
            },
            Location::Root { coder: decoder } if self.optional => {
                quote!(::codable::HelperCoder::decode_if_present(#coder, #decoder)?)
            }
            Location::Root { coder: decoder } => {
                quote!(::codable::HelperCoder::decode(#coder, #decoder)?)
            }
        }
    }

    fn decode_if_present(&self, at: Location<'_>) -> Option<TokenStream> {
        let coder = &self.coder;
        let decode = |decoder: TokenStream| {
            if self.optional {
                quote!(::codable::HelperCoder::decode_if_present(#coder, #decoder)?)
            } else {
                quote!(::codable::HelperCoder::decode(#coder, #decoder)?)
            }
        };
        Some(match at {
            Location::Keyed { container, key } => {
                let decode = decode(quote!(&__decoder));
                quote! {
                    match #container.super_decoder_if_present(#key) {
                        ::codable::__derive::Some(__decoder) => ::codable::__derive::Some(#decode),
                        ::codable::__derive::None => ::codable::__derive::None,
                    }
                }
            }
            Location::Root { coder: decoder } => {
                let decode = decode(quote!(#decoder));
                quote! {
                    if #decoder.is_null() {
                        ::codable::__derive::None
                    } else {
                        ::codable::__derive::Some(#decode)
                    }
                }
            }
        })
    }

    fn encode(&self, at: Location<'_>) -> TokenStream {
        let coder = &self.coder;
        let access = self.base.access();
        match at {
            Location::Keyed { container, key } if self.optional => quote! {
                if let ::codable::__derive::Some(__value) = (#access).as_ref() {
                    ::codable::HelperCoder::encode(#coder, __value, &mut #container.super_encoder(#key))?;
                }
            },
            Location::Keyed { container, key } => quote! {
                ::codable::HelperCoder::encode(#coder, #access, &mut #container.super_encoder(#key))?;
            },
            Location::Root { coder: encoder } if self.optional => quote! {
                if let ::codable::__derive::Some(__value) = (#access).as_ref() {
                    ::codable::HelperCoder::encode(#coder, __value, #encoder)?;
                }
            },
            Location::Root { coder: encoder } => quote! {
                ::codable::HelperCoder::encode(#coder, #access, #encoder)?;
            },
        }
    }

    fn encode_condition(&self) -> Option<TokenStream> {
        self.base.encode_condition()
    }

    fn fallback(&self) -> Fallback {
        self.base.fallback()
    }

    fn value(&self) -> Option<TokenStream> {
        self.base.value()
    }
}
