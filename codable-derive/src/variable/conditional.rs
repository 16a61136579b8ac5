use proc_macro2::{Ident, TokenStream};
use quote::quote;

use crate::variable::{AnyVariable, Fallback, Initialization, Location, Variable};

/// Suppresses decoding and/or encoding of a value.
///
/// Encoding can also be suppressed at runtime by a predicate that receives
/// a reference to the value.
pub struct ConditionalCodingVariable {
    base: AnyVariable,
    decode: bool,
    encode: bool,
    skip_encoding_if: Option<TokenStream>,
}

impl ConditionalCodingVariable {
    pub fn new(base: AnyVariable, decode: bool, encode: bool) -> ConditionalCodingVariable {
        ConditionalCodingVariable {
            base,
            decode,
            encode,
            skip_encoding_if: None,
        }
    }

    pub fn skip_encoding_if(mut self, predicate: &syn::Expr) -> ConditionalCodingVariable {
        self.skip_encoding_if = Some(quote!(#predicate));
        self
    }

    fn own_condition(&self) -> Option<TokenStream> {
        let predicate = self.skip_encoding_if.as_ref()?;
        let access = self.base.access();
        Some(quote!(!(#predicate)(#access)))
    }
}

impl Variable for ConditionalCodingVariable {
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
        self.decode && self.base.decodable()
    }

    fn encodable(&self) -> bool {
        self.encode && self.base.encodable()
    }

    fn decode(&self, at: Location<'_>) -> TokenStream {
        self.base.decode(at)
    }

    fn decode_if_present(&self, at: Location<'_>) -> Option<TokenStream> {
        self.base.decode_if_present(at)
    }

    fn encode(&self, at: Location<'_>) -> TokenStream {
        if !self.encodable() {
            return TokenStream::new();
        }
        let encode = self.base.encode(at);
        match self.own_condition() {
            Some(condition) => quote! {
                if #condition {
                    #encode
                }
            },
            None => encode,
        }
    }

    fn encode_condition(&self) -> Option<TokenStream> {
        match (self.base.encode_condition(), self.own_condition()) {
            (Some(a), Some(b)) => Some(quote!((#a) && (#b))),
            (a, b) => a.or(b),
        }
    }

    fn fallback(&self) -> Fallback {
        self.base.fallback()
    }

    fn value(&self) -> Option<TokenStream> {
        self.base.value()
    }

    fn initialization(&self) -> Initialization {
        self.base.initialization()
    }
}
