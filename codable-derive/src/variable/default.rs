use proc_macro2::{Ident, TokenStream};
use quote::quote;

use crate::attr::kinds::DefaultMode;
use crate::variable::{AnyVariable, Fallback, Initialization, Location, Variable};

/// Replaces a value that cannot be decoded with a default.
pub struct DefaultValueVariable {
    base: AnyVariable,
    default: TokenStream,
    mode: DefaultMode,
}

impl DefaultValueVariable {
    pub fn new(base: AnyVariable, default: TokenStream, mode: DefaultMode) -> DefaultValueVariable {
        DefaultValueVariable {
            base,
            default,
            mode,
        }
    }
}

impl Variable for DefaultValueVariable {
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
        let default = &self.default;
        let ty = self.base.ty();
        match self.mode {
            DefaultMode::IfError => match self.base.decode_if_present(at) {
                // absent and null count as failures too
                Some(decode) => quote! {
                    match (|| -> ::codable::__derive::Result<
                        ::codable::__derive::Option<#ty>,
                        ::codable::Error,
                    > {
                        ::codable::__derive::Ok(#decode)
                    })() {
                        ::codable::__derive::Ok(::codable::__derive::Some(__value)) => __value,
                        _ => #default,
                    }
                },
                None => {
                    let decode = self.base.decode(at);
                    quote! {
                        match (|| -> ::codable::__derive::Result<#ty, ::codable::Error> {
                            ::codable::__derive::Ok(#decode)
                        })() {
                            ::codable::__derive::Ok(__value) => __value,
                            ::codable::__derive::Err(_) => #default,
                        }
                    }
                }
            },
            DefaultMode::IfMissing => match self.base.decode_if_present(at) {
                Some(decode) => quote! {
                    match #decode {
                        ::codable::__derive::Some(__value) => __value,
                        ::codable::__derive::None => #default,
                    }
                },
                None => self.base.decode(at),
            },
        }
    }

    fn decode_if_present(&self, at: Location<'_>) -> Option<TokenStream> {
        self.base.decode_if_present(at)
    }

    fn encode(&self, at: Location<'_>) -> TokenStream {
        self.base.encode(at)
    }

    fn encode_condition(&self) -> Option<TokenStream> {
        self.base.encode_condition()
    }

    fn fallback(&self) -> Fallback {
        let name = self.base.name();
        let default = &self.default;
        let stmt = quote!(#name = #default;);
        match self.mode {
            DefaultMode::IfError => Fallback::IfError(stmt),
            DefaultMode::IfMissing => Fallback::IfMissing(stmt),
        }
    }

    fn value(&self) -> Option<TokenStream> {
        Some(self.default.clone())
    }

    fn initialization(&self) -> Initialization {
        match self.base.initialization() {
            Initialization::Ignored(value) => Initialization::Ignored(value),
            _ => Initialization::Optional(self.default.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::BasicVariable;
    use quote::format_ident;
    use std::rc::Rc;

    #[test]
    fn test_modes() {
        let base: AnyVariable = Rc::new(BasicVariable::new(
            format_ident!("__field_likes"),
            syn::parse_quote!(u32),
            quote!(&self.likes),
        ));
        let container = format_ident!("__container");
        let key = quote!(__CodingKeys::Likes);
        let at = Location::Keyed {
            container: &container,
            key: &key,
        };

        let on_error = DefaultValueVariable::new(base.clone(), quote!(0), DefaultMode::IfError);
        let decoded = on_error.decode(at).to_string();
        assert!(decoded.contains("decode_if_present :: < u32 , _ >"));
        assert!(decoded.contains("_ => 0"));
        assert!(matches!(on_error.fallback(), Fallback::IfError(_)));
        assert!(matches!(on_error.initialization(), Initialization::Optional(_)));

        let if_missing = DefaultValueVariable::new(base, quote!(0), DefaultMode::IfMissing);
        assert!(if_missing.decode(at).to_string().contains("decode_if_present"));
        assert!(matches!(if_missing.fallback(), Fallback::IfMissing(_)));
    }

    #[test]
    fn test_absent_optional_takes_default() {
        let base: AnyVariable = Rc::new(BasicVariable::new(
            format_ident!("__field_level"),
            syn::parse_quote!(Option<u32>),
            quote!(&self.level),
        ));
        let container = format_ident!("__container");
        let key = quote!(__CodingKeys::Level);
        let at = Location::Keyed {
            container: &container,
            key: &key,
        };
        let on_error = DefaultValueVariable::new(base, quote!(Some(3)), DefaultMode::IfError);
        let decoded = on_error.decode(at).to_string();
        assert!(decoded.contains(". map (:: codable :: __derive :: Some)"));
        assert!(decoded.contains("Ok (:: codable :: __derive :: Some (__value)) => __value"));
        assert!(decoded.contains("_ => Some (3)"));
    }
}
