use proc_macro2::TokenStream;
use quote::quote;

use crate::keys::{keys_ident, KeyRegistry};

/// Declares the key enum with one variant per registered key.
pub fn declare(registry: &KeyRegistry) -> TokenStream {
    let ident = keys_ident();
    let variants: Vec<_> = registry.keys().iter().map(|(_, variant)| variant).collect();
    let strings = registry.keys().iter().map(|(key, _)| key);
    quote! {
        #[derive(Clone, Copy)]
        #[allow(non_camel_case_types, dead_code)]
        enum #ident {
            #(#variants,)*
        }

        impl ::codable::CodingKey for #ident {
            fn as_str(&self) -> &str {
                match *self {
                    #(#ident::#variants => #strings,)*
                }
            }
        }
    }
}

#[test]
fn test_declare() {
    let mut registry = KeyRegistry::new();
    registry.add_key("user_id");
    registry.add_key("data");
    let declared = declare(&registry).to_string();
    assert!(declared.contains("enum __CodingKeys { UserId , Data , }"));
    assert!(declared.contains("__CodingKeys :: UserId => \"user_id\""));

    let empty = declare(&KeyRegistry::new()).to_string();
    assert!(empty.contains("match * self { }"));
}
