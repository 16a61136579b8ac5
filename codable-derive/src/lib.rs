extern crate proc_macro;

mod attr;
mod bound;
mod diag;
mod emit;
mod enums;
mod expand;
mod keys;
mod model;
mod registration;
mod variable;

use proc_macro::TokenStream;
use syn::parse_macro_input;

#[proc_macro_derive(Decode, attributes(codable))]
pub fn derive_decode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as syn::DeriveInput);
    expand::derive_decode(&input).into_token_stream().into()
}

#[proc_macro_derive(Encode, attributes(codable))]
pub fn derive_encode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as syn::DeriveInput);
    expand::derive_encode(&input).into_token_stream().into()
}

#[proc_macro_derive(MemberInit, attributes(codable))]
pub fn derive_member_init(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as syn::DeriveInput);
    expand::derive_member_init(&input).into_token_stream().into()
}
