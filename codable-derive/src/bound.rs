use proc_macro2::TokenStream;

/// Returns the where clause of `generics` with `bound` added for every type
/// parameter.
pub fn where_clause_with_bound(generics: &syn::Generics, bound: TokenStream) -> syn::WhereClause {
    let new_predicates = generics
        .type_params()
        .map::<syn::WherePredicate, _>(|param| {
            let param = &param.ident;
            syn::parse_quote!(#param : #bound)
        });

    let mut where_clause = generics.where_clause.clone().unwrap_or_else(|| syn::WhereClause {
        where_token: Default::default(),
        predicates: syn::punctuated::Punctuated::new(),
    });
    where_clause.predicates.extend(new_predicates);
    where_clause
}

#[test]
fn test_existing_predicates_are_kept() {
    let input: syn::DeriveInput = syn::parse_quote! {
        struct Pair<T, U: Clone> where U: Default {
            left: T,
            right: U,
        }
    };
    let clause = where_clause_with_bound(&input.generics, quote::quote!(::codable::Encode));
    assert_eq!(clause.predicates.len(), 3);
}
