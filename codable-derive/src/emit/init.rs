//! Memberwise initializers.
//!
//! Every optional parameter doubles the set of generated constructors: one
//! takes the parameter, the other falls back to the field's default.  A
//! struct with N optional fields gets 2^N associated functions, each of them
//! taking every required parameter.
//!
//! Constructors are named after the optional parameters they take.  If two
//! of those names clash, all of them are named after the positions of the
//! optional fields instead (`new_with_0_and_2`).
use std::collections::HashSet;

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

use crate::model::FieldDescriptor;
use crate::variable::Initialization;

#[derive(Debug, Clone, Default)]
struct Overload {
    params: Vec<TokenStream>,
    assignments: Vec<TokenStream>,
    /// The optional parameters this overload takes.
    optional: Vec<String>,
    /// Their positions among all optional fields.
    positions: Vec<usize>,
}

impl Overload {
    fn name(&self) -> Ident {
        if self.optional.is_empty() {
            format_ident!("new")
        } else {
            format_ident!("new_with_{}", self.optional.join("_and_"))
        }
    }

    fn positional_name(&self) -> Ident {
        if self.positions.is_empty() {
            format_ident!("new")
        } else {
            let positions: Vec<_> = self.positions.iter().map(usize::to_string).collect();
            format_ident!("new_with_{}", positions.join("_and_"))
        }
    }
}

pub struct MemberwiseInitGenerator {
    overloads: Vec<Overload>,
    optional_fields: usize,
}

impl Default for MemberwiseInitGenerator {
    fn default() -> Self {
        MemberwiseInitGenerator {
            overloads: vec![Overload::default()],
            optional_fields: 0,
        }
    }
}

fn param_ident(field: &FieldDescriptor) -> Ident {
    match field.member {
        syn::Member::Named(ref ident) => ident.clone(),
        syn::Member::Unnamed(ref index) => format_ident!("field_{}", index.index),
    }
}

impl MemberwiseInitGenerator {
    pub fn new() -> MemberwiseInitGenerator {
        MemberwiseInitGenerator::default()
    }

    /// Adds a field to every overload.
    pub fn add(&mut self, field: &FieldDescriptor, requirement: Initialization) {
        let member = &field.member;
        let param = param_ident(field);
        let ty = &field.ty;
        match requirement {
            Initialization::Ignored(value) => {
                for overload in &mut self.overloads {
                    overload.assignments.push(quote!(#member: #value));
                }
            }
            Initialization::Required => {
                for overload in &mut self.overloads {
                    overload.params.push(quote!(#param: #ty));
                    overload.assignments.push(quote!(#member: #param));
                }
            }
            Initialization::Optional(default) => {
                let mut with_param = self.overloads.clone();
                for overload in &mut with_param {
                    overload.params.push(quote!(#param: #ty));
                    overload.assignments.push(quote!(#member: #param));
                    overload.optional.push(field.name.clone());
                    overload.positions.push(self.optional_fields);
                }
                self.optional_fields += 1;
                for overload in &mut self.overloads {
                    overload.assignments.push(quote!(#member: #default));
                }
                self.overloads.extend(with_param);
            }
        }
    }

    fn names(&self) -> Vec<Ident> {
        let names: Vec<_> = self.overloads.iter().map(Overload::name).collect();
        let mut seen = HashSet::new();
        if names.iter().all(|name| seen.insert(name.to_string())) {
            names
        } else {
            self.overloads.iter().map(Overload::positional_name).collect()
        }
    }

    /// Emits one associated function per overload.
    pub fn generate(&self, vis: &syn::Visibility) -> TokenStream {
        let names = self.names();
        let functions = self.overloads.iter().zip(names).map(|(overload, name)| {
            let params = &overload.params;
            let assignments = &overload.assignments;
            quote! {
                #[allow(clippy::too_many_arguments)]
                #vis fn #name(#(#params),*) -> Self {
                    Self {
                        #(#assignments,)*
                    }
                }
            }
        });
        quote!(#(#functions)*)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::validate::AttributeRegistry;
    use crate::attr::DeclKind;
    use crate::diag::Diagnostics;
    use proptest::prelude::*;

    fn field(name: &str) -> FieldDescriptor {
        let item: syn::ItemStruct = syn::parse_str(&format!("struct S {{ {}: u32 }}", name)).unwrap();
        let mut diagnostics = Diagnostics::new();
        let (_, mut fields) = FieldDescriptor::extract(
            &item.fields,
            DeclKind::Field,
            &AttributeRegistry::standard(),
            &mut diagnostics,
        );
        fields.remove(0)
    }

    #[test]
    fn test_overload_names() {
        let mut generator = MemberwiseInitGenerator::new();
        generator.add(&field("id"), Initialization::Required);
        generator.add(&field("likes"), Initialization::Optional(quote!(0)));
        generator.add(&field("views"), Initialization::Optional(quote!(0)));
        generator.add(&field("version"), Initialization::Ignored(quote!(1)));
        let names: Vec<_> = generator.names().iter().map(Ident::to_string).collect();
        assert_eq!(
            names,
            vec!["new", "new_with_likes", "new_with_views", "new_with_likes_and_views"]
        );
        let generated = generator.generate(&syn::Visibility::Inherited).to_string();
        assert!(generated.contains("fn new (id : u32) -> Self"));
        assert!(generated.contains("version : 1"));
    }

    #[test]
    fn test_clashing_names_use_positions() {
        let mut generator = MemberwiseInitGenerator::new();
        for name in ["a", "b", "a_and_b"] {
            generator.add(&field(name), Initialization::Optional(quote!(0)));
        }
        let names: Vec<_> = generator.names().iter().map(Ident::to_string).collect();
        assert_eq!(
            names,
            vec![
                "new",
                "new_with_0",
                "new_with_1",
                "new_with_0_and_1",
                "new_with_2",
                "new_with_0_and_2",
                "new_with_1_and_2",
                "new_with_0_and_1_and_2",
            ]
        );
        let generated = generator.generate(&syn::Visibility::Inherited).to_string();
        assert!(generated.contains("fn new_with_0_and_1 (a : u32 , b : u32) -> Self"));
        assert!(!generated.contains("new_with_a_and_b"));
    }

    proptest! {
        #[test]
        fn test_overload_count(kinds in proptest::collection::vec(0u8..3, 0..7)) {
            let mut generator = MemberwiseInitGenerator::new();
            let mut optional = 0;
            let mut required = 0;
            for (idx, kind) in kinds.iter().enumerate() {
                let field = field(&format!("f{}", idx));
                let requirement = match kind {
                    0 => { required += 1; Initialization::Required }
                    1 => { optional += 1; Initialization::Optional(quote!(0)) }
                    _ => Initialization::Ignored(quote!(0)),
                };
                generator.add(&field, requirement);
            }
            prop_assert_eq!(generator.overloads.len(), 1usize << optional);
            let names: HashSet<_> = generator.names().iter().map(Ident::to_string).collect();
            prop_assert_eq!(names.len(), generator.overloads.len());
            for overload in &generator.overloads {
                prop_assert_eq!(overload.params.len(), required + overload.optional.len());
                prop_assert_eq!(overload.assignments.len(), kinds.len());
            }
        }
    }
}
