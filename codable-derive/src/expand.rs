//! Entry points of the derives.
//!
//! Expansion never fails as a whole: every problem is recorded as a
//! diagnostic and the offending attribute is dropped, so the impls are
//! emitted next to the errors.
use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;
use syn::spanned::Spanned;

use crate::attr::syntax::AttachedAttrs;
use crate::attr::validate::AttributeRegistry;
use crate::attr::DeclKind;
use crate::bound::where_clause_with_bound;
use crate::diag::{ids, Diagnostic, Diagnostics};
use crate::emit::init::MemberwiseInitGenerator;
use crate::emit::{decode, encode, keys};
use crate::enums::{check_duplicate_tags, Case, TagStrategy};
use crate::keys::{Directions, KeyRegistry, Scope, Slot};
use crate::model::{ContainerAttrs, FieldDescriptor, Shape};
use crate::registration::{Pipeline, Registration};

/// The generated items together with the diagnostics of one expansion.
pub struct Expansion {
    pub tokens: TokenStream,
    pub diagnostics: Diagnostics,
}

impl Expansion {
    pub fn into_token_stream(self) -> TokenStream {
        let mut tokens = self.tokens;
        tokens.extend(self.diagnostics.to_compile_errors());
        tokens
    }
}

pub enum Body {
    Struct {
        shape: Shape,
        fields: Vec<Registration>,
    },
    Enum {
        strategy: TagStrategy,
        cases: Vec<Case>,
    },
}

/// Everything the emitters need to know about a type.
pub struct TypeModel {
    pub ident: Ident,
    pub vis: syn::Visibility,
    pub generics: syn::Generics,
    pub registry: KeyRegistry,
    pub body: Body,
}

fn register_field(
    registry: &mut KeyRegistry,
    registration: &Registration,
    case: Option<&Case>,
    diagnostics: &mut Diagnostics,
) {
    let variable = &registration.variable;
    let directions = Directions {
        decode: variable.decodable(),
        encode: variable.encodable(),
    };
    if !directions.decode && !directions.encode {
        return;
    }
    let field = &registration.field;
    let (label, scope) = match case {
        Some(case) => (
            format!("field `{}` of variant `{}`", field.name, case.ident),
            Scope::Case(case.index),
        ),
        None => (format!("field `{}`", field.name), Scope::Always),
    };
    registry.register(
        &registration.path,
        &registration.aliases,
        Slot::Field {
            case: case.map(|case| case.index),
            field: field.index,
        },
        label,
        scope,
        directions,
        field.span,
        diagnostics,
    );
}

fn run_pipeline(
    pipeline: &Pipeline,
    shape: Shape,
    descriptors: Vec<FieldDescriptor>,
    container: &ContainerAttrs,
    diagnostics: &mut Diagnostics,
) -> Vec<Registration> {
    let sole_unnamed = shape == Shape::Unnamed && descriptors.len() == 1;
    descriptors
        .into_iter()
        .map(|field| pipeline.run(field, container, sole_unnamed, diagnostics))
        .collect()
}

impl TypeModel {
    /// Builds the model of a type, reporting every problem to `diagnostics`.
    ///
    /// Returns `None` only for declarations that cannot be coded at all.
    pub fn build(input: &syn::DeriveInput, diagnostics: &mut Diagnostics) -> Option<TypeModel> {
        let attributes = AttributeRegistry::standard();
        let decl = match input.data {
            syn::Data::Struct(_) => DeclKind::Struct,
            syn::Data::Enum(_) => DeclKind::Enum,
            syn::Data::Union(ref data) => {
                diagnostics.emit(Diagnostic::new(
                    ids::UNSUPPORTED_TYPE,
                    data.union_token.span(),
                    "unions cannot be coded",
                ));
                return None;
            }
        };
        let raw = AttachedAttrs::collect(&input.attrs, diagnostics);
        let attrs = attributes.validate(&raw, decl, diagnostics);
        let container = ContainerAttrs::parse(&attrs, diagnostics);
        let mut registry = KeyRegistry::new();

        let body = match input.data {
            syn::Data::Struct(ref data) => {
                let (shape, descriptors) =
                    FieldDescriptor::extract(&data.fields, DeclKind::Field, &attributes, diagnostics);
                let fields = run_pipeline(
                    &Pipeline::for_struct(),
                    shape,
                    descriptors,
                    &container,
                    diagnostics,
                );
                for registration in &fields {
                    register_field(&mut registry, registration, None, diagnostics);
                }
                Body::Struct { shape, fields }
            }
            syn::Data::Enum(ref data) => {
                let strategy = TagStrategy::resolve(&container, diagnostics);
                let pipeline = Pipeline::for_variant();
                let mut cases = Vec::new();
                for (index, variant) in data.variants.iter().enumerate() {
                    let raw = AttachedAttrs::collect(&variant.attrs, diagnostics);
                    let attrs = attributes.validate(&raw, DeclKind::Variant, diagnostics);
                    let (shape, descriptors) = FieldDescriptor::extract(
                        &variant.fields,
                        DeclKind::VariantField,
                        &attributes,
                        diagnostics,
                    );
                    let mut case = Case::new(variant, index, shape, &attrs, &container, diagnostics);
                    case.fields = run_pipeline(&pipeline, shape, descriptors, &container, diagnostics);
                    cases.push(case);
                }
                if strategy != TagStrategy::Untagged {
                    check_duplicate_tags(&mut cases, diagnostics);
                }

                match strategy {
                    TagStrategy::External => {
                        for case in cases.iter().filter(|case| !case.ignored) {
                            for tag in &case.tags {
                                registry.add_key(tag);
                            }
                        }
                    }
                    TagStrategy::Internal { ref tag } => {
                        let span = container
                            .tag
                            .as_ref()
                            .map_or_else(Span::call_site, |tag| tag.span);
                        registry.register(
                            tag,
                            &[],
                            Slot::Tag,
                            "the enum tag".into(),
                            Scope::Always,
                            Directions::BOTH,
                            span,
                            diagnostics,
                        );
                    }
                    TagStrategy::Adjacent {
                        ref tag,
                        ref content,
                    } => {
                        for segment in tag.iter().chain(content) {
                            registry.add_key(segment);
                        }
                    }
                    TagStrategy::Untagged => {}
                }
                for case in cases.iter().filter(|case| !case.ignored) {
                    for registration in &case.fields {
                        register_field(&mut registry, registration, Some(case), diagnostics);
                    }
                }
                Body::Enum { strategy, cases }
            }
            syn::Data::Union(_) => return None,
        };

        Some(TypeModel {
            ident: input.ident.clone(),
            vis: input.vis.clone(),
            generics: input.generics.clone(),
            registry,
            body,
        })
    }

    pub fn decode_body(&self) -> TokenStream {
        match self.body {
            Body::Struct { shape, ref fields } => decode::struct_body(&self.registry, shape, fields),
            Body::Enum {
                ref strategy,
                ref cases,
            } => decode::enum_body(&self.registry, strategy, cases),
        }
    }

    pub fn encode_body(&self) -> TokenStream {
        match self.body {
            Body::Struct { ref fields, .. } => encode::struct_body(&self.registry, fields),
            Body::Enum {
                ref strategy,
                ref cases,
            } => encode::enum_body(&self.registry, strategy, cases),
        }
    }

    fn decode_impl(&self) -> TokenStream {
        let ident = &self.ident;
        let (impl_generics, ty_generics, _) = self.generics.split_for_impl();
        let where_clause = where_clause_with_bound(&self.generics, quote!(::codable::Decode));
        let keys = keys::declare(&self.registry);
        let body = self.decode_body();
        quote! {
            const _: () = {
                #keys

                impl #impl_generics ::codable::Decode for #ident #ty_generics #where_clause {
                    #[allow(unused_variables, clippy::redundant_closure_call)]
                    fn decode(
                        __decoder: &::codable::Decoder<'_>,
                    ) -> ::codable::__derive::Result<Self, ::codable::Error> {
                        #body
                    }
                }
            };
        }
    }

    fn encode_impl(&self) -> TokenStream {
        let ident = &self.ident;
        let (impl_generics, ty_generics, _) = self.generics.split_for_impl();
        let where_clause = where_clause_with_bound(&self.generics, quote!(::codable::Encode));
        let keys = keys::declare(&self.registry);
        let body = self.encode_body();
        quote! {
            const _: () = {
                #keys

                impl #impl_generics ::codable::Encode for #ident #ty_generics #where_clause {
                    #[allow(unused_variables)]
                    fn encode(
                        &self,
                        __encoder: &mut ::codable::Encoder<'_>,
                    ) -> ::codable::__derive::Result<(), ::codable::Error> {
                        #body
                    }
                }
            };
        }
    }

    fn member_init_impl(&self, fields: &[Registration]) -> TokenStream {
        let ident = &self.ident;
        let (impl_generics, ty_generics, where_clause) = self.generics.split_for_impl();
        let mut generator = MemberwiseInitGenerator::new();
        for registration in fields {
            generator.add(&registration.field, registration.variable.initialization());
        }
        let functions = generator.generate(&self.vis);
        quote! {
            impl #impl_generics #ident #ty_generics #where_clause {
                #functions
            }
        }
    }
}

fn expand<F>(input: &syn::DeriveInput, generate: F) -> Expansion
where
    F: FnOnce(&TypeModel, &mut Diagnostics) -> TokenStream,
{
    let mut diagnostics = Diagnostics::new();
    let tokens = match TypeModel::build(input, &mut diagnostics) {
        Some(model) => generate(&model, &mut diagnostics),
        None => TokenStream::new(),
    };
    Expansion {
        tokens,
        diagnostics,
    }
}

pub fn derive_decode(input: &syn::DeriveInput) -> Expansion {
    expand(input, |model, _| model.decode_impl())
}

pub fn derive_encode(input: &syn::DeriveInput) -> Expansion {
    expand(input, |model, _| model.encode_impl())
}

pub fn derive_member_init(input: &syn::DeriveInput) -> Expansion {
    expand(input, |model, diagnostics| match model.body {
        Body::Struct { ref fields, .. } => model.member_init_impl(fields),
        Body::Enum { .. } => {
            diagnostics.emit(Diagnostic::new(
                ids::UNSUPPORTED_TYPE,
                model.ident.span(),
                "`MemberInit` can only be derived for structs",
            ));
            TokenStream::new()
        }
    })
}
