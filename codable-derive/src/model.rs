//! The declaration model the rest of the engine works on.
use proc_macro2::{Ident, Span};
use quote::format_ident;
use syn::ext::IdentExt;
use syn::spanned::Spanned;

use crate::attr::kinds::{
    AttributeKind, Content, IgnoreInitialized, InitialValue, PathArg, RenameAll, Tag, Untagged,
};
use crate::attr::syntax::AttachedAttrs;
use crate::attr::validate::AttributeRegistry;
use crate::attr::DeclKind;
use crate::diag::Diagnostics;
use crate::keys::case::KeyStrategy;

/// The shape of a struct or enum variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Named,
    Unnamed,
    Unit,
}

/// One member of a struct or enum variant as declared in source.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub index: usize,
    pub member: syn::Member,
    /// The local the field is decoded into or bound to while encoding.
    pub binding: Ident,
    /// The declared name (the index for tuple members).
    pub name: String,
    pub ty: syn::Type,
    pub initial: Option<syn::Expr>,
    pub mutable: bool,
    /// The validated `codable` attributes of the field.
    pub attrs: AttachedAttrs,
    pub span: Span,
}

impl FieldDescriptor {
    /// Returns `true` for a field that always keeps its initial value.
    pub fn is_constant(&self) -> bool {
        self.initial.is_some() && !self.mutable
    }

    pub fn is_named(&self) -> bool {
        matches!(self.member, syn::Member::Named(_))
    }

    /// Extracts the descriptors of all members.
    pub fn extract(
        fields: &syn::Fields,
        decl: DeclKind,
        registry: &AttributeRegistry,
        diagnostics: &mut Diagnostics,
    ) -> (Shape, Vec<FieldDescriptor>) {
        let shape = match fields {
            syn::Fields::Named(_) => Shape::Named,
            syn::Fields::Unnamed(_) => Shape::Unnamed,
            syn::Fields::Unit => Shape::Unit,
        };
        let descriptors = fields
            .iter()
            .enumerate()
            .map(|(index, field)| {
                let raw = AttachedAttrs::collect(&field.attrs, diagnostics);
                let attrs = registry.validate(&raw, decl, diagnostics);
                let (member, name) = match field.ident {
                    Some(ref ident) => (syn::Member::Named(ident.clone()), ident.unraw().to_string()),
                    None => (syn::Member::Unnamed(index.into()), index.to_string()),
                };
                let initial = InitialValue::try_parse(&attrs, diagnostics);
                FieldDescriptor {
                    index,
                    member,
                    binding: format_ident!("__field_{}", name),
                    name,
                    ty: field.ty.clone(),
                    mutable: initial.as_ref().map_or(true, |initial| initial.mutable),
                    initial: initial.map(|initial| initial.value),
                    attrs,
                    span: field.span(),
                }
            })
            .collect();
        (shape, descriptors)
    }
}

/// The container level configuration of a struct or enum.
#[derive(Debug, Clone, Default)]
pub struct ContainerAttrs {
    pub rename_all: KeyStrategy,
    pub ignore_initialized: bool,
    pub tag: Option<PathArg>,
    pub content: Option<PathArg>,
    pub untagged: bool,
}

impl ContainerAttrs {
    pub fn parse(attrs: &AttachedAttrs, diagnostics: &mut Diagnostics) -> ContainerAttrs {
        ContainerAttrs {
            rename_all: RenameAll::try_parse(attrs, diagnostics)
                .map(|RenameAll(strategy)| strategy)
                .unwrap_or_default(),
            ignore_initialized: IgnoreInitialized::try_parse(attrs, diagnostics).is_some(),
            tag: Tag::try_parse(attrs, diagnostics).map(|Tag(path)| path),
            content: Content::try_parse(attrs, diagnostics).map(|Content(path)| path),
            untagged: Untagged::try_parse(attrs, diagnostics).is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract() {
        let item: syn::ItemStruct = syn::parse_quote! {
            struct Post {
                r#type: String,
                #[codable(constant = 1)]
                version: u32,
                #[codable(initial = 0)]
                views: u32,
            }
        };
        let mut diagnostics = Diagnostics::new();
        let (shape, fields) = FieldDescriptor::extract(
            &item.fields,
            DeclKind::Field,
            &AttributeRegistry::standard(),
            &mut diagnostics,
        );
        assert!(diagnostics.is_empty());
        assert_eq!(shape, Shape::Named);
        assert_eq!(fields[0].name, "type");
        assert_eq!(fields[0].binding.to_string(), "__field_type");
        assert!(fields[1].is_constant());
        assert!(fields[2].initial.is_some() && fields[2].mutable);
    }

    #[test]
    fn test_tuple_members() {
        let item: syn::ItemStruct = syn::parse_quote!(struct Pair(u8, String););
        let mut diagnostics = Diagnostics::new();
        let (shape, fields) = FieldDescriptor::extract(
            &item.fields,
            DeclKind::Field,
            &AttributeRegistry::standard(),
            &mut diagnostics,
        );
        assert_eq!(shape, Shape::Unnamed);
        assert_eq!(fields[1].name, "1");
        assert_eq!(fields[1].binding.to_string(), "__field_1");
    }
}
