//! Raw `#[codable(...)]` arguments as written in source.
use proc_macro2::Span;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Expr, Token};

use crate::diag::{ids, Diagnostic, Diagnostics};

/// The shape of the arguments an attribute was written with.
#[derive(Debug, Clone)]
pub enum AttrArgs {
    /// `name`
    Flag,
    /// `name = expr`
    Value(Expr),
    /// `name(a, b, ...)`
    List(Vec<Expr>),
}

impl AttrArgs {
    pub fn describe(&self) -> &'static str {
        match self {
            AttrArgs::Flag => "a bare flag",
            AttrArgs::Value(_) => "`name = value`",
            AttrArgs::List(_) => "an argument list",
        }
    }
}

/// One attribute inside a `#[codable(...)]` list.
#[derive(Debug, Clone)]
pub struct RawAttr {
    pub name: String,
    pub span: Span,
    pub args: AttrArgs,
}

impl RawAttr {
    /// Number of arguments (a flag has none, a value has one).
    pub fn arity(&self) -> usize {
        match self.args {
            AttrArgs::Flag => 0,
            AttrArgs::Value(_) => 1,
            AttrArgs::List(ref items) => items.len(),
        }
    }

    /// The arguments as a list of expressions regardless of the form used.
    pub fn exprs(&self) -> &[Expr] {
        match self.args {
            AttrArgs::Flag => &[],
            AttrArgs::Value(ref expr) => std::slice::from_ref(expr),
            AttrArgs::List(ref items) => items,
        }
    }

    /// Reads every argument as a string literal.
    pub fn strings(&self) -> Result<Vec<String>, Diagnostic> {
        self.exprs().iter().map(|expr| string_lit(&self.name, expr)).collect()
    }
}

/// Extracts a string literal argument.
pub fn string_lit(attr: &str, expr: &Expr) -> Result<String, Diagnostic> {
    match expr {
        Expr::Lit(syn::ExprLit {
            lit: syn::Lit::Str(lit),
            ..
        }) => Ok(lit.value()),
        other => Err(Diagnostic::new(
            ids::MALFORMED_ATTRIBUTE,
            other.span(),
            format!("`{}` expects string literals", attr),
        )),
    }
}

/// All `codable` attributes attached to one declaration, in source order.
#[derive(Debug, Clone, Default)]
pub struct AttachedAttrs {
    items: Vec<RawAttr>,
}

impl AttachedAttrs {
    /// Collects the `#[codable(...)]` attributes of a declaration.
    ///
    /// An attribute list that does not parse is reported and skipped as a
    /// whole; everything else is kept for validation.
    pub fn collect(attrs: &[syn::Attribute], diagnostics: &mut Diagnostics) -> AttachedAttrs {
        let mut items = Vec::new();
        for attr in attrs {
            if !attr.path().is_ident("codable") {
                continue;
            }
            let mut parsed = Vec::new();
            let result = attr.parse_nested_meta(|meta| {
                let name = match meta.path.get_ident() {
                    Some(ident) => ident.to_string(),
                    None => return Err(meta.error("expected an attribute name")),
                };
                let span = meta.path.span();
                let args = if meta.input.peek(Token![=]) {
                    AttrArgs::Value(meta.value()?.parse()?)
                } else if meta.input.peek(syn::token::Paren) {
                    let content;
                    syn::parenthesized!(content in meta.input);
                    let list = Punctuated::<Expr, Token![,]>::parse_terminated(&content)?;
                    AttrArgs::List(list.into_iter().collect())
                } else {
                    AttrArgs::Flag
                };
                parsed.push(RawAttr { name, span, args });
                Ok(())
            });
            match result {
                Ok(()) => items.extend(parsed),
                Err(err) => diagnostics.emit(Diagnostic::new(
                    ids::MALFORMED_ATTRIBUTE,
                    err.span(),
                    format!("malformed `codable` attribute: {}", err),
                )),
            }
        }
        AttachedAttrs { items }
    }

    pub fn from_items(items: Vec<RawAttr>) -> AttachedAttrs {
        AttachedAttrs { items }
    }

    pub fn iter(&self) -> impl Iterator<Item = &RawAttr> {
        self.items.iter()
    }

    /// Returns the first attribute with one of the given names.
    pub fn find(&self, names: &[&str]) -> Option<&RawAttr> {
        self.items.iter().find(|attr| names.contains(&attr.name.as_str()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.items.iter().any(|attr| attr.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_forms() {
        let attrs: Vec<syn::Attribute> = syn::parse_quote! {
            #[codable(at("data", "id"), default = 42, ignore_encoding)]
            #[serde(skip)]
        };
        let mut diagnostics = Diagnostics::new();
        let attrs = AttachedAttrs::collect(&attrs, &mut diagnostics);
        assert!(diagnostics.is_empty());
        let names: Vec<_> = attrs.iter().map(|attr| attr.name.as_str()).collect();
        assert_eq!(names, vec!["at", "default", "ignore_encoding"]);
        let at = attrs.find(&["at"]).unwrap();
        assert_eq!(at.strings().unwrap(), vec!["data", "id"]);
        assert_eq!(attrs.find(&["default"]).unwrap().arity(), 1);
        assert!(matches!(attrs.find(&["ignore_encoding"]).unwrap().args, AttrArgs::Flag));
    }

    #[test]
    fn test_malformed_list_is_reported() {
        let attrs: Vec<syn::Attribute> = syn::parse_quote! {
            #[codable(default = )]
            #[codable(rename = "x")]
        };
        let mut diagnostics = Diagnostics::new();
        let attrs = AttachedAttrs::collect(&attrs, &mut diagnostics);
        assert_eq!(diagnostics.count(ids::MALFORMED_ATTRIBUTE), 1);
        assert!(attrs.has("rename"));
        assert!(!attrs.has("default"));
    }
}
