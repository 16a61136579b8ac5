//! Typed attribute kinds.
//!
//! Every kind knows the names it is spelled with and how to turn raw
//! arguments into a typed value.  `try_parse` returns `None` when the
//! attribute is absent; argument errors are reported and also yield `None`
//! so that the declaration falls back to its undecorated behavior.
use proc_macro2::{Span, TokenStream};
use quote::{quote, ToTokens};

use crate::attr::syntax::{string_lit, AttachedAttrs, AttrArgs, RawAttr};
use crate::diag::{ids, Diagnostic, Diagnostics};
use crate::keys::case::KeyStrategy;

pub trait AttributeKind: Sized {
    /// The spellings of this attribute.
    const NAMES: &'static [&'static str];

    fn from_raw(raw: &RawAttr) -> Result<Self, Diagnostic>;

    fn try_parse(attrs: &AttachedAttrs, diagnostics: &mut Diagnostics) -> Option<Self> {
        let raw = attrs.find(Self::NAMES)?;
        match Self::from_raw(raw) {
            Ok(value) => Some(value),
            Err(diagnostic) => {
                diagnostics.emit(diagnostic);
                None
            }
        }
    }
}

fn single_string(raw: &RawAttr) -> Result<String, Diagnostic> {
    match raw.args {
        AttrArgs::Value(ref expr) => string_lit(&raw.name, expr),
        _ => Err(Diagnostic::new(
            ids::MALFORMED_ATTRIBUTE,
            raw.span,
            format!("`{}` expects `{} = \"...\"`", raw.name, raw.name),
        )),
    }
}

fn single_expr(raw: &RawAttr) -> Result<syn::Expr, Diagnostic> {
    match raw.args {
        AttrArgs::Value(ref expr) => Ok(expr.clone()),
        _ => Err(Diagnostic::new(
            ids::MALFORMED_ATTRIBUTE,
            raw.span,
            format!("`{}` expects `{} = <expr>`", raw.name, raw.name),
        )),
    }
}

/// `at(...)` or `rename = "..."`: the exact key path of a field.
#[derive(Debug, Clone)]
pub struct CodedAt {
    pub path: Vec<String>,
}

impl AttributeKind for CodedAt {
    const NAMES: &'static [&'static str] = &["at", "rename"];

    fn from_raw(raw: &RawAttr) -> Result<Self, Diagnostic> {
        let path = if raw.name == "rename" {
            vec![single_string(raw)?]
        } else {
            raw.strings()?
        };
        Ok(CodedAt { path })
    }
}

/// `coded_in(...)`: a path prefix the field's own key is appended to.
#[derive(Debug, Clone)]
pub struct CodedIn {
    pub prefix: Vec<String>,
}

impl AttributeKind for CodedIn {
    const NAMES: &'static [&'static str] = &["coded_in"];

    fn from_raw(raw: &RawAttr) -> Result<Self, Diagnostic> {
        Ok(CodedIn {
            prefix: raw.strings()?,
        })
    }
}

/// `alias = "..."` / `alias("a", "b")`: alternate keys accepted on decode.
///
/// Unlike the other kinds every occurrence contributes.
#[derive(Debug, Clone, Default)]
pub struct Aliases {
    pub keys: Vec<String>,
}

impl AttributeKind for Aliases {
    const NAMES: &'static [&'static str] = &["alias"];

    fn from_raw(raw: &RawAttr) -> Result<Self, Diagnostic> {
        Ok(Aliases {
            keys: raw.strings()?,
        })
    }

    fn try_parse(attrs: &AttachedAttrs, diagnostics: &mut Diagnostics) -> Option<Self> {
        let mut rv: Option<Aliases> = None;
        for raw in attrs.iter().filter(|raw| Self::NAMES.contains(&raw.name.as_str())) {
            match Self::from_raw(raw) {
                Ok(aliases) => rv.get_or_insert_with(Aliases::default).keys.extend(aliases.keys),
                Err(diagnostic) => diagnostics.emit(diagnostic),
            }
        }
        rv
    }
}

/// `by = <expr>`: the helper coder of a field.
#[derive(Debug, Clone)]
pub struct CodedBy {
    pub coder: syn::Expr,
}

impl AttributeKind for CodedBy {
    const NAMES: &'static [&'static str] = &["by"];

    fn from_raw(raw: &RawAttr) -> Result<Self, Diagnostic> {
        Ok(CodedBy {
            coder: single_expr(raw)?,
        })
    }
}

/// When a default value replaces the decoded one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultMode {
    /// The key is absent or null.
    IfMissing,
    /// Decoding failed for any reason.
    IfError,
}

/// `default[= expr]` / `default_if_missing[= expr]`.
#[derive(Debug, Clone)]
pub struct DefaultValue {
    pub value: TokenStream,
    pub mode: DefaultMode,
}

impl AttributeKind for DefaultValue {
    const NAMES: &'static [&'static str] = &["default", "default_if_missing"];

    fn from_raw(raw: &RawAttr) -> Result<Self, Diagnostic> {
        let mode = if raw.name == "default" {
            DefaultMode::IfError
        } else {
            DefaultMode::IfMissing
        };
        let value = match raw.args {
            AttrArgs::Flag => quote!(::codable::__derive::Default::default()),
            AttrArgs::Value(ref expr) => expr.to_token_stream(),
            AttrArgs::List(_) => {
                return Err(Diagnostic::new(
                    ids::MALFORMED_ATTRIBUTE,
                    raw.span,
                    format!("`{}` expects no argument or `{} = <expr>`", raw.name, raw.name),
                ))
            }
        };
        Ok(DefaultValue { value, mode })
    }
}

/// `ignore`: the field or variant takes no part in coding.
#[derive(Debug, Clone, Copy)]
pub struct Ignore;

impl AttributeKind for Ignore {
    const NAMES: &'static [&'static str] = &["ignore"];

    fn from_raw(_raw: &RawAttr) -> Result<Self, Diagnostic> {
        Ok(Ignore)
    }
}

/// `ignore_decoding`
#[derive(Debug, Clone, Copy)]
pub struct IgnoreDecoding;

impl AttributeKind for IgnoreDecoding {
    const NAMES: &'static [&'static str] = &["ignore_decoding"];

    fn from_raw(_raw: &RawAttr) -> Result<Self, Diagnostic> {
        Ok(IgnoreDecoding)
    }
}

/// `ignore_encoding` or `ignore_encoding_if = path`.
#[derive(Debug, Clone)]
pub struct IgnoreEncoding {
    /// A predicate called with a reference to the value; encoding is
    /// skipped when it returns `true`.
    pub condition: Option<syn::Expr>,
}

impl AttributeKind for IgnoreEncoding {
    const NAMES: &'static [&'static str] = &["ignore_encoding", "ignore_encoding_if"];

    fn from_raw(raw: &RawAttr) -> Result<Self, Diagnostic> {
        if raw.name == "ignore_encoding" {
            Ok(IgnoreEncoding { condition: None })
        } else {
            Ok(IgnoreEncoding {
                condition: Some(single_expr(raw)?),
            })
        }
    }
}

/// `initial = expr` (mutable) or `constant = expr` (immutable).
#[derive(Debug, Clone)]
pub struct InitialValue {
    pub value: syn::Expr,
    pub mutable: bool,
}

impl AttributeKind for InitialValue {
    const NAMES: &'static [&'static str] = &["initial", "constant"];

    fn from_raw(raw: &RawAttr) -> Result<Self, Diagnostic> {
        Ok(InitialValue {
            value: single_expr(raw)?,
            mutable: raw.name == "initial",
        })
    }
}

/// `rename_all = "..."`
#[derive(Debug, Clone, Copy)]
pub struct RenameAll(pub KeyStrategy);

impl AttributeKind for RenameAll {
    const NAMES: &'static [&'static str] = &["rename_all"];

    fn from_raw(raw: &RawAttr) -> Result<Self, Diagnostic> {
        let name = single_string(raw)?;
        match KeyStrategy::from_name(&name) {
            Some(strategy) => Ok(RenameAll(strategy)),
            None => Err(Diagnostic::new(
                ids::MALFORMED_ATTRIBUTE,
                raw.span,
                format!(
                    "unknown key strategy `{}`, expected one of {}",
                    name,
                    KeyStrategy::NAMES.join(", ")
                ),
            )),
        }
    }
}

/// `ignore_initialized`
#[derive(Debug, Clone, Copy)]
pub struct IgnoreInitialized;

impl AttributeKind for IgnoreInitialized {
    const NAMES: &'static [&'static str] = &["ignore_initialized"];

    fn from_raw(_raw: &RawAttr) -> Result<Self, Diagnostic> {
        Ok(IgnoreInitialized)
    }
}

/// `tag = "..."` / `tag(...)` or `content = "..."` / `content(...)`.
#[derive(Debug, Clone)]
pub struct PathArg {
    pub path: Vec<String>,
    pub span: Span,
}

impl PathArg {
    fn from_raw(raw: &RawAttr) -> Result<PathArg, Diagnostic> {
        let path = raw.strings()?;
        if path.is_empty() {
            return Err(Diagnostic::new(
                ids::WRONG_ARITY,
                raw.span,
                format!("`{}` needs at least one key", raw.name),
            ));
        }
        Ok(PathArg {
            path,
            span: raw.span,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Tag(pub PathArg);

impl AttributeKind for Tag {
    const NAMES: &'static [&'static str] = &["tag"];

    fn from_raw(raw: &RawAttr) -> Result<Self, Diagnostic> {
        PathArg::from_raw(raw).map(Tag)
    }
}

#[derive(Debug, Clone)]
pub struct Content(pub PathArg);

impl AttributeKind for Content {
    const NAMES: &'static [&'static str] = &["content"];

    fn from_raw(raw: &RawAttr) -> Result<Self, Diagnostic> {
        PathArg::from_raw(raw).map(Content)
    }
}

/// `untagged`
#[derive(Debug, Clone, Copy)]
pub struct Untagged;

impl AttributeKind for Untagged {
    const NAMES: &'static [&'static str] = &["untagged"];

    fn from_raw(_raw: &RawAttr) -> Result<Self, Diagnostic> {
        Ok(Untagged)
    }
}
