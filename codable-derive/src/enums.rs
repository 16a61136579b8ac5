//! Enum discriminator resolution.
use proc_macro2::{Ident, Span};
use syn::ext::IdentExt;
use syn::spanned::Spanned;

use crate::attr::kinds::{Aliases, AttributeKind, CodedAt, Ignore};
use crate::attr::syntax::AttachedAttrs;
use crate::diag::{ids, Diagnostic, Diagnostics};
use crate::model::{ContainerAttrs, Shape};
use crate::registration::Registration;

/// How the active case of an enum is identified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagStrategy {
    /// `{"case": content}`
    External,
    /// `{"tag": "case", ...content}`
    Internal { tag: Vec<String> },
    /// `{"tag": "case", "content": content}`
    Adjacent { tag: Vec<String>, content: Vec<String> },
    /// No discriminator, the first case that decodes wins.
    Untagged,
}

impl TagStrategy {
    /// Picks the strategy from the container attributes.
    ///
    /// `tag` selects internal tagging, `tag` with `content` adjacent tagging.
    /// An enum with neither `tag` nor `untagged` is externally tagged, not
    /// untagged: untagged coding is only used when asked for.
    pub fn resolve(container: &ContainerAttrs, diagnostics: &mut Diagnostics) -> TagStrategy {
        match (&container.tag, &container.content) {
            (Some(tag), Some(content)) => {
                let (a, b) = (&tag.path, &content.path);
                let shorter = a.len().min(b.len());
                if a[..shorter] == b[..shorter] {
                    diagnostics.emit(Diagnostic::new(
                        ids::DUPLICATE_KEY_PATH,
                        content.span,
                        format!(
                            "content path `{}` overlaps with tag path `{}`",
                            b.join("."),
                            a.join(".")
                        ),
                    ));
                    return TagStrategy::Internal { tag: a.clone() };
                }
                TagStrategy::Adjacent {
                    tag: a.clone(),
                    content: b.clone(),
                }
            }
            (Some(tag), None) => TagStrategy::Internal {
                tag: tag.path.clone(),
            },
            (None, _) if container.untagged => TagStrategy::Untagged,
            (None, _) => TagStrategy::External,
        }
    }
}

/// One enum variant.
pub struct Case {
    pub ident: Ident,
    pub index: usize,
    pub shape: Shape,
    /// The discriminator values, the first one is used for encoding.
    pub tags: Vec<String>,
    /// Ignored cases are never decoded and cannot be encoded.
    pub ignored: bool,
    pub fields: Vec<Registration>,
    pub span: Span,
}

impl Case {
    pub fn new(
        variant: &syn::Variant,
        index: usize,
        shape: Shape,
        attrs: &AttachedAttrs,
        container: &ContainerAttrs,
        diagnostics: &mut Diagnostics,
    ) -> Case {
        let name = variant.ident.unraw().to_string();
        let primary = match CodedAt::try_parse(attrs, diagnostics) {
            Some(renamed) => renamed.path.join("."),
            None => container.rename_all.apply(&name),
        };
        let mut tags = vec![primary];
        if let Some(aliases) = Aliases::try_parse(attrs, diagnostics) {
            for alias in aliases.keys {
                if !tags.contains(&alias) {
                    tags.push(alias);
                }
            }
        }
        Case {
            ident: variant.ident.clone(),
            index,
            shape,
            tags,
            ignored: Ignore::try_parse(attrs, diagnostics).is_some(),
            fields: Vec::new(),
            span: variant.span(),
        }
    }

    pub fn primary_tag(&self) -> String {
        match self.tags.first() {
            Some(tag) => tag.clone(),
            None => self.ident.unraw().to_string(),
        }
    }

    /// Returns `true` if the case carries associated values.
    pub fn has_fields(&self) -> bool {
        !self.fields.is_empty()
    }
}

/// Reports discriminator values claimed by more than one case.
///
/// The first case keeps the value, later cases lose it.
pub fn check_duplicate_tags(cases: &mut [Case], diagnostics: &mut Diagnostics) {
    let mut seen: Vec<(String, Ident)> = Vec::new();
    for case in cases.iter_mut().filter(|case| !case.ignored) {
        let mut kept = Vec::new();
        for tag in case.tags.drain(..) {
            match seen.iter().find(|(other, _)| *other == tag) {
                Some((_, owner)) => diagnostics.emit(Diagnostic::new(
                    ids::DUPLICATE_TAG_VALUE,
                    case.span,
                    format!(
                        "variant `{}` uses the tag value \"{}\" which is already used by `{}`",
                        case.ident, tag, owner
                    ),
                )),
                None => {
                    seen.push((tag.clone(), case.ident.clone()));
                    kept.push(tag);
                }
            }
        }
        case.tags = kept;
    }
}
