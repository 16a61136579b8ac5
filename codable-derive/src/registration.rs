//! The registration pipeline.
//!
//! Every field starts out as a [`BasicVariable`] coded at its own name and
//! passes through a fixed sequence of stages.  Each stage reads the field's
//! attributes and may return an updated registration; registrations are
//! never mutated in place.
use proc_macro2::TokenStream;
use quote::quote;
use std::rc::Rc;

use crate::attr::kinds::{
    Aliases, AttributeKind, CodedAt, CodedBy, CodedIn, DefaultValue, Ignore, IgnoreDecoding,
    IgnoreEncoding,
};
use crate::diag::Diagnostics;
use crate::model::{ContainerAttrs, FieldDescriptor};
use crate::variable::{
    AnyVariable, BasicVariable, ConditionalCodingVariable, DefaultValueVariable,
    HelperCodedVariable, InitializationVariable, Variable,
};

/// Where the fields of a pipeline live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Struct,
    Variant,
}

/// A field on its way through the pipeline.
#[derive(Clone)]
pub struct Registration {
    pub field: Rc<FieldDescriptor>,
    pub path: Vec<String>,
    /// Alternate last segments accepted while decoding.
    pub aliases: Vec<String>,
    pub variable: AnyVariable,
}

impl Registration {
    fn with_variable<V: Variable + 'static>(&self, variable: V) -> Registration {
        Registration {
            variable: Rc::new(variable),
            ..self.clone()
        }
    }
}

pub struct StageContext<'a> {
    pub kind: FieldKind,
    pub container: &'a ContainerAttrs,
    /// `true` if the field is the only member of a tuple struct or variant.
    pub sole_unnamed: bool,
    pub diagnostics: &'a mut Diagnostics,
}

pub trait Stage {
    /// Returns the updated registration or `None` to keep it unchanged.
    fn build(&self, registration: &Registration, ctx: &mut StageContext<'_>) -> Option<Registration>;
}

/// Resolves the key path from `at`, `coded_in`, `rename` and `rename_all`.
pub struct KeyPathStage;

impl Stage for KeyPathStage {
    fn build(&self, registration: &Registration, ctx: &mut StageContext<'_>) -> Option<Registration> {
        let field = &registration.field;
        let aliases = Aliases::try_parse(&field.attrs, ctx.diagnostics)
            .map(|aliases| aliases.keys)
            .unwrap_or_default();

        let path = if let Some(at) = field.attrs.find(&["at"]) {
            CodedAt::from_raw(at)
                .map_err(|diagnostic| ctx.diagnostics.emit(diagnostic))
                .ok()?
                .path
        } else {
            let prefix = CodedIn::try_parse(&field.attrs, ctx.diagnostics)
                .map(|coded_in| coded_in.prefix)
                .unwrap_or_default();
            let own = match CodedAt::try_parse(&field.attrs, ctx.diagnostics) {
                Some(renamed) => renamed.path,
                None if ctx.sole_unnamed => Vec::new(),
                None if field.is_named() => vec![ctx.container.rename_all.apply(&field.name)],
                None => vec![field.name.clone()],
            };
            prefix.into_iter().chain(own).collect()
        };

        if path == registration.path && aliases.is_empty() {
            return None;
        }
        Some(Registration {
            path,
            aliases,
            ..registration.clone()
        })
    }
}

/// Routes coding through `by = <expr>`.
pub struct HelperCoderStage;

impl Stage for HelperCoderStage {
    fn build(&self, registration: &Registration, ctx: &mut StageContext<'_>) -> Option<Registration> {
        let coded_by = CodedBy::try_parse(&registration.field.attrs, ctx.diagnostics)?;
        Some(registration.with_variable(HelperCodedVariable::new(
            registration.variable.clone(),
            &coded_by.coder,
        )))
    }
}

/// Applies `default` and `default_if_missing`.
pub struct DefaultValueStage;

impl Stage for DefaultValueStage {
    fn build(&self, registration: &Registration, ctx: &mut StageContext<'_>) -> Option<Registration> {
        let default = DefaultValue::try_parse(&registration.field.attrs, ctx.diagnostics)?;
        Some(registration.with_variable(DefaultValueVariable::new(
            registration.variable.clone(),
            default.value,
            default.mode,
        )))
    }
}

/// Applies the `ignore*` attributes, constants and `ignore_initialized`.
pub struct ConditionalStage;

impl Stage for ConditionalStage {
    fn build(&self, registration: &Registration, ctx: &mut StageContext<'_>) -> Option<Registration> {
        let field = &registration.field;
        let attrs = &field.attrs;
        let ignored = Ignore::try_parse(attrs, ctx.diagnostics).is_some()
            || (ctx.kind == FieldKind::Struct
                && ctx.container.ignore_initialized
                && field.initial.is_some());
        let decode = !ignored
            && !field.is_constant()
            && IgnoreDecoding::try_parse(attrs, ctx.diagnostics).is_none();
        let ignore_encoding = IgnoreEncoding::try_parse(attrs, ctx.diagnostics);
        let encode = !ignored
            && !matches!(ignore_encoding, Some(IgnoreEncoding { condition: None }));
        let condition = ignore_encoding.and_then(|ignore| ignore.condition);

        if decode && encode && condition.is_none() {
            return None;
        }
        let mut variable =
            ConditionalCodingVariable::new(registration.variable.clone(), decode, encode);
        if let Some(ref condition) = condition {
            variable = variable.skip_encoding_if(condition);
        }
        Some(registration.with_variable(variable))
    }
}

/// Pins down the memberwise initialization requirement.
pub struct InitializationStage;

impl Stage for InitializationStage {
    fn build(&self, registration: &Registration, _ctx: &mut StageContext<'_>) -> Option<Registration> {
        let field = &registration.field;
        let constant = match field.initial {
            Some(ref value) if !field.mutable => Some(quote!(#value)),
            _ => None,
        };
        let requirement = InitializationVariable::requirement(&*registration.variable, constant);
        Some(registration.with_variable(InitializationVariable::new(
            registration.variable.clone(),
            requirement,
        )))
    }
}

/// An ordered sequence of stages.
pub struct Pipeline {
    kind: FieldKind,
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn for_struct() -> Pipeline {
        Pipeline {
            kind: FieldKind::Struct,
            stages: vec![
                Box::new(KeyPathStage),
                Box::new(HelperCoderStage),
                Box::new(DefaultValueStage),
                Box::new(ConditionalStage),
                Box::new(InitializationStage),
            ],
        }
    }

    /// Enum variant fields have no memberwise initializer.
    pub fn for_variant() -> Pipeline {
        Pipeline {
            kind: FieldKind::Variant,
            stages: vec![
                Box::new(KeyPathStage),
                Box::new(HelperCoderStage),
                Box::new(DefaultValueStage),
                Box::new(ConditionalStage),
            ],
        }
    }

    fn access(&self, field: &FieldDescriptor) -> TokenStream {
        match self.kind {
            FieldKind::Struct => {
                let member = &field.member;
                quote!(&self.#member)
            }
            FieldKind::Variant => {
                let binding = &field.binding;
                quote!(#binding)
            }
        }
    }

    pub fn run(
        &self,
        field: FieldDescriptor,
        container: &ContainerAttrs,
        sole_unnamed: bool,
        diagnostics: &mut Diagnostics,
    ) -> Registration {
        let initial = field.initial.as_ref().map(|value| quote!(#value));
        let variable = BasicVariable::new(field.binding.clone(), field.ty.clone(), self.access(&field))
            .with_value(initial);
        let start = Registration {
            path: vec![field.name.clone()],
            aliases: Vec::new(),
            variable: Rc::new(variable),
            field: Rc::new(field),
        };
        let mut ctx = StageContext {
            kind: self.kind,
            container,
            sole_unnamed,
            diagnostics,
        };
        self.stages.iter().fold(start, |registration, stage| {
            stage.build(&registration, &mut ctx).unwrap_or(registration)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::validate::AttributeRegistry;
    use crate::attr::DeclKind;
    use crate::keys::case::KeyStrategy;
    use crate::variable::Initialization;

    fn run(item: syn::ItemStruct, container: ContainerAttrs) -> Vec<Registration> {
        let mut diagnostics = Diagnostics::new();
        let (_, fields) = FieldDescriptor::extract(
            &item.fields,
            DeclKind::Field,
            &AttributeRegistry::standard(),
            &mut diagnostics,
        );
        let sole = fields.len() == 1 && fields[0].name == "0";
        let pipeline = Pipeline::for_struct();
        let rv = fields
            .into_iter()
            .map(|field| pipeline.run(field, &container, sole, &mut diagnostics))
            .collect();
        assert!(diagnostics.is_empty());
        rv
    }

    #[test]
    fn test_key_paths() {
        let regs = run(
            syn::parse_quote! {
                struct Post {
                    id: String,
                    #[codable(at("header"))]
                    post_title: String,
                    #[codable(coded_in("meta", "stats"), alias = "likeCount")]
                    like_count: u32,
                    #[codable(rename = "ID2")]
                    other_id: u32,
                    #[codable(at())]
                    extra: Extra,
                }
            },
            ContainerAttrs {
                rename_all: KeyStrategy::CamelCase,
                ..ContainerAttrs::default()
            },
        );
        let paths: Vec<_> = regs.iter().map(|r| r.path.join(".")).collect();
        assert_eq!(paths, vec!["id", "header", "meta.stats.likeCount", "ID2", ""]);
        assert_eq!(regs[2].aliases, vec!["likeCount"]);
    }

    #[test]
    fn test_newtype_is_transparent() {
        let regs = run(syn::parse_quote!(struct Id(String);), ContainerAttrs::default());
        assert!(regs[0].path.is_empty());
        let regs = run(syn::parse_quote!(struct Pair(u8, u8);), ContainerAttrs::default());
        assert_eq!(regs[1].path, vec!["1"]);
    }

    #[test]
    fn test_initialization_requirements() {
        let regs = run(
            syn::parse_quote! {
                struct Counter {
                    name: String,
                    #[codable(default)]
                    count: u32,
                    #[codable(initial = 5)]
                    step: u32,
                    #[codable(constant = 1)]
                    version: u32,
                }
            },
            ContainerAttrs::default(),
        );
        let inits: Vec<_> = regs.iter().map(|r| r.variable.initialization()).collect();
        assert!(matches!(inits[0], Initialization::Required));
        assert!(matches!(inits[1], Initialization::Optional(_)));
        assert!(matches!(inits[2], Initialization::Optional(_)));
        assert!(matches!(inits[3], Initialization::Ignored(_)));
        assert!(regs[2].variable.decodable());
        assert!(!regs[3].variable.decodable());
        assert!(regs[3].variable.encodable());
    }

    #[test]
    fn test_ignore_initialized() {
        let regs = run(
            syn::parse_quote! {
                struct Session {
                    user: String,
                    #[codable(initial = 0)]
                    retries: u32,
                }
            },
            ContainerAttrs {
                ignore_initialized: true,
                ..ContainerAttrs::default()
            },
        );
        assert!(regs[0].variable.decodable());
        assert!(!regs[1].variable.decodable());
        assert!(!regs[1].variable.encodable());
    }
}
