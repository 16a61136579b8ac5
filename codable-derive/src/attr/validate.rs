//! Attribute validation.
//!
//! Each known attribute is described by a [`Rule`] built from small
//! composable checks.  Validation runs every rule of every attribute and
//! reports all failures; attributes that fail are dropped so the rest of the
//! expansion sees only well formed input.
use crate::attr::syntax::{AttachedAttrs, AttrArgs, RawAttr};
use crate::attr::DeclKind;
use crate::diag::{ids, Diagnostic, Diagnostics, FixIt};

/// The argument form an attribute must be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    Flag,
    Value,
    List,
}

/// A validation rule for one attribute.
#[derive(Debug)]
pub enum Rule {
    /// The attribute may only be attached to these declarations.
    DeclaredOn(&'static [DeclKind]),
    /// The attribute may only appear once.
    NoDuplicate,
    /// The attribute may not appear together with any of these.
    CannotCombineWith(&'static [&'static str]),
    /// The attribute needs at least one of these next to it.
    MustCombineWith(&'static [&'static str]),
    /// The number of arguments.
    Arity { min: usize, max: Option<usize> },
    /// The argument form.
    Form(Form),
    /// The declaration still has a value when it is not decoded.
    Constructable,
    All(Vec<Rule>),
    Any(Vec<Rule>),
    /// Applies the inner rule only to these declarations.
    When(&'static [DeclKind], Box<Rule>),
}

/// What a rule is checked against.
pub struct Context<'a> {
    pub raw: &'a RawAttr,
    pub index: usize,
    pub attrs: &'a AttachedAttrs,
    pub decl: DeclKind,
}

const VALUE_SOURCES: &[&str] = &["initial", "constant", "default", "default_if_missing"];

fn describe(kinds: &[DeclKind]) -> String {
    kinds
        .iter()
        .map(|kind| kind.to_string())
        .collect::<Vec<_>>()
        .join(" or ")
}

fn quoted(names: &[&str]) -> String {
    names
        .iter()
        .map(|name| format!("`{}`", name))
        .collect::<Vec<_>>()
        .join(", ")
}

impl Rule {
    pub fn check(&self, ctx: &Context<'_>) -> Vec<Diagnostic> {
        let raw = ctx.raw;
        match *self {
            Rule::DeclaredOn(kinds) => {
                if kinds.contains(&ctx.decl) {
                    return Vec::new();
                }
                vec![Diagnostic::new(
                    ids::MISPLACED_ATTRIBUTE,
                    raw.span,
                    format!(
                        "`{}` cannot be applied to {}, it is only valid on {}",
                        raw.name,
                        ctx.decl,
                        describe(kinds)
                    ),
                )
                .with_fix_it(FixIt::remove(raw.span, &raw.name))]
            }
            Rule::NoDuplicate => {
                let repeated = ctx
                    .attrs
                    .iter()
                    .take(ctx.index)
                    .any(|other| other.name == raw.name);
                if !repeated {
                    return Vec::new();
                }
                vec![Diagnostic::new(
                    ids::DUPLICATE_ATTRIBUTE,
                    raw.span,
                    format!("`{}` may only be specified once", raw.name),
                )
                .with_fix_it(FixIt::remove(raw.span, &raw.name))]
            }
            Rule::CannotCombineWith(names) => ctx
                .attrs
                .iter()
                .filter(|other| names.contains(&other.name.as_str()))
                .map(|other| {
                    Diagnostic::new(
                        ids::CONFLICTING_ATTRIBUTES,
                        raw.span,
                        format!("`{}` cannot be combined with `{}`", raw.name, other.name),
                    )
                })
                .collect(),
            Rule::MustCombineWith(names) => {
                if names.iter().any(|name| ctx.attrs.has(name)) {
                    return Vec::new();
                }
                vec![Diagnostic::new(
                    ids::MISSING_COMPANION,
                    raw.span,
                    format!("`{}` requires one of {}", raw.name, quoted(names)),
                )]
            }
            Rule::Arity { min, max } => {
                let arity = raw.arity();
                if arity >= min && max.map_or(true, |max| arity <= max) {
                    return Vec::new();
                }
                let expectation = match max {
                    Some(max) if max == min => format!("exactly {}", min),
                    Some(max) => format!("between {} and {}", min, max),
                    None => format!("at least {}", min),
                };
                vec![Diagnostic::new(
                    ids::WRONG_ARITY,
                    raw.span,
                    format!(
                        "`{}` expects {} argument(s), found {}",
                        raw.name, expectation, arity
                    ),
                )]
            }
            Rule::Form(form) => {
                let matches = matches!(
                    (form, &raw.args),
                    (Form::Flag, AttrArgs::Flag)
                        | (Form::Value, AttrArgs::Value(_))
                        | (Form::List, AttrArgs::List(_))
                );
                if matches {
                    return Vec::new();
                }
                let expected = match form {
                    Form::Flag => format!("`{}`", raw.name),
                    Form::Value => format!("`{} = ...`", raw.name),
                    Form::List => format!("`{}(...)`", raw.name),
                };
                vec![Diagnostic::new(
                    ids::MALFORMED_ATTRIBUTE,
                    raw.span,
                    format!(
                        "expected {}, found {}",
                        expected,
                        raw.args.describe()
                    ),
                )]
            }
            Rule::Constructable => {
                if VALUE_SOURCES.iter().any(|name| ctx.attrs.has(name)) {
                    return Vec::new();
                }
                vec![Diagnostic::new(
                    ids::UNCONSTRUCTABLE_FIELD,
                    raw.span,
                    format!(
                        "a field with `{}` is never decoded and needs a value, add `default` or `initial`",
                        raw.name
                    ),
                )]
            }
            Rule::All(ref rules) => rules.iter().flat_map(|rule| rule.check(ctx)).collect(),
            Rule::Any(ref rules) => {
                let mut failures = Vec::new();
                for rule in rules {
                    let diagnostics = rule.check(ctx);
                    if diagnostics.is_empty() {
                        return Vec::new();
                    }
                    failures.extend(diagnostics);
                }
                let mut iter = failures.into_iter();
                match iter.next() {
                    Some(mut first) => {
                        for other in iter {
                            first.message = format!("{}; or {}", first.message, other.message);
                        }
                        vec![first]
                    }
                    None => Vec::new(),
                }
            }
            Rule::When(kinds, ref rule) => {
                if kinds.contains(&ctx.decl) {
                    rule.check(ctx)
                } else {
                    Vec::new()
                }
            }
        }
    }
}

/// The description of one known attribute.
#[derive(Debug)]
pub struct AttributeSpec {
    pub name: &'static str,
    pub rule: Rule,
}

/// The table of all known attributes.
///
/// Built once per expansion and passed by reference to whatever needs it.
#[derive(Debug)]
pub struct AttributeRegistry {
    specs: Vec<AttributeSpec>,
}

fn spec(name: &'static str, rules: Vec<Rule>) -> AttributeSpec {
    AttributeSpec {
        name,
        rule: Rule::All(rules),
    }
}

fn value_or_list() -> Rule {
    Rule::Any(vec![Rule::Form(Form::Value), Rule::Form(Form::List)])
}

fn flag_or_value() -> Rule {
    Rule::Any(vec![Rule::Form(Form::Flag), Rule::Form(Form::Value)])
}

impl AttributeRegistry {
    pub fn standard() -> AttributeRegistry {
        use self::Rule::*;
        use crate::attr::DeclKind::*;

        const NAMED: &[DeclKind] = &[Field, VariantField, Variant];

        let specs = vec![
            spec(
                "rename_all",
                vec![DeclaredOn(DeclKind::CONTAINERS), Form(self::Form::Value), NoDuplicate],
            ),
            spec(
                "ignore_initialized",
                vec![DeclaredOn(&[Struct]), Form(self::Form::Flag), NoDuplicate],
            ),
            spec(
                "tag",
                vec![
                    DeclaredOn(&[Enum]),
                    value_or_list(),
                    Arity { min: 1, max: None },
                    NoDuplicate,
                    CannotCombineWith(&["untagged"]),
                ],
            ),
            spec(
                "content",
                vec![
                    DeclaredOn(&[Enum]),
                    value_or_list(),
                    Arity { min: 1, max: None },
                    NoDuplicate,
                    MustCombineWith(&["tag"]),
                ],
            ),
            spec(
                "untagged",
                vec![DeclaredOn(&[Enum]), Form(self::Form::Flag), NoDuplicate],
            ),
            spec(
                "at",
                vec![
                    DeclaredOn(DeclKind::FIELDS),
                    Form(self::Form::List),
                    NoDuplicate,
                    CannotCombineWith(&["rename", "coded_in"]),
                ],
            ),
            spec(
                "rename",
                vec![DeclaredOn(NAMED), Form(self::Form::Value), NoDuplicate],
            ),
            spec(
                "coded_in",
                vec![
                    DeclaredOn(DeclKind::FIELDS),
                    Form(self::Form::List),
                    Arity { min: 1, max: None },
                    NoDuplicate,
                ],
            ),
            spec(
                "alias",
                vec![DeclaredOn(NAMED), value_or_list(), Arity { min: 1, max: None }],
            ),
            spec(
                "by",
                vec![DeclaredOn(DeclKind::FIELDS), Form(self::Form::Value), NoDuplicate],
            ),
            spec(
                "default",
                vec![
                    DeclaredOn(DeclKind::FIELDS),
                    flag_or_value(),
                    NoDuplicate,
                    CannotCombineWith(&["default_if_missing"]),
                ],
            ),
            spec(
                "default_if_missing",
                vec![DeclaredOn(DeclKind::FIELDS), flag_or_value(), NoDuplicate],
            ),
            spec(
                "ignore",
                vec![
                    DeclaredOn(NAMED),
                    Form(self::Form::Flag),
                    NoDuplicate,
                    CannotCombineWith(&["ignore_decoding", "ignore_encoding", "ignore_encoding_if"]),
                    When(DeclKind::FIELDS, Box::new(Constructable)),
                ],
            ),
            spec(
                "ignore_decoding",
                vec![
                    DeclaredOn(DeclKind::FIELDS),
                    Form(self::Form::Flag),
                    NoDuplicate,
                    Constructable,
                ],
            ),
            spec(
                "ignore_encoding",
                vec![
                    DeclaredOn(DeclKind::FIELDS),
                    Form(self::Form::Flag),
                    NoDuplicate,
                    CannotCombineWith(&["ignore_encoding_if"]),
                ],
            ),
            spec(
                "ignore_encoding_if",
                vec![DeclaredOn(DeclKind::FIELDS), Form(self::Form::Value), NoDuplicate],
            ),
            spec(
                "initial",
                vec![
                    DeclaredOn(&[Field]),
                    Form(self::Form::Value),
                    NoDuplicate,
                    CannotCombineWith(&["constant", "default", "default_if_missing"]),
                ],
            ),
            spec(
                "constant",
                vec![
                    DeclaredOn(&[Field]),
                    Form(self::Form::Value),
                    NoDuplicate,
                    CannotCombineWith(&["default", "default_if_missing"]),
                ],
            ),
        ];
        AttributeRegistry { specs }
    }

    pub fn get(&self, name: &str) -> Option<&AttributeSpec> {
        self.specs.iter().find(|spec| spec.name == name)
    }

    /// Runs all checks against the attributes of one declaration.
    pub fn check(&self, attrs: &AttachedAttrs, decl: DeclKind) -> Vec<(usize, Diagnostic)> {
        let mut failures = Vec::new();
        for (index, raw) in attrs.iter().enumerate() {
            let spec = match self.get(&raw.name) {
                Some(spec) => spec,
                None => {
                    failures.push((
                        index,
                        Diagnostic::new(
                            ids::UNKNOWN_ATTRIBUTE,
                            raw.span,
                            format!("unknown codable attribute `{}`", raw.name),
                        )
                        .with_fix_it(FixIt::remove(raw.span, &raw.name)),
                    ));
                    continue;
                }
            };
            let ctx = Context {
                raw,
                index,
                attrs,
                decl,
            };
            failures.extend(spec.rule.check(&ctx).into_iter().map(|d| (index, d)));
        }
        failures
    }

    /// Validates the attributes of one declaration.
    ///
    /// All failures are emitted; the returned set only holds the attributes
    /// that passed every check.
    pub fn validate(
        &self,
        attrs: &AttachedAttrs,
        decl: DeclKind,
        diagnostics: &mut Diagnostics,
    ) -> AttachedAttrs {
        let failures = self.check(attrs, decl);
        let valid = attrs
            .iter()
            .enumerate()
            .filter(|(index, _)| !failures.iter().any(|(failed, _)| failed == index))
            .map(|(_, raw)| raw.clone())
            .collect();
        diagnostics.extend(failures.into_iter().map(|(_, d)| d));
        AttachedAttrs::from_items(valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(attrs: Vec<syn::Attribute>, decl: DeclKind) -> (AttachedAttrs, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let attrs = AttachedAttrs::collect(&attrs, &mut diagnostics);
        let valid = AttributeRegistry::standard().validate(&attrs, decl, &mut diagnostics);
        (valid, diagnostics)
    }

    #[test]
    fn test_all_failures_are_collected() {
        let (valid, diagnostics) = run(
            syn::parse_quote!(#[codable(at("a"), rename = "b", tag = "t", bogus, by = Helper)]),
            DeclKind::Field,
        );
        assert_eq!(diagnostics.count(ids::CONFLICTING_ATTRIBUTES), 1);
        assert_eq!(diagnostics.count(ids::MISPLACED_ATTRIBUTE), 1);
        assert_eq!(diagnostics.count(ids::UNKNOWN_ATTRIBUTE), 1);
        assert!(!valid.has("at"));
        assert!(valid.has("rename"));
        assert!(valid.has("by"));
    }

    #[test]
    fn test_ignore_needs_value_source() {
        let (_, diagnostics) = run(
            syn::parse_quote!(#[codable(ignore)]),
            DeclKind::Field,
        );
        assert_eq!(diagnostics.count(ids::UNCONSTRUCTABLE_FIELD), 1);

        let (valid, diagnostics) = run(
            syn::parse_quote!(#[codable(ignore, initial = 5)]),
            DeclKind::Field,
        );
        assert!(diagnostics.is_empty());
        assert!(valid.has("ignore"));

        let (_, diagnostics) = run(
            syn::parse_quote!(#[codable(ignore)]),
            DeclKind::Variant,
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_initial_not_allowed_in_variants() {
        let (_, diagnostics) = run(
            syn::parse_quote!(#[codable(ignore, initial = 1)]),
            DeclKind::VariantField,
        );
        assert_eq!(diagnostics.count(ids::MISPLACED_ATTRIBUTE), 1);
        assert_eq!(diagnostics.count(ids::UNCONSTRUCTABLE_FIELD), 0);
    }

    #[test]
    fn test_duplicates_and_arity() {
        let (valid, diagnostics) = run(
            syn::parse_quote!(#[codable(by = A, by = B, coded_in())]),
            DeclKind::Field,
        );
        assert_eq!(diagnostics.count(ids::DUPLICATE_ATTRIBUTE), 1);
        assert_eq!(diagnostics.count(ids::WRONG_ARITY), 1);
        assert_eq!(valid.iter().filter(|raw| raw.name == "by").count(), 1);
    }

    #[test]
    fn test_any_reports_once() {
        let (_, diagnostics) = run(
            syn::parse_quote!(#[codable(default("x"))]),
            DeclKind::Field,
        );
        assert_eq!(diagnostics.count(ids::MALFORMED_ATTRIBUTE), 1);
    }

    #[test]
    fn test_content_requires_tag() {
        let mut diagnostics = Diagnostics::new();
        let item: syn::DeriveInput = syn::parse_quote! {
            #[codable(content = "c")]
            enum E { A }
        };
        let attrs = AttachedAttrs::collect(&item.attrs, &mut diagnostics);
        AttributeRegistry::standard().validate(&attrs, DeclKind::Enum, &mut diagnostics);
        assert_eq!(diagnostics.count(ids::MISSING_COMPANION), 1);
    }
}
