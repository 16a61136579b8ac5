use proc_macro2::{Span, TokenStream};

/// Stable identifiers of the diagnostics the engine produces.
///
/// Tooling and tests match on these instead of on message text.
pub mod ids {
    pub const UNKNOWN_ATTRIBUTE: &str = "codable::unknown-attribute";
    pub const MALFORMED_ATTRIBUTE: &str = "codable::malformed-attribute";
    pub const MISPLACED_ATTRIBUTE: &str = "codable::misplaced-attribute";
    pub const DUPLICATE_ATTRIBUTE: &str = "codable::duplicate-attribute";
    pub const CONFLICTING_ATTRIBUTES: &str = "codable::conflicting-attributes";
    pub const MISSING_COMPANION: &str = "codable::missing-companion-attribute";
    pub const WRONG_ARITY: &str = "codable::wrong-arity";
    pub const UNCONSTRUCTABLE_FIELD: &str = "codable::unconstructable-field";
    pub const DUPLICATE_KEY_PATH: &str = "codable::duplicate-key-path";
    pub const DUPLICATE_TAG_VALUE: &str = "codable::duplicate-tag-value";
    pub const UNSUPPORTED_TYPE: &str = "codable::unsupported-type";
}

/// A suggested source change attached to a diagnostic.
#[derive(Debug, Clone)]
pub struct FixIt {
    pub message: String,
    pub span: Span,
}

impl FixIt {
    /// Suggests removing the code at `span`.
    pub fn remove(span: Span, what: &str) -> FixIt {
        FixIt {
            message: format!("remove `{}`", what),
            span,
        }
    }
}

/// A single validation failure.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub id: &'static str,
    pub message: String,
    pub span: Span,
    pub fix_it: Option<FixIt>,
}

impl Diagnostic {
    pub fn new<M: Into<String>>(id: &'static str, span: Span, message: M) -> Diagnostic {
        Diagnostic {
            id,
            message: message.into(),
            span,
            fix_it: None,
        }
    }

    pub fn with_fix_it(mut self, fix_it: FixIt) -> Diagnostic {
        self.fix_it = Some(fix_it);
        self
    }
}

/// The per-expansion diagnostic sink.
///
/// Every validation failure is emitted here; expansion carries on with
/// fallback semantics so that one bad attribute never hides the problems
/// of its siblings.
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Diagnostics {
        Diagnostics::default()
    }

    /// Records a diagnostic.
    ///
    /// A diagnostic with the same id, message and location as an earlier
    /// one is dropped.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        let location = format!("{:?}", diagnostic.span);
        if self.items.iter().any(|d| {
            d.id == diagnostic.id
                && d.message == diagnostic.message
                && format!("{:?}", d.span) == location
        }) {
            return;
        }
        self.items.push(diagnostic);
    }

    pub fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, diagnostics: I) {
        for diagnostic in diagnostics {
            self.emit(diagnostic);
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Returns how many diagnostics with the given id were emitted.
    #[cfg(test)]
    pub fn count(&self, id: &str) -> usize {
        self.items.iter().filter(|d| d.id == id).count()
    }

    /// Renders all diagnostics as `compile_error!` invocations.
    pub fn to_compile_errors(&self) -> TokenStream {
        let mut combined: Option<syn::Error> = None;
        for diagnostic in &self.items {
            let mut error = syn::Error::new(diagnostic.span, &diagnostic.message);
            if let Some(ref fix_it) = diagnostic.fix_it {
                error.combine(syn::Error::new(
                    fix_it.span,
                    format!("help: {}", fix_it.message),
                ));
            }
            match combined {
                Some(ref mut combined) => combined.combine(error),
                None => combined = Some(error),
            }
        }
        combined
            .map(|error| error.to_compile_error())
            .unwrap_or_default()
    }
}

#[test]
fn test_emit_deduplicates() {
    let mut diagnostics = Diagnostics::new();
    diagnostics.emit(Diagnostic::new(ids::UNKNOWN_ATTRIBUTE, Span::call_site(), "a"));
    diagnostics.emit(Diagnostic::new(ids::UNKNOWN_ATTRIBUTE, Span::call_site(), "a"));
    diagnostics.emit(Diagnostic::new(ids::UNKNOWN_ATTRIBUTE, Span::call_site(), "b"));
    assert_eq!(diagnostics.len(), 2);
    assert!(!diagnostics.to_compile_errors().is_empty());
}
