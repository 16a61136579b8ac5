//! Variables describe how one coded value is decoded and encoded.
//!
//! A [`BasicVariable`] codes a field through its own `Decode`/`Encode`
//! implementations.  Decorators wrap another variable and override part of
//! its behavior: [`HelperCodedVariable`] routes through a helper coder,
//! [`DefaultValueVariable`] recovers from failures,
//! [`ConditionalCodingVariable`] suppresses a direction and
//! [`InitializationVariable`] decides how the field is initialized.
//!
//! All generated expressions may use `?` and evaluate to the variable's type.
use proc_macro2::{Ident, TokenStream};
use std::rc::Rc;

mod basic;
mod conditional;
mod default;
mod helper;
mod init;

pub use self::basic::BasicVariable;
pub use self::conditional::ConditionalCodingVariable;
pub use self::default::DefaultValueVariable;
pub use self::helper::HelperCodedVariable;
pub use self::init::InitializationVariable;

/// Where a value is read from or written to.
#[derive(Clone, Copy)]
pub enum Location<'a> {
    /// At `key` of the keyed container bound to `container`.
    Keyed {
        container: &'a Ident,
        key: &'a TokenStream,
    },
    /// The decoder or encoder bound to `coder` itself.
    Root { coder: &'a Ident },
}

/// What decoding does when a value cannot be read.
#[derive(Debug, Clone)]
pub enum Fallback {
    /// The error is propagated.
    Throw,
    /// These statements run when the value is absent.
    IfMissing(TokenStream),
    /// These statements run on any error.
    IfError(TokenStream),
}

impl Fallback {
    /// Combines the fallbacks of all values sharing a nested container.
    ///
    /// A single throwing value makes the container required.  Otherwise the
    /// container falls back when it is missing, or on any error as soon as
    /// one value recovers from errors.
    pub fn aggregate<I: IntoIterator<Item = Fallback>>(fallbacks: I) -> Fallback {
        let mut stmts = TokenStream::new();
        let mut on_error = false;
        let mut empty = true;
        for fallback in fallbacks {
            empty = false;
            match fallback {
                Fallback::Throw => return Fallback::Throw,
                Fallback::IfMissing(more) => stmts.extend(more),
                Fallback::IfError(more) => {
                    on_error = true;
                    stmts.extend(more);
                }
            }
        }
        if empty {
            Fallback::Throw
        } else if on_error {
            Fallback::IfError(stmts)
        } else {
            Fallback::IfMissing(stmts)
        }
    }
}

/// How a memberwise initializer treats a field.
#[derive(Debug, Clone)]
pub enum Initialization {
    /// The field always takes this value and is not a parameter.
    Ignored(TokenStream),
    /// The field is a required parameter.
    Required,
    /// The field is an optional parameter with this default.
    Optional(TokenStream),
}

pub trait Variable {
    /// The local binding the value is decoded into.
    fn name(&self) -> &Ident;

    /// The declared type.
    fn ty(&self) -> &syn::Type;

    /// An expression that borrows the value while encoding.
    fn access(&self) -> &TokenStream;

    fn decodable(&self) -> bool {
        true
    }

    fn encodable(&self) -> bool {
        true
    }

    /// An expression decoding the value from `at`.
    fn decode(&self, at: Location<'_>) -> TokenStream;

    /// An expression evaluating to `Some(value)` if the value is present at
    /// `at` and to `None` if it is absent or null.
    fn decode_if_present(&self, at: Location<'_>) -> Option<TokenStream>;

    /// Statements encoding the value into `at`.
    fn encode(&self, at: Location<'_>) -> TokenStream;

    /// A runtime condition that must hold for the value to be encoded.
    fn encode_condition(&self) -> Option<TokenStream> {
        None
    }

    fn fallback(&self) -> Fallback {
        Fallback::Throw
    }

    /// The value a field takes when it is not decoded.
    fn value(&self) -> Option<TokenStream> {
        None
    }

    fn initialization(&self) -> Initialization {
        match self.value() {
            Some(value) => Initialization::Optional(value),
            None => Initialization::Required,
        }
    }
}

/// A type-erased variable.
pub type AnyVariable = Rc<dyn Variable>;

/// Returns the `T` of an `Option<T>`.
pub fn option_inner(ty: &syn::Type) -> Option<&syn::Type> {
    let path = match ty {
        syn::Type::Path(syn::TypePath { qself: None, path }) => path,
        syn::Type::Group(group) => return option_inner(&group.elem),
        syn::Type::Paren(paren) => return option_inner(&paren.elem),
        _ => return None,
    };
    let segment = path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    match segment.arguments {
        syn::PathArguments::AngleBracketed(ref args) if args.args.len() == 1 => {
            match args.args.first() {
                Some(syn::GenericArgument::Type(inner)) => Some(inner),
                _ => None,
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use quote::quote;

    fn fallback_strategy() -> impl Strategy<Value = u8> {
        0u8..3
    }

    fn make(kind: u8, idx: usize) -> Fallback {
        let stmt = quote!(__field = #idx;);
        match kind {
            0 => Fallback::Throw,
            1 => Fallback::IfMissing(stmt),
            _ => Fallback::IfError(stmt),
        }
    }

    fn statements(fallback: &Fallback) -> Option<&TokenStream> {
        match fallback {
            Fallback::Throw => None,
            Fallback::IfMissing(stmts) | Fallback::IfError(stmts) => Some(stmts),
        }
    }

    fn rank(fallback: &Fallback) -> u8 {
        match fallback {
            Fallback::IfMissing(_) => 0,
            Fallback::IfError(_) => 1,
            Fallback::Throw => 2,
        }
    }

    #[test]
    fn test_option_inner() {
        let ty: syn::Type = syn::parse_quote!(Option<Vec<u8>>);
        let inner: syn::Type = syn::parse_quote!(Vec<u8>);
        assert_eq!(option_inner(&ty), Some(&inner));
        let ty: syn::Type = syn::parse_quote!(std::option::Option<u8>);
        assert!(option_inner(&ty).is_some());
        let ty: syn::Type = syn::parse_quote!(Vec<Option<u8>>);
        assert!(option_inner(&ty).is_none());
    }

    #[test]
    fn test_aggregate() {
        assert!(matches!(
            Fallback::aggregate(vec![make(1, 0), make(1, 1)]),
            Fallback::IfMissing(_)
        ));
        assert!(matches!(
            Fallback::aggregate(vec![make(1, 0), make(2, 1)]),
            Fallback::IfError(_)
        ));
        assert!(matches!(
            Fallback::aggregate(vec![make(2, 0), make(0, 1)]),
            Fallback::Throw
        ));
    }

    proptest! {
        #[test]
        fn test_aggregate_is_monotonic(
            kinds in proptest::collection::vec(fallback_strategy(), 1..8),
            extra in fallback_strategy(),
        ) {
            let base: Vec<_> = kinds.iter().enumerate().map(|(idx, &k)| make(k, idx)).collect();
            let before = Fallback::aggregate(base.clone());
            let mut grown = base;
            grown.push(make(extra, 99));
            let after = Fallback::aggregate(grown);
            // adding a value never makes the container more lenient
            prop_assert!(rank(&after) >= rank(&before));
            // the result is at least as strict as every member
            let strictest = kinds.iter().chain(Some(&extra)).map(|&k| rank(&make(k, 0))).max().unwrap();
            prop_assert_eq!(rank(&after), strictest);
            // every recovering member contributes its statements
            if let Some(stmts) = statements(&after) {
                prop_assert_eq!(stmts.to_string().matches("__field").count(), kinds.len() + 1);
            }
        }
    }
}
