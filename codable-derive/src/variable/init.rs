use proc_macro2::{Ident, TokenStream};

use crate::variable::{AnyVariable, Fallback, Initialization, Location, Variable};

/// Pins down how a field takes part in memberwise initialization.
pub struct InitializationVariable {
    base: AnyVariable,
    requirement: Initialization,
}

impl InitializationVariable {
    pub fn new(base: AnyVariable, requirement: Initialization) -> InitializationVariable {
        InitializationVariable { base, requirement }
    }

    /// Computes the requirement of a field.
    ///
    /// An immutable field with an initial value is never a parameter, any
    /// other field with a value is an optional parameter and the rest are
    /// required.
    pub fn requirement(base: &dyn Variable, constant: Option<TokenStream>) -> Initialization {
        match constant {
            Some(value) => Initialization::Ignored(value),
            None => base.initialization(),
        }
    }
}

impl Variable for InitializationVariable {
    fn name(&self) -> &Ident {
        self.base.name()
    }

    fn ty(&self) -> &syn::Type {
        self.base.ty()
    }

    fn access(&self) -> &TokenStream {
        self.base.access()
    }

    fn decodable(&self) -> bool {
        self.base.decodable()
    }

    fn encodable(&self) -> bool {
        self.base.encodable()
    }

    fn decode(&self, at: Location<'_>) -> TokenStream {
        self.base.decode(at)
    }

    fn decode_if_present(&self, at: Location<'_>) -> Option<TokenStream> {
        self.base.decode_if_present(at)
    }

    fn encode(&self, at: Location<'_>) -> TokenStream {
        self.base.encode(at)
    }

    fn encode_condition(&self) -> Option<TokenStream> {
        self.base.encode_condition()
    }

    fn fallback(&self) -> Fallback {
        self.base.fallback()
    }

    fn value(&self) -> Option<TokenStream> {
        self.base.value()
    }

    fn initialization(&self) -> Initialization {
        self.requirement.clone()
    }
}
