//! Code synthesis.
//!
//! The emitters walk the key-path tree of a type and produce the bodies of
//! the generated `decode` and `encode` functions, the key enum and the
//! memberwise initializers.
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

use crate::keys::{KeyRegistry, Node, Occupant, Scope, Slot};
use crate::model::Shape;
use crate::registration::Registration;

pub mod decode;
pub mod encode;
pub mod init;
pub mod keys;

/// The fields of one struct or enum case.
pub struct Members<'a> {
    pub registry: &'a KeyRegistry,
    pub fields: &'a [Registration],
    /// The enum case the fields belong to.
    pub case: Option<usize>,
}

impl<'a> Members<'a> {
    fn scope(&self) -> Scope {
        match self.case {
            Some(case) => Scope::Case(case),
            None => Scope::Always,
        }
    }

    /// Returns the registration an occupant stands for if it is one of
    /// these fields.
    fn resolve(&self, occupant: &Occupant<Slot>) -> Option<&'a Registration> {
        if !occupant.active_in(self.scope()) {
            return None;
        }
        match occupant.item {
            Slot::Field { case, field } if case == self.case => self.fields.get(field),
            _ => None,
        }
    }

    /// The fields decoded at a node.
    ///
    /// Shadowed fields are still decoded from the shared location.
    fn decoded_at(&self, node: &Node<Slot>) -> Vec<&'a Registration> {
        node.occupants()
            .iter()
            .filter_map(|occupant| self.resolve(occupant))
            .filter(|registration| registration.variable.decodable())
            .collect()
    }

    /// The fields encoded at a node.
    fn encoded_at(&self, node: &Node<Slot>) -> Vec<&'a Registration> {
        node.occupants()
            .iter()
            .filter(|occupant| !occupant.shadowed)
            .filter_map(|occupant| self.resolve(occupant))
            .filter(|registration| registration.variable.encodable())
            .collect()
    }

    fn decoded_below(&self, node: &Node<Slot>) -> Vec<&'a Registration> {
        node.descendant_occupants()
            .into_iter()
            .filter_map(|occupant| self.resolve(occupant))
            .filter(|registration| registration.variable.decodable())
            .collect()
    }

    fn encoded_below(&self, node: &Node<Slot>) -> Vec<&'a Registration> {
        node.descendant_occupants()
            .into_iter()
            .filter(|occupant| !occupant.shadowed)
            .filter_map(|occupant| self.resolve(occupant))
            .filter(|registration| registration.variable.encodable())
            .collect()
    }
}

/// Hands out container bindings that are unique within one function.
#[derive(Default)]
struct Fresh {
    next: usize,
}

impl Fresh {
    fn container(&mut self) -> Ident {
        self.next += 1;
        format_ident!("__c{}", self.next)
    }
}

/// Builds `path { member: binding, .. }` for the given shape.
pub fn construct(path: TokenStream, shape: Shape, fields: &[Registration]) -> TokenStream {
    if shape == Shape::Unit {
        return path;
    }
    let members = fields.iter().map(|registration| &registration.field.member);
    let bindings = fields.iter().map(|registration| registration.variable.name());
    quote!(#path { #(#members: #bindings),* })
}
