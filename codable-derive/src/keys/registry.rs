use proc_macro2::{Ident, Span, TokenStream};
use quote::{format_ident, quote};

use crate::diag::{ids, Diagnostic, Diagnostics};
use crate::keys::case::KeyStrategy;
use crate::keys::tree::{Directions, KeyPathTree, Scope};

/// What occupies a location in the key-path tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Field `field` of the struct, or of enum case `case`.
    Field { case: Option<usize>, field: usize },
    /// The discriminator of an internally tagged enum.
    Tag,
}

/// Collects every key of a type and the tree of where values are coded.
pub struct KeyRegistry {
    tree: KeyPathTree<Slot>,
    labels: Vec<(Slot, String)>,
    keys: Vec<(String, Ident)>,
}

impl Default for KeyRegistry {
    fn default() -> Self {
        KeyRegistry {
            tree: KeyPathTree::new(),
            labels: Vec::new(),
            keys: Vec::new(),
        }
    }
}

/// The name of the generated key enum.
pub fn keys_ident() -> Ident {
    Ident::new("__CodingKeys", Span::call_site())
}

impl KeyRegistry {
    pub fn new() -> KeyRegistry {
        KeyRegistry::default()
    }

    pub fn tree(&self) -> &KeyPathTree<Slot> {
        &self.tree
    }

    /// Makes sure the key enum has a variant for `key`.
    pub fn add_key(&mut self, key: &str) {
        if self.keys.iter().any(|(existing, _)| existing == key) {
            return;
        }
        let base = variant_name(key);
        let mut name = base.clone();
        let mut counter = 1;
        while self.keys.iter().any(|(_, ident)| *ident == name) {
            counter += 1;
            name = format!("{}{}", base, counter);
        }
        self.keys.push((key.to_string(), format_ident!("{}", name)));
    }

    /// Registers a value at a key path.
    ///
    /// Every earlier registration at the same location that is not
    /// exclusive with this one is reported once.
    #[allow(clippy::too_many_arguments)]
    pub fn register(
        &mut self,
        path: &[String],
        aliases: &[String],
        slot: Slot,
        label: String,
        scope: Scope,
        directions: Directions,
        span: Span,
        diagnostics: &mut Diagnostics,
    ) {
        for key in path.iter().chain(aliases) {
            self.add_key(key);
        }
        let conflicts = self.tree.register(path, slot, scope, directions);
        for conflict in conflicts {
            let existing = self.label(conflict.existing);
            diagnostics.emit(Diagnostic::new(
                ids::DUPLICATE_KEY_PATH,
                span,
                format!(
                    "{} is coded at key path `{}` which is already used by {}",
                    label,
                    conflict.path.join("."),
                    existing
                ),
            ));
        }
        self.labels.push((slot, label));
    }

    fn label(&self, slot: Slot) -> String {
        self.labels
            .iter()
            .find(|(other, _)| *other == slot)
            .map(|(_, label)| label.clone())
            .unwrap_or_else(|| "another value".to_string())
    }

    /// All keys in registration order with their enum variants.
    pub fn keys(&self) -> &[(String, Ident)] {
        &self.keys
    }

    /// The expression for `key`.
    pub fn key(&self, key: &str) -> TokenStream {
        let keys_ident = keys_ident();
        match self.keys.iter().find(|(existing, _)| existing == key) {
            Some((_, variant)) => quote!(#keys_ident::#variant),
            // unregistered keys are coded as plain strings
            None => quote!(#key),
        }
    }
}

/// Derives a variant name for a key.
fn variant_name(key: &str) -> String {
    let pascal: String = KeyStrategy::PascalCase
        .apply(key)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    match pascal.chars().next() {
        Some(c) if c.is_ascii_alphabetic() && pascal != "Self" => pascal,
        _ => format!("Key{}", pascal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_variant_names() {
        let mut registry = KeyRegistry::new();
        for key in ["id", "user_id", "userId", "0", "", "self", "e-mail"] {
            registry.add_key(key);
        }
        let names: Vec<_> = registry.keys().iter().map(|(_, i)| i.to_string()).collect();
        assert_eq!(names, vec!["Id", "UserId", "UserId2", "Key0", "Key", "KeySelf", "EMail"]);
        assert_eq!(registry.key("userId").to_string(), "__CodingKeys :: UserId2");
    }

    #[test]
    fn test_collision_reported_once() {
        let mut registry = KeyRegistry::new();
        let mut diagnostics = Diagnostics::new();
        let slot = |field| Slot::Field { case: None, field };
        registry.register(
            &path(&["data", "id"]),
            &[],
            slot(0),
            "field `a`".into(),
            Scope::Always,
            Directions::BOTH,
            Span::call_site(),
            &mut diagnostics,
        );
        registry.register(
            &path(&["data", "id"]),
            &[],
            slot(1),
            "field `b`".into(),
            Scope::Always,
            Directions::BOTH,
            Span::call_site(),
            &mut diagnostics,
        );
        assert_eq!(diagnostics.count(ids::DUPLICATE_KEY_PATH), 1);
        let message = &diagnostics.iter().next().unwrap().message;
        assert!(message.contains("field `a`"));
        assert_eq!(registry.keys().len(), 2);
    }
}
