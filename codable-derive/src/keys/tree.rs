//! The key-path tree.
//!
//! Every coded value is registered at its key path.  Intermediate nodes
//! become nested containers in the generated code, occupants are the values
//! coded at a node.  Children keep their insertion order so the generated
//! code follows declaration order.

/// The context a registration is active in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Active for every value of the type (struct fields, enum tags).
    Always,
    /// Active only while coding the enum case with this index.
    Case(usize),
}

/// The coding directions a registration takes part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directions {
    pub decode: bool,
    pub encode: bool,
}

impl Directions {
    pub const BOTH: Directions = Directions {
        decode: true,
        encode: true,
    };
}

/// A value registered at a node.
#[derive(Debug, Clone)]
pub struct Occupant<T> {
    pub item: T,
    pub scope: Scope,
    pub directions: Directions,
    /// Set when an earlier occupant already claims the location.
    ///
    /// Shadowed occupants are still decoded from the shared key but never
    /// encoded.
    pub shadowed: bool,
}

impl<T> Occupant<T> {
    /// Returns `true` if this occupant is active in the given scope.
    pub fn active_in(&self, scope: Scope) -> bool {
        match (self.scope, scope) {
            (Scope::Always, _) | (_, Scope::Always) => true,
            (Scope::Case(a), Scope::Case(b)) => a == b,
        }
    }

    /// Returns `true` if both occupants can never be coded at the same time.
    pub fn exclusive_with(&self, other: &Occupant<T>) -> bool {
        if let (Scope::Case(a), Scope::Case(b)) = (self.scope, other.scope) {
            if a != b {
                return true;
            }
        }
        !(self.directions.decode && other.directions.decode)
            && !(self.directions.encode && other.directions.encode)
    }
}

#[derive(Debug, Clone)]
pub struct Node<T> {
    children: Vec<(String, Node<T>)>,
    occupants: Vec<Occupant<T>>,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Node {
            children: Vec::new(),
            occupants: Vec::new(),
        }
    }
}

impl<T> Node<T> {
    pub fn children(&self) -> impl Iterator<Item = (&str, &Node<T>)> {
        self.children.iter().map(|(key, node)| (key.as_str(), node))
    }

    pub fn occupants(&self) -> &[Occupant<T>] {
        &self.occupants
    }

    #[cfg(test)]
    pub fn child(&self, segment: &str) -> Option<&Node<T>> {
        self.children
            .iter()
            .find(|(key, _)| key == segment)
            .map(|(_, node)| node)
    }

    fn child_mut(&mut self, segment: &str) -> &mut Node<T> {
        let idx = match self.children.iter().position(|(key, _)| key == segment) {
            Some(idx) => idx,
            None => {
                self.children.push((segment.to_string(), Node::default()));
                self.children.len() - 1
            }
        };
        &mut self.children[idx].1
    }

    /// Collects the occupants of this node and all of its descendants,
    /// depth first.
    pub fn all_occupants(&self) -> Vec<&Occupant<T>> {
        let mut rv: Vec<&Occupant<T>> = self.occupants.iter().collect();
        for (_, child) in &self.children {
            rv.extend(child.all_occupants());
        }
        rv
    }

    /// Collects the occupants strictly below this node.
    pub fn descendant_occupants(&self) -> Vec<&Occupant<T>> {
        self.children
            .iter()
            .flat_map(|(_, child)| child.all_occupants())
            .collect()
    }

    /// Returns `true` if this node or a descendant holds a matching occupant.
    #[cfg(test)]
    pub fn any<F: Fn(&Occupant<T>) -> bool>(&self, pred: &F) -> bool {
        self.occupants.iter().any(|occupant| pred(occupant))
            || self.children.iter().any(|(_, child)| child.any(pred))
    }
}

/// A conflict between two registrations at the same location.
#[derive(Debug, Clone)]
pub struct Conflict<T> {
    pub existing: T,
    pub path: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct KeyPathTree<T> {
    root: Node<T>,
}

impl<T> Default for KeyPathTree<T> {
    fn default() -> Self {
        KeyPathTree {
            root: Node::default(),
        }
    }
}

impl<T: Clone> KeyPathTree<T> {
    pub fn new() -> KeyPathTree<T> {
        KeyPathTree::default()
    }

    pub fn root(&self) -> &Node<T> {
        &self.root
    }

    /// Registers an item at a key path.
    ///
    /// Returns one conflict for every earlier occupant of the same location
    /// that is not exclusive with the new one.  The item is registered
    /// either way; if it conflicts it is shadowed.
    ///
    /// Values coded at the root share the container they are coded in and
    /// never conflict with each other.
    pub fn register(
        &mut self,
        path: &[String],
        item: T,
        scope: Scope,
        directions: Directions,
    ) -> Vec<Conflict<T>> {
        let mut node = &mut self.root;
        for segment in path {
            node = node.child_mut(segment);
        }
        let mut occupant = Occupant {
            item,
            scope,
            directions,
            shadowed: false,
        };
        let conflicts: Vec<Conflict<T>> = node
            .occupants
            .iter()
            .filter(|_| !path.is_empty())
            .filter(|existing| !existing.exclusive_with(&occupant))
            .map(|existing| Conflict {
                existing: existing.item.clone(),
                path: path.to_vec(),
            })
            .collect();
        occupant.shadowed = !conflicts.is_empty();
        node.occupants.push(occupant);
        conflicts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_conflict_reported_once_per_pair() {
        let mut tree = KeyPathTree::new();
        assert!(tree
            .register(&path(&["a", "b"]), 1, Scope::Always, Directions::BOTH)
            .is_empty());
        let conflicts = tree.register(&path(&["a", "b"]), 2, Scope::Always, Directions::BOTH);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].existing, 1);
        let conflicts = tree.register(&path(&["a", "b"]), 3, Scope::Always, Directions::BOTH);
        assert_eq!(conflicts.len(), 2);

        let leaf = tree.root().child("a").and_then(|a| a.child("b")).unwrap();
        let shadowed: Vec<_> = leaf.occupants().iter().map(|o| (o.item, o.shadowed)).collect();
        assert_eq!(shadowed, vec![(1, false), (2, true), (3, true)]);
    }

    #[test]
    fn test_exclusive_scopes_do_not_conflict() {
        let mut tree = KeyPathTree::new();
        assert!(tree
            .register(&path(&["id"]), 1, Scope::Case(0), Directions::BOTH)
            .is_empty());
        assert!(tree
            .register(&path(&["id"]), 2, Scope::Case(1), Directions::BOTH)
            .is_empty());
        let decode_only = Directions {
            decode: true,
            encode: false,
        };
        let encode_only = Directions {
            decode: false,
            encode: true,
        };
        assert!(tree
            .register(&path(&["x"]), 3, Scope::Always, decode_only)
            .is_empty());
        assert!(tree
            .register(&path(&["x"]), 4, Scope::Always, encode_only)
            .is_empty());
        assert_eq!(
            tree.register(&path(&["id"]), 5, Scope::Always, Directions::BOTH)
                .len(),
            2
        );
    }

    #[test]
    fn test_root_occupants_share() {
        let mut tree = KeyPathTree::new();
        assert!(tree.register(&[], 1, Scope::Always, Directions::BOTH).is_empty());
        assert!(tree.register(&[], 2, Scope::Always, Directions::BOTH).is_empty());
        assert!(tree.root().occupants().iter().all(|o| !o.shadowed));
    }

    #[test]
    fn test_insertion_order() {
        let mut tree = KeyPathTree::new();
        for (idx, key) in ["z", "a", "m", "a"].iter().enumerate() {
            tree.register(&path(&[*key, "v"]), idx, Scope::Case(idx), Directions::BOTH);
        }
        let keys: Vec<_> = tree.root().children().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        assert_eq!(tree.root().descendant_occupants().len(), 4);
        assert!(tree.root().any(&|o: &Occupant<usize>| o.item == 3));
    }
}
