pub mod case;
pub mod registry;
pub mod tree;

pub use self::registry::{keys_ident, KeyRegistry, Slot};
pub use self::tree::{Directions, Node, Occupant, Scope};
