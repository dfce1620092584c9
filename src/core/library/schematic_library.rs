use std::collections::HashMap;

use rand::Rng;

use crate::core::model::Schematic;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a fresh schematic id of the form `c-xxxxxxxx` (8 base36 chars).
pub fn gen_schematic_id() -> String {
    let mut rng = rand::thread_rng();
    let mut id = String::with_capacity(10);
    id.push_str("c-");
    for _ in 0..8 {
        let c = ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char;
        id.push(c);
    }
    id
}

/// Store of schematics by id. Holds both loaded user schematics and the
/// internal layouts referenced by component definitions.
#[derive(Default)]
pub struct SchematicLibrary {
    schematics: HashMap<String, Schematic>,
}

impl SchematicLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_schematic(&self, id: &str) -> Option<&Schematic> {
        self.schematics.get(id)
    }

    /// Insert a schematic, generating an id if it has none. Returns the id
    /// under which it was stored.
    pub fn add_schematic(&mut self, mut schematic: Schematic) -> String {
        if schematic.id.is_empty() {
            schematic.id = gen_schematic_id();
        }
        let id = schematic.id.clone();
        self.schematics.insert(id.clone(), schematic);
        id
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.schematics.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.schematics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schematics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gen_schematic_id_shape() {
        let id = gen_schematic_id();
        assert_eq!(id.len(), 10);
        assert!(id.starts_with("c-"));
        assert!(id[2..].chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_add_assigns_id_when_missing() {
        let mut lib = SchematicLibrary::new();
        let id = lib.add_schematic(Schematic::new("", "unnamed"));
        assert!(id.starts_with("c-"));
        assert_eq!(lib.get_schematic(&id).map(|s| s.name.as_str()), Some("unnamed"));
    }

    #[test]
    fn test_add_keeps_existing_id() {
        let mut lib = SchematicLibrary::new();
        let id = lib.add_schematic(Schematic::new("c-aaaaaaaa", "named"));
        assert_eq!(id, "c-aaaaaaaa");
        assert_eq!(lib.len(), 1);
    }
}
