use crate::core::library::comp_def::CompLibrary;
use crate::core::library::schematic_library::SchematicLibrary;

/// Everything evaluation and persistence need to resolve references:
/// component definitions plus the schematics those definitions point at.
#[derive(Default)]
pub struct SharedContext {
    pub comp_library: CompLibrary,
    pub schematic_library: SchematicLibrary,
}

impl SharedContext {
    pub fn new(comp_library: CompLibrary, schematic_library: SchematicLibrary) -> Self {
        Self {
            comp_library,
            schematic_library,
        }
    }
}
