use crate::core::geom::{BoundingBox, Vec2};
use crate::core::model::comp::{Comp, CompPort};
use crate::core::model::wire::WireGraph;

/// The netlist: components plus wires, with monotonically increasing id
/// counters for each. When the schematic is the internal layout of a bigger
/// component, `parent_comp_def_id` names that definition and
/// `comp_size`/`comp_ports` describe the component's outer boundary.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schematic {
    pub id: String,
    pub name: String,
    pub comps: Vec<Comp>,
    pub wires: Vec<WireGraph>,
    pub next_comp_id: u64,
    pub next_wire_id: u64,
    pub comp_bbox: BoundingBox,
    pub comp_size: Vec2,
    pub comp_ports: Vec<CompPort>,
    pub parent_comp_def_id: Option<String>,
}

impl Schematic {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn comp_by_id(&self, id: &str) -> Option<&Comp> {
        self.comps.iter().find(|c| c.id == id)
    }

    pub fn wire_by_id(&self, id: &str) -> Option<&WireGraph> {
        self.wires.iter().find(|w| w.id == id)
    }

    /// Add a comp, assigning it the next free id. Returns the assigned id.
    pub fn add_comp(&mut self, mut comp: Comp) -> String {
        let id = self.next_comp_id.to_string();
        self.next_comp_id += 1;
        comp.id = id.clone();
        self.comps.push(comp);
        id
    }

    /// Add a wire, assigning it the next free id. Returns the assigned id.
    pub fn add_wire(&mut self, mut wire: WireGraph) -> String {
        let id = self.next_wire_id.to_string();
        self.next_wire_id += 1;
        wire.id = id.clone();
        self.wires.push(wire);
        id
    }

    /// Copy-on-write comp replacement: the comp with the same id is swapped
    /// for the new value, leaving all other comps untouched.
    pub fn with_comp_replaced(&self, comp: Comp) -> Schematic {
        let mut s = self.clone();
        if let Some(slot) = s.comps.iter_mut().find(|c| c.id == comp.id) {
            *slot = comp;
        }
        s
    }

    /// Recompute next_comp_id/next_wire_id from the maximum numeric ids
    /// present, e.g. after hydrating from a persisted form.
    pub fn recompute_next_ids(&mut self) {
        let max_comp = self
            .comps
            .iter()
            .filter_map(|c| c.id.parse::<u64>().ok())
            .max();
        let max_wire = self
            .wires
            .iter()
            .filter_map(|w| w.id.parse::<u64>().ok())
            .max();
        self.next_comp_id = max_comp.map_or(0, |m| m + 1);
        self.next_wire_id = max_wire.map_or(0, |m| m + 1);
    }
}

/// A reference to a selectable element in the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum ElRef {
    Comp { id: String },
    CompPort { comp_id: String, port_id: String },
    WireNode { wire_id: String, node_id: usize },
    WireSeg { wire_id: String, node0_id: usize, node1_id: usize },
}

/// Top-level editing state: the live schematic plus selection and append-only
/// undo/redo snapshot stacks. Snapshots are whole-value replacements so that
/// cache owners can rely on identity comparison for staleness.
#[derive(Debug, Clone, Default)]
pub struct EditSnapshot {
    pub main_schematic: Schematic,
    pub selected: Vec<ElRef>,
    pub undo_stack: Vec<Schematic>,
    pub redo_stack: Vec<Schematic>,
}

impl EditSnapshot {
    pub fn new(main_schematic: Schematic) -> Self {
        Self {
            main_schematic,
            selected: Vec::new(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Apply an edit, pushing the previous schematic onto the undo stack and
    /// clearing the redo stack.
    pub fn apply_edit(&mut self, new_schematic: Schematic) {
        let prev = std::mem::replace(&mut self.main_schematic, new_schematic);
        self.undo_stack.push(prev);
        self.redo_stack.clear();
    }

    pub fn undo(&mut self) {
        if let Some(prev) = self.undo_stack.pop() {
            let cur = std::mem::replace(&mut self.main_schematic, prev);
            self.redo_stack.push(cur);
        }
    }

    pub fn redo(&mut self) {
        if let Some(next) = self.redo_stack.pop() {
            let cur = std::mem::replace(&mut self.main_schematic, next);
            self.undo_stack.push(cur);
        }
    }
}
