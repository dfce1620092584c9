use serde::{Deserialize, Serialize};
use serde_json::Map;

use crate::core::geom::{rotate_bbox_int, rotate_pos, BoundingBox, Vec2};

/// Bit-set of port direction and semantic tags.
///
/// A port is `IN`, `OUT`, or both (bidirectional). `TRISTATE` marks ports
/// that may be electrically disabled; `DATA`/`ADDR`/`CTRL` are semantic tags
/// that propagate onto the net for display purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortType(pub u32);

impl PortType {
    pub const NONE: PortType = PortType(0);
    pub const IN: PortType = PortType(1 << 0);
    pub const OUT: PortType = PortType(1 << 1);
    pub const TRISTATE: PortType = PortType(1 << 2);
    pub const DATA: PortType = PortType(1 << 3);
    pub const ADDR: PortType = PortType(1 << 4);
    pub const CTRL: PortType = PortType(1 << 5);
    pub const HIDDEN: PortType = PortType(1 << 6);

    pub const OUT_TRI: PortType = PortType(Self::OUT.0 | Self::TRISTATE.0);
    pub const IN_OUT_TRI: PortType = PortType(Self::IN.0 | Self::OUT.0 | Self::TRISTATE.0);

    pub fn has(self, flag: PortType) -> bool {
        self.0 & flag.0 == flag.0
    }

    pub fn union(self, flag: PortType) -> PortType {
        PortType(self.0 | flag.0)
    }

    pub fn remove(self, flag: PortType) -> PortType {
        PortType(self.0 & !flag.0)
    }

    /// Swap In and Out, keeping all other flags. Used for the internal face
    /// of a sub-schematic boundary port.
    pub fn switched_dir(self) -> PortType {
        let mut t = self.remove(PortType::IN).remove(PortType::OUT);
        if self.has(PortType::IN) {
            t = t.union(PortType::OUT);
        }
        if self.has(PortType::OUT) {
            t = t.union(PortType::IN);
        }
        t
    }
}

/// Bit-set of per-definition behavior flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompDefFlags(pub u32);

impl CompDefFlags {
    pub const NONE: CompDefFlags = CompDefFlags(0);
    pub const CAN_ROTATE: CompDefFlags = CompDefFlags(1 << 0);
    pub const HAS_BIT_WIDTH: CompDefFlags = CompDefFlags(1 << 1);
    pub const IS_ATOMIC: CompDefFlags = CompDefFlags(1 << 2);
    pub const WIRES_ONLY: CompDefFlags = CompDefFlags(1 << 3);

    pub fn has(self, flag: CompDefFlags) -> bool {
        self.0 & flag.0 == flag.0
    }

    pub fn union(self, flag: CompDefFlags) -> CompDefFlags {
        CompDefFlags(self.0 | flag.0)
    }
}

/// A port on a component definition. `pos` is relative to the comp's
/// un-rotated bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct CompPort {
    pub id: String,
    pub name: String,
    pub pos: Vec2,
    pub ty: PortType,
    pub width: u8,
}

impl CompPort {
    pub fn new(id: &str, name: &str, pos: Vec2, ty: PortType, width: u8) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            pos,
            ty,
            width,
        }
    }
}

/// A wire node's binding to a component port.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortRef {
    pub comp_id: String,
    pub port_id: String,
}

impl PortRef {
    pub fn new(comp_id: &str, port_id: &str) -> Self {
        Self {
            comp_id: comp_id.to_string(),
            port_id: port_id.to_string(),
        }
    }
}

/// Free-form component configuration: a JSON object, key order preserved so
/// text exports are byte-stable.
pub type CompArgs = Map<String, serde_json::Value>;

/// A placed component instance within a schematic.
///
/// Owned by exactly one schematic; edits go through copy-on-write helpers
/// that replace the comp wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct Comp {
    pub id: String,
    pub def_id: String,
    pub name: String,
    pub pos: Vec2,
    pub size: Vec2,
    /// Quarter turns, 0..4.
    pub rotation: u8,
    pub args: Option<CompArgs>,
    pub ports: Vec<CompPort>,
    pub flags: CompDefFlags,
    /// False when the definition id could not be found in the library; the
    /// comp then behaves as an inert placeholder.
    pub resolved: bool,
    pub has_sub_schematic: bool,
    pub sub_schematic_id: Option<String>,
    /// Rotated bounding box, derived from pos/size/rotation.
    pub bb: BoundingBox,
}

impl Comp {
    /// An unresolved placeholder comp; the library fills in the rest when the
    /// definition is known.
    pub fn placeholder(id: &str, def_id: &str) -> Self {
        Self {
            id: id.to_string(),
            def_id: def_id.to_string(),
            name: id.to_string(),
            pos: Vec2::ZERO,
            size: Vec2::ZERO,
            rotation: 0,
            args: None,
            ports: Vec::new(),
            flags: CompDefFlags::NONE,
            resolved: false,
            has_sub_schematic: false,
            sub_schematic_id: None,
            bb: BoundingBox::new(),
        }
    }

    /// Copy-on-write position update, recomputing the rotated bounding box.
    pub fn with_pos(&self, pos: Vec2) -> Comp {
        let mut c = self.clone();
        c.pos = pos;
        c.update_bb();
        c
    }

    /// Copy-on-write rotation update (wraps to 0..4).
    pub fn with_rotation(&self, rotation: u8) -> Comp {
        let mut c = self.clone();
        c.rotation = rotation % 4;
        c.update_bb();
        c
    }

    pub fn update_bb(&mut self) {
        self.bb = rotate_bbox_int(self.rotation, self.pos, self.size).shrink_in_place_xy(0.5);
    }

    /// World position of a port, applying the comp's rotation.
    pub fn port_world_pos(&self, port: &CompPort) -> Vec2 {
        self.pos.add(rotate_pos(self.rotation, port.pos))
    }

    pub fn port_by_id(&self, port_id: &str) -> Option<&CompPort> {
        self.ports.iter().find(|p| p.id == port_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_type_flags() {
        assert!(PortType::OUT_TRI.has(PortType::OUT));
        assert!(PortType::OUT_TRI.has(PortType::TRISTATE));
        assert!(!PortType::OUT_TRI.has(PortType::IN));
        assert!(PortType::IN_OUT_TRI.has(PortType::IN));
    }

    #[test]
    fn test_switched_dir_preserves_other_flags() {
        let t = PortType::IN.union(PortType::DATA);
        let s = t.switched_dir();
        assert!(s.has(PortType::OUT));
        assert!(!s.has(PortType::IN));
        assert!(s.has(PortType::DATA));

        let bidi = PortType::IN_OUT_TRI.switched_dir();
        assert!(bidi.has(PortType::IN) && bidi.has(PortType::OUT) && bidi.has(PortType::TRISTATE));
    }

    #[test]
    fn test_port_world_pos_rotated() {
        let mut comp = Comp::placeholder("c0", "test");
        comp.pos = Vec2::new(10.0, 10.0);
        comp.size = Vec2::new(4.0, 2.0);
        let port = CompPort::new("out", "O", Vec2::new(4.0, 1.0), PortType::OUT, 32);

        assert_eq!(comp.port_world_pos(&port), Vec2::new(14.0, 11.0));
        let rotated = comp.with_rotation(1);
        assert_eq!(rotated.port_world_pos(&port), Vec2::new(9.0, 14.0));
    }
}
