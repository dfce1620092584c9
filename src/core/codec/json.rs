//! JSON persistence form ("LS" for local-storage heritage). Unlike the text
//! format this carries the full editing state: sub-schematic linkage, the
//! boundary box and port layout of schematics that implement a component.

use serde::{Deserialize, Serialize};

use crate::core::geom::{BoundingBox, Vec2};
use crate::core::library::CompLibrary;
use crate::core::model::{
    check_wires, fix_wire, CompArgs, CompPort, PortRef, PortType, Schematic, WireGraph, WireNode,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LsSchematic {
    pub id: String,
    pub name: String,
    #[serde(rename = "parentCompDefId", skip_serializing_if = "Option::is_none")]
    pub parent_comp_def_id: Option<String>,
    #[serde(rename = "compBbox", skip_serializing_if = "Option::is_none")]
    pub comp_bbox: Option<LsBbox>,
    #[serde(rename = "compArgs", skip_serializing_if = "Option::is_none")]
    pub comp_args: Option<LsCompArgs>,
    pub wires: Vec<LsWire>,
    pub comps: Vec<LsComp>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LsWire {
    pub nodes: Vec<LsWireNode>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LsWireNode {
    pub id: usize,
    pub x: f64,
    pub y: f64,
    pub edges: Vec<usize>,
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub port_ref: Option<LsNodeRef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LsNodeRef {
    pub id: String,
    #[serde(rename = "compNodeId")]
    pub comp_node_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LsComp {
    pub id: String,
    #[serde(rename = "defId")]
    pub def_id: String,
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<CompArgs>,
    #[serde(rename = "subSchematicId", skip_serializing_if = "Option::is_none")]
    pub sub_schematic_id: Option<String>,
}

/// Outer boundary of a schematic that implements a component definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LsCompArgs {
    pub w: f64,
    pub h: f64,
    pub ports: Vec<LsCompPort>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LsCompPort {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub ty: PortType,
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LsBbox {
    #[serde(rename = "minX")]
    pub min_x: f64,
    #[serde(rename = "minY")]
    pub min_y: f64,
    #[serde(rename = "maxX")]
    pub max_x: f64,
    #[serde(rename = "maxY")]
    pub max_y: f64,
}

pub fn schematic_to_ls(schematic: &Schematic) -> LsSchematic {
    let comps = schematic
        .comps
        .iter()
        .map(|c| LsComp {
            id: c.id.clone(),
            def_id: c.def_id.clone(),
            x: c.pos.x,
            y: c.pos.y,
            r: (c.rotation != 0).then_some(c.rotation),
            args: c.args.as_ref().filter(|a| !a.is_empty()).cloned(),
            sub_schematic_id: c.sub_schematic_id.clone(),
        })
        .collect();

    let wires = schematic
        .wires
        .iter()
        .map(|w| LsWire {
            nodes: w
                .nodes
                .iter()
                .map(|n| LsWireNode {
                    id: n.id,
                    x: n.pos.x,
                    y: n.pos.y,
                    edges: n.edges.clone(),
                    port_ref: n.port_ref.as_ref().map(|r| LsNodeRef {
                        id: r.comp_id.clone(),
                        comp_node_id: r.port_id.clone(),
                    }),
                })
                .collect(),
        })
        .collect();

    let comp_args = (schematic.comp_size.len() >= 0.001).then(|| LsCompArgs {
        w: schematic.comp_size.x,
        h: schematic.comp_size.y,
        ports: schematic
            .comp_ports
            .iter()
            .map(|p| LsCompPort {
                id: p.id.clone(),
                name: p.name.clone(),
                ty: p.ty,
                x: p.pos.x,
                y: p.pos.y,
                width: (p.width != 1).then_some(p.width),
            })
            .collect(),
    });

    let comp_bbox = (!schematic.comp_bbox.empty).then(|| LsBbox {
        min_x: schematic.comp_bbox.min.x,
        min_y: schematic.comp_bbox.min.y,
        max_x: schematic.comp_bbox.max.x,
        max_y: schematic.comp_bbox.max.y,
    });

    LsSchematic {
        id: schematic.id.clone(),
        name: schematic.name.clone(),
        parent_comp_def_id: schematic.parent_comp_def_id.clone(),
        comp_bbox,
        comp_args,
        wires,
        comps,
    }
}

/// Hydrate a schematic from its persisted form.
///
/// Comps are recreated through the library so init configs merge and port
/// layouts come from the current definition, not the stored file. Wire graphs
/// are repaired (`fix_wire`), empty wires dropped, and the invariant checker
/// run so a damaged file degrades to logged issues instead of a broken model.
pub fn schematic_from_ls(ls: &LsSchematic, library: &CompLibrary) -> Schematic {
    let mut schematic = Schematic::new(&ls.id, &ls.name);
    schematic.parent_comp_def_id = ls.parent_comp_def_id.clone();

    for ls_comp in &ls.comps {
        let mut comp = library.create(&ls_comp.def_id, ls_comp.args.as_ref());
        comp.id = ls_comp.id.clone();
        comp.pos = Vec2::new(ls_comp.x, ls_comp.y);
        comp.rotation = ls_comp.r.unwrap_or_else(|| {
            ls_comp
                .args
                .as_ref()
                .and_then(|a| a.get("rotate"))
                .and_then(|v| v.as_u64())
                .unwrap_or(0) as u8
        }) % 4;
        comp.sub_schematic_id = ls_comp.sub_schematic_id.clone();
        library.update_comp_from_def(&mut comp);
        schematic.comps.push(comp);
    }

    for (idx, ls_wire) in ls.wires.iter().enumerate() {
        let mut wire = WireGraph::new(&idx.to_string());
        for (node_idx, ls_node) in ls_wire.nodes.iter().enumerate() {
            let mut node = WireNode::new(node_idx, Vec2::new(ls_node.x, ls_node.y));
            node.edges = ls_node.edges.clone();
            node.port_ref = ls_node
                .port_ref
                .as_ref()
                .map(|r| PortRef::new(&r.id, &r.comp_node_id));
            wire.nodes.push(node);
        }
        let wire = fix_wire(&wire);
        if !wire.nodes.is_empty() {
            schematic.wires.push(wire);
        }
    }
    check_wires(&schematic.wires, "schematicFromLs");

    if let Some(args) = &ls.comp_args {
        schematic.comp_size = Vec2::new(args.w, args.h);
        schematic.comp_ports = args
            .ports
            .iter()
            .map(|p| CompPort::new(&p.id, &p.name, Vec2::new(p.x, p.y), p.ty, p.width.unwrap_or(1)))
            .collect();
    }
    if let Some(bb) = &ls.comp_bbox {
        schematic.comp_bbox = BoundingBox::from_min_max(
            Vec2::new(bb.min_x, bb.min_y),
            Vec2::new(bb.max_x, bb.max_y),
        );
    }

    schematic.recompute_next_ids();
    schematic
}

pub fn export_schematic_json(schematic: &Schematic) -> Result<String, String> {
    serde_json::to_string(&schematic_to_ls(schematic))
        .map_err(|e| format!("failed to serialize schematic: {}", e))
}

pub fn import_schematic_json(json: &str, library: &CompLibrary) -> Result<Schematic, String> {
    let ls: LsSchematic =
        serde_json::from_str(json).map_err(|e| format!("failed to parse schematic json: {}", e))?;
    Ok(schematic_from_ls(&ls, library))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::comps::build_comp_library;

    fn sample_json() -> &'static str {
        concat!(
            "{\"id\":\"c-abc12345\",\"name\":\"pc counter\",",
            "\"wires\":[{\"nodes\":[",
            "{\"id\":0,\"x\":4,\"y\":0,\"edges\":[1],\"ref\":{\"id\":\"0\",\"compNodeId\":\"out\"}},",
            "{\"id\":1,\"x\":8,\"y\":0,\"edges\":[0]}]}],",
            "\"comps\":[{\"id\":\"0\",\"defId\":\"core/io/const32\",\"x\":0,\"y\":0,",
            "\"args\":{\"value\":4,\"bitWidth\":32}}]}"
        )
    }

    #[test]
    fn test_hydration_resolves_comps_through_library() {
        let library = build_comp_library();
        let s = import_schematic_json(sample_json(), &library).unwrap();

        assert_eq!(s.comps.len(), 1);
        let comp = &s.comps[0];
        assert!(comp.resolved);
        assert_eq!(comp.def_id, "core/io/const32");
        assert_eq!(comp.ports.len(), 1);
        // stored args merge over the definition's init config
        let args = comp.args.as_ref().unwrap();
        assert_eq!(args.get("value").unwrap().as_u64(), Some(4));
        assert_eq!(args.get("valueMode").unwrap().as_u64(), Some(0));
    }

    #[test]
    fn test_hydration_repairs_wires_and_next_ids() {
        let library = build_comp_library();
        let s = import_schematic_json(sample_json(), &library).unwrap();

        assert_eq!(s.wires.len(), 1);
        assert_eq!(s.wires[0].id, "0");
        assert_eq!(s.wires[0].nodes[0].edges, vec![1]);
        assert_eq!(s.wires[0].nodes[1].edges, vec![0]);
        assert_eq!(
            s.wires[0].nodes[0].port_ref,
            Some(PortRef::new("0", "out"))
        );
        assert_eq!(s.next_comp_id, 1);
        assert_eq!(s.next_wire_id, 1);
    }

    #[test]
    fn test_rotation_from_r_then_args_rotate() {
        let library = build_comp_library();
        let json = "{\"id\":\"s\",\"name\":\"n\",\"wires\":[],\"comps\":[\
            {\"id\":\"0\",\"defId\":\"core/gate/and\",\"x\":0,\"y\":0,\"args\":{\"rotate\":2}},\
            {\"id\":\"1\",\"defId\":\"core/gate/and\",\"x\":0,\"y\":0,\"r\":3,\"args\":{\"rotate\":2}}]}";
        let s = import_schematic_json(json, &library).unwrap();
        assert_eq!(s.comps[0].rotation, 2);
        assert_eq!(s.comps[1].rotation, 3);
    }

    #[test]
    fn test_round_trip_preserves_model() {
        let library = build_comp_library();
        let s = import_schematic_json(sample_json(), &library).unwrap();
        let json = export_schematic_json(&s).unwrap();
        let s2 = import_schematic_json(&json, &library).unwrap();

        assert_eq!(s.comps, s2.comps);
        assert_eq!(s.wires, s2.wires);
        assert_eq!(s.id, s2.id);
        assert_eq!(s.name, s2.name);
    }

    #[test]
    fn test_comp_args_emitted_only_for_boundary_schematics() {
        let mut s = Schematic::new("s", "n");
        let ls = schematic_to_ls(&s);
        assert!(ls.comp_args.is_none());

        s.comp_size = Vec2::new(6.0, 6.0);
        s.comp_ports
            .push(CompPort::new("a", "A", Vec2::new(0.0, 3.0), PortType::IN, 32));
        let ls = schematic_to_ls(&s);
        let args = ls.comp_args.unwrap();
        assert_eq!(args.w, 6.0);
        assert_eq!(args.ports.len(), 1);
        assert_eq!(args.ports[0].width, Some(32));
    }
}
