use crate::core::comps::{arg_bool, arg_f64, arg_u32, arg_u8};
use crate::core::exec::exe_comp::{bit_width_mask, CompData, ExeComp, ExePort};
use crate::core::geom::Vec2;
use crate::core::library::{CompDef, ExeCompBuilder, PortsDef};
use crate::core::model::{Comp, CompArgs, CompPort, PortType};

/// Which edge of the comp rectangle the port sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortPlacement {
    Right,
    Bottom,
    Left,
    Top,
}

impl PortPlacement {
    pub fn from_u32(v: u32) -> Self {
        match v {
            1 => PortPlacement::Bottom,
            2 => PortPlacement::Left,
            3 => PortPlacement::Top,
            _ => PortPlacement::Right,
        }
    }
}

/// Port position on the edge named by `placement`, snapped to the grid
/// midpoint of a w x h comp.
pub fn port_placement_to_pos(placement: PortPlacement, w: f64, h: f64) -> Vec2 {
    let mid_x = (w / 2.0).floor();
    let mid_y = (h / 2.0).floor();
    match placement {
        PortPlacement::Right => Vec2::new(w, mid_y),
        PortPlacement::Bottom => Vec2::new(mid_x, h),
        PortPlacement::Left => Vec2::new(0.0, mid_y),
        PortPlacement::Top => Vec2::new(mid_x, 0.0),
    }
}

fn boundary_ports(args: &CompArgs) -> Vec<CompPort> {
    let declared = PortType(arg_u32(args, "type", PortType::OUT.0));
    let width = arg_u8(args, "bitWidth", 1);
    let w = arg_f64(args, "w", 6.0);
    let h = arg_f64(args, "h", 6.0);
    let placement = PortPlacement::from_u32(arg_u32(args, "portPos", 0));
    let pos = port_placement_to_pos(placement, w, h);

    // The internal face carries the switched direction: a port declared as an
    // input of the sub-schematic acts as a source inside it.
    vec![CompPort::new("a", "", pos, declared.switched_dir(), width)]
}

fn boundary_init_config() -> CompArgs {
    let mut args = CompArgs::new();
    args.insert("portId".into(), "".into());
    args.insert("name".into(), "".into());
    args.insert("w".into(), 6.into());
    args.insert("h".into(), 6.into());
    args.insert("type".into(), PortType::OUT.0.into());
    args.insert("portPos".into(), 0.into());
    args.insert("bitWidth".into(), 1.into());
    args.insert("signed".into(), false.into());
    args.insert("valueMode".into(), 0.into());
    args.insert("inputOverride".into(), false.into());
    args.insert("inputValueOverride".into(), 0.into());
    args
}

fn boundary_apply_config(comp: &mut Comp, args: &CompArgs) {
    comp.size = Vec2::new(arg_f64(args, "w", 6.0), arg_f64(args, "h", 6.0));
}

fn input_phase(data: &mut CompData, ports: &mut [ExePort]) {
    if let CompData::BoundaryPort {
        port,
        external_port,
        external_bound,
        value,
        ..
    } = data
    {
        if *external_bound {
            *value = ports[*external_port].value;
        }
        ports[*port].value = *value;
        ports[*port].io_enabled = true;
    }
}

fn output_phase(data: &mut CompData, ports: &mut [ExePort]) {
    if let CompData::BoundaryPort {
        port,
        external_port,
        external_bound,
        value,
        ..
    } = data
    {
        *value = ports[*port].value;
        if *external_bound {
            ports[*external_port].value = *value;
        }
        ports[*port].io_enabled = true;
    }
}

fn build_boundary_port(mut builder: ExeCompBuilder) -> Result<ExeComp, String> {
    let args = builder.comp().args.clone().unwrap_or_default();

    let declared = PortType(arg_u32(&args, "type", PortType::OUT.0));
    let width = arg_u8(&args, "bitWidth", 1);
    let is_input = declared.has(PortType::IN);

    let port = builder.get_port("a")?;
    let external_port = builder.add_external_port("_b", declared, width);

    let value = if is_input && arg_bool(&args, "inputOverride", false) {
        arg_u32(&args, "inputValueOverride", 0) & bit_width_mask(width)
    } else {
        0
    };

    if is_input {
        builder.add_phase(input_phase, vec![external_port], vec![port])?;
    } else {
        builder.add_phase(output_phase, vec![port], vec![external_port])?;
    }

    Ok(builder.build(CompData::BoundaryPort {
        port,
        external_port,
        external_bound: false,
        is_input,
        value,
    }))
}

pub fn create_comp_io_comps() -> Vec<CompDef> {
    let mut comp_port = CompDef::simple("comp/port", "Port", Vec2::new(6.0, 6.0), Vec::new());
    comp_port.ports = PortsDef::FromConfig(boundary_ports);
    comp_port.init_config = Some(boundary_init_config);
    comp_port.apply_config = Some(boundary_apply_config);
    comp_port.build = Some(build_boundary_port);
    vec![comp_port]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::library::CompLibrary;

    fn library() -> CompLibrary {
        let mut lib = CompLibrary::new();
        for def in create_comp_io_comps() {
            lib.add_comp(def);
        }
        lib
    }

    #[test]
    fn test_port_placement_positions() {
        assert_eq!(port_placement_to_pos(PortPlacement::Right, 6.0, 6.0), Vec2::new(6.0, 3.0));
        assert_eq!(port_placement_to_pos(PortPlacement::Bottom, 6.0, 6.0), Vec2::new(3.0, 6.0));
        assert_eq!(port_placement_to_pos(PortPlacement::Left, 5.0, 3.0), Vec2::new(0.0, 1.0));
        assert_eq!(port_placement_to_pos(PortPlacement::Top, 5.0, 3.0), Vec2::new(2.0, 0.0));
    }

    #[test]
    fn test_internal_port_has_switched_dir() {
        let lib = library();
        let mut args = CompArgs::new();
        args.insert("type".into(), PortType::IN.0.into());
        args.insert("bitWidth".into(), 32.into());
        let comp = lib.create("comp/port", Some(&args));

        // declared In: the internal face drives, so it is Out
        assert_eq!(comp.ports.len(), 1);
        assert!(comp.ports[0].ty.has(PortType::OUT));
        assert!(!comp.ports[0].ty.has(PortType::IN));
        assert_eq!(comp.ports[0].width, 32);
    }

    #[test]
    fn test_size_from_config() {
        let lib = library();
        let mut args = CompArgs::new();
        args.insert("w".into(), 8.into());
        args.insert("h".into(), 2.into());
        let comp = lib.create("comp/port", Some(&args));
        assert_eq!(comp.size, Vec2::new(8.0, 2.0));
    }

    #[test]
    fn test_input_override_feeds_internal_port() {
        let lib = library();
        let mut args = CompArgs::new();
        args.insert("type".into(), PortType::IN.0.into());
        args.insert("bitWidth".into(), 8.into());
        args.insert("inputOverride".into(), true.into());
        args.insert("inputValueOverride".into(), 0x1ff.into());
        let comp = lib.create("comp/port", Some(&args));
        let mut exe = lib.build(&comp, "0").unwrap();

        exe.run_phase(0);
        // masked to 8 bits
        assert_eq!(exe.ports[0].value, 0xff);
    }

    #[test]
    fn test_output_side_copies_to_external_when_bound() {
        let lib = library();
        let mut args = CompArgs::new();
        args.insert("type".into(), PortType::OUT.0.into());
        args.insert("bitWidth".into(), 32.into());
        let comp = lib.create("comp/port", Some(&args));
        let mut exe = lib.build(&comp, "0").unwrap();

        if let CompData::BoundaryPort { external_bound, .. } = &mut exe.data {
            *external_bound = true;
        }
        exe.ports[0].value = 42;
        exe.run_phase(0);
        assert_eq!(exe.ports[1].value, 42);
    }
}
