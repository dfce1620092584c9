use crate::core::comps::arg_u8;
use crate::core::exec::exe_comp::{CompData, ExeComp, ExePort};
use crate::core::geom::Vec2;
use crate::core::library::{CompDef, ExeCompBuilder, PortsDef};
use crate::core::model::{CompArgs, CompDefFlags, CompPort, PortType};

const MUX_W: f64 = 2.0;
const MUX_H: f64 = 4.0;

fn mux2_ports(args: &CompArgs) -> Vec<CompPort> {
    let width = arg_u8(args, "bitWidth", 32);
    vec![
        CompPort::new("sel", "Select", Vec2::new(1.0, 0.0), PortType::IN, 1),
        CompPort::new("a", "A", Vec2::new(0.0, 1.0), PortType::IN, width),
        CompPort::new("b", "B", Vec2::new(0.0, 3.0), PortType::IN, width),
        CompPort::new("out", "Out", Vec2::new(MUX_W, 3.0), PortType::OUT, width),
    ]
}

fn mux2_init_config() -> CompArgs {
    let mut args = CompArgs::new();
    args.insert("bitWidth".into(), 32.into());
    args.insert("rotate".into(), 0.into());
    args
}

fn mux2_phase(data: &mut CompData, ports: &mut [ExePort]) {
    if let CompData::Mux2 { sel, a, b, out } = data {
        let take_a = ports[*sel].value == 0;
        ports[*out].value = if take_a { ports[*a].value } else { ports[*b].value };
        // the unselected leg is not consumed this tick
        ports[*a].io_enabled = take_a;
        ports[*b].io_enabled = !take_a;
    }
}

fn build_mux2(mut builder: ExeCompBuilder) -> Result<ExeComp, String> {
    let sel = builder.get_port("sel")?;
    let a = builder.get_port("a")?;
    let b = builder.get_port("b")?;
    let out = builder.get_port("out")?;
    builder.add_phase(mux2_phase, vec![sel, a, b], vec![out])?;
    Ok(builder.build(CompData::Mux2 { sel, a, b, out }))
}

pub fn create_mux_comps() -> Vec<CompDef> {
    let mut mux2 = CompDef::simple("mux/mux2", "Mux", Vec2::new(MUX_W, MUX_H), Vec::new());
    mux2.alt_def_ids.push("mux2".to_string());
    mux2.flags = CompDefFlags::CAN_ROTATE.union(CompDefFlags::HAS_BIT_WIDTH);
    mux2.ports = PortsDef::FromConfig(mux2_ports);
    mux2.init_config = Some(mux2_init_config);
    mux2.build = Some(build_mux2);
    vec![mux2]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::library::CompLibrary;

    #[test]
    fn test_mux_selects_and_disables_other_leg() {
        let mut lib = CompLibrary::new();
        for def in create_mux_comps() {
            lib.add_comp(def);
        }
        let comp = lib.create("mux/mux2", None);
        let mut exe = lib.build(&comp, "0").unwrap();

        exe.ports[1].value = 11;
        exe.ports[2].value = 22;

        exe.ports[0].value = 0;
        exe.run_phase(0);
        assert_eq!(exe.ports[3].value, 11);
        assert!(exe.ports[1].io_enabled);
        assert!(!exe.ports[2].io_enabled);

        exe.ports[0].value = 1;
        exe.run_phase(0);
        assert_eq!(exe.ports[3].value, 22);
        assert!(!exe.ports[1].io_enabled);
        assert!(exe.ports[2].io_enabled);
    }
}
