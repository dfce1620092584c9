use crate::core::exec::exe_comp::{bit_width_mask, CompData, ExeComp, ExePort};
use crate::core::geom::Vec2;
use crate::core::library::{CompDef, ExeCompBuilder};
use crate::core::model::{CompPort, PortType};

fn reg1_output_phase(data: &mut CompData, ports: &mut [ExePort]) {
    if let CompData::Reg1 { out, value, .. } = data {
        ports[*out].value = *value;
        ports[*out].io_enabled = true;
    }
}

fn reg1_latch_phase(data: &mut CompData, ports: &mut [ExePort]) {
    if let CompData::Reg1 { inp, value, width, .. } = data {
        *value = ports[*inp].value & bit_width_mask(*width);
    }
}

/// Plain rising-edge register: drives its stored value every tick and latches
/// the input at the end of every tick.
fn build_reg1(mut builder: ExeCompBuilder) -> Result<ExeComp, String> {
    let inp = builder.get_port("in")?;
    let out = builder.get_port("out")?;
    builder.add_phase(reg1_output_phase, vec![], vec![out])?;
    builder.add_latch_phase(reg1_latch_phase, vec![inp], vec![])?;
    Ok(builder.build(CompData::Reg1 {
        inp,
        out,
        value: 0,
        width: 32,
    }))
}

// ctrl bit layout, (1 + 5) bits per channel: outA, outB, write
const CTRL_OUT_A_EN: u32 = 0;
const CTRL_OUT_B_EN: u32 = 6;
const CTRL_WRITE_EN: u32 = 12;

fn reg_file_read_phase(data: &mut CompData, ports: &mut [ExePort]) {
    if let CompData::RegFile {
        ctrl,
        out_a,
        out_b,
        file,
        ..
    } = data
    {
        let ctrl = ports[*ctrl].value;
        let a_enabled = (ctrl >> CTRL_OUT_A_EN) & 0b1 != 0;
        let b_enabled = (ctrl >> CTRL_OUT_B_EN) & 0b1 != 0;
        let a_reg = ((ctrl >> (CTRL_OUT_A_EN + 1)) & 0x1f) as usize;
        let b_reg = ((ctrl >> (CTRL_OUT_B_EN + 1)) & 0x1f) as usize;

        ports[*out_a].io_enabled = a_enabled;
        ports[*out_b].io_enabled = b_enabled;
        ports[*out_a].value = if a_enabled { file[a_reg] } else { 0 };
        ports[*out_b].value = if b_enabled { file[b_reg] } else { 0 };
    }
}

fn reg_file_write_phase(data: &mut CompData, ports: &mut [ExePort]) {
    if let CompData::RegFile {
        ctrl,
        inp,
        write_enabled,
        write_reg,
        write_data,
        ..
    } = data
    {
        let ctrl = ports[*ctrl].value;
        *write_enabled = (ctrl >> CTRL_WRITE_EN) & 0b1 != 0;
        *write_reg = ((ctrl >> (CTRL_WRITE_EN + 1)) & 0x1f) as usize;
        *write_data = ports[*inp].value;
    }
}

fn reg_file_latch_phase(data: &mut CompData, _ports: &mut [ExePort]) {
    if let CompData::RegFile {
        file,
        write_enabled,
        write_reg,
        write_data,
        ..
    } = data
    {
        // register 0 is hard-wired to zero
        if *write_enabled && *write_reg != 0 {
            file[*write_reg] = *write_data;
        }
    }
}

fn build_reg_file(mut builder: ExeCompBuilder) -> Result<ExeComp, String> {
    let ctrl = builder.get_port("ctrl")?;
    let inp = builder.get_port("in")?;
    let out_a = builder.get_port("outA")?;
    let out_b = builder.get_port("outB")?;
    builder.add_phase(reg_file_read_phase, vec![ctrl], vec![out_a, out_b])?;
    builder.add_phase(reg_file_write_phase, vec![ctrl, inp], vec![])?;
    builder.add_latch_phase(reg_file_latch_phase, vec![], vec![])?;
    Ok(builder.build(CompData::RegFile {
        ctrl,
        inp,
        out_a,
        out_b,
        file: Box::new([0; 32]),
        write_enabled: false,
        write_reg: 0,
        write_data: 0,
    }))
}

pub fn create_register_comps() -> Vec<CompDef> {
    let mut reg1 = CompDef::simple(
        "flipflop/reg1",
        "Register",
        Vec2::new(10.0, 2.0),
        vec![
            CompPort::new("in", "In", Vec2::new(0.0, 1.0), PortType::IN, 32),
            CompPort::new("out", "Out", Vec2::new(10.0, 1.0), PortType::OUT, 32),
        ],
    );
    reg1.alt_def_ids.push("reg1".to_string());
    reg1.build = Some(build_reg1);

    let mut reg32 = CompDef::simple(
        "flipflop/reg32",
        "Registers",
        Vec2::new(10.0, 24.0),
        vec![
            CompPort::new("ctrl", "Ctrl", Vec2::new(5.0, 0.0), PortType::IN, 18),
            CompPort::new("in", "In", Vec2::new(0.0, 3.0), PortType::IN, 32),
            CompPort::new("outA", "Out A", Vec2::new(10.0, 3.0), PortType::OUT_TRI, 32),
            CompPort::new("outB", "Out B", Vec2::new(10.0, 5.0), PortType::OUT_TRI, 32),
        ],
    );
    reg32.alt_def_ids.push("reg32Riscv".to_string());
    reg32.build = Some(build_reg_file);

    vec![reg1, reg32]
}
