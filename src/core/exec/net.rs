use log::warn;

use crate::core::exec::exe_comp::{ExeComp, IoDir};

/// A port bound to a net, addressed by dense indexes into the system arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExePortRef {
    pub comp_idx: usize,
    pub port_idx: usize,
}

/// The resolved electrical net behind one wire.
///
/// `srcs` are the ports that may drive the net, `dests` the ports that
/// consume it. `value` holds the last successfully driven value; when the net
/// is floating or in conflict it goes stale rather than being zeroed.
#[derive(Debug, Clone)]
pub struct ExeNet {
    /// Flattened wire id (`parentId|` prefixes for nested schematics).
    pub wire_id: String,
    /// Max width over all bound ports.
    pub width: u8,
    pub value: u32,
    pub tristate: bool,
    /// Drivers currently enabled; anything other than 1 is abnormal.
    pub enabled_count: u32,
    /// Tristate net with zero enabled drivers and at least one consumer.
    pub floating: bool,
    pub srcs: Vec<ExePortRef>,
    pub dests: Vec<ExePortRef>,
}

impl ExeNet {
    pub fn new(wire_id: &str) -> Self {
        Self {
            wire_id: wire_id.to_string(),
            width: 1,
            value: 0,
            tristate: false,
            enabled_count: 0,
            floating: false,
            srcs: Vec::new(),
            dests: Vec::new(),
        }
    }
}

/// Propagate one net: count enabled drivers, and with exactly one driver copy
/// its value to every destination port.
///
/// Zero drivers on a tristate net with consumers marks the net floating;
/// more than one driver is a short circuit. In both cases the value is left
/// stale so the condition stays observable instead of decaying to logic 0.
pub fn resolve_net(comps: &mut [ExeComp], net: &mut ExeNet) {
    let mut enabled_count = 0u32;
    let mut driver: Option<ExePortRef> = None;

    for &src in &net.srcs {
        let port = &comps[src.comp_idx].ports[src.port_idx];
        if port.io_enabled && port.io_dir != IoDir::In {
            enabled_count += 1;
            if driver.is_none() {
                driver = Some(src);
            }
        }
    }

    net.enabled_count = enabled_count;
    net.floating = net.tristate && enabled_count == 0 && !net.dests.is_empty();

    if enabled_count > 1 {
        warn!(
            "net {} is short-circuited: {} enabled drivers",
            net.wire_id, enabled_count
        );
        return;
    }

    let driven = enabled_count == 1;
    if driven {
        if let Some(src) = driver {
            let port = &mut comps[src.comp_idx].ports[src.port_idx];
            port.io_dir = IoDir::Out;
            port.data_used = true;
            net.value = port.value;
        }
    }

    for &dest in &net.dests {
        let port = &mut comps[dest.comp_idx].ports[dest.port_idx];
        if driven {
            port.value = net.value;
            port.io_dir = IoDir::In;
            port.data_used = port.io_enabled;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::exec::exe_comp::{CompData, ExePort};
    use crate::core::model::{Comp, PortType};

    fn comp_with_ports(ports: Vec<ExePort>) -> ExeComp {
        ExeComp {
            full_id: "0".to_string(),
            comp: Comp::placeholder("0", "test"),
            ports,
            data: CompData::Empty,
            phases: Vec::new(),
            valid: true,
        }
    }

    fn two_drivers_one_dest(tristate: bool) -> (Vec<ExeComp>, ExeNet) {
        let ty = if tristate { PortType::OUT_TRI } else { PortType::OUT };
        let comps = vec![
            comp_with_ports(vec![ExePort::new(0, ty, 32)]),
            comp_with_ports(vec![ExePort::new(0, ty, 32)]),
            comp_with_ports(vec![ExePort::new(0, PortType::IN, 32)]),
        ];
        let mut net = ExeNet::new("0");
        net.width = 32;
        net.tristate = tristate;
        net.srcs = vec![
            ExePortRef { comp_idx: 0, port_idx: 0 },
            ExePortRef { comp_idx: 1, port_idx: 0 },
        ];
        net.dests = vec![ExePortRef { comp_idx: 2, port_idx: 0 }];
        (comps, net)
    }

    #[test]
    fn test_single_driver_propagates() {
        let (mut comps, mut net) = two_drivers_one_dest(true);
        comps[0].ports[0].value = 0xdead_beef;
        comps[1].ports[0].io_enabled = false;

        resolve_net(&mut comps, &mut net);
        assert_eq!(net.enabled_count, 1);
        assert!(!net.floating);
        assert_eq!(comps[2].ports[0].value, 0xdead_beef);
        assert!(comps[2].ports[0].data_used);
        assert_eq!(comps[0].ports[0].io_dir, IoDir::Out);
    }

    #[test]
    fn test_conflict_reported_not_arbitrated() {
        let (mut comps, mut net) = two_drivers_one_dest(true);
        comps[0].ports[0].value = 1;
        comps[1].ports[0].value = 2;
        comps[2].ports[0].value = 7;

        resolve_net(&mut comps, &mut net);
        assert_eq!(net.enabled_count, 2);
        // dest keeps its stale value
        assert_eq!(comps[2].ports[0].value, 7);
    }

    #[test]
    fn test_floating_flagged() {
        let (mut comps, mut net) = two_drivers_one_dest(true);
        comps[0].ports[0].io_enabled = false;
        comps[1].ports[0].io_enabled = false;
        net.value = 9;

        resolve_net(&mut comps, &mut net);
        assert_eq!(net.enabled_count, 0);
        assert!(net.floating);
        assert_eq!(net.value, 9);
    }

    #[test]
    fn test_disabled_dest_gets_value_but_not_data_used() {
        let (mut comps, mut net) = two_drivers_one_dest(false);
        comps[1].ports[0].io_enabled = false;
        comps[0].ports[0].value = 5;
        comps[2].ports[0].io_enabled = false;

        resolve_net(&mut comps, &mut net);
        assert_eq!(comps[2].ports[0].value, 5);
        assert!(!comps[2].ports[0].data_used);
    }
}
